//! Purchase order lifecycle
//!
//! PENDING -> APPROVED -> FULFILLED, with CANCELLED reachable from
//! PENDING and APPROVED. FULFILLED and CANCELLED are terminal. An order
//! may be fulfilled straight from PENDING; approval is then backfilled
//! with the fulfilling actor at the identical timestamp.

use chrono::{DateTime, Utc};
use shared::{PurchaseOrder, PurchaseOrderStatus};

use crate::common::error::StoreError;

/// Order code prefix; suffix is a zero-padded strictly increasing integer
pub const CODE_PREFIX: &str = "PED-";

/// Next sequential order code
///
/// Takes the maximum numeric suffix among existing codes and increments
/// (max + 1, never count + 1 — gaps left by unparsable codes don't get
/// reused). Starts at 1 when no order exists.
pub fn next_code(orders: &[PurchaseOrder]) -> String {
    let max = orders
        .iter()
        .filter_map(|o| o.code.strip_prefix(CODE_PREFIX))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    format!("{CODE_PREFIX}{:06}", max + 1)
}

/// Whether a status change is legal
pub fn can_transition(from: PurchaseOrderStatus, to: PurchaseOrderStatus) -> bool {
    use PurchaseOrderStatus::*;
    matches!(
        (from, to),
        (Pending, Approved)
            | (Pending, Fulfilled)
            | (Pending, Cancelled)
            | (Approved, Fulfilled)
            | (Approved, Cancelled)
    )
}

/// Side effect a transition asks of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Status changed; nothing else to do
    None,
    /// Order entered FULFILLED for the first time; credit its lines
    /// into stock
    CreditStock,
    /// Requested state equals the current state; idempotent no-op
    AlreadyApplied,
}

/// Apply a status transition in place
///
/// Records the attribution fields for the target state. Requesting the
/// state the order is already in is an idempotent no-op (in particular,
/// re-fulfilling moves no stock and rewrites no dates). An illegal
/// transition fails without touching the order.
pub fn apply_transition(
    order: &mut PurchaseOrder,
    to: PurchaseOrderStatus,
    responsible_id: &str,
    reason: Option<String>,
    now: DateTime<Utc>,
) -> Result<TransitionEffect, StoreError> {
    if order.status == to {
        return Ok(TransitionEffect::AlreadyApplied);
    }
    if !can_transition(order.status, to) {
        return Err(StoreError::InvalidTransition {
            from: order.status,
            to,
        });
    }

    let effect = match to {
        PurchaseOrderStatus::Approved => {
            order.approval_date = Some(now);
            order.approved_by_id = Some(responsible_id.to_string());
            TransitionEffect::None
        }
        PurchaseOrderStatus::Fulfilled => {
            if order.approval_date.is_none() {
                // Fulfilled straight from PENDING: the fulfilling actor
                // doubles as the approver, at the same instant.
                order.approval_date = Some(now);
                order.approved_by_id = Some(responsible_id.to_string());
            }
            order.fulfilled_date = Some(now);
            order.fulfilled_by_id = Some(responsible_id.to_string());
            TransitionEffect::CreditStock
        }
        PurchaseOrderStatus::Cancelled => {
            order.cancellation_date = Some(now);
            order.cancelled_by_id = Some(responsible_id.to_string());
            order.cancellation_reason = reason;
            TransitionEffect::None
        }
        // can_transition admits no edge into PENDING
        PurchaseOrderStatus::Pending => unreachable!("no transition re-enters PENDING"),
    };

    order.status = to;
    Ok(effect)
}
