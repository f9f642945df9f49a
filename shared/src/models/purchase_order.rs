//! Purchase order model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Purchase order lifecycle status
///
/// PENDING -> APPROVED -> FULFILLED, with CANCELLED reachable from
/// PENDING and APPROVED. FULFILLED and CANCELLED are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseOrderStatus {
    #[default]
    Pending,
    Approved,
    Fulfilled,
    Cancelled,
}

/// One requested item line on a purchase order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLine {
    pub item_id: String,
    pub quantity: f64,
}

/// Purchase order entity
///
/// `code` is sequential (`PED-NNNNNN`, strictly increasing numeric
/// suffix). Transition attribution fields are filled by the state
/// machine as the order moves through its lifecycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseOrder {
    pub id: String,
    pub code: String,
    pub status: PurchaseOrderStatus,
    pub request_date: DateTime<Utc>,
    pub requester_id: String,
    pub items: Vec<OrderLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fulfilled_by_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_by_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
}

/// Create purchase order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderDraft {
    pub requester_id: String,
    pub items: Vec<OrderLine>,
    pub notes: Option<String>,
}
