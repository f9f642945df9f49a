//! Append-only stock ledger
//!
//! Every warehouse item's `stock_quantity` is the running sum of its
//! `stock_history` deltas. Nothing in the history is ever rewritten: an
//! edit of the originating document appends a compensating entry.
//!
//! Zero net deltas append nothing, so editing a document without changing
//! quantities leaves the ledger silent. Stock may go negative; the ledger
//! enforces no floor.

use chrono::{DateTime, Utc};
use shared::{MaintenanceLog, PurchaseOrder, StockHistoryLog, StockReason, WarehouseItem};
use std::collections::BTreeMap;

/// Append one signed movement to an item
///
/// Returns whether an entry was appended; a zero delta is a no-op.
pub fn apply_delta(
    item: &mut WarehouseItem,
    date: DateTime<Utc>,
    quantity_change: f64,
    reason: StockReason,
    reference_id: Option<String>,
    invoice_number: Option<String>,
) -> bool {
    if quantity_change == 0.0 {
        return false;
    }
    let new_stock_level = item.stock_quantity + quantity_change;
    item.stock_history.push(StockHistoryLog {
        date,
        quantity_change,
        new_stock_level,
        reason,
        reference_id,
        invoice_number,
    });
    item.stock_quantity = new_stock_level;
    true
}

/// Debit every part consumed by a maintenance service
///
/// A part referencing an unknown item moves no stock; the anomaly is
/// logged and the remaining parts still apply.
pub fn consume_parts(items: &mut [WarehouseItem], log: &MaintenanceLog) {
    for part in &log.parts_used {
        match items.iter_mut().find(|i| i.id == part.item_id) {
            Some(item) => {
                apply_delta(
                    item,
                    log.date,
                    -part.quantity,
                    StockReason::MaintenanceExit,
                    Some(log.id.clone()),
                    None,
                );
            }
            None => tracing::warn!(
                item_id = %part.item_id,
                log_id = %log.id,
                "Maintenance part references unknown warehouse item; stock not moved"
            ),
        }
    }
}

/// Compensate stock for an edited maintenance log
///
/// Per affected item, net delta = old consumed quantity - new consumed
/// quantity, applied as at most one `MaintenanceEditAdjustment` entry.
/// Removing a part restores its full originally consumed amount; an
/// unchanged quantity appends nothing.
pub fn adjust_for_log_edit(
    items: &mut [WarehouseItem],
    old: &MaintenanceLog,
    new: &MaintenanceLog,
    now: DateTime<Utc>,
) {
    let mut net: BTreeMap<&str, f64> = BTreeMap::new();
    for part in &old.parts_used {
        *net.entry(part.item_id.as_str()).or_default() += part.quantity;
    }
    for part in &new.parts_used {
        *net.entry(part.item_id.as_str()).or_default() -= part.quantity;
    }

    for (item_id, delta) in net {
        if delta == 0.0 {
            continue;
        }
        match items.iter_mut().find(|i| i.id == item_id) {
            Some(item) => {
                apply_delta(
                    item,
                    now,
                    delta,
                    StockReason::MaintenanceEditAdjustment,
                    Some(new.id.clone()),
                    None,
                );
            }
            None => tracing::warn!(
                item_id = %item_id,
                log_id = %new.id,
                "Maintenance edit references unknown warehouse item; stock not moved"
            ),
        }
    }
}

/// Credit every order line of a fulfilled purchase order into stock
///
/// The caller guards against re-crediting: this runs only when the order
/// enters FULFILLED for the first time.
pub fn credit_purchase(items: &mut [WarehouseItem], order: &PurchaseOrder, now: DateTime<Utc>) {
    for line in &order.items {
        match items.iter_mut().find(|i| i.id == line.item_id) {
            Some(item) => {
                apply_delta(
                    item,
                    now,
                    line.quantity,
                    StockReason::PurchaseReceipt,
                    Some(order.id.clone()),
                    None,
                );
            }
            None => tracing::warn!(
                item_id = %line.item_id,
                order_code = %order.code,
                "Fulfilled order line references unknown warehouse item; stock not moved"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{MaintenanceType, OrderLine, PartUsage, PurchaseOrderStatus};

    fn item(id: &str, quantity: f64) -> WarehouseItem {
        let now = Utc::now();
        let mut item = WarehouseItem {
            id: id.to_string(),
            code: format!("CODE-{id}"),
            name: format!("Item {id}"),
            unit_value: 10.0,
            stock_quantity: 0.0,
            created_at: now,
            stock_history: vec![],
        };
        apply_delta(&mut item, now, quantity, StockReason::InitialEntry, None, None);
        item
    }

    fn maint_log(id: &str, parts: Vec<(&str, f64)>) -> MaintenanceLog {
        MaintenanceLog {
            id: id.to_string(),
            machine_id: "machine:1".to_string(),
            collaborator_id: "collab:1".to_string(),
            date: Utc::now(),
            maintenance_type: MaintenanceType::OilChange,
            hour_meter: 100.0,
            total_cost: 50.0,
            parts_used: parts
                .into_iter()
                .map(|(item_id, quantity)| PartUsage {
                    item_id: item_id.to_string(),
                    quantity,
                })
                .collect(),
            notes: None,
        }
    }

    fn ledger_sum(item: &WarehouseItem) -> f64 {
        item.stock_history.iter().map(|h| h.quantity_change).sum()
    }

    #[test]
    fn test_zero_delta_appends_nothing() {
        let mut it = item("item:1", 5.0);
        let appended = apply_delta(&mut it, Utc::now(), 0.0, StockReason::ManualAdjustment, None, None);
        assert!(!appended);
        assert_eq!(it.stock_history.len(), 1);
        assert_eq!(it.stock_quantity, 5.0);
    }

    #[test]
    fn test_running_total_invariant() {
        let mut it = item("item:1", 5.0);
        apply_delta(&mut it, Utc::now(), -3.0, StockReason::MaintenanceExit, None, None);
        apply_delta(&mut it, Utc::now(), 10.0, StockReason::InvoiceEntry, None, None);

        assert_eq!(it.stock_quantity, 12.0);
        assert_eq!(ledger_sum(&it), it.stock_quantity);
        for window in it.stock_history.windows(2) {
            assert_eq!(
                window[1].new_stock_level,
                window[0].new_stock_level + window[1].quantity_change
            );
        }
    }

    #[test]
    fn test_stock_may_go_negative() {
        let mut it = item("item:1", 2.0);
        apply_delta(&mut it, Utc::now(), -5.0, StockReason::MaintenanceExit, None, None);
        assert_eq!(it.stock_quantity, -3.0);
        assert_eq!(ledger_sum(&it), -3.0);
    }

    #[test]
    fn test_consume_parts_skips_unknown_items() {
        let mut items = vec![item("item:1", 10.0)];
        let log = maint_log("maint:1", vec![("item:1", 4.0), ("item:missing", 2.0)]);
        consume_parts(&mut items, &log);

        assert_eq!(items[0].stock_quantity, 6.0);
        let last = items[0].stock_history.last().unwrap();
        assert_eq!(last.reason, StockReason::MaintenanceExit);
        assert_eq!(last.reference_id.as_deref(), Some("maint:1"));
    }

    #[test]
    fn test_edit_raising_consumption_appends_one_entry() {
        // Quantity 3 -> 5 on an item holding 3 produces exactly one -2 entry.
        let mut items = vec![item("item:1", 3.0)];
        let old = maint_log("maint:1", vec![("item:1", 3.0)]);
        consume_parts(&mut items, &old);
        assert_eq!(items[0].stock_quantity, 0.0);
        let history_len = items[0].stock_history.len();

        let new = maint_log("maint:1", vec![("item:1", 5.0)]);
        adjust_for_log_edit(&mut items, &old, &new, Utc::now());

        assert_eq!(items[0].stock_history.len(), history_len + 1);
        let last = items[0].stock_history.last().unwrap();
        assert_eq!(last.quantity_change, -2.0);
        assert_eq!(last.reason, StockReason::MaintenanceEditAdjustment);
        assert_eq!(items[0].stock_quantity, -2.0);
    }

    #[test]
    fn test_edit_removing_part_restores_original_amount() {
        let mut items = vec![item("item:1", 10.0)];
        let old = maint_log("maint:1", vec![("item:1", 4.0)]);
        consume_parts(&mut items, &old);
        assert_eq!(items[0].stock_quantity, 6.0);

        let new = maint_log("maint:1", vec![]);
        adjust_for_log_edit(&mut items, &old, &new, Utc::now());

        assert_eq!(items[0].stock_quantity, 10.0);
        let last = items[0].stock_history.last().unwrap();
        assert_eq!(last.quantity_change, 4.0);
    }

    #[test]
    fn test_edit_with_unchanged_quantities_is_silent() {
        let mut items = vec![item("item:1", 10.0)];
        let old = maint_log("maint:1", vec![("item:1", 4.0)]);
        consume_parts(&mut items, &old);
        let history_len = items[0].stock_history.len();

        // Same parts, different notes: no ledger noise.
        let new = maint_log("maint:1", vec![("item:1", 4.0)]);
        adjust_for_log_edit(&mut items, &old, &new, Utc::now());
        assert_eq!(items[0].stock_history.len(), history_len);
    }

    #[test]
    fn test_credit_purchase_credits_each_line() {
        let mut items = vec![item("item:1", 1.0), item("item:2", 0.0)];
        let order = PurchaseOrder {
            id: "po:1".to_string(),
            code: "PED-000001".to_string(),
            status: PurchaseOrderStatus::Fulfilled,
            request_date: Utc::now(),
            requester_id: "collab:1".to_string(),
            items: vec![
                OrderLine {
                    item_id: "item:1".to_string(),
                    quantity: 5.0,
                },
                OrderLine {
                    item_id: "item:2".to_string(),
                    quantity: 2.0,
                },
            ],
            notes: None,
            approval_date: None,
            approved_by_id: None,
            fulfilled_date: None,
            fulfilled_by_id: None,
            cancellation_date: None,
            cancelled_by_id: None,
            cancellation_reason: None,
        };
        credit_purchase(&mut items, &order, Utc::now());

        assert_eq!(items[0].stock_quantity, 6.0);
        assert_eq!(items[1].stock_quantity, 2.0);
        let last = items[0].stock_history.last().unwrap();
        assert_eq!(last.reason, StockReason::PurchaseReceipt);
        assert_eq!(last.reference_id.as_deref(), Some("po:1"));
    }
}
