//! Warehouse item and stock history models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why a stock level changed
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockReason {
    /// Opening balance recorded at item creation
    InitialEntry,
    /// Goods received against a supplier invoice
    InvoiceEntry,
    /// Parts consumed by a maintenance service
    MaintenanceExit,
    /// Compensation appended when a maintenance log is edited
    MaintenanceEditAdjustment,
    /// Direct quantity correction on the item
    ManualAdjustment,
    /// Purchase order fulfillment credit
    PurchaseReceipt,
}

/// Append-only stock movement record
///
/// Entries are never mutated or deleted; an edit of the originating
/// document appends a compensating entry instead. `new_stock_level` is
/// the running sum up to and including this entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StockHistoryLog {
    pub date: DateTime<Utc>,
    /// Signed delta applied to the stock level
    pub quantity_change: f64,
    pub new_stock_level: f64,
    pub reason: StockReason,
    /// Id of the document that caused the movement (maintenance log,
    /// purchase order), when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
}

/// Warehouse item entity
///
/// Invariant: `stock_quantity` equals the sum of
/// `stock_history[*].quantity_change`. Negative stock is allowed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WarehouseItem {
    pub id: String,
    pub code: String,
    pub name: String,
    pub unit_value: f64,
    pub stock_quantity: f64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub stock_history: Vec<StockHistoryLog>,
}

/// Create warehouse item payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseItemDraft {
    pub code: String,
    pub name: String,
    pub unit_value: f64,
    /// Opening stock, recorded as an `InitialEntry` history line
    pub stock_quantity: f64,
}
