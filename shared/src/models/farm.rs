//! Farm root aggregate

use serde::{Deserialize, Serialize};

use super::collaborator::Collaborator;
use super::fuel_log::{FuelLog, FuelPrice};
use super::machine::Machine;
use super::maintenance_log::MaintenanceLog;
use super::purchase_order::PurchaseOrder;
use super::warehouse_item::WarehouseItem;

/// Root aggregate holding every collection of the ledger.
///
/// The whole aggregate is serialized as one JSON document and replaced
/// wholesale on every mutation. Foreign keys inside logs and orders
/// (`machine_id`, `collaborator_id`, `item_id`) are expected to resolve,
/// but a dangling reference degrades to "unknown" instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Farm {
    /// Farm display name; absent until explicitly set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub machines: Vec<Machine>,
    #[serde(default)]
    pub collaborators: Vec<Collaborator>,
    #[serde(default)]
    pub fuel_logs: Vec<FuelLog>,
    #[serde(default)]
    pub maintenance_logs: Vec<MaintenanceLog>,
    #[serde(default)]
    pub fuel_prices: Vec<FuelPrice>,
    #[serde(default)]
    pub warehouse_items: Vec<WarehouseItem>,
    #[serde(default)]
    pub purchase_orders: Vec<PurchaseOrder>,
}

impl Farm {
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    pub fn machine_mut(&mut self, id: &str) -> Option<&mut Machine> {
        self.machines.iter_mut().find(|m| m.id == id)
    }

    pub fn collaborator(&self, id: &str) -> Option<&Collaborator> {
        self.collaborators.iter().find(|c| c.id == id)
    }

    pub fn warehouse_item(&self, id: &str) -> Option<&WarehouseItem> {
        self.warehouse_items.iter().find(|i| i.id == id)
    }

    pub fn warehouse_item_mut(&mut self, id: &str) -> Option<&mut WarehouseItem> {
        self.warehouse_items.iter_mut().find(|i| i.id == id)
    }

    pub fn purchase_order(&self, id: &str) -> Option<&PurchaseOrder> {
        self.purchase_orders.iter().find(|o| o.id == id)
    }

    pub fn purchase_order_mut(&mut self, id: &str) -> Option<&mut PurchaseOrder> {
        self.purchase_orders.iter_mut().find(|o| o.id == id)
    }
}
