//! Mutation gateway
//!
//! [`FarmStore`] is the single entry point for every command. Each command
//! clones the in-memory aggregate, mutates the clone through the domain
//! modules, swaps it in wholesale, then writes the snapshot through the
//! [`SnapshotStore`]. Commands are processed one at a time under the write
//! lock; there is no partial in-memory state to observe.
//!
//! Validation failures (`NotFound`, `InvalidQuantity`, `InvalidTransition`)
//! return `Err` and leave the aggregate untouched. A persistence failure
//! after a successful in-memory update does NOT roll back: the command
//! reports `Durability::MemoryOnly` in its receipt and the engine keeps
//! serving the updated state.

pub mod persistence;
pub mod seed;

use chrono::Utc;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use shared::{
    Collaborator, CollaboratorDraft, Farm, FuelLog, FuelLogDraft, FuelPrice, LastMaintenance,
    Machine, MachineDraft, MaintenanceLog, MaintenanceLogDraft, PurchaseOrder, PurchaseOrderDraft,
    PurchaseOrderStatus, StockReason, WarehouseItem, WarehouseItemDraft,
};

use crate::common::error::{StoreError, StoreResult};
use crate::core::Config;
use crate::hour_meter;
use crate::purchase::{self, TransitionEffect};
use crate::stock;

pub use persistence::{FarmStorage, PersistenceError, PersistenceResult, SnapshotStore};

/// Whether a committed command reached disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Durability {
    /// Snapshot written; the change survives restart
    Durable,
    /// In-memory state updated but the snapshot write failed; the change
    /// is lost on restart
    MemoryOnly(String),
}

/// Outcome of a successfully applied command
#[derive(Debug, Clone)]
pub struct CommandReceipt {
    /// Id of the entity the command created or targeted
    pub entity_id: String,
    pub durability: Durability,
}

impl CommandReceipt {
    pub fn is_durable(&self) -> bool {
        matches!(self.durability, Durability::Durable)
    }
}

/// In-memory farm aggregate with write-through snapshot persistence
pub struct FarmStore {
    farm: RwLock<Farm>,
    storage: Arc<dyn SnapshotStore>,
}

impl FarmStore {
    /// Open the store for the configured work directory
    ///
    /// Creates the directory if needed; seeds the demo farm when the
    /// snapshot database is empty.
    pub fn open(config: &Config) -> StoreResult<Self> {
        std::fs::create_dir_all(&config.work_dir).map_err(PersistenceError::from)?;
        let storage = FarmStorage::open(config.db_path())?;
        Self::with_storage(Arc::new(storage))
    }

    /// Open an ephemeral store (testing, demos)
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::with_storage(Arc::new(FarmStorage::open_in_memory()?))
    }

    /// Open on an arbitrary snapshot backend
    pub fn with_storage(storage: Arc<dyn SnapshotStore>) -> StoreResult<Self> {
        let farm = match storage.load().map_err(StoreError::from)? {
            Some(farm) => {
                info!(
                    machines = farm.machines.len(),
                    orders = farm.purchase_orders.len(),
                    "Loaded farm snapshot"
                );
                farm
            }
            None => {
                let farm = seed::demo_farm();
                storage.save(&farm).map_err(StoreError::from)?;
                info!("Empty storage, seeded demo farm");
                farm
            }
        };
        Ok(Self {
            farm: RwLock::new(farm),
            storage,
        })
    }

    /// Snapshot clone of the current aggregate
    pub fn farm(&self) -> Farm {
        self.farm.read().clone()
    }

    // ========== Lookups ==========

    pub fn get_machine_by_id(&self, id: &str) -> Option<Machine> {
        self.farm.read().machine(id).cloned()
    }

    pub fn get_collaborator_by_id(&self, id: &str) -> Option<Collaborator> {
        self.farm.read().collaborator(id).cloned()
    }

    pub fn get_warehouse_item_by_id(&self, id: &str) -> Option<WarehouseItem> {
        self.farm.read().warehouse_item(id).cloned()
    }

    // ========== Farm ==========

    pub fn set_farm_name(&self, name: impl Into<String>) -> CommandReceipt {
        let name = name.into();
        let mut next = self.farm.read().clone();
        next.name = Some(name.clone());
        info!(name = %name, "Farm renamed");
        self.commit(next, "farm")
    }

    // ========== Machines ==========

    pub fn add_machine(&self, draft: MachineDraft) -> CommandReceipt {
        let mut next = self.farm.read().clone();
        let id = new_id("machine");
        info!(machine_id = %id, name = %draft.name, "Machine registered");
        next.machines.push(Machine {
            id: id.clone(),
            name: draft.name,
            model: draft.model,
            brand: draft.brand,
            year: draft.year,
            hour_meter: draft.hour_meter,
            hour_meter_history: vec![],
            last_maintenance: LastMaintenance::default(),
        });
        self.commit(next, id)
    }

    pub fn update_machine(&self, machine: Machine) -> StoreResult<CommandReceipt> {
        let mut next = self.farm.read().clone();
        let slot = next
            .machine_mut(&machine.id)
            .ok_or_else(|| StoreError::not_found("machine", &machine.id))?;
        let id = machine.id.clone();
        *slot = machine;
        Ok(self.commit(next, id))
    }

    /// Remove a machine; its logs stay in the ledger
    pub fn delete_machine(&self, machine_id: &str) -> StoreResult<CommandReceipt> {
        let mut next = self.farm.read().clone();
        if next.machine(machine_id).is_none() {
            return Err(StoreError::not_found("machine", machine_id));
        }
        next.machines.retain(|m| m.id != machine_id);
        info!(machine_id = %machine_id, "Machine removed");
        Ok(self.commit(next, machine_id))
    }

    // ========== Collaborators ==========

    pub fn add_collaborator(&self, draft: CollaboratorDraft) -> CommandReceipt {
        let mut next = self.farm.read().clone();
        let id = new_id("collab");
        next.collaborators.push(Collaborator {
            id: id.clone(),
            name: draft.name,
            role: draft.role,
        });
        self.commit(next, id)
    }

    // ========== Fuel logs ==========

    /// Record a refill; the odometer reading feeds the machine's hour meter
    pub fn add_fuel_log(&self, draft: FuelLogDraft) -> CommandReceipt {
        let mut next = self.farm.read().clone();
        let id = new_id("fuel");
        let log = FuelLog {
            id: id.clone(),
            machine_id: draft.machine_id,
            collaborator_id: draft.collaborator_id,
            date: draft.date,
            odometer: draft.odometer,
            liters: draft.liters,
            total_value: draft.total_value,
            fuel_type: draft.fuel_type,
        };
        match next.machine_mut(&log.machine_id) {
            Some(machine) => {
                hour_meter::record_reading(machine, hour_meter::reading_from_fuel(&log));
            }
            None => warn!(
                machine_id = %log.machine_id,
                log_id = %id,
                "Fuel log references unknown machine"
            ),
        }
        info!(log_id = %id, machine_id = %log.machine_id, liters = log.liters, "Fuel log added");
        next.fuel_logs.push(log);
        self.commit(next, id)
    }

    /// Replace a fuel log and rebuild every machine it touches
    pub fn update_fuel_log(&self, updated: FuelLog) -> StoreResult<CommandReceipt> {
        let mut next = self.farm.read().clone();
        let old = next
            .fuel_logs
            .iter_mut()
            .find(|l| l.id == updated.id)
            .ok_or_else(|| StoreError::not_found("fuel log", &updated.id))?;
        let old_machine_id = old.machine_id.clone();
        let id = updated.id.clone();
        *old = updated.clone();

        reconcile_machines(&mut next, [old_machine_id, updated.machine_id]);
        info!(log_id = %id, "Fuel log updated");
        Ok(self.commit(next, id))
    }

    // ========== Maintenance logs ==========

    /// Record a service: consumes parts, raises service counters, feeds
    /// the hour meter
    pub fn add_maintenance_log(&self, draft: MaintenanceLogDraft) -> StoreResult<CommandReceipt> {
        validate_part_quantities(&draft.parts_used)?;

        let mut next = self.farm.read().clone();
        let id = new_id("maint");
        let log = MaintenanceLog {
            id: id.clone(),
            machine_id: draft.machine_id,
            collaborator_id: draft.collaborator_id,
            date: draft.date,
            maintenance_type: draft.maintenance_type,
            hour_meter: draft.hour_meter,
            total_cost: draft.total_cost,
            parts_used: draft.parts_used,
            notes: draft.notes,
        };

        stock::consume_parts(&mut next.warehouse_items, &log);

        match next.machine_mut(&log.machine_id) {
            Some(machine) => {
                hour_meter::record_reading(machine, hour_meter::reading_from_maintenance(&log));
                hour_meter::raise_service_counters(
                    &mut machine.last_maintenance,
                    log.maintenance_type,
                    log.hour_meter,
                );
            }
            None => warn!(
                machine_id = %log.machine_id,
                log_id = %id,
                "Maintenance log references unknown machine"
            ),
        }
        info!(
            log_id = %id,
            machine_id = %log.machine_id,
            maintenance_type = ?log.maintenance_type,
            "Maintenance log added"
        );
        next.maintenance_logs.push(log);
        Ok(self.commit(next, id))
    }

    /// Replace a maintenance log: compensate stock for the part diff and
    /// rebuild every machine it touches
    pub fn update_maintenance_log(&self, updated: MaintenanceLog) -> StoreResult<CommandReceipt> {
        validate_part_quantities(&updated.parts_used)?;

        let mut next = self.farm.read().clone();
        let old = next
            .maintenance_logs
            .iter()
            .find(|l| l.id == updated.id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("maintenance log", &updated.id))?;
        let id = updated.id.clone();

        stock::adjust_for_log_edit(&mut next.warehouse_items, &old, &updated, Utc::now());

        let slot = next
            .maintenance_logs
            .iter_mut()
            .find(|l| l.id == updated.id)
            .ok_or_else(|| StoreError::not_found("maintenance log", &updated.id))?;
        let old_machine_id = old.machine_id;
        *slot = updated.clone();

        reconcile_machines(&mut next, [old_machine_id, updated.machine_id]);
        info!(log_id = %id, "Maintenance log updated");
        Ok(self.commit(next, id))
    }

    // ========== Fuel prices ==========

    pub fn update_fuel_prices(&self, prices: Vec<FuelPrice>) -> CommandReceipt {
        let mut next = self.farm.read().clone();
        next.fuel_prices = prices;
        self.commit(next, "fuel_prices")
    }

    // ========== Warehouse ==========

    pub fn add_warehouse_item(&self, draft: WarehouseItemDraft) -> CommandReceipt {
        let mut next = self.farm.read().clone();
        let id = new_id("item");
        let now = Utc::now();
        let mut item = WarehouseItem {
            id: id.clone(),
            code: draft.code,
            name: draft.name,
            unit_value: draft.unit_value,
            stock_quantity: 0.0,
            created_at: now,
            stock_history: vec![],
        };
        stock::apply_delta(
            &mut item,
            now,
            draft.stock_quantity,
            StockReason::InitialEntry,
            None,
            None,
        );
        info!(item_id = %id, code = %item.code, "Warehouse item created");
        next.warehouse_items.push(item);
        self.commit(next, id)
    }

    /// Replace an item's descriptive fields; a changed quantity appends a
    /// `ManualAdjustment` ledger entry instead of rewriting history
    pub fn update_warehouse_item(&self, updated: WarehouseItem) -> StoreResult<CommandReceipt> {
        let mut next = self.farm.read().clone();
        let slot = next
            .warehouse_item_mut(&updated.id)
            .ok_or_else(|| StoreError::not_found("warehouse item", &updated.id))?;
        let id = updated.id.clone();

        let delta = updated.stock_quantity - slot.stock_quantity;
        slot.code = updated.code;
        slot.name = updated.name;
        slot.unit_value = updated.unit_value;
        stock::apply_delta(slot, Utc::now(), delta, StockReason::ManualAdjustment, None, None);

        Ok(self.commit(next, id))
    }

    pub fn delete_warehouse_item(&self, item_id: &str) -> StoreResult<CommandReceipt> {
        let mut next = self.farm.read().clone();
        if next.warehouse_item(item_id).is_none() {
            return Err(StoreError::not_found("warehouse item", item_id));
        }
        next.warehouse_items.retain(|i| i.id != item_id);
        info!(item_id = %item_id, "Warehouse item removed");
        Ok(self.commit(next, item_id))
    }

    /// Receive goods against a supplier invoice
    pub fn add_stock_to_warehouse_item(
        &self,
        item_id: &str,
        quantity: f64,
        invoice_number: impl Into<String>,
    ) -> StoreResult<CommandReceipt> {
        if quantity <= 0.0 {
            return Err(StoreError::InvalidQuantity(quantity));
        }
        let mut next = self.farm.read().clone();
        let item = next
            .warehouse_item_mut(item_id)
            .ok_or_else(|| StoreError::not_found("warehouse item", item_id))?;
        stock::apply_delta(
            item,
            Utc::now(),
            quantity,
            StockReason::InvoiceEntry,
            None,
            Some(invoice_number.into()),
        );
        info!(item_id = %item_id, quantity, "Stock received");
        Ok(self.commit(next, item_id))
    }

    // ========== Purchase orders ==========

    pub fn add_purchase_order(&self, draft: PurchaseOrderDraft) -> StoreResult<CommandReceipt> {
        if let Some(line) = draft.items.iter().find(|l| l.quantity <= 0.0) {
            return Err(StoreError::InvalidQuantity(line.quantity));
        }
        let mut next = self.farm.read().clone();
        let id = new_id("po");
        let code = purchase::next_code(&next.purchase_orders);
        info!(order_id = %id, code = %code, "Purchase order created");
        next.purchase_orders.push(PurchaseOrder {
            id: id.clone(),
            code,
            status: PurchaseOrderStatus::Pending,
            request_date: Utc::now(),
            requester_id: draft.requester_id,
            items: draft.items,
            notes: draft.notes,
            approval_date: None,
            approved_by_id: None,
            fulfilled_date: None,
            fulfilled_by_id: None,
            cancellation_date: None,
            cancelled_by_id: None,
            cancellation_reason: None,
        });
        Ok(self.commit(next, id))
    }

    /// Move an order through its lifecycle; fulfillment credits stock once
    pub fn update_purchase_order_status(
        &self,
        order_id: &str,
        status: PurchaseOrderStatus,
        responsible_id: &str,
    ) -> StoreResult<CommandReceipt> {
        self.transition_order(order_id, status, responsible_id, None)
    }

    pub fn cancel_purchase_order(
        &self,
        order_id: &str,
        responsible_id: &str,
        reason: Option<String>,
    ) -> StoreResult<CommandReceipt> {
        self.transition_order(order_id, PurchaseOrderStatus::Cancelled, responsible_id, reason)
    }

    fn transition_order(
        &self,
        order_id: &str,
        status: PurchaseOrderStatus,
        responsible_id: &str,
        reason: Option<String>,
    ) -> StoreResult<CommandReceipt> {
        let now = Utc::now();
        let mut next = self.farm.read().clone();
        let order = next
            .purchase_order_mut(order_id)
            .ok_or_else(|| StoreError::not_found("purchase order", order_id))?;

        let effect = purchase::apply_transition(order, status, responsible_id, reason, now)?;
        match effect {
            TransitionEffect::AlreadyApplied => {
                // Idempotent repeat: nothing changed, nothing to persist.
                return Ok(CommandReceipt {
                    entity_id: order_id.to_string(),
                    durability: Durability::Durable,
                });
            }
            TransitionEffect::CreditStock => {
                let order = order.clone();
                stock::credit_purchase(&mut next.warehouse_items, &order, now);
            }
            TransitionEffect::None => {}
        }
        info!(order_id = %order_id, status = ?status, "Purchase order transitioned");
        Ok(self.commit(next, order_id))
    }

    // ========== Commit ==========

    fn commit(&self, next: Farm, entity_id: impl Into<String>) -> CommandReceipt {
        let durability = match self.storage.save(&next) {
            Ok(()) => Durability::Durable,
            Err(e) => {
                error!(error = %e, "Snapshot write failed, state kept in memory only");
                Durability::MemoryOnly(e.to_string())
            }
        };
        *self.farm.write() = next;
        CommandReceipt {
            entity_id: entity_id.into(),
            durability,
        }
    }
}

/// Prefixed v4 id, e.g. `machine:6f9e...`
fn new_id(prefix: &str) -> String {
    format!("{prefix}:{}", Uuid::new_v4())
}

fn validate_part_quantities(parts: &[shared::PartUsage]) -> StoreResult<()> {
    if let Some(part) = parts.iter().find(|p| p.quantity <= 0.0) {
        return Err(StoreError::InvalidQuantity(part.quantity));
    }
    Ok(())
}

/// Rebuild derived state for every distinct machine id that still exists
fn reconcile_machines(farm: &mut Farm, machine_ids: impl IntoIterator<Item = String>) {
    let mut done: Vec<String> = Vec::new();
    for machine_id in machine_ids {
        if done.contains(&machine_id) {
            continue;
        }
        let summary = hour_meter::reconcile(&machine_id, &farm.fuel_logs, &farm.maintenance_logs);
        if let Some(machine) = farm.machine_mut(&machine_id) {
            machine.hour_meter = summary.hour_meter;
            machine.hour_meter_history = summary.history;
            machine.last_maintenance = summary.last_maintenance;
        }
        done.push(machine_id);
    }
}
