//! End-to-end engine flow: full command surface against on-disk storage,
//! followed by a reload from the same snapshot file.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use farm_ledger::reports::{cost_report, CostQuery};
use farm_ledger::store::persistence::SnapshotStore;
use farm_ledger::{Config, FarmStorage, FarmStore};
use shared::{
    CollaboratorDraft, Farm, FuelLogDraft, FuelPrice, MachineDraft, MaintenanceLogDraft,
    MaintenanceType, OrderLine, PartUsage, PurchaseOrderDraft, PurchaseOrderStatus,
    WarehouseItemDraft,
};

fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

fn open_empty(path: &std::path::Path) -> FarmStore {
    let storage = Arc::new(FarmStorage::open(path).unwrap());
    storage.save(&Farm::default()).unwrap();
    FarmStore::with_storage(storage).unwrap()
}

#[test]
fn full_ledger_flow_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("farm.redb");

    let store = open_empty(&db_path);

    store.set_farm_name("Fazenda Santa Rita");
    let operator = store
        .add_collaborator(CollaboratorDraft {
            name: "Carlos".to_string(),
            role: Some("Operador".to_string()),
        })
        .entity_id;
    let manager = store
        .add_collaborator(CollaboratorDraft {
            name: "Ana".to_string(),
            role: Some("Gerente".to_string()),
        })
        .entity_id;

    let tractor = store
        .add_machine(MachineDraft {
            name: "Trator 6110".to_string(),
            model: Some("6110J".to_string()),
            brand: Some("John Deere".to_string()),
            year: Some(2019),
            hour_meter: 1000.0,
        })
        .entity_id;

    let oil = store
        .add_warehouse_item(WarehouseItemDraft {
            code: "OIL-154".to_string(),
            name: "Óleo 15W40".to_string(),
            unit_value: 28.5,
            stock_quantity: 40.0,
        })
        .entity_id;

    store.update_fuel_prices(vec![FuelPrice {
        fuel_type: "Diesel S10".to_string(),
        price_per_liter: 5.89,
        updated_at: at(2024, 3, 1),
    }]);

    // Refill on the 8th advances the hour meter past its registration value.
    store.add_fuel_log(FuelLogDraft {
        machine_id: tractor.clone(),
        collaborator_id: operator.clone(),
        date: at(2024, 3, 8),
        odometer: 1040.0,
        liters: 80.0,
        total_value: 471.2,
        fuel_type: Some("Diesel S10".to_string()),
    });

    // Service on the 5th: older reading, so the counter holds at 1040.
    store
        .add_maintenance_log(MaintenanceLogDraft {
            machine_id: tractor.clone(),
            collaborator_id: manager.clone(),
            date: at(2024, 3, 5),
            maintenance_type: MaintenanceType::OilChange,
            hour_meter: 1025.0,
            total_cost: 390.0,
            parts_used: vec![PartUsage {
                item_id: oil.clone(),
                quantity: 12.0,
            }],
            notes: None,
        })
        .unwrap();

    let machine = store.get_machine_by_id(&tractor).unwrap();
    assert_eq!(machine.hour_meter, 1040.0);
    assert_eq!(machine.hour_meter_history.len(), 2);
    assert_eq!(machine.last_maintenance.engine_oil_hour, 1025.0);
    assert_eq!(store.get_warehouse_item_by_id(&oil).unwrap().stock_quantity, 28.0);

    // Restock against an invoice, then run an order through its lifecycle.
    store.add_stock_to_warehouse_item(&oil, 20.0, "NF-1042").unwrap();

    let order = store
        .add_purchase_order(PurchaseOrderDraft {
            requester_id: operator.clone(),
            items: vec![OrderLine {
                item_id: oil.clone(),
                quantity: 24.0,
            }],
            notes: Some("Reposição trimestral".to_string()),
        })
        .unwrap()
        .entity_id;
    store
        .update_purchase_order_status(&order, PurchaseOrderStatus::Approved, &manager)
        .unwrap();
    store
        .update_purchase_order_status(&order, PurchaseOrderStatus::Fulfilled, &manager)
        .unwrap();
    assert_eq!(store.get_warehouse_item_by_id(&oil).unwrap().stock_quantity, 72.0);

    // Read side: all three cost categories land in the March window.
    let report = cost_report(
        &store.farm(),
        &CostQuery::for_window(at(2024, 3, 1), at(2024, 3, 31)),
    );
    assert_eq!(report.fuel_cost, 471.2);
    assert_eq!(report.maintenance_cost, 390.0);
    assert_eq!(report.purchase_cost, 24.0 * 28.5);
    assert_eq!(
        report.total_cost,
        report.fuel_cost + report.maintenance_cost + report.purchase_cost
    );

    let before = store.farm();
    drop(store);

    // Reopen from the same file: the aggregate must come back intact.
    let reopened = FarmStore::with_storage(Arc::new(FarmStorage::open(&db_path).unwrap())).unwrap();
    let after = reopened.farm();
    assert_eq!(after, before);
    assert_eq!(after.name.as_deref(), Some("Fazenda Santa Rita"));
    assert_eq!(after.purchase_order(&order).unwrap().code, "PED-000001");

    // Re-fulfilling after the reload still moves no stock.
    reopened
        .update_purchase_order_status(&order, PurchaseOrderStatus::Fulfilled, &manager)
        .unwrap();
    assert_eq!(
        reopened.get_warehouse_item_by_id(&oil).unwrap().stock_quantity,
        72.0
    );
}

#[test]
fn open_seeds_demo_farm_in_fresh_work_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::with_work_dir(dir.path().join("agrosync").to_string_lossy());

    let store = FarmStore::open(&config).unwrap();
    let farm = store.farm();
    assert!(farm.name.is_none());
    assert!(!farm.machines.is_empty());

    // Stock ledger invariant holds for every seeded item.
    for item in &farm.warehouse_items {
        let sum: f64 = item.stock_history.iter().map(|h| h.quantity_change).sum();
        assert_eq!(sum, item.stock_quantity);
    }

    // Seed is persisted: a second open sees the same farm, not a reseed.
    let renamed = store.set_farm_name("Minha Fazenda");
    assert!(renamed.is_durable());
    drop(store);

    let store = FarmStore::open(&config).unwrap();
    assert_eq!(store.farm().name.as_deref(), Some("Minha Fazenda"));
}
