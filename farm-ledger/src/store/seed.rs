//! Demo dataset seeded on first run
//!
//! A fresh work directory starts from this sample farm instead of an
//! empty one, with the farm name left unset so onboarding still asks for
//! it. Derived state (hour meters, service counters, stock levels) is
//! built through the regular engine paths, so the seed obeys the same
//! invariants as live data.

use chrono::{TimeZone, Utc};
use shared::{
    Collaborator, Farm, FuelLog, FuelPrice, LastMaintenance, Machine, MaintenanceLog,
    MaintenanceType, PartUsage, StockReason, WarehouseItem,
};

use crate::hour_meter;
use crate::stock;

/// Build the demo farm
pub fn demo_farm() -> Farm {
    let seeded_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

    let mut farm = Farm {
        name: None,
        ..Farm::default()
    };

    farm.collaborators = vec![
        Collaborator {
            id: "collab:carlos".to_string(),
            name: "Carlos Silva".to_string(),
            role: Some("Operador".to_string()),
        },
        Collaborator {
            id: "collab:ana".to_string(),
            name: "Ana Souza".to_string(),
            role: Some("Gerente".to_string()),
        },
    ];

    farm.machines = vec![
        Machine {
            id: "machine:tractor-6110".to_string(),
            name: "Trator John Deere 6110".to_string(),
            model: Some("6110J".to_string()),
            brand: Some("John Deere".to_string()),
            year: Some(2019),
            hour_meter: 0.0,
            hour_meter_history: vec![],
            last_maintenance: LastMaintenance::default(),
        },
        Machine {
            id: "machine:harvester-s540".to_string(),
            name: "Colheitadeira S540".to_string(),
            model: Some("S540".to_string()),
            brand: Some("John Deere".to_string()),
            year: Some(2021),
            hour_meter: 0.0,
            hour_meter_history: vec![],
            last_maintenance: LastMaintenance::default(),
        },
    ];

    farm.fuel_prices = vec![FuelPrice {
        fuel_type: "Diesel S10".to_string(),
        price_per_liter: 5.89,
        updated_at: seeded_at,
    }];

    let mut filter = WarehouseItem {
        id: "item:oil-filter".to_string(),
        code: "FLT-010".to_string(),
        name: "Filtro de óleo".to_string(),
        unit_value: 45.0,
        stock_quantity: 0.0,
        created_at: seeded_at,
        stock_history: vec![],
    };
    stock::apply_delta(&mut filter, seeded_at, 12.0, StockReason::InitialEntry, None, None);

    let mut oil = WarehouseItem {
        id: "item:engine-oil-15w40".to_string(),
        code: "OIL-154".to_string(),
        name: "Óleo de motor 15W40 (L)".to_string(),
        unit_value: 28.5,
        stock_quantity: 0.0,
        created_at: seeded_at,
        stock_history: vec![],
    };
    stock::apply_delta(&mut oil, seeded_at, 60.0, StockReason::InitialEntry, None, None);

    farm.warehouse_items = vec![filter, oil];

    let fuel_log = FuelLog {
        id: "fuel:seed-1".to_string(),
        machine_id: "machine:tractor-6110".to_string(),
        collaborator_id: "collab:carlos".to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 8, 9, 0, 0).unwrap(),
        odometer: 1240.0,
        liters: 80.0,
        total_value: 471.2,
        fuel_type: Some("Diesel S10".to_string()),
    };
    let maintenance_log = MaintenanceLog {
        id: "maint:seed-1".to_string(),
        machine_id: "machine:tractor-6110".to_string(),
        collaborator_id: "collab:ana".to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 5, 14, 0, 0).unwrap(),
        maintenance_type: MaintenanceType::OilAndFilter,
        hour_meter: 1225.0,
        total_cost: 390.0,
        parts_used: vec![
            PartUsage {
                item_id: "item:oil-filter".to_string(),
                quantity: 1.0,
            },
            PartUsage {
                item_id: "item:engine-oil-15w40".to_string(),
                quantity: 12.0,
            },
        ],
        notes: Some("Revisão das 1.200 horas".to_string()),
    };

    stock::consume_parts(&mut farm.warehouse_items, &maintenance_log);

    if let Some(machine) = farm.machine_mut("machine:tractor-6110") {
        hour_meter::record_reading(machine, hour_meter::reading_from_maintenance(&maintenance_log));
        hour_meter::raise_service_counters(
            &mut machine.last_maintenance,
            maintenance_log.maintenance_type,
            maintenance_log.hour_meter,
        );
        hour_meter::record_reading(machine, hour_meter::reading_from_fuel(&fuel_log));
    }

    farm.fuel_logs = vec![fuel_log];
    farm.maintenance_logs = vec![maintenance_log];

    farm
}
