//! Hour-meter reconciliation
//!
//! A machine's `hour_meter`, `hour_meter_history` and `last_maintenance`
//! counters are derived from the union of its fuel logs (odometer
//! readings) and maintenance logs (hour-meter readings). Two paths keep
//! them consistent:
//!
//! - **Insert fast path** ([`record_reading`]): a freshly created log
//!   always appends its reading to the history, but the displayed counter
//!   only moves forward. Backfilled out-of-order readings neither regress
//!   nor advance it.
//! - **Edit path** ([`reconcile`]): editing a log invalidates incremental
//!   patching (the edit may even move the log to another machine), so
//!   every touched machine is rebuilt from scratch.
//!
//! Selection policy on rebuild is most-recent-wins, NOT max-wins: the
//! newest reading by (date desc, value desc) is authoritative even when an
//! older reading recorded a higher number. This allows hour-meter resets
//! and corrections to be re-entered as the latest data point.

use shared::{
    FuelLog, HourMeterReading, HourMeterSource, LastMaintenance, Machine, MaintenanceLog,
    MaintenanceType,
};

/// Service components tracked by the per-machine maintenance counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceComponent {
    EngineOil,
    TransmissionOil,
    FuelFilter,
    AirFilter,
}

/// Components serviced by a maintenance type
///
/// Corrective repairs fix a defect without renewing any consumable, so
/// they service nothing.
pub fn serviced_components(maintenance_type: MaintenanceType) -> &'static [ServiceComponent] {
    use ServiceComponent::*;
    match maintenance_type {
        MaintenanceType::OilChange => &[EngineOil],
        MaintenanceType::FilterChange => &[FuelFilter, AirFilter],
        MaintenanceType::OilAndFilter => &[EngineOil, FuelFilter, AirFilter],
        MaintenanceType::Preventive => &[EngineOil, TransmissionOil, FuelFilter, AirFilter],
        MaintenanceType::Corrective => &[],
    }
}

fn counter_mut(counters: &mut LastMaintenance, component: ServiceComponent) -> &mut f64 {
    match component {
        ServiceComponent::EngineOil => &mut counters.engine_oil_hour,
        ServiceComponent::TransmissionOil => &mut counters.transmission_oil_hour,
        ServiceComponent::FuelFilter => &mut counters.fuel_filter_hour,
        ServiceComponent::AirFilter => &mut counters.air_filter_hour,
    }
}

/// Raise the serviced components' counters to `max(current, hour_meter)`
pub fn raise_service_counters(
    counters: &mut LastMaintenance,
    maintenance_type: MaintenanceType,
    hour_meter: f64,
) {
    for &component in serviced_components(maintenance_type) {
        let slot = counter_mut(counters, component);
        if hour_meter > *slot {
            *slot = hour_meter;
        }
    }
}

/// Candidate reading derived from a fuel log
pub fn reading_from_fuel(log: &FuelLog) -> HourMeterReading {
    HourMeterReading {
        date: log.date,
        value: log.odometer,
        collaborator_id: log.collaborator_id.clone(),
        source: HourMeterSource::Fuel,
        source_id: log.id.clone(),
    }
}

/// Candidate reading derived from a maintenance log
pub fn reading_from_maintenance(log: &MaintenanceLog) -> HourMeterReading {
    HourMeterReading {
        date: log.date,
        value: log.hour_meter,
        collaborator_id: log.collaborator_id.clone(),
        source: HourMeterSource::Maintenance,
        source_id: log.id.clone(),
    }
}

/// Insert fast path: append the reading, advance the counter only forward
pub fn record_reading(machine: &mut Machine, reading: HourMeterReading) {
    if reading.value > machine.hour_meter {
        machine.hour_meter = reading.value;
    }
    machine.hour_meter_history.push(reading);
}

/// Derived machine state produced by a full rebuild
#[derive(Debug, Clone, PartialEq)]
pub struct MachineSummary {
    pub hour_meter: f64,
    /// Full candidate history, most recent first
    pub history: Vec<HourMeterReading>,
    pub last_maintenance: LastMaintenance,
}

/// Rebuild a machine's derived state from the full log sets
///
/// Pure function: reads only the logs belonging to `machine_id`, returns
/// the summary, mutates nothing. A machine with no readings comes back at
/// zero.
pub fn reconcile(
    machine_id: &str,
    fuel_logs: &[FuelLog],
    maintenance_logs: &[MaintenanceLog],
) -> MachineSummary {
    let mut history: Vec<HourMeterReading> = fuel_logs
        .iter()
        .filter(|l| l.machine_id == machine_id)
        .map(reading_from_fuel)
        .chain(
            maintenance_logs
                .iter()
                .filter(|l| l.machine_id == machine_id)
                .map(reading_from_maintenance),
        )
        .collect();

    // Most recent first; equal dates fall back to the higher reading
    history.sort_by(|a, b| b.date.cmp(&a.date).then(b.value.total_cmp(&a.value)));

    let hour_meter = history.first().map(|r| r.value).unwrap_or(0.0);

    let mut last_maintenance = LastMaintenance::default();
    for log in maintenance_logs.iter().filter(|l| l.machine_id == machine_id) {
        raise_service_counters(&mut last_maintenance, log.maintenance_type, log.hour_meter);
    }

    MachineSummary {
        hour_meter,
        history,
        last_maintenance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use shared::PartUsage;

    fn fuel(id: &str, machine_id: &str, date: (i32, u32, u32), odometer: f64) -> FuelLog {
        FuelLog {
            id: id.to_string(),
            machine_id: machine_id.to_string(),
            collaborator_id: "collab:1".to_string(),
            date: Utc.with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0).unwrap(),
            odometer,
            liters: 50.0,
            total_value: 300.0,
            fuel_type: None,
        }
    }

    fn maintenance(
        id: &str,
        machine_id: &str,
        date: (i32, u32, u32),
        maintenance_type: MaintenanceType,
        hour_meter: f64,
    ) -> MaintenanceLog {
        MaintenanceLog {
            id: id.to_string(),
            machine_id: machine_id.to_string(),
            collaborator_id: "collab:1".to_string(),
            date: Utc.with_ymd_and_hms(date.0, date.1, date.2, 12, 0, 0).unwrap(),
            maintenance_type,
            hour_meter,
            total_cost: 100.0,
            parts_used: Vec::<PartUsage>::new(),
            notes: None,
        }
    }

    #[test]
    fn test_most_recent_wins_not_max_wins() {
        // Fuel log dated 2024-03-01 with odometer 120 is newer than the
        // maintenance log dated 2024-02-15 with hour meter 200.
        let fuel_logs = vec![fuel("fuel:1", "machine:1", (2024, 3, 1), 120.0)];
        let maint_logs = vec![maintenance(
            "maint:1",
            "machine:1",
            (2024, 2, 15),
            MaintenanceType::Corrective,
            200.0,
        )];

        let summary = reconcile("machine:1", &fuel_logs, &maint_logs);
        assert_eq!(summary.hour_meter, 120.0);
        assert_eq!(summary.history.len(), 2);
        assert_eq!(summary.history[0].source, HourMeterSource::Fuel);
    }

    #[test]
    fn test_equal_dates_prefer_higher_value() {
        let fuel_logs = vec![
            fuel("fuel:1", "machine:1", (2024, 3, 1), 120.0),
            fuel("fuel:2", "machine:1", (2024, 3, 1), 140.0),
        ];
        let summary = reconcile("machine:1", &fuel_logs, &[]);
        assert_eq!(summary.hour_meter, 140.0);
    }

    #[test]
    fn test_reconcile_ignores_other_machines() {
        let fuel_logs = vec![
            fuel("fuel:1", "machine:1", (2024, 3, 1), 120.0),
            fuel("fuel:2", "machine:2", (2024, 3, 2), 900.0),
        ];
        let summary = reconcile("machine:1", &fuel_logs, &[]);
        assert_eq!(summary.hour_meter, 120.0);
        assert_eq!(summary.history.len(), 1);
    }

    #[test]
    fn test_reconcile_empty_is_zero() {
        let summary = reconcile("machine:1", &[], &[]);
        assert_eq!(summary.hour_meter, 0.0);
        assert!(summary.history.is_empty());
        assert_eq!(summary.last_maintenance, LastMaintenance::default());
    }

    #[test]
    fn test_record_reading_never_regresses() {
        let mut machine = Machine {
            id: "machine:1".to_string(),
            name: "Tractor".to_string(),
            model: None,
            brand: None,
            year: None,
            hour_meter: 100.0,
            hour_meter_history: vec![],
            last_maintenance: LastMaintenance::default(),
        };

        // Backfilled reading below the current counter: history grows,
        // counter stays put.
        let low = reading_from_fuel(&fuel("fuel:1", "machine:1", (2024, 1, 1), 80.0));
        record_reading(&mut machine, low);
        assert_eq!(machine.hour_meter, 100.0);
        assert_eq!(machine.hour_meter_history.len(), 1);

        let high = reading_from_fuel(&fuel("fuel:2", "machine:1", (2024, 4, 1), 130.0));
        record_reading(&mut machine, high);
        assert_eq!(machine.hour_meter, 130.0);
        assert_eq!(machine.hour_meter_history.len(), 2);
    }

    #[test]
    fn test_service_component_map() {
        use ServiceComponent::*;
        assert_eq!(serviced_components(MaintenanceType::OilChange), &[EngineOil][..]);
        assert_eq!(
            serviced_components(MaintenanceType::FilterChange),
            &[FuelFilter, AirFilter][..]
        );
        assert_eq!(
            serviced_components(MaintenanceType::OilAndFilter),
            &[EngineOil, FuelFilter, AirFilter][..]
        );
        assert_eq!(
            serviced_components(MaintenanceType::Preventive),
            &[EngineOil, TransmissionOil, FuelFilter, AirFilter][..]
        );
        assert!(serviced_components(MaintenanceType::Corrective).is_empty());
    }

    #[test]
    fn test_last_maintenance_takes_max_per_component() {
        let maint_logs = vec![
            maintenance("maint:1", "machine:1", (2024, 1, 1), MaintenanceType::OilChange, 500.0),
            maintenance("maint:2", "machine:1", (2024, 2, 1), MaintenanceType::Preventive, 400.0),
            maintenance("maint:3", "machine:1", (2024, 3, 1), MaintenanceType::Corrective, 600.0),
        ];
        let summary = reconcile("machine:1", &[], &maint_logs);

        // Oil change at 500 beats the preventive at 400; corrective at 600
        // raises nothing.
        assert_eq!(summary.last_maintenance.engine_oil_hour, 500.0);
        assert_eq!(summary.last_maintenance.transmission_oil_hour, 400.0);
        assert_eq!(summary.last_maintenance.fuel_filter_hour, 400.0);
        assert_eq!(summary.last_maintenance.air_filter_hour, 400.0);
        // But the corrective log's reading is still the newest, so it
        // drives the hour meter.
        assert_eq!(summary.hour_meter, 600.0);
    }
}
