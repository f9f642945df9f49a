//! Machine Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Where a hour-meter reading came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HourMeterSource {
    Fuel,
    Maintenance,
}

/// One hour-meter reading, taken during a fuel refill or a maintenance
/// service. `source_id` points back to the originating log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HourMeterReading {
    pub date: DateTime<Utc>,
    pub value: f64,
    pub collaborator_id: String,
    pub source: HourMeterSource,
    pub source_id: String,
}

/// Hour-meter value at which each service component was last serviced.
///
/// Counters only ever rise; a component never serviced stays at 0.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct LastMaintenance {
    #[serde(default)]
    pub engine_oil_hour: f64,
    #[serde(default)]
    pub transmission_oil_hour: f64,
    #[serde(default)]
    pub fuel_filter_hour: f64,
    #[serde(default)]
    pub air_filter_hour: f64,
}

/// Machine entity
///
/// `hour_meter` and `last_maintenance` are derived state, reconciled from
/// the machine's fuel and maintenance logs by the hour-meter reconciler.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Machine {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Current usage counter; never regresses on single-log insert
    pub hour_meter: f64,
    #[serde(default)]
    pub hour_meter_history: Vec<HourMeterReading>,
    #[serde(default)]
    pub last_maintenance: LastMaintenance,
}

/// Create machine payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineDraft {
    pub name: String,
    pub model: Option<String>,
    pub brand: Option<String>,
    pub year: Option<i32>,
    /// Hour-meter value at registration time
    pub hour_meter: f64,
}
