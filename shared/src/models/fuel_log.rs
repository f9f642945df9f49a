//! Fuel log and fuel price models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fuel refill record
///
/// `odometer` is the hour-meter reading taken at the pump; it feeds the
/// hour-meter reconciler. Immutable once logged except via an explicit
/// update command.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelLog {
    pub id: String,
    pub machine_id: String,
    pub collaborator_id: String,
    pub date: DateTime<Utc>,
    pub odometer: f64,
    pub liters: f64,
    pub total_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
}

/// Create fuel log payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuelLogDraft {
    pub machine_id: String,
    pub collaborator_id: String,
    pub date: DateTime<Utc>,
    pub odometer: f64,
    pub liters: f64,
    pub total_value: f64,
    pub fuel_type: Option<String>,
}

/// Current price for one fuel type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FuelPrice {
    pub fuel_type: String,
    pub price_per_liter: f64,
    pub updated_at: DateTime<Utc>,
}
