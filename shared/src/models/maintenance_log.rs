//! Maintenance log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of maintenance service performed
///
/// The type decides which `last_maintenance` counters the log raises;
/// corrective repairs raise none.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaintenanceType {
    OilChange,
    FilterChange,
    OilAndFilter,
    Preventive,
    Corrective,
}

/// One warehouse part consumed by a maintenance service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartUsage {
    pub item_id: String,
    pub quantity: f64,
}

/// Maintenance service record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MaintenanceLog {
    pub id: String,
    pub machine_id: String,
    pub collaborator_id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub maintenance_type: MaintenanceType,
    /// Hour-meter reading at service time
    pub hour_meter: f64,
    pub total_cost: f64,
    #[serde(default)]
    pub parts_used: Vec<PartUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Create maintenance log payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceLogDraft {
    pub machine_id: String,
    pub collaborator_id: String,
    pub date: DateTime<Utc>,
    pub maintenance_type: MaintenanceType,
    pub hour_meter: f64,
    pub total_cost: f64,
    pub parts_used: Vec<PartUsage>,
    pub notes: Option<String>,
}
