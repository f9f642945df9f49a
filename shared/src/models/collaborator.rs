//! Collaborator Model

use serde::{Deserialize, Serialize};

/// Collaborator entity (machine operators, warehouse staff, admins)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Collaborator {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Create collaborator payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorDraft {
    pub name: String,
    pub role: Option<String>,
}
