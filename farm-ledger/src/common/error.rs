//! Store error taxonomy
//!
//! Commands fail with a typed error and leave the aggregate untouched.
//! Persistence failure is NOT part of command failure: a command whose
//! storage write fails still commits in memory and reports the degraded
//! durability through its receipt (see `store::Durability`).

use shared::PurchaseOrderStatus;
use thiserror::Error;

use crate::store::persistence::PersistenceError;

/// Command errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid quantity: {0} (expected a positive value)")]
    InvalidQuantity(f64),

    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: PurchaseOrderStatus,
        to: PurchaseOrderStatus,
    },

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
