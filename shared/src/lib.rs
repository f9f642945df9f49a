//! Shared types for the AgroSync farm ledger
//!
//! The domain model crate: the `Farm` root aggregate and every entity it
//! owns. No business logic lives here; the `farm-ledger` crate mutates
//! these types through its reconcilers and store.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::*;
