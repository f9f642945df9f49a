//! Data models
//!
//! Entities of the farm-operations ledger. All of them hang off the
//! [`Farm`](farm::Farm) root aggregate; nothing outside it references an
//! entity except by its opaque string id.

pub mod collaborator;
pub mod farm;
pub mod fuel_log;
pub mod machine;
pub mod maintenance_log;
pub mod purchase_order;
pub mod warehouse_item;

// Re-exports
pub use collaborator::*;
pub use farm::*;
pub use fuel_log::*;
pub use machine::*;
pub use maintenance_log::*;
pub use purchase_order::*;
pub use warehouse_item::*;
