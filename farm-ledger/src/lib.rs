//! AgroSync Farm Ledger - single consistent farm-operations ledger
//!
//! # Architecture
//!
//! The engine keeps one in-memory `Farm` aggregate consistent under every
//! mutating operation and writes the whole serialized aggregate through to
//! a key-value snapshot store after each command.
//!
//! ```text
//! farm-ledger/src/
//! ├── core/          # Configuration
//! ├── common/        # Logging, error taxonomy
//! ├── hour_meter.rs  # Hour-meter reconciliation (derived machine state)
//! ├── stock.rs       # Append-only stock ledger
//! ├── purchase.rs    # Purchase order lifecycle
//! ├── reports.rs     # Read-side cost aggregation
//! └── store/         # Mutation gateway, persistence, seed data
//! ```
//!
//! # Execution model
//!
//! Single-writer, synchronous: one logical actor issues commands one at a
//! time. Every command is a deterministic transformation from
//! (current aggregate, command) to (new aggregate, persistence write).
//! The in-memory aggregate is authoritative the instant a command returns;
//! a failed storage write is reported in the command receipt, never rolled
//! back.

pub mod common;
pub mod core;
pub mod hour_meter;
pub mod purchase;
pub mod reports;
pub mod stock;
pub mod store;

// Re-export public types
pub use common::error::{StoreError, StoreResult};
pub use core::Config;
pub use store::persistence::{FarmStorage, PersistenceError, SnapshotStore};
pub use store::{CommandReceipt, Durability, FarmStore};

// Re-export logger functions
pub use common::logger::{init_logger, init_logger_with_file};
