//! Common utilities and shared infrastructure
//!
//! - Error taxonomy for store commands
//! - Logging setup

pub mod error;
pub mod logger;

// Re-export commonly used items
pub use error::{StoreError, StoreResult};
pub use logger::{init_logger, init_logger_with_file};
