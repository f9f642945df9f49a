//! Core module - engine configuration
//!
//! - [`Config`] - engine configuration loaded from environment variables

pub mod config;

pub use config::Config;
