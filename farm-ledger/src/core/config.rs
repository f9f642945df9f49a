use std::path::PathBuf;

/// Engine configuration
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Purpose |
/// |----------|---------|---------|
/// | FARM_WORK_DIR | /var/lib/agrosync | Work directory (snapshot db, logs) |
/// | FARM_LOG_LEVEL | info | Log level |
/// | ENVIRONMENT | development | Runtime environment |
///
/// # Example
///
/// ```ignore
/// FARM_WORK_DIR=/data/agrosync FARM_LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the snapshot database and log files
    pub work_dir: String,
    /// Log level: trace | debug | info | warn | error
    pub log_level: String,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Falls back to defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("FARM_WORK_DIR").unwrap_or_else(|_| "/var/lib/agrosync".into()),
            log_level: std::env::var("FARM_LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the work directory, typically for tests
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// Path of the snapshot database file
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("farm.redb")
    }

    /// Path of the log directory
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
