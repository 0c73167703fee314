//! Log file configuration from TOML (`[log]` section)

use lumiere_domain::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw log configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLogConfig {
    /// Log file, created on the first record
    pub path: PathBuf,
    /// Minimum level written to the file
    pub level: LogLevel,
    /// Write diagnostics to the log file at all
    pub enabled: bool,
}

impl Default for FileLogConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("log.txt"),
            level: LogLevel::Info,
            enabled: true,
        }
    }
}
