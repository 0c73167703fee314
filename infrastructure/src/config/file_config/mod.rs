//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod log;
mod runtime;
mod script;

pub use log::FileLogConfig;
pub use runtime::FileRuntimeConfig;
pub use script::FileScriptConfig;

use lumiere_application::RuntimeOptions;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("runtime.library_name '{0}' is not a valid Lua identifier")]
    InvalidLibraryName(String),

    #[error("script.main cannot be empty")]
    EmptyScriptPath,

    #[error("script.entrypoint '{0}' is not a valid Lua identifier")]
    InvalidEntrypoint(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Scripting runtime settings
    pub runtime: FileRuntimeConfig,
    /// Script selection
    pub script: FileScriptConfig,
    /// Log file settings
    pub log: FileLogConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !is_identifier(&self.runtime.library_name) {
            return Err(ConfigValidationError::InvalidLibraryName(
                self.runtime.library_name.clone(),
            ));
        }

        if self.script.main.as_os_str().is_empty() {
            return Err(ConfigValidationError::EmptyScriptPath);
        }

        if let Some(entrypoint) = &self.script.entrypoint
            && !is_identifier(entrypoint)
        {
            return Err(ConfigValidationError::InvalidEntrypoint(entrypoint.clone()));
        }

        Ok(())
    }

    /// Options for opening the runtime
    pub fn to_runtime_options(&self) -> RuntimeOptions {
        RuntimeOptions {
            library_name: self.runtime.library_name.clone(),
            memory_limit: self.runtime.memory_limit,
            sandbox: self.runtime.sandbox,
        }
    }
}

/// Lua identifier: letter or underscore, then letters, digits or underscores.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
