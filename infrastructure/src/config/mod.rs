//! Configuration file loading for lumiere
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. `LUMIERE_*` environment variables (e.g. `LUMIERE_LOG__LEVEL=debug`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./lumiere.toml` or `./.lumiere.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/lumiere/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileLogConfig, FileRuntimeConfig, FileScriptConfig,
};
pub use loader::ConfigLoader;
