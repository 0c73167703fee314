//! Runtime configuration from TOML (`[runtime]` section)

use lumiere_domain::DEFAULT_LIBRARY_NAME;
use serde::{Deserialize, Serialize};

/// Raw runtime configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRuntimeConfig {
    /// Global name of the root table host members are registered under
    pub library_name: String,
    /// Heap limit in bytes for the Lua state
    pub memory_limit: Option<usize>,
    /// Block C extension modules
    pub sandbox: bool,
}

impl Default for FileRuntimeConfig {
    fn default() -> Self {
        Self {
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
            memory_limit: None,
            sandbox: true,
        }
    }
}
