//! Script configuration from TOML (`[script]` section)

use lumiere_domain::MAIN_SCRIPT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw script configuration from TOML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileScriptConfig {
    /// Script run when no script is given on the command line
    pub main: PathBuf,
    /// Member of the root table called after the script has run
    pub entrypoint: Option<String>,
}

impl Default for FileScriptConfig {
    fn default() -> Self {
        Self {
            main: PathBuf::from(MAIN_SCRIPT),
            entrypoint: None,
        }
    }
}
