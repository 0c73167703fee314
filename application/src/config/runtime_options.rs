//! Runtime options: parameters for opening the scripting runtime.
//!
//! These are read from the `[runtime]` config section by the infrastructure
//! layer and handed to the runtime when it is opened.

use lumiere_domain::DEFAULT_LIBRARY_NAME;
use serde::{Deserialize, Serialize};

/// Options applied when a runtime is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeOptions {
    /// Global name of the root namespace table.
    pub library_name: String,
    /// Upper bound on runtime heap usage in bytes (`None` = unlimited).
    pub memory_limit: Option<usize>,
    /// Block C extension modules.
    pub sandbox: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
            memory_limit: None,
            sandbox: true,
        }
    }
}

impl RuntimeOptions {
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    pub fn with_memory_limit(mut self, limit: Option<usize>) -> Self {
        self.memory_limit = limit;
        self
    }

    pub fn with_sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}
