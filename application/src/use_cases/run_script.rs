//! Run Script use case.
//!
//! Loads a script (inline source or a file, `main.lua` by convention) into a
//! [`ScriptHostPort`] and, when an entrypoint is configured, calls
//! `lib.<entrypoint>` once the script has run.

use crate::ports::script_host::{ScriptError, ScriptHostPort};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur while running a script.
#[derive(Error, Debug)]
pub enum RunScriptError {
    #[error("Entrypoint '{name}' failed: {source}")]
    Entrypoint {
        name: String,
        #[source]
        source: ScriptError,
    },

    #[error("Scripting runtime is not available")]
    Unavailable,
}

/// Where the script comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptSource {
    /// A file on disk.
    File(PathBuf),
    /// A literal chunk (e.g. from `--eval`).
    Inline(String),
}

/// Input for the [`RunScriptUseCase`].
#[derive(Debug, Clone)]
pub struct RunScriptInput {
    pub source: ScriptSource,
    /// Member of the root table to call after loading (e.g. `start`).
    pub entrypoint: Option<String>,
}

impl RunScriptInput {
    pub fn new(source: ScriptSource) -> Self {
        Self {
            source,
            entrypoint: None,
        }
    }

    pub fn with_entrypoint(mut self, entrypoint: impl Into<String>) -> Self {
        self.entrypoint = Some(entrypoint.into());
        self
    }
}

/// Result of a script run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunScriptOutput {
    /// The script compiled and ran to completion.
    pub loaded: bool,
    /// The entrypoint was found and called.
    pub entrypoint_called: bool,
}

/// Use case for running a script against a host.
pub struct RunScriptUseCase;

impl RunScriptUseCase {
    pub fn new() -> Self {
        Self
    }

    pub fn execute(
        &self,
        host: &mut dyn ScriptHostPort,
        input: RunScriptInput,
    ) -> Result<RunScriptOutput, RunScriptError> {
        if !host.is_available() {
            return Err(RunScriptError::Unavailable);
        }

        let loaded = match &input.source {
            ScriptSource::File(path) => {
                info!("Loading script {}", path.display());
                host.load_file(path)
            }
            ScriptSource::Inline(code) => {
                debug!("Loading inline chunk ({} bytes)", code.len());
                host.load_source("=(inline)", code)
            }
        };

        let mut output = RunScriptOutput {
            loaded,
            entrypoint_called: false,
        };

        let Some(entrypoint) = input.entrypoint else {
            return Ok(output);
        };

        if !loaded {
            warn!("Skipping entrypoint '{}': script did not load", entrypoint);
            return Ok(output);
        }

        output.entrypoint_called =
            host.call_member(&entrypoint)
                .map_err(|source| RunScriptError::Entrypoint {
                    name: entrypoint.clone(),
                    source,
                })?;

        Ok(output)
    }
}

impl Default for RunScriptUseCase {
    fn default() -> Self {
        Self::new()
    }
}
