//! Script host port: interface for the embedded Lua runtime.
//!
//! This port abstracts the runtime so that:
//! - The application layer doesn't depend on mlua
//! - A no-op implementation (`NoScriptHost`) is always available
//!
//! Loading is never fallible at this boundary: load and runtime failures are
//! reported through the host's diagnostic sink and surface here only as a
//! `false` return. Calling an entrypoint is an unchecked call, so a script
//! error raised by it propagates as [`ScriptError`].

use std::path::Path;

/// Error from a script host operation.
#[derive(Debug, Clone)]
pub struct ScriptError {
    pub message: String,
}

impl std::fmt::Display for ScriptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "script error: {}", self.message)
    }
}

impl std::error::Error for ScriptError {}

/// Port for the script host.
pub trait ScriptHostPort {
    /// Compile and run a literal chunk. Returns whether it ran to completion.
    fn load_source(&mut self, name: &str, source: &str) -> bool;

    /// Read, compile and run a script file. Returns whether it ran to completion.
    fn load_file(&mut self, path: &Path) -> bool;

    /// Call a function stored directly under the root library table.
    ///
    /// Returns `Ok(false)` when the member is missing or not callable
    /// (already reported as a diagnostic).
    fn call_member(&mut self, method: &str) -> Result<bool, ScriptError>;

    /// Whether a real runtime backs this host.
    fn is_available(&self) -> bool;
}

/// No-op host used when no runtime is available.
pub struct NoScriptHost;

impl ScriptHostPort for NoScriptHost {
    fn load_source(&mut self, _name: &str, _source: &str) -> bool {
        false
    }

    fn load_file(&mut self, _path: &Path) -> bool {
        false
    }

    fn call_member(&mut self, _method: &str) -> Result<bool, ScriptError> {
        Ok(false)
    }

    fn is_available(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_script_host_is_noop() {
        let mut host = NoScriptHost;
        assert!(!host.is_available());
        assert!(!host.load_source("chunk", "return 1"));
        assert!(!host.load_file(Path::new("/nonexistent/main.lua")));
        assert!(!host.call_member("start").unwrap());
    }

    #[test]
    fn test_script_error_display() {
        let err = ScriptError {
            message: "boom".into(),
        };
        assert_eq!(err.to_string(), "script error: boom");
    }
}
