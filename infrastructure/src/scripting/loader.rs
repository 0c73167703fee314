//! Script loading: literal chunks, script files and `main.lua`.
//!
//! Loading never raises for script content. Compile and read failures are
//! reported as `ScriptLoadError` diagnostics; runtime failures go through
//! `protected_call` and are reported with their status.

use lumiere_application::{ScriptError, ScriptHostPort};
use lumiere_domain::{Diagnostic, DiagnosticKind, MAIN_SCRIPT};
use std::path::Path;
use tracing::{debug, info};

use super::runtime::{LuaRuntime, error_message};
use super::stack_guard::StackGuard;

impl LuaRuntime {
    /// Compile and run a literal chunk. Returns whether it ran to completion.
    pub fn load_source(&mut self, name: &str, source: &str) -> bool {
        let function = match self.lua().load(source).set_name(name).into_function() {
            Ok(function) => function,
            Err(e) => {
                self.emit(Diagnostic::new(
                    DiagnosticKind::ScriptLoadError,
                    format!("Failed to load '{}': {}", name, error_message(&e)),
                ));
                return false;
            }
        };

        let mut stack = StackGuard::new(self);
        let status = match stack.push_value(function) {
            Ok(()) => stack.protected_call(0, 0),
            Err(e) => Err(e),
        };

        match status {
            Ok(status) if status.is_ok() => {
                debug!("Chunk '{}' ran to completion", name);
                true
            }
            Ok(status) => {
                debug!("Chunk '{}' failed with status {}", name, status.code());
                false
            }
            Err(e) => {
                stack.emit(Diagnostic::new(
                    DiagnosticKind::ScriptLoadError,
                    format!("Failed to run '{}': {}", name, e),
                ));
                false
            }
        }
    }

    /// Read, compile and run a script file.
    pub fn load_file(&mut self, path: &Path) -> bool {
        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                self.emit(Diagnostic::new(
                    DiagnosticKind::ScriptLoadError,
                    format!("Cannot read script '{}': {}", path.display(), e),
                ));
                return false;
            }
        };

        info!("Running script {}", path.display());
        self.load_source(&format!("@{}", path.display()), &source)
    }

    /// Run `main.lua` from `dir`.
    pub fn load_main(&mut self, dir: &Path) -> bool {
        self.load_file(&dir.join(MAIN_SCRIPT))
    }
}

impl ScriptHostPort for LuaRuntime {
    fn load_source(&mut self, name: &str, source: &str) -> bool {
        LuaRuntime::load_source(self, name, source)
    }

    fn load_file(&mut self, path: &Path) -> bool {
        LuaRuntime::load_file(self, path)
    }

    fn call_member(&mut self, method: &str) -> Result<bool, ScriptError> {
        self.call(method, 0, 0).map_err(|e| ScriptError {
            message: e.to_string(),
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_application::{
        MemoryDiagnosticSink, RunScriptInput, RunScriptUseCase, RuntimeOptions, ScriptSource,
    };
    use mlua::prelude::*;
    use std::sync::Arc;

    fn runtime() -> (LuaRuntime, Arc<MemoryDiagnosticSink>) {
        let sink = Arc::new(MemoryDiagnosticSink::new());
        let rt = LuaRuntime::new(&RuntimeOptions::default(), sink.clone()).unwrap();
        (rt, sink)
    }

    /// Replace `print` so output lands in the global `printed` table.
    fn capture_print(rt: &LuaRuntime) {
        rt.lua()
            .load(
                r#"
                printed = {}
                print = function(...)
                    local parts = {}
                    for i = 1, select('#', ...) do
                        parts[#parts + 1] = tostring(select(i, ...))
                    end
                    printed[#printed + 1] = table.concat(parts, ' ')
                end
                "#,
            )
            .exec()
            .unwrap();
    }

    fn printed(rt: &LuaRuntime) -> Vec<String> {
        let table: LuaTable = rt.lua().globals().get("printed").unwrap();
        table.sequence_values::<String>().collect::<LuaResult<_>>().unwrap()
    }

    #[test]
    fn test_registered_values_visible_to_scripts() {
        let (mut rt, sink) = runtime();
        capture_print(&rt);
        rt.register_value("n", 5).unwrap();
        rt.register_value("x", 10).unwrap();
        rt.register_value("test.n", 9).unwrap();

        assert!(rt.load_source("=test", "print(lib.n, lib.test.n, lib.x)"));
        assert_eq!(printed(&rt), vec!["5 9 10"]);
        assert_eq!(rt.depth(), 0);
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_runtime_error_is_reported_not_raised() {
        let (mut rt, sink) = runtime();
        rt.push_integer(1);

        assert!(!rt.load_source("=boom", "error('boom')"));
        assert_eq!(rt.depth(), 1);

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiagnosticKind::RuntimeError);
        assert!(entries[0].mentions("boom"));
    }

    #[test]
    fn test_syntax_error_is_a_load_error() {
        let (mut rt, sink) = runtime();
        assert!(!rt.load_source("=broken", "local = 1"));
        assert_eq!(rt.depth(), 0);
        let entries = sink.entries();
        assert_eq!(entries[0].kind, DiagnosticKind::ScriptLoadError);
        assert!(entries[0].message.contains("broken"));
    }

    #[test]
    fn test_load_file_runs_script() {
        let (mut rt, _) = runtime();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("setup.lua");
        std::fs::write(&path, "loaded_from_file = 42").unwrap();

        assert!(rt.load_file(&path));
        let value: i64 = rt.lua().globals().get("loaded_from_file").unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_load_missing_file() {
        let (mut rt, sink) = runtime();
        let dir = tempfile::tempdir().unwrap();

        assert!(!rt.load_file(&dir.path().join("absent.lua")));
        let entries = sink.entries();
        assert_eq!(entries[0].kind, DiagnosticKind::ScriptLoadError);
        assert!(entries[0].message.contains("absent.lua"));
    }

    #[test]
    fn test_load_main_from_directory() {
        let (mut rt, _) = runtime();
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.lua"), "main_ran = true").unwrap();

        assert!(rt.load_main(dir.path()));
        let ran: bool = rt.lua().globals().get("main_ran").unwrap();
        assert!(ran);
    }

    #[test]
    fn test_run_script_use_case_calls_entrypoint() {
        let (mut rt, _) = runtime();
        let input = RunScriptInput::new(ScriptSource::Inline(
            "lib = { start = function() started = true end }".to_string(),
        ))
        .with_entrypoint("start");

        let output = RunScriptUseCase::new().execute(&mut rt, input).unwrap();
        assert!(output.loaded);
        assert!(output.entrypoint_called);
        let started: bool = rt.lua().globals().get("started").unwrap();
        assert!(started);
    }

    #[test]
    fn test_entrypoint_error_surfaces_as_script_error() {
        let (mut rt, _) = runtime();
        rt.load_source("=setup", "lib = { start = function() error('bad start') end }");

        let err = ScriptHostPort::call_member(&mut rt, "start").unwrap_err();
        assert!(err.message.contains("bad start"));
        assert_eq!(rt.depth(), 0);
    }
}
