//! Host functions exposed to scripts under the root library table.
//!
//! ```lua
//! print(lib.version)            -- host version string
//! lib.log.info("level loaded")  -- forwarded to the diagnostic sink
//! lib.log.warning("low memory")
//! ```

use lumiere_domain::{Diagnostic, DiagnosticKind, LogLevel};
use tracing::debug;

use super::error::Result;
use super::runtime::LuaRuntime;

const LOG_FUNCTIONS: [(&str, LogLevel); 4] = [
    ("log.debug", LogLevel::Debug),
    ("log.info", LogLevel::Info),
    ("log.warning", LogLevel::Warning),
    ("log.error", LogLevel::Error),
];

/// Register `lib.version` and `lib.log.*` on the runtime.
///
/// Log calls become `Script` diagnostics on the runtime's sink, at the level
/// named by the function.
pub fn register_host_api(runtime: &mut LuaRuntime) -> Result<()> {
    runtime.register_value("version", env!("CARGO_PKG_VERSION"))?;

    for (path, level) in LOG_FUNCTIONS {
        let sink = runtime.sink().clone();
        runtime.register_function(path, move |_, message: String| {
            sink.emit(Diagnostic::new(DiagnosticKind::Script, message).with_level(level));
            Ok(())
        })?;
    }

    debug!("Host API registered under '{}'", runtime.library_name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_application::{MemoryDiagnosticSink, RuntimeOptions};
    use mlua::prelude::*;
    use std::sync::{Arc, Mutex};

    fn runtime() -> (LuaRuntime, Arc<MemoryDiagnosticSink>) {
        let sink = Arc::new(MemoryDiagnosticSink::new());
        let mut rt = LuaRuntime::new(&RuntimeOptions::default(), sink.clone()).unwrap();
        register_host_api(&mut rt).unwrap();
        (rt, sink)
    }

    #[test]
    fn test_version_is_registered() {
        let (rt, _) = runtime();
        let version: String = rt.lua().load("return lib.version").eval().unwrap();
        assert_eq!(version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_log_functions_forward_to_sink() {
        let (mut rt, sink) = runtime();
        assert!(rt.load_source("=log", "lib.log.info('hello') lib.log.error('bad')"));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].kind, DiagnosticKind::Script);
        assert_eq!(entries[0].level, LogLevel::Info);
        assert_eq!(entries[0].message, "hello");
        assert_eq!(entries[1].level, LogLevel::Error);
    }

    #[test]
    fn test_host_api_leaves_room_for_other_members() {
        let (mut rt, _) = runtime();
        rt.register_value("log.custom", 1).unwrap();
        assert!(rt.member_exists("log.info").unwrap());
        assert!(rt.member_exists("log.custom").unwrap());
    }

    #[test]
    fn test_resolved_host_function_can_be_invoked() {
        let (mut rt, _) = runtime();
        let output = Arc::new(Mutex::new(Vec::new()));
        let captured = Arc::clone(&output);
        rt.register_function("game.config", move |_, ()| {
            captured.lock().unwrap().push("Hello from host".to_string());
            Ok(())
        })
        .unwrap();

        assert!(rt.get_nested_member("game.config").unwrap());
        assert_eq!(rt.depth(), 1);
        assert!(rt.is_function(-1));

        let status = rt.protected_call(0, 0).unwrap();
        assert!(status.is_ok());
        assert_eq!(rt.depth(), 0);
        assert_eq!(*output.lock().unwrap(), vec!["Hello from host"]);
    }

    #[test]
    fn test_script_can_call_host_function() {
        let (mut rt, _) = runtime();
        rt.register_function("math.square", |_, x: i64| Ok(x * x))
            .unwrap();
        assert!(rt.load_source("=square", "squared = lib.math.square(7)"));
        let value: LuaValue = rt.lua().globals().get("squared").unwrap();
        assert_eq!(value, LuaValue::Integer(49));
    }
}
