//! Infrastructure layer for lumiere
//!
//! This crate contains the mlua-backed scripting runtime and the adapters
//! that implement the ports defined in the application layer, including
//! log sinks and configuration file loading.

pub mod config;
pub mod logging;
pub mod scripting;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileLogConfig, FileRuntimeConfig,
    FileScriptConfig,
};
pub use logging::{LineLogSink, LineLogger, LogError, TracingDiagnosticSink};
pub use scripting::{
    BridgeError, CallStatus, LuaRuntime, Result, RuntimeHandle, StackGuard, register_host_api,
};
