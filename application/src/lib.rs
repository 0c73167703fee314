//! Application layer for lumiere
//!
//! This crate contains use cases, port definitions, and runtime options.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::RuntimeOptions;
pub use ports::{
    diagnostic_sink::{
        CompositeDiagnosticSink, DiagnosticSink, MemoryDiagnosticSink, NoDiagnosticSink,
    },
    script_host::{NoScriptHost, ScriptError, ScriptHostPort},
};
pub use use_cases::run_script::{
    RunScriptError, RunScriptInput, RunScriptOutput, RunScriptUseCase, ScriptSource,
};
