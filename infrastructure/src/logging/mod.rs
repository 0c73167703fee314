//! Logging infrastructure: diagnostic sinks backed by files and `tracing`.
//!
//! - [`LineLogger`]: leveled line writer for `log.txt`
//! - [`LineLogSink`]: [`DiagnosticSink`](lumiere_application::DiagnosticSink) over a `LineLogger`
//! - [`TracingDiagnosticSink`]: forwards diagnostics to `tracing`

mod line_logger;
mod tracing_sink;

pub use line_logger::{LineLogSink, LineLogger, LogError};
pub use tracing_sink::TracingDiagnosticSink;
