//! Diagnostic sink that forwards to `tracing`.

use lumiere_application::DiagnosticSink;
use lumiere_domain::{Diagnostic, LogLevel};
use tracing::{debug, error, info, warn};

/// Emits each diagnostic as a `tracing` event at the matching level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnosticSink;

impl DiagnosticSink for TracingDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let kind = diagnostic.kind.as_str();
        let message = diagnostic.message.as_str();
        match diagnostic.level {
            LogLevel::Debug => debug!(target: "lumiere::script", kind, "{}", message),
            LogLevel::Info => info!(target: "lumiere::script", kind, "{}", message),
            LogLevel::Warning => warn!(target: "lumiere::script", kind, "{}", message),
            LogLevel::Error => error!(target: "lumiere::script", kind, "{}", message),
        }
        if let Some(trace) = &diagnostic.trace {
            debug!(target: "lumiere::script", "{}", trace);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_domain::DiagnosticKind;

    #[test]
    fn test_emit_without_subscriber_is_silent() {
        let sink = TracingDiagnosticSink;
        sink.emit(Diagnostic::new(DiagnosticKind::Script, "hello"));
        sink.emit(Diagnostic::new(DiagnosticKind::RuntimeError, "boom").with_trace("trace"));
    }
}
