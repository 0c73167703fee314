//! Port for diagnostic output.
//!
//! Script-level failures (runtime errors, load errors, missing members) are
//! reported as [`Diagnostic`] values through this trait instead of being
//! printed or raised. The infrastructure layer provides file and `tracing`
//! backed sinks; presentation provides a console sink.

use lumiere_domain::Diagnostic;
use std::sync::{Arc, Mutex};

/// Receiver of diagnostics.
///
/// `emit` is synchronous and non-fallible: a sink that cannot deliver a
/// diagnostic drops it rather than disturbing the caller.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for Arc<T> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Discards every diagnostic.
pub struct NoDiagnosticSink;

impl DiagnosticSink for NoDiagnosticSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Keeps diagnostics in memory so they can be inspected later.
#[derive(Default)]
pub struct MemoryDiagnosticSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl MemoryDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far.
    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(diagnostic);
        }
    }
}

/// Fans each diagnostic out to several sinks, in order.
pub struct CompositeDiagnosticSink {
    delegates: Vec<Arc<dyn DiagnosticSink>>,
}

impl CompositeDiagnosticSink {
    pub fn new(delegates: Vec<Arc<dyn DiagnosticSink>>) -> Self {
        Self { delegates }
    }
}

impl DiagnosticSink for CompositeDiagnosticSink {
    fn emit(&self, diagnostic: Diagnostic) {
        for d in &self.delegates {
            d.emit(diagnostic.clone());
        }
    }
}
