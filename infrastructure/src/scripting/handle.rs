//! Lifecycle of the process-wide runtime.
//!
//! [`RuntimeHandle`] owns at most one [`LuaRuntime`]. It is created empty,
//! opened once, handed out by `&mut` for the bridge operations, and closed at
//! shutdown. The binary keeps a single handle; there is no global.

use lumiere_application::{DiagnosticSink, RuntimeOptions};
use lumiere_domain::{Diagnostic, DiagnosticKind};
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::{BridgeError, Result};
use super::runtime::LuaRuntime;

/// Owner slot for the runtime: `Closed` until [`open`](Self::open).
#[derive(Default)]
pub struct RuntimeHandle {
    runtime: Option<LuaRuntime>,
}

impl RuntimeHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the runtime.
    ///
    /// Opening an already open handle keeps the existing runtime; the
    /// attempt is logged and reported as a `Lifecycle` diagnostic.
    pub fn open(&mut self, options: &RuntimeOptions, sink: Arc<dyn DiagnosticSink>) -> Result<()> {
        if let Some(runtime) = &self.runtime {
            error!("Attempted to open the Lua runtime twice");
            runtime.emit(Diagnostic::new(
                DiagnosticKind::Lifecycle,
                "Lua runtime is already open",
            ));
            return Ok(());
        }

        self.runtime = Some(LuaRuntime::new(options, sink)?);
        debug!("Lua runtime opened");
        Ok(())
    }

    /// The open runtime.
    pub fn get(&mut self) -> Result<&mut LuaRuntime> {
        self.runtime.as_mut().ok_or(BridgeError::ResourceNotAvailable)
    }

    pub fn is_open(&self) -> bool {
        self.runtime.is_some()
    }

    /// Destroy the runtime. Closing a closed handle only logs a warning.
    pub fn close(&mut self) {
        match self.runtime.take() {
            Some(_) => debug!("Lua runtime closed"),
            None => warn!("Close requested but the Lua runtime is not open"),
        }
    }
}
