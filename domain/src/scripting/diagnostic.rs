//! Structured diagnostics emitted by the scripting bridge.
//!
//! Script failures are expected operating conditions: instead of being
//! raised, they become [`Diagnostic`] values handed to a sink.

use serde::{Deserialize, Serialize};

/// Severity of a log line or diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Bracketed prefix tag written in front of each log line.
    pub fn tag(&self) -> String {
        format!("[{}]", self.as_str())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown log level: '{}'", other)),
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// What produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A protected call failed while running script code.
    RuntimeError,
    /// The runtime could not allocate memory.
    MemoryError,
    /// The message handler of a protected call itself failed.
    HandlerError,
    /// A literal or file script could not be read or compiled.
    ScriptLoadError,
    /// `call` looked up a member that does not exist.
    MissingMember,
    /// `call` found a member that is not a function.
    NotCallable,
    /// The runtime handle was opened or closed out of order.
    Lifecycle,
    /// Namespace traversal trace output.
    Resolution,
    /// A message logged by script code through `lib.log`.
    Script,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RuntimeError => "RuntimeError",
            Self::MemoryError => "MemoryError",
            Self::HandlerError => "HandlerError",
            Self::ScriptLoadError => "ScriptLoadError",
            Self::MissingMember => "MissingMember",
            Self::NotCallable => "NotCallable",
            Self::Lifecycle => "Lifecycle",
            Self::Resolution => "Resolution",
            Self::Script => "Script",
        }
    }

    /// Default severity for diagnostics of this kind.
    pub fn default_level(&self) -> LogLevel {
        match self {
            Self::RuntimeError | Self::MemoryError | Self::HandlerError | Self::ScriptLoadError => {
                LogLevel::Error
            }
            Self::MissingMember | Self::NotCallable | Self::Lifecycle => LogLevel::Warning,
            Self::Resolution => LogLevel::Debug,
            Self::Script => LogLevel::Info,
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single diagnostic event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub level: LogLevel,
    pub message: String,
    /// Stack traceback, when the runtime could produce one.
    pub trace: Option<String>,
}

impl Diagnostic {
    /// Create a diagnostic at the kind's default level.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            level: kind.default_level(),
            message: message.into(),
            trace: None,
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn with_trace(mut self, trace: impl Into<String>) -> Self {
        self.trace = Some(trace.into());
        self
    }

    /// Whether the message or the trace mentions `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.message.contains(needle)
            || self.trace.as_deref().is_some_and(|t| t.contains(needle))
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.level.tag(), self.kind, self.message)?;
        if let Some(trace) = &self.trace {
            write!(f, "\n{}", trace)?;
        }
        Ok(())
    }
}
