//! Presentation layer for lumiere
//!
//! This crate contains the CLI definition and the console rendering of
//! diagnostics and run summaries.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use output::console::{ConsoleDiagnosticSink, ConsoleFormatter};
