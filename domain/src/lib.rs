//! Domain layer for lumiere
//!
//! This crate contains the value types of the scripting bridge.
//! It has no dependencies on the Lua runtime or on presentation concerns.
//!
//! # Core Concepts
//!
//! - **Member path**: a dotted name (`game.config.start`) locating a value
//!   inside the nested namespace under the root library table
//! - **Diagnostic**: a structured report of a script-level failure, which is
//!   logged and recovered from rather than raised

pub mod core;
pub mod scripting;

// Re-export commonly used types
pub use crate::core::string::explode;
pub use scripting::{
    DEFAULT_LIBRARY_NAME, MAIN_SCRIPT,
    diagnostic::{Diagnostic, DiagnosticKind, LogLevel},
    path::{MemberPath, PATH_DELIMITER, PathError},
};
