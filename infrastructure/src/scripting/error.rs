//! Error types for the Lua bridge

use lumiere_domain::PathError;
use mlua::prelude::LuaError;
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors raised by the bridge itself.
///
/// These are contract violations by the embedding code. Failures that come
/// from script content are reported as diagnostics instead.
#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Scripting runtime requested but it is not open")]
    ResourceNotAvailable,

    #[error("Tried to get scope '{scope}' of '{path}' but it is not a table (found {found})")]
    TypeConflict {
        path: String,
        scope: String,
        found: &'static str,
    },

    #[error(
        "Something went wrong when adding member '{path}' (stack size is {actual} but {expected} was expected)"
    )]
    StackIntegrity {
        path: String,
        expected: usize,
        actual: usize,
    },

    #[error("Producer for member '{path}' replaced the slot it was given")]
    SlotReplaced { path: String },

    #[error("Invalid member path: {0}")]
    InvalidPath(#[from] PathError),

    #[error("Stack index {index} is not valid (depth {depth})")]
    StackIndex { index: i32, depth: usize },

    #[error("Expected a {expected} at stack index {index} but found {found}")]
    UnexpectedType {
        index: i32,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Lua error: {0}")]
    Lua(#[from] LuaError),
}

impl BridgeError {
    /// Whether this error was raised by the runtime rather than the bridge.
    pub fn is_runtime_error(&self) -> bool {
        matches!(self, BridgeError::Lua(_))
    }
}
