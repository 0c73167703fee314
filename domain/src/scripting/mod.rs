//! Scripting domain types
//!
//! Defines member paths and diagnostics for the Lua bridge. These types are
//! runtime-agnostic; the actual Lua state lives in the infrastructure layer.

pub mod diagnostic;
pub mod path;

/// Name of the global root table every member path is anchored under.
pub const DEFAULT_LIBRARY_NAME: &str = "lib";

/// Script loaded from the working directory when nothing else is given.
pub const MAIN_SCRIPT: &str = "main.lua";
