//! Lua scripting bridge
//!
//! Provides [`LuaRuntime`], an mlua (Lua 5.4) state paired with an explicit
//! evaluation stack, and the operations that bridge host values into the
//! nested namespace under the root library table.
//!
//! # Modules
//!
//! - `runtime`: stack primitives (push/pop/get-field/set-field/call/pcall)
//! - `stack_guard`: depth checkpoint that unwinds the stack on every exit path
//! - `registrar`: `add_nested_member`, creating scopes lazily
//! - `resolver`: read-only `get_nested_member` traversal
//! - `invoker`: `call` / `protected_call`
//! - `loader`: literal and file script loading
//! - `handle`: open/get/close lifecycle of the single runtime
//! - `host_api`: `lib.version` and `lib.log.*`
//! - `sandbox`: C module blocking

mod error;
mod handle;
mod host_api;
mod invoker;
mod loader;
mod registrar;
mod resolver;
mod runtime;
mod sandbox;
mod stack_guard;

pub use error::{BridgeError, Result};
pub use handle::RuntimeHandle;
pub use host_api::register_host_api;
pub use runtime::{CallStatus, LuaRuntime};
pub use stack_guard::StackGuard;
