//! Namespace registration: `add_nested_member`.
//!
//! Installs a host value at a dotted path under the root library table,
//! creating the root and every intermediate scope table on demand:
//!
//! ```text
//! add_nested_member("game.config.start", producer)
//!
//!   lib = lib or {}
//!   lib.game = lib.game or {}
//!   lib.game.config = lib.game.config or {}
//!   lib.game.config.start = <value pushed by producer>
//! ```

use lumiere_domain::MemberPath;
use mlua::prelude::*;
use mlua::{FromLuaMulti, IntoLua, IntoLuaMulti, MaybeSend};
use tracing::debug;

use super::error::{BridgeError, Result};
use super::runtime::LuaRuntime;
use super::stack_guard::StackGuard;

impl LuaRuntime {
    /// Install the value pushed by `producer` at `path`.
    ///
    /// The producer runs exactly once with the leaf key already on the stack
    /// and must push exactly one value. Existing intermediate tables and
    /// sibling leaves are preserved; only the leaf is overwritten.
    ///
    /// # Errors
    ///
    /// - [`BridgeError::InvalidPath`] for a malformed path
    /// - [`BridgeError::TypeConflict`] when the root or an intermediate
    ///   segment already holds a non-table value
    /// - [`BridgeError::StackIntegrity`] when the producer pushed zero or
    ///   several values
    /// - [`BridgeError::SlotReplaced`] when the producer swapped out the
    ///   leaf key or its scope table
    ///
    /// The stack is back at its original depth on every exit path.
    pub fn add_nested_member<F>(&mut self, path: &str, producer: F) -> Result<()>
    where
        F: FnOnce(&mut LuaRuntime) -> Result<()>,
    {
        let path = MemberPath::parse(path)?;
        let library = self.library_name().to_string();
        let mut stack = StackGuard::new(self);

        // Establish the root table
        stack.get_global(&library)?;
        if stack.is_nil(-1) {
            stack.pop(1);
            stack.new_table()?;
            stack.set_global(&library)?;
            stack.get_global(&library)?;
        } else if !stack.is_table(-1) {
            return Err(BridgeError::TypeConflict {
                path: path.to_string(),
                scope: library,
                found: stack.type_name(-1),
            });
        }

        // Walk the scopes, creating missing tables
        for scope in path.scopes() {
            stack.get_field(-1, scope)?;
            if stack.is_nil(-1) {
                stack.pop(1);
                stack.new_table()?;
                stack.set_field(-2, scope)?;
                stack.get_field(-1, scope)?;
            } else if !stack.is_table(-1) {
                return Err(BridgeError::TypeConflict {
                    path: path.to_string(),
                    scope: scope.clone(),
                    found: stack.type_name(-1),
                });
            }
        }

        stack.push_string(path.leaf())?;
        let scope = stack.value(-2)?.clone();
        let key = stack.value(-1)?.clone();
        let expected = stack.depth() + 1;

        producer(&mut *stack)?;

        let actual = stack.depth();
        if actual != expected {
            return Err(BridgeError::StackIntegrity {
                path: path.to_string(),
                expected,
                actual,
            });
        }
        // Same depth is not enough: the table and key below the value must be ours
        if stack.value(-3)? != &scope || stack.value(-2)? != &key {
            return Err(BridgeError::SlotReplaced {
                path: path.to_string(),
            });
        }

        stack.set_table(-3)?;
        stack.pop(path.scopes().len());
        stack.set_global(&library)?;

        debug!("Registered '{}.{}'", library, path);
        Ok(())
    }

    /// Register a plain value at `path`.
    pub fn register_value(&mut self, path: &str, value: impl IntoLua) -> Result<()> {
        self.add_nested_member(path, move |rt| rt.push_value(value))
    }

    /// Register a host function at `path`.
    pub fn register_function<A, R, F>(&mut self, path: &str, function: F) -> Result<()>
    where
        A: FromLuaMulti,
        R: IntoLuaMulti,
        F: Fn(&Lua, A) -> LuaResult<R> + MaybeSend + 'static,
    {
        self.add_nested_member(path, move |rt| rt.push_function(function))
    }
}
