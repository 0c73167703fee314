//! Member resolution: `get_nested_member`.
//!
//! Read-only traversal of the namespace: nothing is created, and a missing
//! member is a normal `false` result rather than an error.

use lumiere_domain::{Diagnostic, DiagnosticKind, MemberPath};

use super::error::Result;
use super::runtime::LuaRuntime;
use super::stack_guard::StackGuard;

impl LuaRuntime {
    /// Resolve `path` and leave its value on top of the stack.
    ///
    /// Returns `Ok(true)` with exactly one value pushed when every scope is a
    /// table (the leaf itself may be nil). Returns `Ok(false)` with the stack
    /// unchanged when the root or an intermediate scope is missing or not a
    /// table.
    pub fn get_nested_member(&mut self, path: &str) -> Result<bool> {
        let path = MemberPath::parse(path)?;
        let library = self.library_name().to_string();
        let mut stack = StackGuard::new(self);

        stack.get_global(&library)?;
        if !stack.is_table(-1) {
            stack.emit(Diagnostic::new(
                DiagnosticKind::Resolution,
                format!("Library '{}' is not defined", library),
            ));
            return Ok(false);
        }

        for scope in path.scopes() {
            stack.get_field(-1, scope)?;
            if !stack.is_table(-1) {
                stack.emit(Diagnostic::new(
                    DiagnosticKind::Resolution,
                    format!(
                        "Scope '{}' of '{}' cannot be traversed (found {})",
                        scope,
                        path,
                        stack.type_name(-1)
                    ),
                ));
                return Ok(false);
            }
        }

        // Move the leaf value behind the traversed tables; the guard pops them
        stack.get_field(-1, path.leaf())?;
        let slot = stack.base() as i32 + 1;
        stack.insert(slot)?;
        stack.keep(1);
        Ok(true)
    }

    /// Whether `path` resolves to a non-nil value. Leaves the stack unchanged.
    pub fn member_exists(&mut self, path: &str) -> Result<bool> {
        let mut stack = StackGuard::new(self);
        Ok(stack.get_nested_member(path)? && !stack.is_nil(-1))
    }
}
