//! Scoped stack checkpoint.
//!
//! A [`StackGuard`] records the stack depth when it is created and, when it
//! is dropped, pops everything above `base + kept`. Bridge operations run all
//! their stack work through a guard, so early returns and `?` leave the stack
//! exactly as deep as the operation's contract says.

use std::ops::{Deref, DerefMut};
use tracing::trace;

use super::error::{BridgeError, Result};
use super::runtime::LuaRuntime;

/// Depth checkpoint over a [`LuaRuntime`].
///
/// Derefs to the runtime, so stack primitives are called on the guard.
pub struct StackGuard<'a> {
    runtime: &'a mut LuaRuntime,
    base: usize,
    kept: usize,
}

impl<'a> StackGuard<'a> {
    /// Checkpoint at the current depth.
    pub fn new(runtime: &'a mut LuaRuntime) -> Self {
        let base = runtime.depth();
        Self {
            runtime,
            base,
            kept: 0,
        }
    }

    /// Checkpoint below the top `count` values, which the operation consumes.
    pub fn below(runtime: &'a mut LuaRuntime, count: usize) -> Result<Self> {
        let depth = runtime.depth();
        let base = depth.checked_sub(count).ok_or(BridgeError::StackIndex {
            index: -(count as i32),
            depth,
        })?;
        Ok(Self {
            runtime,
            base,
            kept: 0,
        })
    }

    /// Depth at the checkpoint.
    pub fn base(&self) -> usize {
        self.base
    }

    /// Leave `count` values above the checkpoint when the guard drops.
    pub fn keep(&mut self, count: usize) {
        self.kept = count;
    }

    /// Values currently above the checkpoint.
    pub fn scratch(&self) -> usize {
        self.runtime.depth().saturating_sub(self.base)
    }
}

impl Deref for StackGuard<'_> {
    type Target = LuaRuntime;

    fn deref(&self) -> &LuaRuntime {
        &*self.runtime
    }
}

impl DerefMut for StackGuard<'_> {
    fn deref_mut(&mut self) -> &mut LuaRuntime {
        &mut *self.runtime
    }
}

impl Drop for StackGuard<'_> {
    fn drop(&mut self) {
        let target = self.base + self.kept;
        let depth = self.runtime.depth();
        if depth > target {
            trace!("Unwinding {} stack value(s) to depth {}", depth - target, target);
            self.runtime.set_top(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_application::{NoDiagnosticSink, RuntimeOptions};
    use std::sync::Arc;

    fn runtime() -> LuaRuntime {
        LuaRuntime::new(&RuntimeOptions::default(), Arc::new(NoDiagnosticSink)).unwrap()
    }

    #[test]
    fn test_guard_unwinds_scratch() {
        let mut rt = runtime();
        rt.push_integer(1);
        {
            let mut stack = StackGuard::new(&mut rt);
            stack.push_integer(2);
            stack.push_integer(3);
            assert_eq!(stack.scratch(), 2);
        }
        assert_eq!(rt.depth(), 1);
    }

    #[test]
    fn test_guard_keeps_declared_results() {
        let mut rt = runtime();
        {
            let mut stack = StackGuard::new(&mut rt);
            stack.push_integer(7);
            stack.push_integer(8);
            stack.keep(1);
        }
        assert_eq!(rt.depth(), 1);
        assert_eq!(rt.value(-1).unwrap(), &mlua::Value::Integer(7));
    }

    #[test]
    fn test_guard_unwinds_on_error_path() {
        fn failing(rt: &mut LuaRuntime) -> Result<()> {
            let mut stack = StackGuard::new(rt);
            stack.push_integer(1);
            stack.get_field(-1, "x")?;
            Ok(())
        }

        let mut rt = runtime();
        assert!(failing(&mut rt).is_err());
        assert_eq!(rt.depth(), 0);
    }

    #[test]
    fn test_below_consumes_arguments() {
        let mut rt = runtime();
        rt.push_integer(1);
        rt.push_integer(2);
        {
            let stack = StackGuard::below(&mut rt, 1).unwrap();
            assert_eq!(stack.base(), 1);
        }
        assert_eq!(rt.depth(), 1);
        assert!(StackGuard::below(&mut rt, 3).is_err());
    }
}
