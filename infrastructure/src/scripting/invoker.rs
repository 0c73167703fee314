//! Invocation: `call` and `protected_call`.
//!
//! `call` trusts the callable: a script error raised inside it propagates.
//! `protected_call` treats script failures as expected: they are classified,
//! reported to the diagnostic sink, and the stack is restored.

use lumiere_domain::{Diagnostic, DiagnosticKind};
use mlua::prelude::*;
use tracing::debug;

use super::error::Result;
use super::runtime::{CallStatus, LuaRuntime};
use super::stack_guard::StackGuard;

impl LuaRuntime {
    /// Call `lib.<method>` with the `nargs` arguments on top of the stack.
    ///
    /// The arguments are consumed in every case. When the member is missing
    /// or not a function a diagnostic is emitted and `Ok(false)` returned.
    /// Otherwise the call is unchecked: `nresults` results are left on
    /// success, and a runtime error propagates with the stack restored.
    pub fn call(&mut self, method: &str, nargs: usize, nresults: usize) -> Result<bool> {
        let library = self.library_name().to_string();
        let mut stack = StackGuard::below(self, nargs)?;

        stack.get_global(&library)?;
        if !stack.is_table(-1) {
            stack.emit(Diagnostic::new(
                DiagnosticKind::MissingMember,
                format!("Library '{}' is not defined", library),
            ));
            return Ok(false);
        }

        stack.get_field(-1, method)?;
        if !stack.is_function(-1) {
            let kind = if stack.is_nil(-1) {
                DiagnosticKind::MissingMember
            } else {
                DiagnosticKind::NotCallable
            };
            stack.emit(Diagnostic::new(
                kind,
                format!(
                    "'{}' is 'nil' or is not a callable member of '{}' object (found {})",
                    method,
                    library,
                    stack.type_name(-1)
                ),
            ));
            return Ok(false);
        }
        debug!("'{}' is a callable member", method);

        // [args.., lib, f] -> [f, args..]
        stack.remove(-2)?;
        let slot = stack.base() as i32 + 1;
        stack.insert(slot)?;

        stack.call_raw(nargs, Some(nresults))?;
        stack.keep(nresults);
        Ok(true)
    }

    /// Protected call of the function below the top `nargs` arguments.
    ///
    /// Never fails for script errors: a failure is reported as a diagnostic,
    /// its error value popped, and the status returned. On success `nresults`
    /// results are left on the stack.
    pub fn protected_call(&mut self, nargs: usize, nresults: usize) -> Result<CallStatus> {
        self.protected_call_inner(nargs, nresults, None)
    }

    /// [`protected_call`](Self::protected_call) with a message handler at
    /// `handler`. The handler stays on the stack.
    pub fn protected_call_with_handler(
        &mut self,
        nargs: usize,
        nresults: usize,
        handler: i32,
    ) -> Result<CallStatus> {
        self.protected_call_inner(nargs, nresults, Some(handler))
    }

    fn protected_call_inner(
        &mut self,
        nargs: usize,
        nresults: usize,
        handler: Option<i32>,
    ) -> Result<CallStatus> {
        let mut stack = StackGuard::below(self, nargs + 1)?;

        let status = stack.pcall(nargs, Some(nresults), handler)?;
        if status.is_ok() {
            stack.keep(nresults);
            return Ok(status);
        }

        // Only strings and numbers count as messages
        let message = match stack.value(-1)? {
            LuaValue::String(s) => Some(s.to_string_lossy().to_string()),
            LuaValue::Integer(n) => Some(n.to_string()),
            LuaValue::Number(n) => Some(n.to_string()),
            _ => None,
        };
        stack.pop(1);

        let diagnostic = match message {
            Some(message) => stack.describe_failure(status, &message),
            None => Diagnostic::new(status.diagnostic_kind(), status.generic_message()),
        };
        stack.emit(diagnostic);
        Ok(status)
    }

    /// Build a diagnostic for a failed call, splitting off the traceback.
    fn describe_failure(&self, status: CallStatus, message: &str) -> Diagnostic {
        let full = self.traceback(message);
        match full.split_once("\nstack traceback:") {
            Some((head, trace)) => Diagnostic::new(status.diagnostic_kind(), head)
                .with_trace(format!("stack traceback:{}", trace)),
            None => Diagnostic::new(status.diagnostic_kind(), full),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumiere_application::{MemoryDiagnosticSink, RuntimeOptions};
    use std::sync::{Arc, Mutex};

    fn runtime() -> (LuaRuntime, Arc<MemoryDiagnosticSink>) {
        let sink = Arc::new(MemoryDiagnosticSink::new());
        let rt = LuaRuntime::new(&RuntimeOptions::default(), sink.clone()).unwrap();
        (rt, sink)
    }

    fn compile(rt: &LuaRuntime, code: &str) -> LuaFunction {
        rt.lua().load(code).eval().unwrap()
    }

    #[test]
    fn test_call_invokes_member() {
        let (mut rt, sink) = runtime();
        let hits = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&hits);
        rt.register_function("start", move |_, ()| {
            *counter.lock().unwrap() += 1;
            Ok(())
        })
        .unwrap();

        assert!(rt.call("start", 0, 0).unwrap());
        assert_eq!(*hits.lock().unwrap(), 1);
        assert_eq!(rt.depth(), 0);
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_call_passes_arguments_and_keeps_results() {
        let (mut rt, _) = runtime();
        rt.register_function("add", |_, (a, b): (i64, i64)| Ok(a + b))
            .unwrap();
        rt.push_string("below").unwrap();
        rt.push_integer(2);
        rt.push_integer(3);

        assert!(rt.call("add", 2, 1).unwrap());
        assert_eq!(rt.depth(), 2);
        assert_eq!(rt.value(-1).unwrap(), &LuaValue::Integer(5));
        assert_eq!(rt.type_name(1), "string");
    }

    #[test]
    fn test_call_missing_member_is_logged() {
        let (mut rt, sink) = runtime();
        rt.register_value("other", 1).unwrap();

        assert!(!rt.call("start", 0, 0).unwrap());
        assert_eq!(rt.depth(), 0);
        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiagnosticKind::MissingMember);
        assert!(entries[0].message.contains("'start'"));
    }

    #[test]
    fn test_call_non_callable_consumes_arguments() {
        let (mut rt, sink) = runtime();
        rt.register_value("start", "not a function").unwrap();
        rt.push_integer(1);

        assert!(!rt.call("start", 1, 0).unwrap());
        assert_eq!(rt.depth(), 0);
        assert_eq!(sink.entries()[0].kind, DiagnosticKind::NotCallable);
    }

    #[test]
    fn test_call_without_library() {
        let (mut rt, sink) = runtime();
        assert!(!rt.call("start", 0, 0).unwrap());
        assert_eq!(rt.depth(), 0);
        assert!(sink.entries()[0].message.contains("not defined"));
    }

    #[test]
    fn test_call_runtime_error_propagates_balanced() {
        let (mut rt, _) = runtime();
        let f = compile(&rt, "return function() error('fatal') end");
        rt.register_value("start", f).unwrap();

        let err = rt.call("start", 0, 0).unwrap_err();
        assert!(err.is_runtime_error());
        assert!(err.to_string().contains("fatal"));
        assert_eq!(rt.depth(), 0);
    }

    #[test]
    fn test_protected_call_success() {
        let (mut rt, sink) = runtime();
        let f = compile(&rt, "return function(x) return x + 1 end");
        rt.push_value(f).unwrap();
        rt.push_integer(1);

        let status = rt.protected_call(1, 1).unwrap();
        assert_eq!(status, CallStatus::Ok);
        assert_eq!(rt.depth(), 1);
        assert_eq!(rt.value(-1).unwrap(), &LuaValue::Integer(2));
        assert!(sink.entries().is_empty());
    }

    #[test]
    fn test_protected_call_failure_is_reported() {
        let (mut rt, sink) = runtime();
        rt.push_boolean(true);
        let f = compile(&rt, "return function() error('boom') end");
        rt.push_value(f).unwrap();

        let status = rt.protected_call(0, 0).unwrap();
        assert_eq!(status, CallStatus::RuntimeError);
        assert_eq!(rt.depth(), 1);

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, DiagnosticKind::RuntimeError);
        assert!(entries[0].mentions("boom"));
    }

    #[test]
    fn test_protected_call_without_message_is_classified() {
        let (mut rt, sink) = runtime();
        let handler = compile(&rt, "return function(msg) return nil end");
        let f = compile(&rt, "return function() error('hidden') end");
        rt.push_value(handler).unwrap();
        rt.push_value(f).unwrap();

        let status = rt.protected_call_with_handler(0, 0, 1).unwrap();
        assert_eq!(status, CallStatus::RuntimeError);
        assert_eq!(rt.depth(), 1);

        let entries = sink.entries();
        assert_eq!(entries[0].message, CallStatus::RuntimeError.generic_message());
        assert!(entries[0].trace.is_none());
    }

    #[test]
    fn test_protected_call_non_string_error_is_classified() {
        for code in [
            "return function() error({ code = 1 }) end",
            "return function() error({}) end",
            "return function() error(nil) end",
        ] {
            let (mut rt, sink) = runtime();
            let f = compile(&rt, code);
            rt.push_value(f).unwrap();

            let status = rt.protected_call(0, 0).unwrap();
            assert_eq!(status, CallStatus::RuntimeError);
            assert_eq!(rt.depth(), 0);

            let entries = sink.entries();
            assert_eq!(entries.len(), 1, "{}", code);
            assert_eq!(entries[0].message, CallStatus::RuntimeError.generic_message());
            assert!(entries[0].trace.is_none());
        }
    }

    #[test]
    fn test_protected_call_number_error_is_its_message() {
        let (mut rt, sink) = runtime();
        let f = compile(&rt, "return function() error(42) end");
        rt.push_value(f).unwrap();

        let status = rt.protected_call(0, 0).unwrap();
        assert_eq!(status, CallStatus::RuntimeError);
        assert_eq!(rt.depth(), 0);
        assert!(sink.entries()[0].message.starts_with("42"));
    }

    #[test]
    fn test_protected_call_handler_error() {
        let (mut rt, sink) = runtime();
        let handler = compile(&rt, "return function(msg) error('handler broke') end");
        let f = compile(&rt, "return function() error('boom') end");
        rt.push_value(handler).unwrap();
        rt.push_value(f).unwrap();

        let status = rt.protected_call_with_handler(0, 0, -2).unwrap();
        assert_eq!(status, CallStatus::HandlerError);
        assert_eq!(rt.depth(), 1);
        assert_eq!(sink.entries()[0].kind, DiagnosticKind::HandlerError);
    }

    #[test]
    fn test_protected_call_memory_error() {
        let (mut rt, sink) = runtime();
        let f = compile(
            &rt,
            "return function() local t = {} for i = 1, 1e8 do t[i] = i end end",
        );
        rt.push_value(f).unwrap();

        let limit = rt.used_memory() + 256 * 1024;
        rt.set_memory_limit(limit).unwrap();
        let status = rt.protected_call(0, 0).unwrap();
        rt.set_memory_limit(0).unwrap();

        assert_eq!(status, CallStatus::MemoryError);
        assert_eq!(rt.depth(), 0);
        assert_eq!(sink.entries()[0].kind, DiagnosticKind::MemoryError);
    }

    #[test]
    fn test_protected_call_requires_callable_frame() {
        let (mut rt, _) = runtime();
        assert!(rt.protected_call(0, 0).is_err());
        assert_eq!(rt.depth(), 0);
    }
}
