//! The runtime handle adapter: an mlua state plus an explicit evaluation stack.
//!
//! Every bridge operation stages its values on [`LuaRuntime`]'s stack, the
//! same way a C embedding stages them on the Lua stack. Indices follow the
//! Lua convention: positive indices are 1-based from the bottom, negative
//! indices count down from the top (`-1` is the top value).

use lumiere_application::{DiagnosticSink, RuntimeOptions};
use lumiere_domain::{Diagnostic, DiagnosticKind};
use mlua::prelude::*;
use mlua::{FromLuaMulti, IntoLua, IntoLuaMulti, MaybeSend};
use std::sync::{Arc, Mutex};
use tracing::debug;

use super::error::{BridgeError, Result};
use super::sandbox::apply_sandbox;

/// Outcome of a protected call, mirroring Lua's status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallStatus {
    Ok,
    RuntimeError,
    MemoryError,
    /// The message handler failed while handling another error.
    HandlerError,
}

impl CallStatus {
    /// Lua status code (`LUA_OK`, `LUA_ERRRUN`, `LUA_ERRMEM`, `LUA_ERRERR`).
    pub fn code(&self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::RuntimeError => 2,
            Self::MemoryError => 4,
            Self::HandlerError => 5,
        }
    }

    /// Classify an error returned by the runtime.
    pub fn classify(err: &LuaError) -> Self {
        match err {
            LuaError::MemoryError(_) => Self::MemoryError,
            LuaError::CallbackError { cause, .. } => Self::classify(cause),
            LuaError::WithContext { cause, .. } => Self::classify(cause),
            _ => Self::RuntimeError,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    /// Diagnostic kind reported for a failed call with this status.
    pub fn diagnostic_kind(&self) -> DiagnosticKind {
        match self {
            Self::MemoryError => DiagnosticKind::MemoryError,
            Self::HandlerError => DiagnosticKind::HandlerError,
            Self::Ok | Self::RuntimeError => DiagnosticKind::RuntimeError,
        }
    }

    /// Message used when the failed call left no error message behind.
    pub fn generic_message(&self) -> &'static str {
        match self {
            Self::Ok => "no error",
            Self::RuntimeError => "A runtime error occurred while running a script",
            Self::MemoryError => "Memory allocation failed while running a script",
            Self::HandlerError => "An error occurred while running the message handler",
        }
    }
}

/// An mlua state with its evaluation stack.
///
/// Owns the root library name and the diagnostic sink every operation
/// reports through. Access is `&mut`, so operations are serialized by
/// construction.
pub struct LuaRuntime {
    lua: Lua,
    /// `xpcall` captured at open, so scripts replacing the global cannot
    /// break protected calls.
    xpcall: LuaFunction,
    stack: Vec<LuaValue>,
    library_name: String,
    sink: Arc<dyn DiagnosticSink>,
}

impl LuaRuntime {
    /// Create a runtime with the standard libraries loaded.
    pub fn new(options: &RuntimeOptions, sink: Arc<dyn DiagnosticSink>) -> Result<Self> {
        let lua = Lua::new();

        if options.sandbox {
            apply_sandbox(&lua)?;
        }
        if let Some(limit) = options.memory_limit {
            lua.set_memory_limit(limit)?;
        }
        let xpcall: LuaFunction = lua.globals().get("xpcall")?;

        debug!(
            "Created Lua runtime (library '{}', sandbox {}, memory limit {:?})",
            options.library_name, options.sandbox, options.memory_limit
        );

        Ok(Self {
            lua,
            xpcall,
            stack: Vec::new(),
            library_name: options.library_name.clone(),
            sink,
        })
    }

    /// The underlying mlua state.
    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    /// Global name of the root namespace table.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
        &self.sink
    }

    pub fn emit(&self, diagnostic: Diagnostic) {
        self.sink.emit(diagnostic);
    }

    /// Change the heap limit; returns the previous one.
    pub fn set_memory_limit(&self, limit: usize) -> Result<usize> {
        Ok(self.lua.set_memory_limit(limit)?)
    }

    pub fn used_memory(&self) -> usize {
        self.lua.used_memory()
    }

    // ==================== Stack inspection ====================

    /// Number of values on the stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Resolve a Lua-style index to a position in the stack vector.
    fn position(&self, index: i32) -> Result<usize> {
        let depth = self.stack.len();
        let position = if index > 0 {
            let i = index as usize;
            (i <= depth).then(|| i - 1)
        } else if index < 0 {
            let back = index.unsigned_abs() as usize;
            (back <= depth).then(|| depth - back)
        } else {
            None
        };
        position.ok_or(BridgeError::StackIndex { index, depth })
    }

    /// Borrow the value at `index`.
    pub fn value(&self, index: i32) -> Result<&LuaValue> {
        let position = self.position(index)?;
        Ok(&self.stack[position])
    }

    /// `true` for nil and for indices past the top.
    pub fn is_nil(&self, index: i32) -> bool {
        self.value(index).map_or(true, LuaValue::is_nil)
    }

    pub fn is_table(&self, index: i32) -> bool {
        matches!(self.value(index), Ok(LuaValue::Table(_)))
    }

    pub fn is_function(&self, index: i32) -> bool {
        matches!(self.value(index), Ok(LuaValue::Function(_)))
    }

    /// Type name of the value at `index` (`"no value"` past the top).
    pub fn type_name(&self, index: i32) -> &'static str {
        self.value(index).map_or("no value", LuaValue::type_name)
    }

    fn table_at(&self, index: i32) -> Result<LuaTable> {
        match self.value(index)? {
            LuaValue::Table(table) => Ok(table.clone()),
            other => Err(BridgeError::UnexpectedType {
                index,
                expected: "table",
                found: other.type_name(),
            }),
        }
    }

    fn function_at(&self, index: i32) -> Result<LuaFunction> {
        match self.value(index)? {
            LuaValue::Function(function) => Ok(function.clone()),
            other => Err(BridgeError::UnexpectedType {
                index,
                expected: "function",
                found: other.type_name(),
            }),
        }
    }

    // ==================== Push / pop ====================

    /// Push any value convertible into Lua.
    pub fn push_value(&mut self, value: impl IntoLua) -> Result<()> {
        let value = value.into_lua(&self.lua)?;
        self.stack.push(value);
        Ok(())
    }

    pub fn push_nil(&mut self) {
        self.stack.push(LuaValue::Nil);
    }

    pub fn push_boolean(&mut self, value: bool) {
        self.stack.push(LuaValue::Boolean(value));
    }

    pub fn push_integer(&mut self, value: i64) {
        self.stack.push(LuaValue::Integer(value));
    }

    pub fn push_number(&mut self, value: f64) {
        self.stack.push(LuaValue::Number(value));
    }

    pub fn push_string(&mut self, value: &str) -> Result<()> {
        let s = self.lua.create_string(value)?;
        self.stack.push(LuaValue::String(s));
        Ok(())
    }

    /// Push a host function.
    pub fn push_function<A, R, F>(&mut self, function: F) -> Result<()>
    where
        A: FromLuaMulti,
        R: IntoLuaMulti,
        F: Fn(&Lua, A) -> LuaResult<R> + MaybeSend + 'static,
    {
        let function = self.lua.create_function(function)?;
        self.stack.push(LuaValue::Function(function));
        Ok(())
    }

    /// Push a new empty table.
    pub fn new_table(&mut self) -> Result<()> {
        let table = self.lua.create_table()?;
        self.stack.push(LuaValue::Table(table));
        Ok(())
    }

    /// Pop up to `count` values.
    pub fn pop(&mut self, count: usize) {
        let depth = self.stack.len().saturating_sub(count);
        self.stack.truncate(depth);
    }

    /// Remove and return the top value.
    pub fn pop_value(&mut self) -> Result<LuaValue> {
        self.stack.pop().ok_or(BridgeError::StackIndex {
            index: -1,
            depth: 0,
        })
    }

    /// Set the stack depth, dropping values or padding with nil.
    pub fn set_top(&mut self, depth: usize) {
        self.stack.resize(depth, LuaValue::Nil);
    }

    /// Move the top value into `index`, shifting the values above it up.
    pub fn insert(&mut self, index: i32) -> Result<()> {
        let position = self.position(index)?;
        let value = self.pop_value()?;
        self.stack.insert(position, value);
        Ok(())
    }

    /// Remove the value at `index`, shifting the values above it down.
    pub fn remove(&mut self, index: i32) -> Result<LuaValue> {
        let position = self.position(index)?;
        Ok(self.stack.remove(position))
    }

    // ==================== Globals and fields ====================

    /// Push the global `name`.
    pub fn get_global(&mut self, name: &str) -> Result<()> {
        let value: LuaValue = self.lua.globals().get(name)?;
        self.stack.push(value);
        Ok(())
    }

    /// Pop the top value into the global `name`.
    pub fn set_global(&mut self, name: &str) -> Result<()> {
        let value = self.pop_value()?;
        self.lua.globals().set(name, value)?;
        Ok(())
    }

    /// Push `t[key]` where `t` is the table at `index`.
    pub fn get_field(&mut self, index: i32, key: &str) -> Result<()> {
        let table = self.table_at(index)?;
        let value: LuaValue = table.get(key)?;
        self.stack.push(value);
        Ok(())
    }

    /// `t[key] = v` where `t` is at `index` and `v` is the popped top value.
    pub fn set_field(&mut self, index: i32, key: &str) -> Result<()> {
        let table = self.table_at(index)?;
        let value = self.pop_value()?;
        table.set(key, value)?;
        Ok(())
    }

    /// `t[k] = v` where `t` is at `index`, `v` is the top and `k` just below it.
    /// Pops both key and value.
    pub fn set_table(&mut self, index: i32) -> Result<()> {
        let table = self.table_at(index)?;
        if self.stack.len() < 2 {
            return Err(BridgeError::StackIndex {
                index: -2,
                depth: self.stack.len(),
            });
        }
        let value = self.pop_value()?;
        let key = self.pop_value()?;
        table.set(key, value)?;
        Ok(())
    }

    // ==================== Calls ====================

    /// Remove a function and its `nargs` arguments from the top of the stack.
    fn take_call_frame(&mut self, nargs: usize) -> Result<(LuaFunction, LuaMultiValue)> {
        let depth = self.stack.len();
        if depth < nargs + 1 {
            return Err(BridgeError::StackIndex {
                index: -(nargs as i32 + 1),
                depth,
            });
        }
        let function = self.function_at(-(nargs as i32 + 1))?;
        let args = self.stack.split_off(depth - nargs);
        self.stack.pop();
        Ok((function, args.into_iter().collect()))
    }

    /// Push call results, truncated or nil-padded to `nresults` (`None` keeps all).
    fn push_results(&mut self, results: LuaMultiValue, nresults: Option<usize>) {
        match nresults {
            None => self.stack.extend(results),
            Some(n) => {
                let mut results = results.into_iter();
                for _ in 0..n {
                    self.stack.push(results.next().unwrap_or(LuaValue::Nil));
                }
            }
        }
    }

    /// Unchecked call of the function below the top `nargs` arguments.
    ///
    /// A runtime error propagates as [`BridgeError::Lua`]; the function and
    /// arguments are consumed either way.
    pub fn call_raw(&mut self, nargs: usize, nresults: Option<usize>) -> Result<()> {
        let (function, args) = self.take_call_frame(nargs)?;
        let results: LuaMultiValue = function.call(args)?;
        self.push_results(results, nresults);
        Ok(())
    }

    /// Protected call of the function below the top `nargs` arguments.
    ///
    /// On success the results are pushed. On failure exactly one error value
    /// is pushed: the value the script raised (a string message carries its
    /// traceback), or whatever the message handler at `handler` returned for
    /// it. A failing handler yields [`CallStatus::HandlerError`].
    pub fn pcall(
        &mut self,
        nargs: usize,
        nresults: Option<usize>,
        handler: Option<i32>,
    ) -> Result<CallStatus> {
        let handler = handler.map(|index| self.function_at(index)).transpose()?;
        let (function, args) = self.take_call_frame(nargs)?;

        let raised = Arc::new(Mutex::new(None));
        let capture = self.capture_handler(Arc::clone(&raised))?;
        let frame: LuaMultiValue = [LuaValue::Function(function), LuaValue::Function(capture)]
            .into_iter()
            .chain(args)
            .collect();

        let (mut status, raw, error_value) = match self.xpcall.call::<LuaMultiValue>(frame) {
            Ok(values) => {
                let mut values = values.into_iter();
                if matches!(values.next(), Some(LuaValue::Boolean(true))) {
                    self.push_results(values.collect(), nresults);
                    return Ok(CallStatus::Ok);
                }
                let thrown = values.next().unwrap_or(LuaValue::Nil);
                match raised.lock().ok().and_then(|mut slot| slot.take()) {
                    Some(raised) => self.describe_raised(raised)?,
                    // The message handler never runs for allocation failures
                    None => (CallStatus::MemoryError, thrown.clone(), thrown),
                }
            }
            Err(err) => {
                let message = LuaValue::String(self.lua.create_string(error_message(&err))?);
                (CallStatus::classify(&err), message.clone(), message)
            }
        };

        let error_value = match handler {
            Some(handler) if status != CallStatus::MemoryError => {
                match handler.call::<LuaValue>(raw) {
                    Ok(value) => value,
                    Err(handler_err) => {
                        status = CallStatus::HandlerError;
                        LuaValue::String(self.lua.create_string(error_message(&handler_err))?)
                    }
                }
            }
            _ => error_value,
        };
        self.stack.push(error_value);
        Ok(status)
    }

    /// Message handler recording the raised value, with a traceback taken
    /// at the error site when the value is a string.
    fn capture_handler(&self, slot: Arc<Mutex<Option<RaisedError>>>) -> Result<LuaFunction> {
        let handler = self.lua.create_function(move |lua, value: LuaValue| {
            let trace = match &value {
                LuaValue::String(message) => lua
                    .globals()
                    .get::<LuaTable>("debug")
                    .and_then(|debug| debug.get::<LuaFunction>("traceback"))
                    .and_then(|traceback| traceback.call::<String>((message.clone(), 2)))
                    .ok(),
                _ => None,
            };
            if let Ok(mut slot) = slot.lock() {
                *slot = Some(RaisedError {
                    value: value.clone(),
                    trace,
                });
            }
            Ok(value)
        })?;
        Ok(handler)
    }

    /// Status, raw value and pushed error value for a raised error.
    fn describe_raised(&self, raised: RaisedError) -> Result<(CallStatus, LuaValue, LuaValue)> {
        match raised.value {
            // Host callback errors arrive wrapped
            LuaValue::Error(err) => {
                let message = LuaValue::String(self.lua.create_string(error_message(&err))?);
                Ok((CallStatus::classify(&err), message.clone(), message))
            }
            value => {
                let error_value = match raised.trace {
                    Some(trace) => LuaValue::String(self.lua.create_string(trace)?),
                    None => value.clone(),
                };
                Ok((CallStatus::RuntimeError, value, error_value))
            }
        }
    }

    /// Attach a stack traceback to `message`.
    ///
    /// Messages that already carry a traceback are returned unchanged;
    /// otherwise `debug.traceback` is used when the debug library is loaded.
    pub fn traceback(&self, message: &str) -> String {
        if message.contains("stack traceback:") {
            return message.to_string();
        }
        self.lua
            .globals()
            .get::<LuaTable>("debug")
            .and_then(|debug| debug.get::<LuaFunction>("traceback"))
            .and_then(|traceback| traceback.call::<String>(message))
            .unwrap_or_else(|_| message.to_string())
    }
}

/// Value raised inside a protected call.
struct RaisedError {
    value: LuaValue,
    trace: Option<String>,
}

/// Text of a runtime error without mlua's variant prefix.
pub(crate) fn error_message(err: &LuaError) -> String {
    match err {
        LuaError::RuntimeError(message) | LuaError::MemoryError(message) => message.clone(),
        LuaError::SyntaxError { message, .. } => message.clone(),
        LuaError::CallbackError { cause, traceback } => {
            format!("{}\n{}", error_message(cause), traceback)
        }
        other => other.to_string(),
    }
}
