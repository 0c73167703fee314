//! Lua sandbox: blocks C module loading for ABI safety.
//!
//! Scripts run by the host are trusted, but native extension modules are
//! blocked to avoid ABI mismatches with the vendored Lua.

use mlua::prelude::*;

/// Apply sandbox restrictions to the Lua VM.
///
/// Currently blocks:
/// - `package.loadlib`: prevents loading arbitrary .so/.dll
/// - `package.cpath`: clears the C module search path
pub fn apply_sandbox(lua: &Lua) -> LuaResult<()> {
    let package: LuaTable = lua.globals().get("package")?;
    package.set("loadlib", LuaValue::Nil)?;
    package.set("cpath", "")?;
    Ok(())
}
