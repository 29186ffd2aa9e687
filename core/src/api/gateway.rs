//! Call gateway: invoke a global Lua function by name with a raw payload.
//!
//! Hosts that shuttle opaque byte payloads (message handlers, plugin hooks)
//! call into scripts through [`Interpreter::invoke`], which hands the payload
//! over as a single Lua string and returns the result as text.

use tracing::debug;

use super::{Error, Interpreter, Result};

impl Interpreter {
    /// Call global `name` with `payload` and convert its first result to text.
    ///
    /// Fails with [`Error::Gateway`] when `name` is not bound to a function,
    /// when the call raises, and when the result is neither a string nor a
    /// number.
    pub fn invoke(&self, name: &str, payload: &[u8]) -> Result<String> {
        debug!(function = name, payload_len = payload.len(), "invoking script function");

        let Some(function) = self.global_function(name)? else {
            return Err(Error::Gateway("Function not found".to_string()));
        };

        let argument = self.lua().create_string(payload)?;
        let result: mlua::Value = function
            .call(argument)
            .map_err(|err| Error::Gateway(lua_message(&err)))?;

        match self.lua().coerce_string(result)? {
            Some(text) => Ok(text.to_string_lossy().to_string()),
            None => Err(Error::Gateway("Invalid return value".to_string())),
        }
    }
}

/// The message Lua raised, without the traceback decoration `mlua` adds.
fn lua_message(err: &mlua::Error) -> String {
    match err {
        mlua::Error::RuntimeError(message) => message
            .split_once("\nstack traceback:")
            .map_or(message.as_str(), |(head, _)| head)
            .to_string(),
        mlua::Error::CallbackError { cause, .. } => lua_message(cause),
        other => other.to_string(),
    }
}
