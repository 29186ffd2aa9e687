//! Error type for all bridge operations.
//!
//! Errors raised inside a bridged host function travel back into Lua through
//! [`Error::into_lua_error`], so script-level `pcall` can observe them. The
//! call gateway returns its errors to the host caller directly.

use std::sync::Arc;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Fewer arguments were supplied than the resolved parameter count.
    #[error("got {resolved} arguments, needed {supplied}")]
    Arity { resolved: usize, supplied: usize },

    /// An argument could not be converted to (or defaulted for) the
    /// parameter's type. `position` is 1-based.
    #[error("wrong argument type: got {got}, wanted {wanted}")]
    ArgumentType {
        position: usize,
        got: &'static str,
        wanted: String,
    },

    /// A bridged host function panicked.
    #[error("function panic: {0}")]
    Panic(String),

    /// A bridged host function returned an error value.
    #[error("{0}")]
    Host(String),

    /// The call gateway could not produce a result.
    #[error("{0}")]
    Gateway(String),

    /// A structured record failed to serialize while `strict_records` is on.
    #[error("record serialization failed: {0}")]
    Record(#[from] serde_json::Error),

    /// Table nesting went past `InterpreterOptions::max_depth`.
    #[error("table nesting exceeds maximum depth of {max_depth}")]
    DepthExceeded { max_depth: usize },

    /// A stack primitive was used on the wrong kind of slot.
    #[error("stack error: {0}")]
    Stack(String),

    #[error(transparent)]
    Lua(#[from] mlua::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

impl Error {
    /// Convert into the runtime's native error so it can be raised in Lua.
    ///
    /// Argument type errors become bad-argument errors at their position,
    /// naming `function` when known. Runtime errors pass through unchanged.
    pub fn into_lua_error(self, function: Option<&str>) -> mlua::Error {
        match self {
            Error::Lua(err) => err,
            Error::ArgumentType { position, .. } => mlua::Error::BadArgument {
                to: function.map(str::to_string),
                pos: position,
                name: None,
                cause: Arc::new(mlua::Error::RuntimeError(self.to_string())),
            },
            other => mlua::Error::RuntimeError(other.to_string()),
        }
    }
}
