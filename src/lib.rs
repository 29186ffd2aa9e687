//! Moonbridge - value and function bridge between Lua and Rust
//!
//! # Overview
//!
//! Moonbridge embeds a Lua 5.4 interpreter and moves data across the
//! boundary in both directions:
//!
//! - host values (numbers, strings, sequences, maps, serde records) become
//!   Lua values
//! - Lua values come back as a closed [`DynamicValue`] tree
//! - Rust closures become Lua functions with typed parameters
//! - scripts can be driven with opaque byte payloads through a call gateway
//!
//! # Quick Start
//!
//! ```
//! use moonbridge::{HostFunction, Interpreter, DynamicValue};
//!
//! let mut lua = Interpreter::new();
//! lua.set_globals([("scale", HostFunction::new(|x: f64, k: f64| x * k))]).unwrap();
//! lua.exec("result = scale(21, 2)").unwrap();
//!
//! let globals = lua.get_globals(["result"]).unwrap();
//! assert_eq!(globals["result"], DynamicValue::Number(42.0));
//! ```
//!
//! # Arrays and Tables
//!
//! Lua has one container type. A table with a positive border length reads
//! back as [`DynamicValue::Array`]; a table with no border reads back as
//! [`DynamicValue::Table`] with stringified keys. Write empty sequences with
//! [`InterpreterOptions::mark_empty_arrays`] to keep them arrays across a
//! round trip.
//!
//! # Call Gateway
//!
//! ```
//! use moonbridge::Interpreter;
//!
//! let mut lua = Interpreter::new();
//! lua.exec("function on_message(body) return 'got ' .. #body .. ' bytes' end").unwrap();
//! assert_eq!(lua.invoke("on_message", b"hello").unwrap(), "got 5 bytes");
//! ```

// Re-export public API from moonbridge_core
pub use moonbridge_core::api::{
    Error, Globals, Interpreter, InterpreterOptions, Result,
};

// Re-export the bridge and value model
pub use moonbridge_core::bridge::{self, HostFunction, Signature, Variadic};
pub use moonbridge_core::stack::{self, Marshal, Stack, TypeTag};
pub use moonbridge_core::values::{
    self, DynamicValue, FromDynamic, Record, StructuredRecord,
};

pub use moonbridge_core::stdlib;

// The runtime, for hosts that need lower-level access through `Interpreter::lua`.
pub use mlua;
