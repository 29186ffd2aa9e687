//! Value bridge between an embedded Lua runtime and a Rust host.
//!
//! - [`values`]: the dynamic value model and host conversions
//! - [`stack`]: the host-side stack with its Reader and Writer
//! - [`bridge`]: Rust closures as Lua functions
//! - [`api`]: the [`Interpreter`] handle, globals and the call gateway
//! - [`stdlib`]: host packages installable into an interpreter

pub mod api;
pub mod bridge;
pub mod stack;
pub mod stdlib;
pub mod values;

pub use api::{Error, Globals, Interpreter, InterpreterOptions, Result};
pub use bridge::{HostFunction, Variadic};
pub use stack::{Marshal, Stack};
pub use values::{DynamicValue, FromDynamic, Record, StructuredRecord};
