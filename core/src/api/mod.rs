//! Public API for embedding Lua in a Rust host.
//!
//! An [`Interpreter`] owns one Lua state. Host values cross into Lua through
//! [`Interpreter::set_globals`] and come back through
//! [`Interpreter::get_globals`] as [`DynamicValue`](crate::values::DynamicValue)s.
//! Rust closures become Lua functions through
//! [`HostFunction`](crate::bridge::HostFunction), and scripts exposing
//! byte-payload entry points are driven through [`Interpreter::invoke`].
//!
//! # Example
//!
//! ```
//! use moonbridge_core::{Interpreter, bridge::HostFunction};
//!
//! let mut lua = Interpreter::new();
//! lua.set_globals([("greet", HostFunction::new(|name: String| format!("hi {name}")))])
//!     .unwrap();
//! lua.exec("function handle(payload) return greet(payload) end").unwrap();
//!
//! assert_eq!(lua.invoke("handle", b"moon").unwrap(), "hi moon");
//! ```

pub mod error;
pub mod gateway;
pub mod globals;
pub mod interpreter;
pub mod options;

pub use error::{Error, Result};
pub use globals::Globals;
pub use interpreter::Interpreter;
pub use options::InterpreterOptions;
