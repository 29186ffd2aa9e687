//! Standard host library.
//!
//! Packages are Lua tables of bridged host functions, installed as globals
//! before scripts run.
//!
//! - `json`: `json.encode(value)` and `json.decode(text)` over `serde_json`

use crate::api::{Interpreter, Result};

pub mod json;

pub use json::build_json_package;

/// Install every standard package as a global.
///
/// To pick individual packages, bind the result of `build_json_package()`
/// and friends under names of your choice instead.
pub fn register_stdlib(interp: &mut Interpreter) -> Result<()> {
    interp.set_globals([("json", build_json_package())])
}
