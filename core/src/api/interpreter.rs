//! The interpreter: one Lua state plus the host-side stack that talks to it.

use std::collections::BTreeMap;

use mlua::{Lua, Value};
use tracing::debug;

use super::{InterpreterOptions, Result};
use crate::stack::{Marshal, Stack};
use crate::values::DynamicValue;

/// An embedded Lua interpreter with a value bridge to the host.
///
/// `Interpreter` is neither `Send` nor `Sync`: every operation on one
/// interpreter runs on the thread that created it.
///
/// # Example
///
/// ```
/// use moonbridge_core::{Interpreter, values::DynamicValue};
///
/// let mut lua = Interpreter::new();
/// lua.set_globals([("greeting", "hello")]).unwrap();
/// lua.exec("shout = greeting:upper()").unwrap();
///
/// let globals = lua.get_globals(["shout"]).unwrap();
/// assert_eq!(globals["shout"], DynamicValue::from("HELLO"));
/// ```
pub struct Interpreter {
    stack: Stack,
}

impl Interpreter {
    /// Create an interpreter with the standard Lua libraries loaded.
    pub fn new() -> Self {
        Self::with_options(InterpreterOptions::default())
    }

    pub fn with_options(options: InterpreterOptions) -> Self {
        Self::from_lua(Lua::new(), options)
    }

    /// Wrap an existing Lua state.
    pub fn from_lua(lua: Lua, options: InterpreterOptions) -> Self {
        debug!(?options, "creating interpreter");
        Interpreter {
            stack: Stack::new(lua, options),
        }
    }

    pub fn lua(&self) -> &Lua {
        self.stack.lua()
    }

    pub fn options(&self) -> &InterpreterOptions {
        self.stack.options()
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack {
        &mut self.stack
    }

    /// Run a chunk for its side effects.
    pub fn exec(&mut self, source: &str) -> Result<()> {
        self.lua().load(source).exec()?;
        Ok(())
    }

    /// Evaluate a chunk and read its first result.
    pub fn eval(&mut self, source: &str) -> Result<DynamicValue> {
        let value: Value = self.lua().load(source).eval()?;
        self.stack.read_value(&value)
    }

    /// Bind each `(name, value)` pair as a global.
    pub fn set_globals<I, K, V>(&mut self, globals: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Marshal,
    {
        for (name, value) in globals {
            let name = name.as_ref();
            self.stack.push_any(&value)?;
            self.stack.set_global(name)?;
            debug!(name, "bound global");
        }
        Ok(())
    }

    /// Read the named globals. Unbound names read as nil.
    pub fn get_globals<I, K>(&mut self, names: I) -> Result<BTreeMap<String, DynamicValue>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<str>,
    {
        let mut globals = BTreeMap::new();
        for name in names {
            let name = name.as_ref();
            self.stack.get_global(name)?;
            let value = self.stack.read_any(-1);
            self.stack.pop(1);
            globals.insert(name.to_string(), value?);
        }
        Ok(globals)
    }

    /// Push a host value onto the interpreter's stack.
    pub fn push_any<T: Marshal + ?Sized>(&mut self, value: &T) -> Result<()> {
        self.stack.push_any(value)
    }

    /// Read the slot at `pos` of the interpreter's stack.
    pub fn read_any(&self, pos: i32) -> Result<DynamicValue> {
        self.stack.read_any(pos)
    }

    /// Every slot of the interpreter's stack, bottom to top.
    pub fn full_stack(&self) -> Result<Vec<DynamicValue>> {
        self.stack.full_stack()
    }

    /// Global `name` if it is bound to a function.
    pub(crate) fn global_function(&self, name: &str) -> Result<Option<mlua::Function>> {
        let value: Value = self.lua().globals().get(name)?;
        Ok(match value {
            Value::Function(function) => Some(function),
            _ => None,
        })
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
