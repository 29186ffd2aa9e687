//! Host-side execution stack over an `mlua` interpreter.
//!
//! Lua's C stack is not reachable through `mlua`, so the bridge keeps its own
//! stack of `mlua::Value` slots with the same discipline: 1-based positions,
//! negative positions counted from the top, containers assembled by pushing a
//! table and then popping keys and values into it. The Reader and the Writer
//! are implemented as methods on [`Stack`] in the `reader` and `writer`
//! submodules.
//!
//! A bridged host function gets a fresh `Stack` frame holding exactly the
//! arguments Lua passed, at positions `1..=top`.

pub mod reader;
pub mod writer;

use mlua::{Lua, Table, Value};

use crate::api::{Error, InterpreterOptions, Result};

pub use writer::Marshal;

/// Reserved key forcing a table to read back as an empty array.
pub const EMPTY_ARRAY_SENTINEL: &str = "__emptyarray";

/// Runtime type tag of a stack slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeTag {
    /// The position is not valid for the current stack.
    None,
    Nil,
    Boolean,
    Number,
    String,
    Table,
    Function,
    /// Userdata, threads and other values with no dynamic counterpart.
    Other,
}

impl TypeTag {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Nil => TypeTag::Nil,
            Value::Boolean(_) => TypeTag::Boolean,
            Value::Integer(_) | Value::Number(_) => TypeTag::Number,
            Value::String(_) => TypeTag::String,
            Value::Table(_) => TypeTag::Table,
            Value::Function(_) => TypeTag::Function,
            _ => TypeTag::Other,
        }
    }
}

pub struct Stack {
    lua: Lua,
    slots: Vec<Value>,
    options: InterpreterOptions,
}

impl Stack {
    /// Create an empty stack bound to `lua`.
    pub fn new(lua: Lua, options: InterpreterOptions) -> Self {
        Self::frame(lua, options, Vec::new())
    }

    /// Create a stack pre-filled with `slots`, bottom first.
    pub fn frame(lua: Lua, options: InterpreterOptions, slots: Vec<Value>) -> Self {
        Self {
            lua,
            slots,
            options,
        }
    }

    pub fn lua(&self) -> &Lua {
        &self.lua
    }

    pub fn options(&self) -> &InterpreterOptions {
        &self.options
    }

    /// Number of occupied slots; also the position of the top slot.
    pub fn top(&self) -> usize {
        self.slots.len()
    }

    /// Resolve `pos` into a 1-based absolute index.
    ///
    /// Positive positions count from the bottom, negative ones from the top
    /// (`-1` is the top slot). Returns `None` for 0 and out-of-range positions.
    pub fn absolute(&self, pos: i32) -> Option<usize> {
        let top = self.top();
        let offset = pos.unsigned_abs() as usize;
        match pos {
            0 => None,
            p if p > 0 => (offset <= top).then_some(offset),
            _ => (offset <= top).then(|| top + 1 - offset),
        }
    }

    pub fn value(&self, pos: i32) -> Option<&Value> {
        self.absolute(pos).map(|index| &self.slots[index - 1])
    }

    pub fn type_tag(&self, pos: i32) -> TypeTag {
        self.value(pos).map_or(TypeTag::None, TypeTag::of)
    }

    pub fn push_value(&mut self, value: Value) {
        self.slots.push(value);
    }

    pub fn push_nil(&mut self) {
        self.push_value(Value::Nil);
    }

    pub fn push_number(&mut self, n: f64) {
        self.push_value(Value::Number(n));
    }

    pub fn push_bool(&mut self, b: bool) {
        self.push_value(Value::Boolean(b));
    }

    pub fn push_string(&mut self, s: &str) -> Result<()> {
        let s = self.lua.create_string(s)?;
        self.push_value(Value::String(s));
        Ok(())
    }

    /// Remove up to `n` slots from the top.
    pub fn pop(&mut self, n: usize) {
        let keep = self.top().saturating_sub(n);
        self.slots.truncate(keep);
    }

    /// Push a fresh table with room for `narr` sequence and `nrec` keyed entries.
    pub fn create_table(&mut self, narr: usize, nrec: usize) -> Result<()> {
        let table = self.lua.create_table_with_capacity(narr, nrec)?;
        self.push_value(Value::Table(table));
        Ok(())
    }

    /// `t[k] = v` without metamethods, where `t` is at `table_pos`, `v` is the
    /// top slot and `k` the slot below it. Pops both key and value.
    pub fn raw_set(&mut self, table_pos: i32) -> Result<()> {
        let table = self.table_at(table_pos)?;
        let value = self.pop_value()?;
        let key = self.pop_value()?;
        table.raw_set(key, value)?;
        Ok(())
    }

    /// `t[index] = v` without metamethods, where `t` is at `table_pos` and `v`
    /// is the top slot. Pops the value.
    pub fn raw_seti(&mut self, table_pos: i32, index: i64) -> Result<()> {
        let table = self.table_at(table_pos)?;
        let value = self.pop_value()?;
        table.raw_set(index, value)?;
        Ok(())
    }

    /// Border length of the table at `pos`.
    pub fn border_len(&self, pos: i32) -> Result<usize> {
        Ok(border_len(&self.table_at(pos)?))
    }

    /// All key/value pairs of the table at `pos`, in `next` order.
    pub fn pairs(&self, pos: i32) -> Result<Vec<(Value, Value)>> {
        table_pairs(&self.table_at(pos)?)
    }

    /// Pop the top slot and bind it as global `name`.
    pub fn set_global(&mut self, name: &str) -> Result<()> {
        let value = self.pop_value()?;
        self.lua.globals().set(name, value)?;
        Ok(())
    }

    /// Push the value of global `name`.
    pub fn get_global(&mut self, name: &str) -> Result<()> {
        let value: Value = self.lua.globals().get(name)?;
        self.push_value(value);
        Ok(())
    }

    /// Remove the top `n` slots and return them bottom first.
    pub(crate) fn take_top(&mut self, n: usize) -> Vec<Value> {
        let keep = self.top().saturating_sub(n);
        self.slots.split_off(keep)
    }

    fn pop_value(&mut self) -> Result<Value> {
        self.slots
            .pop()
            .ok_or_else(|| Error::Stack("stack underflow".to_string()))
    }

    pub(crate) fn table_at(&self, pos: i32) -> Result<Table> {
        match self.value(pos) {
            Some(Value::Table(table)) => Ok(table.clone()),
            Some(other) => Err(Error::Stack(format!(
                "slot {} holds a {}, expected a table",
                pos,
                other.type_name()
            ))),
            None => Err(Error::Stack(format!(
                "slot {} is out of range (top is {})",
                pos,
                self.top()
            ))),
        }
    }
}

/// Border length of `table`, without metamethods.
pub(crate) fn border_len(table: &Table) -> usize {
    table.raw_len()
}

/// Key/value pairs of `table` in `next` order.
pub(crate) fn table_pairs(table: &Table) -> Result<Vec<(Value, Value)>> {
    let mut pairs = Vec::new();
    for pair in table.clone().pairs::<Value, Value>() {
        pairs.push(pair?);
    }
    Ok(pairs)
}

#[cfg(test)]
mod stack_test;
