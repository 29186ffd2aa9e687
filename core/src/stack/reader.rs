//! Reader: converts stack slots into [`DynamicValue`]s.
//!
//! Tables are classified by their border length. A table with no border reads
//! as a string-keyed table; any other table reads as an array of exactly that
//! length. Integer keys outside `1..=len` and non-integer keys of an array are
//! dropped.

use std::collections::BTreeMap;

use mlua::{Table, Value};
use tracing::trace;

use super::{EMPTY_ARRAY_SENTINEL, Stack, TypeTag, border_len, table_pairs};
use crate::api::{Error, Result};
use crate::values::DynamicValue;

impl Stack {
    /// Read the slot at `pos`. Invalid positions and slots without a dynamic
    /// counterpart read as nil.
    pub fn read_any(&self, pos: i32) -> Result<DynamicValue> {
        match self.type_tag(pos) {
            TypeTag::None => Ok(DynamicValue::Nil),
            TypeTag::Table => self.read_table(pos),
            _ => match self.value(pos) {
                Some(value) => self.read_value(value),
                None => Ok(DynamicValue::Nil),
            },
        }
    }

    /// Read the slot at 1-based absolute `index`.
    pub(crate) fn read_index(&self, index: usize) -> Result<DynamicValue> {
        match index.checked_sub(1).and_then(|i| self.slots.get(i)) {
            Some(value) => self.read_value(value),
            None => Ok(DynamicValue::Nil),
        }
    }

    /// Read the table at `pos` as an array or a table.
    pub fn read_table(&self, pos: i32) -> Result<DynamicValue> {
        let table = self.table_at(pos)?;
        self.reader().table(&table, 0)
    }

    /// Textual form of the slot at `pos`, as used for table keys.
    pub fn read_string(&self, pos: i32) -> String {
        self.value(pos).map(value_string).unwrap_or_default()
    }

    /// Read a runtime value that is not on the stack.
    pub fn read_value(&self, value: &Value) -> Result<DynamicValue> {
        self.reader().value(value, 0)
    }

    /// Every slot from bottom to top.
    pub fn full_stack(&self) -> Result<Vec<DynamicValue>> {
        self.slots.iter().map(|value| self.read_value(value)).collect()
    }

    fn reader(&self) -> Reader {
        Reader {
            max_depth: self.options.max_depth,
        }
    }
}

/// Integers read in full, floats in shortest `%g` form, booleans as
/// `true`/`false`, and every other non-string kind as the empty string.
pub(crate) fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_string_lossy().to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Number(n) => float_string(*n),
        Value::Boolean(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Shortest digits, switching to exponent form (`1e+06`, `2.5e-05`) below
/// 1e-4 and from 1e6 up.
fn float_string(n: f64) -> String {
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if n.is_nan() {
        return "NaN".to_string();
    }

    let scientific = format!("{n:e}");
    let Some((mantissa, exp)) = scientific.split_once('e') else {
        return n.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return n.to_string();
    };
    if (-4..6).contains(&exp) {
        return n.to_string();
    }
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

struct Reader {
    max_depth: usize,
}

impl Reader {
    fn value(&self, value: &Value, depth: usize) -> Result<DynamicValue> {
        Ok(match value {
            Value::Nil => DynamicValue::Nil,
            Value::Boolean(b) => DynamicValue::Bool(*b),
            Value::Integer(i) => DynamicValue::Number(*i as f64),
            Value::Number(n) => DynamicValue::Number(*n),
            Value::String(s) => DynamicValue::String(s.to_string_lossy().to_string()),
            Value::Table(table) => self.table(table, depth)?,
            Value::Function(_) => DynamicValue::Function,
            other => {
                trace!(kind = other.type_name(), "reading unsupported value as nil");
                DynamicValue::Nil
            }
        })
    }

    fn table(&self, table: &Table, depth: usize) -> Result<DynamicValue> {
        if depth >= self.max_depth {
            return Err(Error::DepthExceeded {
                max_depth: self.max_depth,
            });
        }

        let border = border_len(table);
        if border == 0 {
            return self.entries(table, depth);
        }

        let mut items = vec![DynamicValue::Nil; border];
        for (key, value) in table_pairs(table)? {
            match array_index(&key, border) {
                Some(index) => items[index] = self.value(&value, depth + 1)?,
                None => trace!(key = %value_string(&key), "dropping key outside array border"),
            }
        }
        Ok(DynamicValue::Array(items))
    }

    fn entries(&self, table: &Table, depth: usize) -> Result<DynamicValue> {
        let mut entries = BTreeMap::new();
        for (key, value) in table_pairs(table)? {
            let value = self.value(&value, depth + 1)?;
            // A real string key wins over a number or boolean that formats the same.
            if matches!(key, Value::String(_)) {
                entries.insert(value_string(&key), value);
            } else {
                entries.entry(value_string(&key)).or_insert(value);
            }
        }

        if entries.len() == 1 && entries.contains_key(EMPTY_ARRAY_SENTINEL) {
            return Ok(DynamicValue::Array(Vec::new()));
        }
        Ok(DynamicValue::Table(entries))
    }
}

/// Zero-based slot for `key` if it is an integer within `1..=border`.
fn array_index(key: &Value, border: usize) -> Option<usize> {
    let index = match key {
        Value::Integer(i) => usize::try_from(*i).ok()?,
        Value::Number(n) if n.fract() == 0.0 && *n >= 1.0 => *n as usize,
        _ => return None,
    };
    (1..=border).contains(&index).then(|| index - 1)
}
