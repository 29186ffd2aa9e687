//! The dynamic value model shared by the Reader, the Writer and host code.
//!
//! `DynamicValue` is a closed tagged union. Every Lua value read off the stack
//! lands in exactly one variant, and every host value written to the stack can
//! be expressed through one. Composite Lua tables are classified as either
//! [`DynamicValue::Array`] or [`DynamicValue::Table`] when they are read; the
//! classification is computed from the table's border length, never stored in
//! Lua itself.

use std::collections::BTreeMap;
use std::fmt;

/// A host-side snapshot of a Lua value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DynamicValue {
    #[default]
    Nil,
    Number(f64),
    Bool(bool),
    String(String),
    /// Ordered sequence. Stored zero-based, addressed 1-based through
    /// [`DynamicValue::element`] to match Lua's convention.
    Array(Vec<DynamicValue>),
    /// String-keyed mapping.
    Table(BTreeMap<String, DynamicValue>),
    /// Opaque marker for a Lua function. The callable itself stays in Lua.
    Function,
}

impl DynamicValue {
    /// Build an array from anything that yields values.
    pub fn array<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DynamicValue>,
    {
        DynamicValue::Array(items.into_iter().map(Into::into).collect())
    }

    /// Build a table from `(key, value)` pairs.
    pub fn table<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<DynamicValue>,
    {
        DynamicValue::Table(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Name of the variant, as used in conversion error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            DynamicValue::Nil => "nil",
            DynamicValue::Number(_) => "number",
            DynamicValue::Bool(_) => "bool",
            DynamicValue::String(_) => "string",
            DynamicValue::Array(_) => "array",
            DynamicValue::Table(_) => "table",
            DynamicValue::Function => "function",
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, DynamicValue::Nil)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            DynamicValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DynamicValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            DynamicValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[DynamicValue]> {
        match self {
            DynamicValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&BTreeMap<String, DynamicValue>> {
        match self {
            DynamicValue::Table(entries) => Some(entries),
            _ => None,
        }
    }

    /// Array element at 1-based position `pos`.
    ///
    /// Returns `None` for non-arrays, for position 0 and past the end.
    pub fn element(&self, pos: usize) -> Option<&DynamicValue> {
        let items = self.as_array()?;
        pos.checked_sub(1).and_then(|index| items.get(index))
    }

    /// Table entry by key. Returns `None` for non-tables.
    pub fn field(&self, key: &str) -> Option<&DynamicValue> {
        self.as_table()?.get(key)
    }
}

impl From<f64> for DynamicValue {
    fn from(value: f64) -> Self {
        DynamicValue::Number(value)
    }
}

impl From<i64> for DynamicValue {
    fn from(value: i64) -> Self {
        DynamicValue::Number(value as f64)
    }
}

impl From<i32> for DynamicValue {
    fn from(value: i32) -> Self {
        DynamicValue::Number(f64::from(value))
    }
}

impl From<bool> for DynamicValue {
    fn from(value: bool) -> Self {
        DynamicValue::Bool(value)
    }
}

impl From<&str> for DynamicValue {
    fn from(value: &str) -> Self {
        DynamicValue::String(value.to_string())
    }
}

impl From<String> for DynamicValue {
    fn from(value: String) -> Self {
        DynamicValue::String(value)
    }
}

impl From<Vec<DynamicValue>> for DynamicValue {
    fn from(items: Vec<DynamicValue>) -> Self {
        DynamicValue::Array(items)
    }
}

impl From<BTreeMap<String, DynamicValue>> for DynamicValue {
    fn from(entries: BTreeMap<String, DynamicValue>) -> Self {
        DynamicValue::Table(entries)
    }
}

impl<T: Into<DynamicValue>> From<Option<T>> for DynamicValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DynamicValue::Nil, Into::into)
    }
}

/// Default textual formatting. Scalars print the way table keys are
/// stringified; composites print in a compact literal-like form.
impl fmt::Display for DynamicValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DynamicValue::Nil => write!(f, "nil"),
            DynamicValue::Number(n) => write!(f, "{}", n),
            DynamicValue::Bool(b) => write!(f, "{}", b),
            DynamicValue::String(s) => write!(f, "{}", s),
            DynamicValue::Array(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            DynamicValue::Table(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                write!(f, "}}")
            }
            DynamicValue::Function => write!(f, "function"),
        }
    }
}
