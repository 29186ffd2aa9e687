//! Writer: pushes host values onto the stack.
//!
//! Every host type that can cross into Lua implements [`Marshal`]. Sequences
//! become 1-based tables, maps become tables keyed by the string form of each
//! key, and structured records go through their JSON form.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::fmt::Display;
use std::hash::BuildHasher;

use tracing::{trace, warn};

use super::{EMPTY_ARRAY_SENTINEL, Stack};
use crate::api::{Error, Result};
use crate::values::{DynamicValue, Record, StructuredRecord};

/// A host value that can be written onto a [`Stack`].
///
/// Implementors push exactly one slot on success.
pub trait Marshal {
    fn push_onto(&self, stack: &mut Stack) -> Result<()>;
}

impl Stack {
    /// Push any writable host value. On failure the stack is left as it was.
    pub fn push_any<T: Marshal + ?Sized>(&mut self, value: &T) -> Result<()> {
        let base = self.top();
        let pushed = value.push_onto(self);
        self.restore_on_error(base, pushed)
    }

    /// Push `{__emptyarray = true}`, which reads back as an empty array.
    pub fn push_empty_array(&mut self) -> Result<()> {
        self.create_table(0, 1)?;
        self.push_string(EMPTY_ARRAY_SENTINEL)?;
        self.push_bool(true);
        self.raw_set(-3)
    }

    /// Push `items` as a table with keys `1..=len`.
    pub fn push_sequence<'a, T, I>(&mut self, items: I) -> Result<()>
    where
        T: Marshal + ?Sized + 'a,
        I: ExactSizeIterator<Item = &'a T>,
    {
        let len = items.len();
        if len == 0 && self.options.mark_empty_arrays {
            return self.push_empty_array();
        }

        let base = self.top();
        self.create_table(len, 0)?;
        for (index, item) in (1..).zip(items) {
            let pushed = item.push_onto(self).and_then(|()| self.raw_seti(-2, index));
            self.restore_on_error(base, pushed)?;
        }
        Ok(())
    }

    /// Push `entries` as a table keyed by the display form of each key.
    pub fn push_mapping<'a, K, V, I>(&mut self, entries: I) -> Result<()>
    where
        K: Display + ?Sized + 'a,
        V: Marshal + ?Sized + 'a,
        I: ExactSizeIterator<Item = (&'a K, &'a V)>,
    {
        let base = self.top();
        self.create_table(0, entries.len())?;
        for (key, value) in entries {
            let pushed = self
                .push_string(&key.to_string())
                .and_then(|()| value.push_onto(self))
                .and_then(|()| self.raw_set(-3));
            self.restore_on_error(base, pushed)?;
        }
        Ok(())
    }

    /// Drop everything above `base` when `result` is an error.
    fn restore_on_error(&mut self, base: usize, result: Result<()>) -> Result<()> {
        if result.is_err() {
            self.pop(self.top().saturating_sub(base));
        }
        result
    }
}

impl<T: Marshal + ?Sized> Marshal for &T {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        (**self).push_onto(stack)
    }
}

impl<T: Marshal + ?Sized> Marshal for Box<T> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        (**self).push_onto(stack)
    }
}

/// `None` is nil.
impl<T: Marshal> Marshal for Option<T> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        match self {
            Some(value) => value.push_onto(stack),
            None => {
                stack.push_nil();
                Ok(())
            }
        }
    }
}

impl Marshal for bool {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_bool(*self);
        Ok(())
    }
}

impl Marshal for str {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_string(self)
    }
}

impl Marshal for String {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_string(self)
    }
}

impl Marshal for char {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_string(self.encode_utf8(&mut [0; 4]))
    }
}

macro_rules! impl_marshal_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Marshal for $ty {
                fn push_onto(&self, stack: &mut Stack) -> Result<()> {
                    stack.push_number(*self as f64);
                    Ok(())
                }
            }
        )*
    };
}

impl_marshal_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl<T: Marshal> Marshal for [T] {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_sequence(self.iter())
    }
}

impl<T: Marshal, const N: usize> Marshal for [T; N] {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_sequence(self.iter())
    }
}

impl<T: Marshal> Marshal for Vec<T> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_sequence(self.iter())
    }
}

impl<T: Marshal> Marshal for VecDeque<T> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_sequence(self.iter())
    }
}

impl<K: Display, V: Marshal, S: BuildHasher> Marshal for HashMap<K, V, S> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_mapping(self.iter())
    }
}

impl<K: Display, V: Marshal> Marshal for BTreeMap<K, V> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        stack.push_mapping(self.iter())
    }
}

impl Marshal for DynamicValue {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        match self {
            DynamicValue::Nil => stack.push_nil(),
            DynamicValue::Number(n) => stack.push_number(*n),
            DynamicValue::Bool(b) => stack.push_bool(*b),
            DynamicValue::String(s) => return stack.push_string(s),
            DynamicValue::Array(items) => return stack.push_sequence(items.iter()),
            DynamicValue::Table(entries) => return stack.push_mapping(entries.iter()),
            DynamicValue::Function => {
                trace!("function placeholder has no runtime value, writing nil");
                stack.push_nil();
            }
        }
        Ok(())
    }
}

impl Marshal for serde_json::Value {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        use serde_json::Value as Json;

        match self {
            Json::Null => stack.push_nil(),
            Json::Bool(b) => stack.push_bool(*b),
            Json::Number(n) => stack.push_number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => return stack.push_string(s),
            Json::Array(items) => return stack.push_sequence(items.iter()),
            Json::Object(entries) => return stack.push_mapping(entries.iter()),
        }
        Ok(())
    }
}

/// Records prefer their error description, then their string representation,
/// and otherwise cross as the table form of their JSON serialization.
impl<T: StructuredRecord> Marshal for Record<T> {
    fn push_onto(&self, stack: &mut Stack) -> Result<()> {
        let record = &self.0;
        if let Some(text) = record
            .error_description()
            .or_else(|| record.string_representation())
        {
            return stack.push_string(&text);
        }

        match serde_json::to_value(record) {
            Ok(json) => json.push_onto(stack),
            Err(err) if stack.options.strict_records => Err(Error::Record(err)),
            Err(err) => {
                warn!(error = %err, "record failed to serialize, writing nil");
                stack.push_nil();
                Ok(())
            }
        }
    }
}
