//! Conversions from `DynamicValue` into statically typed host values.
//!
//! The Function Bridge binds every Lua argument to a Rust parameter through
//! [`FromDynamic`]. Conversions are narrow: numbers convert into
//! any numeric width, strings only into `String`, arrays and tables
//! elementwise into collections. Anything else is a [`TypeMismatch`].

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde::de::DeserializeOwned;

use super::{dynamic::DynamicValue, record::Record};

/// A dynamic value could not be converted into the requested type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeMismatch {
    /// Kind name of the value that was received.
    pub got: &'static str,
}

impl TypeMismatch {
    pub fn of(value: &DynamicValue) -> Self {
        TypeMismatch {
            got: value.kind_name(),
        }
    }
}

/// A host type that bridged functions can accept as a parameter.
pub trait FromDynamic: Sized {
    /// Name of the required kind, used in argument errors.
    fn kind() -> String;

    /// Convert a non-nil value.
    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch>;

    /// Value bound when the argument is nil. `None` means nil is rejected.
    fn zero() -> Option<Self>;
}

/// Convert `value` into `T`, substituting `T`'s zero value for nil.
pub fn coerce<T: FromDynamic>(value: DynamicValue) -> Result<T, TypeMismatch> {
    if value.is_nil() {
        return T::zero().ok_or(TypeMismatch { got: "nil" });
    }
    T::from_dynamic(value)
}

macro_rules! impl_from_dynamic_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromDynamic for $ty {
                fn kind() -> String {
                    stringify!($ty).to_string()
                }

                fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
                    match value {
                        // Truncates toward zero and saturates at the type's bounds.
                        DynamicValue::Number(n) => Ok(n as $ty),
                        other => Err(TypeMismatch::of(&other)),
                    }
                }

                fn zero() -> Option<Self> {
                    Some(<$ty>::default())
                }
            }
        )*
    };
}

impl_from_dynamic_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl FromDynamic for bool {
    fn kind() -> String {
        "bool".to_string()
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        match value {
            DynamicValue::Bool(b) => Ok(b),
            other => Err(TypeMismatch::of(&other)),
        }
    }

    fn zero() -> Option<Self> {
        Some(false)
    }
}

impl FromDynamic for String {
    fn kind() -> String {
        "string".to_string()
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        match value {
            DynamicValue::String(s) => Ok(s),
            other => Err(TypeMismatch::of(&other)),
        }
    }

    fn zero() -> Option<Self> {
        Some(String::new())
    }
}

/// Accepts anything, nil included.
impl FromDynamic for DynamicValue {
    fn kind() -> String {
        "any".to_string()
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        Ok(value)
    }

    fn zero() -> Option<Self> {
        Some(DynamicValue::Nil)
    }
}

impl<T: FromDynamic> FromDynamic for Option<T> {
    fn kind() -> String {
        T::kind()
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        coerce(value).map(Some)
    }

    fn zero() -> Option<Self> {
        Some(None)
    }
}

impl<T: FromDynamic> FromDynamic for Vec<T> {
    fn kind() -> String {
        format!("array of {}", T::kind())
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        match value {
            DynamicValue::Array(items) => items
                .into_iter()
                .map(coerce)
                .collect::<Result<_, _>>()
                .map_err(|_| TypeMismatch { got: "array" }),
            // `{}` has border length 0 and reads back as a table.
            DynamicValue::Table(entries) if entries.is_empty() => Ok(Vec::new()),
            other => Err(TypeMismatch::of(&other)),
        }
    }

    fn zero() -> Option<Self> {
        Some(Vec::new())
    }
}

fn entries_from_dynamic<T, C>(value: DynamicValue) -> Result<C, TypeMismatch>
where
    T: FromDynamic,
    C: FromIterator<(String, T)> + Default,
{
    match value {
        DynamicValue::Table(entries) => entries
            .into_iter()
            .map(|(key, value)| coerce(value).map(|value| (key, value)))
            .collect::<Result<_, _>>()
            .map_err(|_| TypeMismatch { got: "table" }),
        DynamicValue::Array(items) if items.is_empty() => Ok(C::default()),
        other => Err(TypeMismatch::of(&other)),
    }
}

impl<T: FromDynamic> FromDynamic for BTreeMap<String, T> {
    fn kind() -> String {
        format!("table of {}", T::kind())
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        entries_from_dynamic(value)
    }

    fn zero() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<T, S> FromDynamic for HashMap<String, T, S>
where
    T: FromDynamic,
    S: BuildHasher + Default,
{
    fn kind() -> String {
        format!("table of {}", T::kind())
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        entries_from_dynamic(value)
    }

    fn zero() -> Option<Self> {
        Some(HashMap::default())
    }
}

/// Tables convert through their JSON form; nil has no record equivalent.
impl<T: DeserializeOwned> FromDynamic for Record<T> {
    fn kind() -> String {
        "record".to_string()
    }

    fn from_dynamic(value: DynamicValue) -> Result<Self, TypeMismatch> {
        match value {
            DynamicValue::Table(_) | DynamicValue::Array(_) => {
                serde_json::from_value(value.to_json())
                    .map(Record)
                    .map_err(|_| TypeMismatch::of(&value))
            }
            other => Err(TypeMismatch::of(&other)),
        }
    }

    fn zero() -> Option<Self> {
        None
    }
}
