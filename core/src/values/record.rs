//! Structured records: host structs that cross the bridge as Lua tables.

/// Opt-in capabilities for a type written through [`Record`].
///
/// Both methods default to `None`, which selects the structural path: the
/// value is serialized with serde into a field-name keyed table. A type that
/// returns text from either method is pushed as that text instead.
/// `error_description` is consulted first.
///
/// ```ignore
/// #[derive(Serialize)]
/// struct Point { x: f64, y: f64 }
///
/// impl StructuredRecord for Point {}
///
/// interp.set_globals([("origin", Record(Point { x: 0.0, y: 0.0 }))])?;
/// ```
pub trait StructuredRecord: serde::Serialize {
    /// Text describing an error condition, when the record represents one.
    fn error_description(&self) -> Option<String> {
        None
    }

    /// Human-readable representation.
    fn string_representation(&self) -> Option<String> {
        None
    }
}

/// Wrapper selecting the structured-record rules.
///
/// As a pushed value it follows [`StructuredRecord`]. As a bridged function
/// parameter (`T: DeserializeOwned`) it converts the Lua table through JSON
/// into `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Record<T>(pub T);

impl<T> Record<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> core::ops::Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}
