//! Configuration options for an interpreter.

/// Options controlling how values cross the bridge.
///
/// # Example
///
/// ```
/// use moonbridge_core::api::InterpreterOptions;
///
/// let options = InterpreterOptions {
///     strict_records: true,
///     ..InterpreterOptions::default()
/// };
/// assert_eq!(options.max_depth, 64);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterOptions {
    /// Maximum table nesting the Reader follows before failing.
    ///
    /// Protects the host stack from self-referential tables.
    ///
    /// Default: 64
    pub max_depth: usize,

    /// Surface record serialization failures as errors.
    ///
    /// When `false`, a record that fails to serialize is written as nil and a
    /// warning is logged.
    ///
    /// Default: false
    pub strict_records: bool,

    /// Write empty host sequences as the `__emptyarray` sentinel table so they
    /// read back as empty arrays instead of empty tables.
    ///
    /// Default: false
    pub mark_empty_arrays: bool,
}

impl Default for InterpreterOptions {
    fn default() -> Self {
        Self {
            max_depth: 64,
            strict_records: false,
            mark_empty_arrays: false,
        }
    }
}
