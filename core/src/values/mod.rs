pub mod convert;
pub mod dynamic;
pub mod json;
pub mod record;
pub use convert::{FromDynamic, TypeMismatch, coerce};
pub use dynamic::DynamicValue;
pub use record::{Record, StructuredRecord};
