//! Interchange between `DynamicValue` and `serde_json::Value`.
//!
//! The structured-record rule of the Writer serializes a record into JSON and
//! pushes the generic result; the `json` stdlib package and `Record<T>`
//! parameters go the other way.

use serde_json::{Map, Number, Value as Json};

use super::dynamic::DynamicValue;

impl DynamicValue {
    /// Convert to a JSON value.
    ///
    /// Integral numbers inside the `i64` range encode as JSON integers, other
    /// finite numbers as floats, NaN and infinities as `null`. Functions have
    /// no JSON form and encode as `null`.
    pub fn to_json(&self) -> Json {
        match self {
            DynamicValue::Nil | DynamicValue::Function => Json::Null,
            DynamicValue::Number(n) => number_to_json(*n),
            DynamicValue::Bool(b) => Json::Bool(*b),
            DynamicValue::String(s) => Json::String(s.clone()),
            DynamicValue::Array(items) => Json::Array(items.iter().map(Self::to_json).collect()),
            DynamicValue::Table(entries) => Json::Object(
                entries
                    .iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect::<Map<_, _>>(),
            ),
        }
    }
}

// 2^63 as f64; values at or past it do not fit an i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn number_to_json(n: f64) -> Json {
    if n.fract() == 0.0 && n >= -I64_BOUND && n < I64_BOUND {
        return Json::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(Json::Null, Json::Number)
}

impl From<Json> for DynamicValue {
    fn from(json: Json) -> Self {
        match json {
            Json::Null => DynamicValue::Nil,
            Json::Bool(b) => DynamicValue::Bool(b),
            Json::Number(n) => DynamicValue::Number(n.as_f64().unwrap_or(f64::NAN)),
            Json::String(s) => DynamicValue::String(s),
            Json::Array(items) => DynamicValue::Array(items.into_iter().map(Into::into).collect()),
            Json::Object(entries) => {
                DynamicValue::Table(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}
