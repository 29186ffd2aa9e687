//! The `json` package.
//!
//! `json.encode` accepts any value. Arrays encode as JSON arrays, tables as
//! objects, integral numbers without a fraction, and functions as `null`.
//! `json.decode` returns the decoded value, with `null` decoding to nil.

use std::collections::BTreeMap;

use crate::bridge::HostFunction;
use crate::values::DynamicValue;

pub fn build_json_package() -> BTreeMap<&'static str, HostFunction> {
    BTreeMap::from([
        ("encode", HostFunction::new(encode).named("json.encode")),
        ("decode", HostFunction::new(decode).named("json.decode")),
    ])
}

fn encode(value: DynamicValue) -> Result<String, serde_json::Error> {
    serde_json::to_string(&value.to_json())
}

fn decode(text: String) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::from_str(&text)
}
