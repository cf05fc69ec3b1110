#![allow(dead_code)]

pub mod fixtures;

use serde_json::{Map, Value};

/// Unwraps a `json!` object literal into a document.
pub fn doc(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("document must be a map, got {other}"),
    }
}
