//! Canonical JSON serialization.
//!
//! Output is compact: no whitespace between tokens. Object members come out
//! in insertion order, strings are escaped by [`escape_into`], and numbers
//! use their canonical decimal text, so integral values never gain a `.0`.
//!
//! Serializing a [`JsonValue`] cannot fail. Arbitrary `Serialize` data goes
//! through [`to_value`] first, which rejects anything JSON cannot represent.

use std::io;

use serde::Serialize;

use super::escape::escape_into;
use super::types::{JsonObject, JsonValue};
use super::value_ser::to_value;
use crate::error::TypeResult;

/// Serialize a value to its canonical text.
pub fn to_string(value: &JsonValue) -> String {
    let mut output = String::new();
    write_value(value, &mut output);
    output
}

/// Append the canonical text of `value` to `output`.
pub fn write_value(value: &JsonValue, output: &mut String) {
    match value {
        JsonValue::Null => output.push_str("null"),
        JsonValue::Bool(true) => output.push_str("true"),
        JsonValue::Bool(false) => output.push_str("false"),
        JsonValue::Number(n) => output.push_str(&n.to_string()),
        JsonValue::String(s) => write_string(s, output),
        JsonValue::Array(arr) => write_array(arr, output),
        JsonValue::Object(obj) => write_object(obj, output),
    }
}

/// Write the canonical text of `value` to an I/O sink.
pub fn to_writer<W: io::Write>(mut writer: W, value: &JsonValue) -> io::Result<()> {
    writer.write_all(to_string(value).as_bytes())
}

/// Serialize caller data after validating that every part of it has a JSON
/// representation.
pub fn serialize<T>(value: &T) -> TypeResult<String>
where
    T: Serialize + ?Sized,
{
    Ok(to_string(&to_value(value)?))
}

fn write_string(s: &str, output: &mut String) {
    output.push('"');
    escape_into(s, output);
    output.push('"');
}

fn write_array(arr: &[JsonValue], output: &mut String) {
    output.push('[');
    for (i, value) in arr.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        write_value(value, output);
    }
    output.push(']');
}

fn write_object(obj: &JsonObject, output: &mut String) {
    output.push('{');
    for (i, (key, value)) in obj.iter().enumerate() {
        if i > 0 {
            output.push(',');
        }
        write_string(key, output);
        output.push(':');
        write_value(value, output);
    }
    output.push('}');
}

/// Check if `input` is exactly the canonical text of `value`.
pub fn is_canonical(input: &str, value: &JsonValue) -> bool {
    to_string(value) == input
}
