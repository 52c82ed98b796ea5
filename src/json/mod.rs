//! JSON parsing and canonical serialization.
//!
//! # Architecture
//!
//! - [`types`] - [`JsonValue`] and the insertion-ordered [`JsonObject`]
//! - [`number`] - arbitrary-precision decimal [`Number`]
//! - [`escape`] - string literal escape/unescape codec
//! - [`lexer`] - single-lookahead character scanner
//! - [`parser`] - recursive descent parser
//! - [`serializer`] - compact canonical output
//! - [`value_ser`] - `Serialize` data to [`JsonValue`], with type validation
//! - [`value_de`] - [`JsonValue`] to `Deserialize` data
//! - [`limits`] - parser resource limits
//!
//! # Canonical form
//!
//! Serialization is deterministic: no whitespace, object members in
//! insertion order, numbers in canonical decimal text, and strings escaped
//! so the output is pure ASCII apart from BMP characters above `U+001F`.
//! Serializing a parsed value and parsing the result gives back an equal
//! value, and serializing again gives the same text.
//!
//! # Example
//!
//! ```
//! use json_canon::json::{parse, to_string, JsonObject, JsonValue};
//!
//! let value = parse(r#"{ "b": 1.50, "a": "x/y" }"#).unwrap();
//! assert_eq!(to_string(&value), r#"{"b":1.50,"a":"x\/y"}"#);
//!
//! let mut obj = JsonObject::new();
//! obj.set("id", 7).unwrap().set("tags", vec!["a", "b"]).unwrap();
//! assert_eq!(JsonValue::from(obj).to_string(), r#"{"id":7,"tags":["a","b"]}"#);
//! ```

pub mod escape;
pub mod lexer;
pub mod limits;
pub mod number;
pub mod parser;
pub mod serializer;
pub mod types;
pub mod value_de;
pub mod value_ser;

// Re-export commonly used items
pub use escape::{escape, unescape};
pub use limits::Limits;
pub use number::Number;
pub use parser::{from_reader, parse, parse_chars, parse_with_limits, Parser};
pub use serializer::{is_canonical, serialize, to_string, to_writer, write_value};
pub use types::{JsonObject, JsonValue};
pub use value_de::from_value;
pub use value_ser::to_value;
