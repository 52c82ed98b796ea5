//! json-canon - JSON value model, parser and canonical serializer.
//!
//! Parses JSON text into an owned [`JsonValue`] tree and writes it back in a
//! single deterministic compact form.
//!
//! # Architecture
//!
//! - [`json`] - value model, parser, serializer and escape codec
//! - [`error`] - parse errors with codes and positions, type errors
//! - [`conformance`] - corpus runner for test vectors
//!
//! # Guarantees
//!
//! - Object members keep insertion order through parse and serialize.
//! - Numbers keep every digit of their decimal text.
//! - `parse(&to_string(v))` equals `v`, and serializing again is stable.
//! - Parse failures report an error code, character offset, line and column.
//!
//! # Example
//!
//! ```
//! use json_canon::{parse, to_string};
//!
//! let value = parse(r#"{"price": 12.50, "tags": ["a/b"]}"#).unwrap();
//! assert_eq!(to_string(&value), r#"{"price":12.50,"tags":["a\/b"]}"#);
//! ```

// Library code propagates errors instead of panicking.
// Tests are checked separately with `cargo test`.
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(missing_docs)]

pub mod conformance;
pub mod error;
pub mod json;

// Re-export commonly used types
pub use error::{AccessError, KeyError, ParseError, ParseErrorKind, ParseResult, TypeError, TypeResult};
pub use json::{
    from_value, parse, parse_with_limits, serialize, to_string, to_value, JsonObject, JsonValue,
    Limits, Number,
};
