//! JSON value types.
//!
//! [`JsonValue`] is a closed enum of the six JSON shapes; [`JsonObject`] is
//! an insertion-ordered map with unique, non-empty keys.
//!
//! Trees are strictly owned: a container owns its children, `Clone` is a
//! full deep copy and dropping a container drops the whole subtree.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Serialize;

use super::number::Number;
use super::parser::parse;
use super::serializer::write_value;
use super::value_ser::to_value;
use crate::error::{AccessError, KeyError, ParseError, TypeError, TypeResult};

/// A JSON value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum JsonValue {
    /// JSON null literal
    #[default]
    Null,
    /// JSON boolean (true/false)
    Bool(bool),
    /// JSON number, kept at full decimal precision
    Number(Number),
    /// JSON string, stored unescaped
    String(String),
    /// JSON array of values
    Array(Vec<JsonValue>),
    /// JSON object with insertion-ordered keys
    Object(JsonObject),
}

impl JsonValue {
    /// Returns true if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    /// Returns true if this is a boolean value.
    pub fn is_bool(&self) -> bool {
        matches!(self, JsonValue::Bool(_))
    }

    /// Returns true if this is a number value.
    pub fn is_number(&self) -> bool {
        matches!(self, JsonValue::Number(_))
    }

    /// Returns true if this is a string value.
    pub fn is_string(&self) -> bool {
        matches!(self, JsonValue::String(_))
    }

    /// Returns true if this is an array value.
    pub fn is_array(&self) -> bool {
        matches!(self, JsonValue::Array(_))
    }

    /// Returns true if this is an object value.
    pub fn is_object(&self) -> bool {
        matches!(self, JsonValue::Object(_))
    }

    /// Returns the boolean value if this is a Bool, None otherwise.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the number if this is a Number, None otherwise.
    pub fn as_number(&self) -> Option<&Number> {
        match self {
            JsonValue::Number(n) => Some(n),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if this is an integral Number in range.
    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    /// Returns the nearest `f64` if this is a finite-range Number.
    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().and_then(Number::as_f64)
    }

    /// Returns a reference to the string if this is a String, None otherwise.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns a reference to the array if this is an Array, None otherwise.
    pub fn as_array(&self) -> Option<&Vec<JsonValue>> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a mutable reference to the array if this is an Array.
    pub fn as_array_mut(&mut self) -> Option<&mut Vec<JsonValue>> {
        match self {
            JsonValue::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Returns a reference to the object if this is an Object, None otherwise.
    pub fn as_object(&self) -> Option<&JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns a mutable reference to the object if this is an Object.
    pub fn as_object_mut(&mut self) -> Option<&mut JsonObject> {
        match self {
            JsonValue::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get a value from an object by key.
    ///
    /// Lenient counterpart of [`JsonObject::get`]: any failure is `None`.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|o| o.get(key).ok())
    }

    /// Get a value from an array by index.
    pub fn get_index(&self, index: usize) -> Option<&JsonValue> {
        match self {
            JsonValue::Array(arr) => arr.get(index),
            _ => None,
        }
    }

    /// Returns the type name as a string for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonValue::Null => "null",
            JsonValue::Bool(_) => "boolean",
            JsonValue::Number(_) => "number",
            JsonValue::String(_) => "string",
            JsonValue::Array(_) => "array",
            JsonValue::Object(_) => "object",
        }
    }
}

impl fmt::Display for JsonValue {
    /// Writes the canonical compact form.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        write_value(self, &mut out);
        f.write_str(&out)
    }
}

impl FromStr for JsonValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}

/// An insertion-ordered JSON object.
///
/// Keys are unique and never empty. Replacing the value of an existing key
/// keeps the key at the position of its first insertion; removing a key
/// closes the gap without reordering the rest.
///
/// Equality is order-sensitive, since key order is observable in the
/// serialized form.
#[derive(Debug, Clone, Default)]
pub struct JsonObject {
    entries: IndexMap<String, JsonValue>,
}

fn check_key(key: &str) -> TypeResult<()> {
    if key.is_empty() {
        return Err(TypeError::EmptyKey);
    }
    Ok(())
}

impl JsonObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Build an object from key/value pairs; later duplicates win.
    pub fn from_entries<I, K, V>(entries: I) -> TypeResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<JsonValue>,
    {
        let mut object = Self::new();
        for (key, value) in entries {
            object.set(key, value)?;
        }
        Ok(object)
    }

    /// Set `key` to `value`, returning the object for chaining.
    ///
    /// Fails with [`TypeError::EmptyKey`] for an empty key, leaving the object
    /// unmodified.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> TypeResult<&mut Self> {
        let key = key.into();
        check_key(&key)?;
        self.entries.insert(key, value.into());
        Ok(self)
    }

    /// Set `key` to a value whose conversion can fail, such as an `f64`.
    ///
    /// The object is unmodified if either the key or the conversion fails.
    pub fn try_set<V>(&mut self, key: impl Into<String>, value: V) -> TypeResult<&mut Self>
    where
        V: TryInto<JsonValue, Error = TypeError>,
    {
        let key = key.into();
        check_key(&key)?;
        let value = value.try_into()?;
        self.entries.insert(key, value);
        Ok(self)
    }

    /// Set `key` to arbitrary serializable data after checking that every
    /// part of it has a JSON representation.
    ///
    /// The object is unmodified on failure.
    pub fn set_serialize<T>(&mut self, key: impl Into<String>, value: &T) -> TypeResult<&mut Self>
    where
        T: Serialize + ?Sized,
    {
        let key = key.into();
        check_key(&key)?;
        let value = to_value(value)?;
        self.entries.insert(key, value);
        Ok(self)
    }

    /// Look up `key`.
    ///
    /// An empty key is a [`TypeError`]; an absent key is a [`KeyError`].
    pub fn get(&self, key: &str) -> Result<&JsonValue, AccessError> {
        check_key(key)?;
        self.entries
            .get(key)
            .ok_or_else(|| KeyError(key.to_string()).into())
    }

    /// Mutable counterpart of [`get`](Self::get).
    pub fn get_mut(&mut self, key: &str) -> Result<&mut JsonValue, AccessError> {
        check_key(key)?;
        self.entries
            .get_mut(key)
            .ok_or_else(|| KeyError(key.to_string()).into())
    }

    /// Returns true if `key` is present.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove `key`, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<JsonValue> {
        self.entries.shift_remove(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the object has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &JsonValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Detached copy of the entries in insertion order.
    pub fn entries(&self) -> Vec<(String, JsonValue)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &JsonValue> {
        self.entries.values()
    }

    /// Mutable values in insertion order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut JsonValue> {
        self.entries.values_mut()
    }
}

impl PartialEq for JsonObject {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len() && self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for JsonObject {}

impl IntoIterator for JsonObject {
    type Item = (String, JsonValue);
    type IntoIter = indexmap::map::IntoIter<String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a JsonObject {
    type Item = (&'a String, &'a JsonValue);
    type IntoIter = indexmap::map::Iter<'a, String, JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        JsonValue::Bool(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        JsonValue::String(value)
    }
}

impl From<char> for JsonValue {
    fn from(value: char) -> Self {
        JsonValue::String(value.to_string())
    }
}

impl From<Number> for JsonValue {
    fn from(value: Number) -> Self {
        JsonValue::Number(value)
    }
}

impl From<JsonObject> for JsonValue {
    fn from(value: JsonObject) -> Self {
        JsonValue::Object(value)
    }
}

impl From<()> for JsonValue {
    fn from((): ()) -> Self {
        JsonValue::Null
    }
}

impl<T: Into<JsonValue>> From<Vec<T>> for JsonValue {
    fn from(value: Vec<T>) -> Self {
        JsonValue::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<JsonValue>> From<Option<T>> for JsonValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(JsonValue::Null, Into::into)
    }
}

impl<T: Into<JsonValue>> FromIterator<T> for JsonValue {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        JsonValue::Array(iter.into_iter().map(Into::into).collect())
    }
}

macro_rules! impl_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for JsonValue {
                fn from(value: $ty) -> Self {
                    JsonValue::Number(Number::from(value))
                }
            }
        )*
    };
}

impl_from_integer!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl TryFrom<f64> for JsonValue {
    type Error = TypeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Number::try_from(value).map(JsonValue::Number)
    }
}

impl TryFrom<f32> for JsonValue {
    type Error = TypeError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Number::try_from(value).map(JsonValue::Number)
    }
}
