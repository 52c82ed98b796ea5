//! Conversion of a [`JsonValue`] into arbitrary `Deserialize` data.
//!
//! [`from_value`] is the inverse of [`to_value`](super::to_value): it lets
//! text read with this crate's parser feed `#[derive(Deserialize)]` types.
//! Integral numbers are offered as `i64`/`u64`, other numbers as `f64`, and
//! numbers too large for `f64` as their decimal text.
//!
//! Enums use the external tagging `to_value` produces: a unit variant is a
//! string, any other variant a single-member object keyed by its name.

use std::fmt;

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, IntoDeserializer, MapAccess, SeqAccess, Visitor,
};
use serde::{forward_to_deserialize_any, Deserialize, Deserializer};

use super::number::Number;
use super::types::{JsonObject, JsonValue};
use crate::error::{TypeError, TypeResult};

/// Build a `T` from a parsed value.
pub fn from_value<T: DeserializeOwned>(value: JsonValue) -> TypeResult<T> {
    T::deserialize(value)
}

fn visit_number<'de, V: Visitor<'de>>(number: Number, visitor: V) -> TypeResult<V::Value> {
    if let Some(i) = number.as_i64() {
        visitor.visit_i64(i)
    } else if let Some(u) = number.as_u64() {
        visitor.visit_u64(u)
    } else if let Some(f) = number.as_f64() {
        visitor.visit_f64(f)
    } else {
        visitor.visit_string(number.to_string())
    }
}

impl<'de> Deserializer<'de> for JsonValue {
    type Error = TypeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> TypeResult<V::Value> {
        match self {
            JsonValue::Null => visitor.visit_unit(),
            JsonValue::Bool(b) => visitor.visit_bool(b),
            JsonValue::Number(n) => visit_number(n, visitor),
            JsonValue::String(s) => visitor.visit_string(s),
            JsonValue::Array(arr) => visitor.visit_seq(ArrayAccess::new(arr)),
            JsonValue::Object(obj) => visitor.visit_map(ObjectAccess::new(obj)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> TypeResult<V::Value> {
        match self {
            JsonValue::Null => visitor.visit_none(),
            other => visitor.visit_some(other),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> TypeResult<V::Value> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> TypeResult<V::Value> {
        match self {
            JsonValue::String(variant) => visitor.visit_enum(variant.into_deserializer()),
            JsonValue::Object(obj) if obj.len() == 1 => {
                let mut entries = obj.into_iter();
                match entries.next() {
                    Some((variant, value)) => visitor.visit_enum(TaggedVariant { variant, value }),
                    None => Err(de::Error::invalid_length(0, &"a single-member object")),
                }
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &"an enum variant")),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple tuple_struct map struct
        identifier ignored_any
    }
}

fn unexpected(value: &JsonValue) -> de::Unexpected<'_> {
    match value {
        JsonValue::Null => de::Unexpected::Unit,
        JsonValue::Bool(b) => de::Unexpected::Bool(*b),
        JsonValue::Number(_) => de::Unexpected::Other("number"),
        JsonValue::String(s) => de::Unexpected::Str(s),
        JsonValue::Array(_) => de::Unexpected::Seq,
        JsonValue::Object(_) => de::Unexpected::Map,
    }
}

struct ArrayAccess {
    items: std::vec::IntoIter<JsonValue>,
}

impl ArrayAccess {
    fn new(items: Vec<JsonValue>) -> Self {
        Self {
            items: items.into_iter(),
        }
    }
}

impl<'de> SeqAccess<'de> for ArrayAccess {
    type Error = TypeError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> TypeResult<Option<T::Value>> {
        self.items.next().map(|item| seed.deserialize(item)).transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct ObjectAccess {
    entries: indexmap::map::IntoIter<String, JsonValue>,
    pending: Option<JsonValue>,
}

impl ObjectAccess {
    fn new(object: JsonObject) -> Self {
        Self {
            entries: object.into_iter(),
            pending: None,
        }
    }
}

impl<'de> MapAccess<'de> for ObjectAccess {
    type Error = TypeError;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> TypeResult<Option<K::Value>> {
        match self.entries.next() {
            Some((key, value)) => {
                self.pending = Some(value);
                seed.deserialize(key.into_deserializer()).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> TypeResult<V::Value> {
        match self.pending.take() {
            Some(value) => seed.deserialize(value),
            None => Err(de::Error::custom("value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

/// The single member of a tagged enum object.
struct TaggedVariant {
    variant: String,
    value: JsonValue,
}

impl<'de> de::EnumAccess<'de> for TaggedVariant {
    type Error = TypeError;
    type Variant = JsonValue;

    fn variant_seed<V: DeserializeSeed<'de>>(self, seed: V) -> TypeResult<(V::Value, JsonValue)> {
        let variant = seed.deserialize(IntoDeserializer::<TypeError>::into_deserializer(self.variant))?;
        Ok((variant, self.value))
    }
}

impl<'de> de::VariantAccess<'de> for JsonValue {
    type Error = TypeError;

    fn unit_variant(self) -> TypeResult<()> {
        match self {
            JsonValue::Null => Ok(()),
            other => Err(de::Error::invalid_type(unexpected(&other), &"a unit variant")),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> TypeResult<T::Value> {
        seed.deserialize(self)
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> TypeResult<V::Value> {
        match self {
            JsonValue::Array(arr) => visitor.visit_seq(ArrayAccess::new(arr)),
            other => Err(de::Error::invalid_type(unexpected(&other), &"a tuple variant")),
        }
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> TypeResult<V::Value> {
        match self {
            JsonValue::Object(obj) => visitor.visit_map(ObjectAccess::new(obj)),
            other => Err(de::Error::invalid_type(unexpected(&other), &"a struct variant")),
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JsonValueVisitor)
    }
}

struct JsonValueVisitor;

impl<'de> Visitor<'de> for JsonValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<JsonValue, E> {
        Ok(v.into())
    }

    fn visit_i128<E>(self, v: i128) -> Result<JsonValue, E> {
        Ok(v.into())
    }

    fn visit_u64<E>(self, v: u64) -> Result<JsonValue, E> {
        Ok(v.into())
    }

    fn visit_u128<E>(self, v: u128) -> Result<JsonValue, E> {
        Ok(v.into())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonValue, E> {
        JsonValue::try_from(v).map_err(E::custom)
    }

    fn visit_str<E>(self, v: &str) -> Result<JsonValue, E> {
        Ok(v.into())
    }

    fn visit_string<E>(self, v: String) -> Result<JsonValue, E> {
        Ok(v.into())
    }

    fn visit_unit<E>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        JsonValue::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonValue, A::Error> {
        let mut object = JsonObject::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, JsonValue>()? {
            object
                .set(key, value)
                .map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(JsonValue::Object(object))
    }
}
