//! Conversion of arbitrary `Serialize` data into [`JsonValue`].
//!
//! [`to_value`] is the type-validation pass run before caller data is
//! stored or serialized. It walks the whole tree once and fails on the
//! first part JSON cannot represent:
//!
//! - byte blobs ([`TypeError::UnsupportedType`])
//! - NaN and infinities ([`TypeError::NonFiniteNumber`])
//! - map keys that do not serialize as strings ([`TypeError::NonStringKey`])
//! - empty keys ([`TypeError::EmptyKey`])
//!
//! The pass has no side effects; the caller's data is only read.

use serde::ser::{self, Serialize, Serializer};

use super::number::{Number, NUMBER_TOKEN};
use super::types::{JsonObject, JsonValue};
use crate::error::{TypeError, TypeResult};

/// Convert `value` into a [`JsonValue`], validating every part of it.
pub fn to_value<T>(value: &T) -> TypeResult<JsonValue>
where
    T: Serialize + ?Sized,
{
    value.serialize(ValueSerializer)
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            JsonValue::Null => serializer.serialize_unit(),
            JsonValue::Bool(b) => serializer.serialize_bool(*b),
            JsonValue::Number(n) => n.serialize(serializer),
            JsonValue::String(s) => serializer.serialize_str(s),
            JsonValue::Array(arr) => serializer.collect_seq(arr),
            JsonValue::Object(obj) => obj.serialize(serializer),
        }
    }
}

impl Serialize for JsonObject {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Serializer whose output is a [`JsonValue`].
pub struct ValueSerializer;

impl Serializer for ValueSerializer {
    type Ok = JsonValue;
    type Error = TypeError;

    type SerializeSeq = SerializeArray;
    type SerializeTuple = SerializeArray;
    type SerializeTupleStruct = SerializeArray;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> TypeResult<JsonValue> {
        Ok(JsonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_i16(self, v: i16) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_i32(self, v: i32) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_i64(self, v: i64) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_i128(self, v: i128) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_u8(self, v: u8) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_u16(self, v: u16) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_u32(self, v: u32) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_u64(self, v: u64) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_u128(self, v: u128) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_f32(self, v: f32) -> TypeResult<JsonValue> {
        JsonValue::try_from(v)
    }

    fn serialize_f64(self, v: f64) -> TypeResult<JsonValue> {
        JsonValue::try_from(v)
    }

    fn serialize_char(self, v: char) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_str(self, v: &str) -> TypeResult<JsonValue> {
        Ok(v.into())
    }

    fn serialize_bytes(self, _v: &[u8]) -> TypeResult<JsonValue> {
        Err(TypeError::UnsupportedType("byte array"))
    }

    fn serialize_none(self) -> TypeResult<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> TypeResult<JsonValue> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> TypeResult<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> TypeResult<JsonValue> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> TypeResult<JsonValue> {
        Ok(variant.into())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        name: &'static str,
        value: &T,
    ) -> TypeResult<JsonValue> {
        let inner = value.serialize(self)?;
        if name != NUMBER_TOKEN {
            return Ok(inner);
        }
        // Numbers outside the primitive range arrive as their decimal text
        match inner {
            JsonValue::String(text) => Ok(JsonValue::Number(text.parse::<Number>()?)),
            other => Ok(other),
        }
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> TypeResult<JsonValue> {
        let mut object = JsonObject::new();
        object.set(variant, to_value(value)?)?;
        Ok(object.into())
    }

    fn serialize_seq(self, len: Option<usize>) -> TypeResult<SerializeArray> {
        Ok(SerializeArray {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> TypeResult<SerializeArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> TypeResult<SerializeArray> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> TypeResult<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> TypeResult<SerializeObject> {
        Ok(SerializeObject {
            object: JsonObject::with_capacity(len.unwrap_or(0)),
            pending_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> TypeResult<SerializeObject> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> TypeResult<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            variant,
            object: JsonObject::with_capacity(len),
        })
    }
}

/// Array under construction.
pub struct SerializeArray {
    items: Vec<JsonValue>,
}

impl ser::SerializeSeq for SerializeArray {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> TypeResult<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> TypeResult<JsonValue> {
        Ok(JsonValue::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeArray {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> TypeResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> TypeResult<JsonValue> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeArray {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> TypeResult<()> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> TypeResult<JsonValue> {
        ser::SerializeSeq::end(self)
    }
}

/// `{"Variant": [..]}` under construction.
pub struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<JsonValue>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> TypeResult<()> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> TypeResult<JsonValue> {
        let mut object = JsonObject::new();
        object.set(self.variant, JsonValue::Array(self.items))?;
        Ok(object.into())
    }
}

/// Object under construction.
pub struct SerializeObject {
    object: JsonObject,
    pending_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> TypeResult<()> {
        match to_value(key)? {
            JsonValue::String(key) if key.is_empty() => Err(TypeError::EmptyKey),
            JsonValue::String(key) => {
                self.pending_key = Some(key);
                Ok(())
            }
            other => Err(TypeError::NonStringKey(other.type_name())),
        }
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> TypeResult<()> {
        let key = self
            .pending_key
            .take()
            .ok_or_else(|| TypeError::Custom("map value without a key".to_string()))?;
        self.object.set(key, to_value(value)?)?;
        Ok(())
    }

    fn end(self) -> TypeResult<JsonValue> {
        Ok(self.object.into())
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> TypeResult<()> {
        self.object.set(key, to_value(value)?)?;
        Ok(())
    }

    fn end(self) -> TypeResult<JsonValue> {
        Ok(self.object.into())
    }
}

/// `{"Variant": {..}}` under construction.
pub struct SerializeStructVariant {
    variant: &'static str,
    object: JsonObject,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = JsonValue;
    type Error = TypeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> TypeResult<()> {
        self.object.set(key, to_value(value)?)?;
        Ok(())
    }

    fn end(self) -> TypeResult<JsonValue> {
        let mut outer = JsonObject::new();
        outer.set(self.variant, self.object)?;
        Ok(outer.into())
    }
}
