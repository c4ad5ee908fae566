use std::collections::BTreeMap;

use serde::ser::{self, Impossible, Serialize};

use super::{Number, Payload};
use crate::error::SignatureError;

pub(crate) struct PayloadSerializer;

fn unsupported(what: &str) -> SignatureError {
    SignatureError::Serialization(format!("{what} has no JSON representation"))
}

fn non_string_key(kind: &str) -> SignatureError {
    SignatureError::Serialization(format!("map key must be a string, got {kind}"))
}

fn float(v: f64) -> Result<Payload, SignatureError> {
    if v.is_finite() {
        Ok(Payload::Number(Number::Float(v)))
    } else {
        Err(unsupported("non-finite float"))
    }
}

fn tagged(variant: &'static str, value: Payload) -> Payload {
    let mut map = BTreeMap::new();
    map.insert(variant.to_string(), value);
    Payload::Object(map)
}

impl ser::Serializer for PayloadSerializer {
    type Ok = Payload;
    type Error = SignatureError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeObject;
    type SerializeStruct = SerializeObject;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Payload, SignatureError> {
        Ok(Payload::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_i16(self, v: i16) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_i32(self, v: i32) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_i64(self, v: i64) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_i128(self, v: i128) -> Result<Payload, SignatureError> {
        Ok(Payload::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_u16(self, v: u16) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_u32(self, v: u32) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_u64(self, v: u64) -> Result<Payload, SignatureError> {
        self.serialize_i128(v.into())
    }

    fn serialize_u128(self, v: u128) -> Result<Payload, SignatureError> {
        let v = i128::try_from(v)
            .map_err(|_| SignatureError::Serialization(format!("integer {v} out of range")))?;
        self.serialize_i128(v)
    }

    fn serialize_f32(self, v: f32) -> Result<Payload, SignatureError> {
        float(v.into())
    }

    fn serialize_f64(self, v: f64) -> Result<Payload, SignatureError> {
        float(v)
    }

    fn serialize_char(self, v: char) -> Result<Payload, SignatureError> {
        Ok(Payload::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Payload, SignatureError> {
        Ok(Payload::String(v.to_string()))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Payload, SignatureError> {
        Err(unsupported("byte array"))
    }

    fn serialize_none(self) -> Result<Payload, SignatureError> {
        Ok(Payload::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Payload, SignatureError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Payload, SignatureError> {
        Ok(Payload::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Payload, SignatureError> {
        Ok(Payload::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<Payload, SignatureError> {
        Ok(Payload::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Payload, SignatureError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Payload, SignatureError> {
        Ok(tagged(variant, value.serialize(PayloadSerializer)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec, SignatureError> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec, SignatureError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeVec, SignatureError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant, SignatureError> {
        Ok(SerializeTupleVariant {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeObject, SignatureError> {
        Ok(SerializeObject {
            map: BTreeMap::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SerializeObject, SignatureError> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<SerializeStructVariant, SignatureError> {
        Ok(SerializeStructVariant {
            variant,
            map: BTreeMap::new(),
        })
    }
}

pub(crate) struct SerializeVec {
    items: Vec<Payload>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SignatureError> {
        self.items.push(value.serialize(PayloadSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Payload, SignatureError> {
        Ok(Payload::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SignatureError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Payload, SignatureError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SignatureError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Payload, SignatureError> {
        ser::SerializeSeq::end(self)
    }
}

pub(crate) struct SerializeTupleVariant {
    variant: &'static str,
    items: Vec<Payload>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SignatureError> {
        self.items.push(value.serialize(PayloadSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Payload, SignatureError> {
        Ok(tagged(self.variant, Payload::Array(self.items)))
    }
}

pub(crate) struct SerializeObject {
    map: BTreeMap<String, Payload>,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeObject {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), SignatureError> {
        self.next_key = Some(key.serialize(KeySerializer)?);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SignatureError> {
        let key = self.next_key.take().ok_or_else(|| {
            SignatureError::Serialization("map value serialized before its key".into())
        })?;
        self.map.insert(key, value.serialize(PayloadSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Payload, SignatureError> {
        Ok(Payload::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeObject {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SignatureError> {
        self.map
            .insert(key.to_string(), value.serialize(PayloadSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Payload, SignatureError> {
        Ok(Payload::Object(self.map))
    }
}

pub(crate) struct SerializeStructVariant {
    variant: &'static str,
    map: BTreeMap<String, Payload>,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Payload;
    type Error = SignatureError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SignatureError> {
        self.map
            .insert(key.to_string(), value.serialize(PayloadSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Payload, SignatureError> {
        Ok(tagged(self.variant, Payload::Object(self.map)))
    }
}

struct KeySerializer;

impl ser::Serializer for KeySerializer {
    type Ok = String;
    type Error = SignatureError;

    type SerializeSeq = Impossible<String, SignatureError>;
    type SerializeTuple = Impossible<String, SignatureError>;
    type SerializeTupleStruct = Impossible<String, SignatureError>;
    type SerializeTupleVariant = Impossible<String, SignatureError>;
    type SerializeMap = Impossible<String, SignatureError>;
    type SerializeStruct = Impossible<String, SignatureError>;
    type SerializeStructVariant = Impossible<String, SignatureError>;

    fn serialize_str(self, v: &str) -> Result<String, SignatureError> {
        Ok(v.to_string())
    }

    fn serialize_char(self, v: char) -> Result<String, SignatureError> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _index: u32,
        variant: &'static str,
    ) -> Result<String, SignatureError> {
        Ok(variant.to_string())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, SignatureError> {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, SignatureError> {
        Err(non_string_key("bool"))
    }

    fn serialize_i8(self, _v: i8) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_i16(self, _v: i16) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_i32(self, _v: i32) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_i64(self, _v: i64) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_i128(self, _v: i128) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_u8(self, _v: u8) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_u16(self, _v: u16) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_u32(self, _v: u32) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_u64(self, _v: u64) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_u128(self, _v: u128) -> Result<String, SignatureError> {
        Err(non_string_key("integer"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, SignatureError> {
        Err(non_string_key("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, SignatureError> {
        Err(non_string_key("float"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, SignatureError> {
        Err(non_string_key("bytes"))
    }

    fn serialize_none(self) -> Result<String, SignatureError> {
        Err(non_string_key("null"))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<String, SignatureError> {
        Err(non_string_key("option"))
    }

    fn serialize_unit(self) -> Result<String, SignatureError> {
        Err(non_string_key("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, SignatureError> {
        Err(non_string_key("unit struct"))
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, SignatureError> {
        Err(non_string_key("enum variant"))
    }

    fn serialize_seq(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeSeq, SignatureError> {
        Err(non_string_key("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, SignatureError> {
        Err(non_string_key("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, SignatureError> {
        Err(non_string_key("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, SignatureError> {
        Err(non_string_key("enum variant"))
    }

    fn serialize_map(
        self,
        _len: Option<usize>,
    ) -> Result<Self::SerializeMap, SignatureError> {
        Err(non_string_key("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, SignatureError> {
        Err(non_string_key("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, SignatureError> {
        Err(non_string_key("enum variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Number, Payload};
    use crate::error::SignatureError;
    use serde::Serialize;
    use std::collections::{BTreeMap, HashMap};

    #[derive(Serialize)]
    struct Transaction {
        id: &'static str,
        amount: u32,
        status: Status,
        memo: Option<String>,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
    enum Status {
        Success,
    }

    #[test]
    fn struct_becomes_sorted_object() {
        let tx = Transaction {
            id: "tx-1",
            amount: 10,
            status: Status::Success,
            memo: None,
        };
        let p = Payload::from_serialize(&tx).unwrap();
        let Payload::Object(map) = p else {
            panic!("expected object");
        };
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, ["amount", "id", "memo", "status"]);
        assert_eq!(map["status"], Payload::String("SUCCESS".into()));
        assert_eq!(map["memo"], Payload::Null);
    }

    #[test]
    fn integer_key_rejected() {
        let mut m = HashMap::new();
        m.insert(1u32, "one");
        let err = Payload::from_serialize(&m).unwrap_err();
        assert!(matches!(err, SignatureError::Serialization(msg) if msg.contains("integer")));
    }

    #[test]
    fn nested_non_string_key_rejected() {
        let mut inner = BTreeMap::new();
        inner.insert(true, 1);
        let mut outer = BTreeMap::new();
        outer.insert("outer", vec![inner]);
        assert!(matches!(
            Payload::from_serialize(&outer),
            Err(SignatureError::Serialization(_))
        ));
    }

    #[test]
    fn bytes_rejected() {
        let blob = serde_bytes_like(&[1, 2, 3]);
        assert!(matches!(
            Payload::from_serialize(&blob),
            Err(SignatureError::Serialization(_))
        ));
    }

    #[test]
    fn non_finite_float_rejected() {
        assert!(Payload::from_serialize(&f64::NAN).is_err());
        assert!(Payload::from_serialize(&f64::INFINITY).is_err());
        assert_eq!(
            Payload::from_serialize(&2.5f64).unwrap(),
            Payload::Number(Number::Float(2.5))
        );
    }

    #[test]
    fn u128_out_of_range_rejected() {
        assert!(Payload::from_serialize(&u128::MAX).is_err());
        assert_eq!(
            Payload::from_serialize(&(u64::MAX as u128)).unwrap(),
            Payload::Number(Number::Integer(u64::MAX.into()))
        );
    }

    #[test]
    fn char_and_unit_variant_keys_accepted() {
        #[derive(Serialize, PartialEq, Eq, PartialOrd, Ord)]
        enum Side {
            Buy,
        }
        let mut m = BTreeMap::new();
        m.insert(Side::Buy, 'x');
        let p = Payload::from_serialize(&m).unwrap();
        assert_eq!(p.get("Buy"), Some(&Payload::String("x".into())));
    }

    struct Bytes<'a>(&'a [u8]);

    impl Serialize for Bytes<'_> {
        fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(self.0)
        }
    }

    fn serde_bytes_like(b: &[u8]) -> Bytes<'_> {
        Bytes(b)
    }
}
