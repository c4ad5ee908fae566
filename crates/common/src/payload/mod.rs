mod ser;

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::SignatureError;

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Payload>),
    Object(BTreeMap<String, Payload>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i128),
    Float(f64),
}

impl Payload {
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, SignatureError> {
        value.serialize(ser::PayloadSerializer)
    }

    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Payload)>,
        K: Into<String>,
    {
        Self::Object(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn array<I: IntoIterator<Item = Payload>>(items: I) -> Self {
        Self::Array(items.into_iter().collect())
    }

    pub fn get(&self, key: &str) -> Option<&Payload> {
        match self {
            Self::Object(map) => map.get(key),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Payload {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(Number::from(&n)),
            Value::String(s) => Self::String(s),
            Value::Array(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<&serde_json::Number> for Number {
    fn from(n: &serde_json::Number) -> Self {
        if let Some(i) = n.as_i64() {
            Self::Integer(i.into())
        } else if let Some(u) = n.as_u64() {
            Self::Integer(u.into())
        } else {
            Self::Float(n.as_f64().expect("non-integer serde_json numbers are f64"))
        }
    }
}

impl From<bool> for Payload {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Payload {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Payload {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i32> for Payload {
    fn from(v: i32) -> Self {
        Self::Number(Number::Integer(v.into()))
    }
}

impl From<i64> for Payload {
    fn from(v: i64) -> Self {
        Self::Number(Number::Integer(v.into()))
    }
}

impl From<u64> for Payload {
    fn from(v: u64) -> Self {
        Self::Number(Number::Integer(v.into()))
    }
}

impl From<f64> for Payload {
    fn from(v: f64) -> Self {
        Self::Number(Number::Float(v))
    }
}

impl From<Vec<Payload>> for Payload {
    fn from(items: Vec<Payload>) -> Self {
        Self::Array(items)
    }
}

impl From<BTreeMap<String, Payload>> for Payload {
    fn from(map: BTreeMap<String, Payload>) -> Self {
        Self::Object(map)
    }
}

impl<T: Into<Payload>> From<Option<T>> for Payload {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (k, v) in map {
                    out.serialize_entry(k, v)?;
                }
                out.end()
            }
        }
    }
}

impl Serialize for Number {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Integer(i) => {
                if let Ok(v) = i64::try_from(i) {
                    serializer.serialize_i64(v)
                } else if let Ok(v) = u64::try_from(i) {
                    serializer.serialize_u64(v)
                } else {
                    serializer.serialize_i128(i)
                }
            }
            Self::Float(f) => serializer.serialize_f64(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    #[test]
    fn from_json_value_keeps_number_kinds() {
        let p = Payload::from(json!({"int": 100, "float": 100.0, "big": u64::MAX}));
        assert_eq!(p.get("int"), Some(&Payload::Number(Number::Integer(100))));
        assert_eq!(p.get("float"), Some(&Payload::Number(Number::Float(100.0))));
        assert_eq!(
            p.get("big"),
            Some(&Payload::Number(Number::Integer(u64::MAX.into())))
        );
    }

    #[test]
    fn json_integers_past_u64_arrive_as_floats() {
        let v: serde_json::Value = serde_json::from_str("18446744073709551616").unwrap();
        assert_eq!(
            Payload::from(v),
            Payload::Number(Number::Float(18446744073709551616.0))
        );
    }

    #[test]
    fn object_builder_ignores_insertion_order() {
        let a = Payload::object([("currency", "USD".into()), ("amount", 100.into())]);
        let b = Payload::object([("amount", 100.into()), ("currency", "USD".into())]);
        assert_eq!(a, b);
    }

    #[test]
    fn from_serialize_matches_json_value_conversion() {
        let mut labels = HashMap::new();
        labels.insert("b", vec![1, 2]);
        labels.insert("a", vec![]);
        let direct = Payload::from_serialize(&labels).unwrap();
        let via_value = Payload::from(serde_json::to_value(&labels).unwrap());
        assert_eq!(direct, via_value);
    }

    #[test]
    fn payload_serializes_back_to_json() {
        let p = Payload::object([
            ("z", Payload::Null),
            ("a", Payload::array([true.into(), 1.5.into()])),
        ]);
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            r#"{"a":[true,1.5],"z":null}"#
        );
    }

    #[test]
    fn option_maps_none_to_null() {
        assert_eq!(Payload::from(None::<&str>), Payload::Null);
        assert_eq!(Payload::from(Some("x")), Payload::String("x".into()));
    }
}
