//! Argument decoding.
//!
//! Arguments arrive as transport-level payload strings. An
//! [`ArgumentDecoder`] turns each payload into a [`Value`] before the target
//! member is invoked. [`JsonDecoder`] reads JSON:
//!
//! | JSON | Value |
//! |------|-------|
//! | `null` | `None` |
//! | `true` / `false` | `Integer(1)` / `Integer(0)` |
//! | integer | `Integer` (must fit in `i64`) |
//! | number with fraction or exponent | `Float` |
//! | string | `Text` |
//! | array | list `Sequence` |
//! | object | `Mapping` with `Text` keys |

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::error::InvokeError;
use crate::value::{Mapping, Sequence, Value};

/// Turns a payload string into a value.
pub trait ArgumentDecoder {
    /// Decodes one payload. Failures are reported as
    /// [`InvokeError::MalformedArgument`].
    fn decode(&self, payload: &str) -> Result<Value, InvokeError>;
}

/// Decodes JSON payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecoder;

impl ArgumentDecoder for JsonDecoder {
    fn decode(&self, payload: &str) -> Result<Value, InvokeError> {
        Ok(serde_json::from_str::<Value>(payload)?)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor)
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an argument value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Self::Value, E> {
        Ok(Value::Integer(i64::from(v)))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Value::Integer(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        i64::try_from(v)
            .map(Value::Integer)
            .map_err(|_| E::custom(format!("integer {} does not fit in 64 signed bits", v)))
    }

    fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E> {
        Ok(Value::Text(v.to_owned()))
    }

    fn visit_string<E>(self, v: String) -> Result<Self::Value, E> {
        Ok(Value::Text(v))
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Value::None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E> {
        Ok(Value::None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element::<Value>()? {
            items.push(item);
        }
        Ok(Value::Sequence(Sequence::list(items)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mapping = Mapping::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            mapping.insert(Value::Text(key), value);
        }
        Ok(Value::Mapping(mapping))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(payload: &str) -> Value {
        JsonDecoder.decode(payload).unwrap()
    }

    #[test]
    fn test_decode_scalars() {
        assert_eq!(decode("42"), Value::Integer(42));
        assert_eq!(decode("-3"), Value::Integer(-3));
        assert_eq!(decode("2.5"), Value::Float(2.5));
        assert_eq!(decode("\"hi\""), Value::from("hi"));
        assert_eq!(decode("null"), Value::None);
        assert_eq!(decode("true"), Value::Integer(1));
        assert_eq!(decode("false"), Value::Integer(0));
    }

    #[test]
    fn test_decode_array_as_list() {
        let Value::Sequence(sequence) = decode("[1, \"a\", null]") else {
            panic!("expected a sequence");
        };
        assert_eq!(sequence.kind().tag(), "list");
        assert_eq!(
            sequence.items(),
            vec![Value::Integer(1), Value::from("a"), Value::None]
        );
    }

    #[test]
    fn test_decode_object_as_mapping() {
        let Value::Mapping(mapping) = decode(r#"{"b": [1], "a": {"c": 2}}"#) else {
            panic!("expected a mapping");
        };
        assert_eq!(mapping.len(), 2);
        assert!(matches!(mapping.get(&Value::from("b")), Some(Value::Sequence(_))));
        assert!(matches!(mapping.get(&Value::from("a")), Some(Value::Mapping(_))));
    }

    #[test]
    fn test_decode_out_of_range_integer() {
        let err = JsonDecoder.decode("18446744073709551615").unwrap_err();
        assert_eq!(err.kind(), "MalformedArgument");
        assert!(err.to_string().contains("does not fit"));
    }

    #[test]
    fn test_decode_malformed_payload() {
        let err = JsonDecoder.decode("[1,").unwrap_err();
        assert!(matches!(err, InvokeError::MalformedArgument { .. }));
        assert!(JsonDecoder.decode("not json").is_err());
    }
}
