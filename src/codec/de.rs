//! Lenient `serde` deserializer over an owned [`Value`].
//!
//! Behaves like `serde_json::from_value` except for scalar hints:
//!
//! - integer hints accept numeric strings and floats without a fractional part
//! - float hints accept numeric strings
//! - bool hints accept `"true"` / `"false"` in any ASCII case
//! - string hints accept numbers and booleans in their textual form
//!
//! The leniency applies at every depth, so a plain `#[derive(Deserialize)]` struct accepts
//! `{"id":"456"}` for an `i64` field.

use serde::de::{
    self, DeserializeOwned, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Unexpected,
    Visitor,
};
use serde::forward_to_deserialize_any;
use serde_json::{Error, Map, Number, Value};

/// Decode `T` from `value` with scalar leniency.
pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T, Error> {
    T::deserialize(Lenient(value))
}

/// `true` / `false` in any ASCII case.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    if text.eq_ignore_ascii_case("true") {
        Some(true)
    } else if text.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Integral value of a float without a fractional part, when it fits `i64`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn whole_float(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64)
        .then_some(f as i64)
}

struct Lenient(Value);

fn visit_number<'de, V: Visitor<'de>>(n: &Number, visitor: V) -> Result<V::Value, Error> {
    if let Some(u) = n.as_u64() {
        visitor.visit_u64(u)
    } else if let Some(i) = n.as_i64() {
        visitor.visit_i64(i)
    } else {
        visitor.visit_f64(n.as_f64().unwrap_or(f64::NAN))
    }
}

impl Lenient {
    fn integer<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::String(text) => {
                let trimmed = text.trim();
                if let Ok(i) = trimmed.parse::<i64>() {
                    visitor.visit_i64(i)
                } else if let Ok(u) = trimmed.parse::<u64>() {
                    visitor.visit_u64(u)
                } else {
                    Err(de::Error::invalid_value(Unexpected::Str(&text), &visitor))
                }
            }
            Value::Number(n) if n.is_f64() => {
                let f = n.as_f64().unwrap_or(f64::NAN);
                match whole_float(f) {
                    Some(i) => visitor.visit_i64(i),
                    None => visitor.visit_f64(f),
                }
            }
            other => Lenient(other).deserialize_any(visitor),
        }
    }

    fn float<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::String(text) => match text.trim().parse::<f64>() {
                Ok(f) => visitor.visit_f64(f),
                Err(_) => Err(de::Error::invalid_value(Unexpected::Str(&text), &visitor)),
            },
            other => Lenient(other).deserialize_any(visitor),
        }
    }

    fn text<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Number(n) => visitor.visit_string(n.to_string()),
            Value::Bool(b) => visitor.visit_string(b.to_string()),
            other => Lenient(other).deserialize_any(visitor),
        }
    }
}

macro_rules! integer_hints {
    ($($method:ident)*) => {
        $(
            fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
                self.integer(visitor)
            }
        )*
    };
}

impl<'de> Deserializer<'de> for Lenient {
    type Error = Error;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_unit(),
            Value::Bool(b) => visitor.visit_bool(b),
            Value::Number(n) => visit_number(&n, visitor),
            Value::String(s) => visitor.visit_string(s),
            Value::Array(items) => visitor.visit_seq(LenientSeq {
                items: items.into_iter(),
            }),
            Value::Object(map) => visitor.visit_map(LenientMap {
                entries: map.into_iter(),
                value: None,
            }),
        }
    }

    integer_hints! {
        deserialize_i8 deserialize_i16 deserialize_i32 deserialize_i64 deserialize_i128
        deserialize_u8 deserialize_u16 deserialize_u32 deserialize_u64 deserialize_u128
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.float(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.float(visitor)
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::String(text) => match parse_bool(&text) {
                Some(b) => visitor.visit_bool(b),
                None => Err(de::Error::invalid_value(Unexpected::Str(&text), &visitor)),
            },
            other => Lenient(other).deserialize_any(visitor),
        }
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.text(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        self.text(visitor)
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, Error> {
        match self.0 {
            Value::Null => visitor.visit_none(),
            other => visitor.visit_some(Lenient(other)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, Error> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        name: &'static str,
        variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Error> {
        self.0.deserialize_enum(name, variants, visitor)
    }

    forward_to_deserialize_any! {
        char bytes byte_buf unit unit_struct seq tuple tuple_struct map struct identifier
        ignored_any
    }
}

struct LenientSeq {
    items: std::vec::IntoIter<Value>,
}

impl<'de> SeqAccess<'de> for LenientSeq {
    type Error = Error;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, Error> {
        self.items
            .next()
            .map(|item| seed.deserialize(Lenient(item)))
            .transpose()
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.items.len())
    }
}

struct LenientMap {
    entries: <Map<String, Value> as IntoIterator>::IntoIter,
    value: Option<Value>,
}

impl<'de> MapAccess<'de> for LenientMap {
    type Error = Error;

    fn next_key_seed<K: DeserializeSeed<'de>>(&mut self, seed: K) -> Result<Option<K::Value>, Error> {
        match self.entries.next() {
            Some((key, value)) => {
                self.value = Some(value);
                seed.deserialize(Lenient(Value::String(key))).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, Error> {
        match self.value.take() {
            Some(value) => seed.deserialize(Lenient(value)),
            None => Err(de::Error::custom("map value requested before its key")),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Plain {
        id: i64,
        ratio: f32,
        active: bool,
        label: String,
        parent: Option<u32>,
        tags: Vec<u8>,
    }

    #[test]
    fn test_scalars_accept_text() {
        let plain: Plain = from_value(json!({
            "id": "456",
            "ratio": "0.5",
            "active": "TRUE",
            "label": 7,
            "parent": "12",
            "tags": ["1", 2, 3.0]
        }))
        .unwrap();
        assert_eq!(
            plain,
            Plain {
                id: 456,
                ratio: 0.5,
                active: true,
                label: "7".to_string(),
                parent: Some(12),
                tags: vec![1, 2, 3],
            }
        );
    }

    #[test]
    fn test_native_values_still_work() {
        let plain: Plain = from_value(json!({
            "id": -4,
            "ratio": 1,
            "active": false,
            "label": "x",
            "parent": null,
            "tags": []
        }))
        .unwrap();
        assert_eq!(plain.id, -4);
        assert!((plain.ratio - 1.0).abs() < f32::EPSILON);
        assert_eq!(plain.parent, None);
    }

    #[test]
    fn test_invalid_text_still_fails() {
        let err = from_value::<Plain>(json!({
            "id": "abc", "ratio": 0, "active": true, "label": "", "parent": null, "tags": []
        }))
        .unwrap_err();
        assert!(err.to_string().contains("abc"), "{err}");

        assert!(from_value::<u8>(json!("300")).is_err());
        assert!(from_value::<i64>(json!(1.5)).is_err());
        assert!(from_value::<bool>(json!("yes")).is_err());
    }

    #[test]
    fn test_integer_map_keys_and_enums() {
        #[derive(Debug, Deserialize, PartialEq)]
        enum Size {
            #[serde(rename = "big")]
            Big,
            #[serde(rename = "small")]
            Small,
        }

        let sizes: HashMap<u16, Size> = from_value(json!({ "1": "big", "2": "small" })).unwrap();
        assert_eq!(sizes[&1], Size::Big);
        assert_eq!(sizes[&2], Size::Small);
    }

    #[test]
    fn test_whole_float() {
        assert_eq!(whole_float(5.0), Some(5));
        assert_eq!(whole_float(-2.0), Some(-2));
        assert_eq!(whole_float(5.5), None);
        assert_eq!(whole_float(f64::INFINITY), None);
    }
}
