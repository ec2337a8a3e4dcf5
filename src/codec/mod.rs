//! # Codec Module
//!
//! The structured-decoding collaborator used by the body binder.
//!
//! [`StructuredCodec`] exposes the two operations the binder relies on:
//! parsing text into a type and converting an already structured value into a type.
//! [`JsonCodec`] implements both with `serde_json`.
//!
//! ## Decoding rules of [`JsonCodec`]
//!
//! - JSON `null` decodes to [`BoundValue::Null`] for every type
//! - Numbers decode into numeric kinds when they fit the declared width
//! - A JSON string decodes into a primitive, enumeration or custom type through the
//!   textual coercer, so `"456"` is a valid `Long`
//! - An integral kind accepts a number without a fractional part, so `5.0` is a valid `Long`
//! - Objects decode through the declared type's `serde` implementation, driven by a lenient
//!   deserializer: numeric and boolean fields also accept their textual form at any depth
//! - Lists decode element by element, preserving source order; a failing element is
//!   reported with its position

mod de;

pub(crate) use de::{from_value, parse_bool};

use crate::coerce;
use crate::error::DecodeError;
use crate::types::SemanticType;
use crate::value::BoundValue;
use serde_json::Value;

/// Structured-decoding collaborator.
pub trait StructuredCodec: Send + Sync {
    /// Parse `text` and decode it into `ty`.
    fn parse_text_to_type(&self, text: &str, ty: &SemanticType) -> Result<BoundValue, DecodeError>;

    /// Decode an already structured value into `ty`.
    fn convert_structure_to_type(&self, value: &Value, ty: &SemanticType) -> Result<BoundValue, DecodeError>;
}

/// `serde_json` backed codec.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonCodec;

impl StructuredCodec for JsonCodec {
    fn parse_text_to_type(&self, text: &str, ty: &SemanticType) -> Result<BoundValue, DecodeError> {
        let value: Value = serde_json::from_str(text)?;
        decode(value, ty)
    }

    fn convert_structure_to_type(&self, value: &Value, ty: &SemanticType) -> Result<BoundValue, DecodeError> {
        decode(value.clone(), ty)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn mismatch(ty: &SemanticType, value: &Value) -> DecodeError {
    DecodeError::TypeMismatch {
        expected: ty.name(),
        found: json_kind(value),
    }
}

fn integral<T: TryFrom<i64>>(value: &Value, ty: &SemanticType) -> Result<T, DecodeError> {
    value
        .as_i64()
        .or_else(|| value.as_f64().and_then(de::whole_float))
        .and_then(|n| T::try_from(n).ok())
        .ok_or_else(|| mismatch(ty, value))
}

fn decode(value: Value, ty: &SemanticType) -> Result<BoundValue, DecodeError> {
    if value.is_null() {
        return Ok(BoundValue::Null);
    }

    // String scalars go through the textual coercer, like path and query values
    if let Value::String(text) = &value {
        if ty.is_primitive() || matches!(ty, SemanticType::Enum(_) | SemanticType::Custom(_)) {
            return Ok(coerce::to_value(Some(text.as_str()), ty)?);
        }
    }

    match ty {
        SemanticType::Bool => value.as_bool().map(BoundValue::Bool).ok_or_else(|| mismatch(ty, &value)),
        SemanticType::Byte => integral(&value, ty).map(BoundValue::Byte),
        SemanticType::Short => integral(&value, ty).map(BoundValue::Short),
        SemanticType::Int => integral(&value, ty).map(BoundValue::Int),
        SemanticType::Long => integral(&value, ty).map(BoundValue::Long),
        // Narrowing to f32 follows the usual float conversion
        #[allow(clippy::cast_possible_truncation)]
        SemanticType::Float => value
            .as_f64()
            .map(|f| BoundValue::Float(f as f32))
            .ok_or_else(|| mismatch(ty, &value)),
        SemanticType::Double => value.as_f64().map(BoundValue::Double).ok_or_else(|| mismatch(ty, &value)),
        SemanticType::String => match value {
            Value::String(s) => Ok(BoundValue::Str(s)),
            Value::Number(n) => Ok(BoundValue::Str(n.to_string())),
            Value::Bool(b) => Ok(BoundValue::Str(b.to_string())),
            other => Err(mismatch(ty, &other)),
        },
        SemanticType::Enum(_) | SemanticType::Custom(_) => Err(mismatch(ty, &value)),
        SemanticType::Object(object) => Ok(BoundValue::Object(object.decode(value)?)),
        SemanticType::Json => Ok(BoundValue::Json(value)),
        SemanticType::List(element) => match value {
            Value::Array(items) => items
                .into_iter()
                .enumerate()
                .map(|(index, item)| {
                    decode(item, element).map_err(|e| DecodeError::Element {
                        index,
                        source: Box::new(e),
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map(BoundValue::List),
            other => Err(mismatch(ty, &other)),
        },
        SemanticType::Context => Err(DecodeError::Unsupported { target: ty.name() }),
    }
}
