//! Binds body-sourced parameters.
//!
//! A raw-body parameter receives the payload verbatim. A structured-body parameter is
//! decoded into its exact declared type by a [`StructuredCodec`]; a decoding failure is a
//! [`BindingError`] that aborts the invocation. The parameter is never left out, which
//! would shift every later argument out of position.

use crate::codec::StructuredCodec;
use crate::error::BindingError;
use crate::request::RequestBody;
use crate::types::SemanticType;
use crate::value::BoundValue;
use tracing::debug;

/// Pass the body through unmodified.
#[must_use]
pub fn bind_raw(body: &RequestBody) -> BoundValue {
    match body {
        RequestBody::Empty => BoundValue::Null,
        RequestBody::Text(text) => BoundValue::Str(text.clone()),
        RequestBody::Structured(value) => BoundValue::Json(value.clone()),
    }
}

/// Decode the body into `ty`.
///
/// Text is parsed then decoded; an already structured body is converted in place; an
/// empty body binds `Null`.
///
/// # Errors
///
/// Returns [`BindingError`] carrying the parameter position when the codec fails.
pub fn bind_structured(
    codec: &dyn StructuredCodec,
    index: usize,
    body: &RequestBody,
    ty: &SemanticType,
) -> Result<BoundValue, BindingError> {
    let decoded = match body {
        RequestBody::Empty => return Ok(BoundValue::Null),
        RequestBody::Text(text) => codec.parse_text_to_type(text, ty),
        RequestBody::Structured(value) => codec.convert_structure_to_type(value, ty),
    };

    decoded.map_err(|source| {
        debug!(
            param_index = index,
            target_type = %ty,
            error = %source,
            "Body decoding failed"
        );
        BindingError {
            index,
            target: ty.name(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::JsonCodec;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Entity {
        id: i64,
    }

    #[test]
    fn test_raw_is_verbatim() {
        let text = " {\"id\": 1}\n";
        assert_eq!(bind_raw(&RequestBody::Text(text.into())).as_str(), Some(text));
        assert_eq!(
            bind_raw(&RequestBody::Structured(json!({"a": 1}))).as_json(),
            Some(&json!({"a": 1}))
        );
        assert!(bind_raw(&RequestBody::Empty).is_null());
    }

    #[test]
    fn test_structured_text_and_value() {
        let ty = SemanticType::object::<Entity>();
        let from_text =
            bind_structured(&JsonCodec, 0, &RequestBody::Text("{\"id\":3}".into()), &ty).unwrap();
        assert_eq!(from_text.downcast_ref::<Entity>().unwrap().id, 3);
        let from_value =
            bind_structured(&JsonCodec, 0, &RequestBody::Structured(json!({"id": 4})), &ty).unwrap();
        assert_eq!(from_value.downcast_ref::<Entity>().unwrap().id, 4);
    }

    #[test]
    fn test_empty_body_binds_null() {
        let ty = SemanticType::object::<Entity>();
        assert!(bind_structured(&JsonCodec, 0, &RequestBody::Empty, &ty).unwrap().is_null());
    }

    #[test]
    fn test_failure_carries_position() {
        let ty = SemanticType::object::<Entity>();
        let err = bind_structured(&JsonCodec, 2, &RequestBody::Text("{\"id\":\"x\"}".into()), &ty)
            .unwrap_err();
        assert_eq!(err.index, 2);
        assert_eq!(err.target, "Entity");
    }
}
