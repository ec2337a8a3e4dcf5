//! Coerce core module - textual values into declared types.
//!
//! Runs once per textual parameter on the binding path. Primitive kinds parse directly;
//! everything else walks [`STRATEGIES`] in order.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::unnecessary_to_owned)]

use crate::codec::parse_bool;
use crate::error::CoercionError;
use crate::types::{Mechanism, SemanticType};
use crate::value::BoundValue;
use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;
use tracing::{debug, trace};

/// Outcome of one strategy that did not fail.
#[derive(Debug)]
pub enum Coercion {
    /// The target type does not expose this strategy's mechanism
    NotApplicable,
    /// The mechanism produced a value
    Converted(BoundValue),
}

/// Named textual conversion strategy backed by one [`Mechanism`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategy {
    pub name: &'static str,
    pub mechanism: Mechanism,
}

/// Strategy lookup order for non-primitive targets.
pub static STRATEGIES: [Strategy; 3] = [
    Strategy {
        name: "string-constructor",
        mechanism: Mechanism::StringConstructor,
    },
    Strategy {
        name: "valueOf",
        mechanism: Mechanism::ValueOf,
    },
    Strategy {
        name: "fromString",
        mechanism: Mechanism::FromString,
    },
];

impl Strategy {
    /// Apply this strategy to `raw`.
    ///
    /// # Errors
    ///
    /// Returns [`CoercionError::Rejected`] when the mechanism exists and fails.
    pub fn apply(&self, raw: &str, target: &SemanticType) -> Result<Coercion, CoercionError> {
        match target.convert_with(self.mechanism, raw) {
            None => Ok(Coercion::NotApplicable),
            Some(Ok(value)) => Ok(Coercion::Converted(value)),
            Some(Err(source)) => Err(CoercionError::Rejected {
                strategy: self.name,
                target: target.name(),
                value: raw.to_owned(),
                source,
            }),
        }
    }
}

/// Convert an optional textual value into `target`.
///
/// # Errors
///
/// - [`CoercionError::Malformed`] for an invalid primitive literal
/// - [`CoercionError::Rejected`] when a conversion mechanism rejects the value
/// - [`CoercionError::Unsupported`] when nothing applies and `target` does not accept a string
pub fn to_value(raw: Option<&str>, target: &SemanticType) -> Result<BoundValue, CoercionError> {
    let Some(raw) = raw else {
        return Ok(BoundValue::Null);
    };

    match target {
        SemanticType::Bool => parse_bool(raw).map(BoundValue::Bool).ok_or_else(|| {
            CoercionError::Malformed {
                target: target.name(),
                value: raw.to_owned(),
                reason: "expected `true` or `false`".to_owned(),
            }
        }),
        SemanticType::Byte => parse(raw, target).map(BoundValue::Byte),
        SemanticType::Short => parse(raw, target).map(BoundValue::Short),
        SemanticType::Int => parse(raw, target).map(BoundValue::Int),
        SemanticType::Long => parse(raw, target).map(BoundValue::Long),
        SemanticType::Float => parse(raw, target).map(BoundValue::Float),
        SemanticType::Double => parse(raw, target).map(BoundValue::Double),
        SemanticType::String => Ok(BoundValue::Str(raw.to_owned())),
        SemanticType::Json => Ok(BoundValue::Json(Value::String(raw.to_owned()))),
        // Simple-style array: comma separated, order preserved
        SemanticType::List(element) => {
            if raw.is_empty() {
                return Ok(BoundValue::List(Vec::new()));
            }
            raw.split(',')
                .map(|item| to_value(Some(item), element))
                .collect::<Result<Vec<_>, _>>()
                .map(BoundValue::List)
        }
        _ => by_strategy(raw, target),
    }
}

fn parse<T>(raw: &str, target: &SemanticType) -> Result<T, CoercionError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.parse::<T>().map_err(|e| CoercionError::Malformed {
        target: target.name(),
        value: raw.to_owned(),
        reason: e.to_string(),
    })
}

fn by_strategy(raw: &str, target: &SemanticType) -> Result<BoundValue, CoercionError> {
    for strategy in &STRATEGIES {
        match strategy.apply(raw, target)? {
            Coercion::Converted(value) => {
                debug!(
                    target_type = %target,
                    strategy = strategy.name,
                    "Textual value converted"
                );
                return Ok(value);
            }
            Coercion::NotApplicable => {
                trace!(
                    target_type = %target,
                    strategy = strategy.name,
                    "Strategy not applicable"
                );
            }
        }
    }

    if target.accepts_string() {
        return Ok(BoundValue::Str(raw.to_owned()));
    }

    Err(CoercionError::Unsupported {
        target: target.name(),
        value: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CustomType, EnumType};
    use anyhow::anyhow;
    use std::net::IpAddr;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_primitives_match_direct_parse() {
        assert_eq!(to_value(Some("123"), &SemanticType::Long).unwrap().as_i64(), Some(123));
        assert_eq!(to_value(Some("-7"), &SemanticType::Int).unwrap().as_i64(), Some(-7));
        assert_eq!(to_value(Some("12"), &SemanticType::Short).unwrap().as_i64(), Some(12));
        assert_eq!(to_value(Some("-128"), &SemanticType::Byte).unwrap().as_i64(), Some(-128));
        assert_eq!(to_value(Some("true"), &SemanticType::Bool).unwrap().as_bool(), Some(true));
        assert_eq!(to_value(Some("2.5"), &SemanticType::Double).unwrap().as_f64(), Some(2.5));
        assert_eq!(to_value(Some("0.5"), &SemanticType::Float).unwrap().as_f64(), Some(0.5));
    }

    #[test]
    fn test_null_for_every_target() {
        let targets = [
            SemanticType::Bool,
            SemanticType::Long,
            SemanticType::String,
            SemanticType::Json,
            SemanticType::Enum(EnumType::new("E", ["a"])),
            SemanticType::Custom(CustomType::new("Opaque")),
            SemanticType::list_of(SemanticType::Int),
        ];
        for target in &targets {
            assert!(to_value(None, target).unwrap().is_null(), "{target}");
        }
    }

    #[test]
    fn test_malformed_primitive() {
        let err = to_value(Some("12x"), &SemanticType::Long).unwrap_err();
        assert!(matches!(err, CoercionError::Malformed { .. }));
        assert!(to_value(Some("300"), &SemanticType::Byte).is_err());
        assert!(to_value(Some("yes"), &SemanticType::Bool).is_err());
    }

    #[test]
    fn test_unknown_enum_constant_is_rejected() {
        let ty = SemanticType::Enum(EnumType::new("EntityType", ["big", "small"]));
        let err = to_value(Some("medium"), &ty).unwrap_err();
        match err {
            CoercionError::Rejected { strategy, .. } => assert_eq!(strategy, "valueOf"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_constructor_wins_over_factories() {
        let ty = SemanticType::Custom(
            CustomType::new("Tag")
                .with_constructor(|raw| Ok(BoundValue::Str(format!("ctor:{raw}"))))
                .with_value_of(|raw| Ok(BoundValue::Str(format!("valueOf:{raw}"))))
                .with_from_string(|raw| Ok(BoundValue::Str(format!("fromString:{raw}")))),
        );
        assert_eq!(to_value(Some("x"), &ty).unwrap().as_str(), Some("ctor:x"));
    }

    #[test]
    fn test_falls_through_to_from_string() {
        let ty = SemanticType::Custom(
            CustomType::new("Tag")
                .with_from_string(|raw| Ok(BoundValue::Str(raw.to_uppercase()))),
        );
        assert_eq!(to_value(Some("abc"), &ty).unwrap().as_str(), Some("ABC"));
    }

    #[test]
    fn test_rejection_is_not_swallowed() {
        let later = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later);
        let ty = SemanticType::Custom(
            CustomType::new("Strict")
                .with_constructor(|_| Err(anyhow!("bad literal")))
                .with_from_string(move |raw| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(BoundValue::Str(raw.to_owned()))
                }),
        );
        let err = to_value(Some("x"), &ty).unwrap_err();
        assert!(err.to_string().contains("bad literal"));
        assert_eq!(later.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_identity_fallback_only_for_string_types() {
        let lenient = SemanticType::Custom(CustomType::new("Alias").accepting_strings());
        assert_eq!(to_value(Some("v"), &lenient).unwrap().as_str(), Some("v"));

        let opaque = SemanticType::Custom(CustomType::new("Opaque"));
        assert!(matches!(
            to_value(Some("v"), &opaque).unwrap_err(),
            CoercionError::Unsupported { .. }
        ));
    }

    #[test]
    fn test_parsed_custom_type() {
        let ty = SemanticType::Custom(CustomType::parsed::<IpAddr>());
        let value = to_value(Some("10.0.0.1"), &ty).unwrap();
        assert_eq!(value.downcast_ref::<IpAddr>().unwrap().to_string(), "10.0.0.1");
        assert!(to_value(Some("not-an-ip"), &ty).is_err());
    }

    #[test]
    fn test_comma_separated_list() {
        let ty = SemanticType::list_of(SemanticType::Int);
        let value = to_value(Some("3,1,2"), &ty).unwrap();
        let items: Vec<i64> = value
            .as_list()
            .unwrap()
            .iter()
            .filter_map(BoundValue::as_i64)
            .collect();
        assert_eq!(items, vec![3, 1, 2]);
        assert!(to_value(Some(""), &ty).unwrap().as_list().unwrap().is_empty());
    }

    #[test]
    fn test_strategy_order() {
        let names: Vec<_> = STRATEGIES.iter().map(|s| s.name).collect();
        assert_eq!(names, ["string-constructor", "valueOf", "fromString"]);
    }
}
