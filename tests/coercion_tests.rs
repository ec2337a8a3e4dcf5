//! Tests for textual coercion through the public API
//!
//! # Test Coverage
//!
//! - Primitive literals coerce to the value a direct parse yields; booleans ignore ASCII case
//! - A missing value coerces to `Null` for every target
//! - Strategy order for custom types: string constructor, then `valueOf`, then `fromString`
//! - A mechanism that exists and fails is reported, never skipped
//! - Types without mechanisms bind the raw string only when they accept one

use brrtbind::coerce::{to_value, Coercion, STRATEGIES};
use brrtbind::types::{CustomType, EnumType};
use brrtbind::{BoundValue, CoercionError, SemanticType};
use std::net::Ipv4Addr;

fn all_targets() -> Vec<SemanticType> {
    vec![
        SemanticType::Bool,
        SemanticType::Byte,
        SemanticType::Short,
        SemanticType::Int,
        SemanticType::Long,
        SemanticType::Float,
        SemanticType::Double,
        SemanticType::String,
        SemanticType::Enum(EnumType::new("Size", ["big", "small"])),
        SemanticType::Custom(CustomType::new("Opaque")),
        SemanticType::Json,
        SemanticType::list_of(SemanticType::Int),
    ]
}

#[test]
fn test_missing_value_is_null_for_every_target() {
    for target in all_targets() {
        let value = to_value(None, &target).unwrap();
        assert!(value.is_null(), "{target} should bind null");
    }
}

#[test]
fn test_primitives_match_direct_parse() {
    for literal in ["0", "-1", "127", "42"] {
        assert_eq!(
            to_value(Some(literal), &SemanticType::Byte).unwrap().as_i64(),
            Some(i64::from(literal.parse::<i8>().unwrap()))
        );
        assert_eq!(
            to_value(Some(literal), &SemanticType::Long).unwrap().as_i64(),
            Some(literal.parse::<i64>().unwrap())
        );
    }
    for literal in ["1.5", "-0.25", "1e3"] {
        assert_eq!(
            to_value(Some(literal), &SemanticType::Double).unwrap().as_f64(),
            Some(literal.parse::<f64>().unwrap())
        );
    }
    for literal in ["true", "false", "TRUE", "False", "tRuE"] {
        assert_eq!(
            to_value(Some(literal), &SemanticType::Bool).unwrap().as_bool(),
            Some(literal.to_ascii_lowercase().parse::<bool>().unwrap())
        );
    }
}

#[test]
fn test_out_of_range_is_malformed() {
    let err = to_value(Some("128"), &SemanticType::Byte).unwrap_err();
    assert!(matches!(err, CoercionError::Malformed { .. }), "{err:?}");
    for literal in ["yes", "1", "t", ""] {
        let err = to_value(Some(literal), &SemanticType::Bool).unwrap_err();
        assert!(matches!(err, CoercionError::Malformed { .. }), "{err:?}");
    }
}

#[test]
fn test_enum_is_exact() {
    let size = SemanticType::Enum(EnumType::new("Size", ["big", "small"]));
    let value = to_value(Some("small"), &size).unwrap();
    assert_eq!(value.as_variant(), Some("small"));

    let err = to_value(Some("BIG"), &size).unwrap_err();
    match err {
        CoercionError::Rejected { strategy, .. } => assert_eq!(strategy, "valueOf"),
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[test]
fn test_parsed_custom_type() {
    let addr = SemanticType::Custom(CustomType::parsed::<Ipv4Addr>());
    let value = to_value(Some("10.0.0.1"), &addr).unwrap();
    assert_eq!(value.downcast_ref::<Ipv4Addr>(), Some(&Ipv4Addr::new(10, 0, 0, 1)));

    let err = to_value(Some("10.0.0"), &addr).unwrap_err();
    assert!(matches!(err, CoercionError::Rejected { strategy: "string-constructor", .. }));
}

#[test]
fn test_strategy_order() {
    let tagged = CustomType::new("Tagged")
        .with_value_of(|raw| Ok(BoundValue::Str(format!("valueOf:{raw}"))))
        .with_from_string(|raw| Ok(BoundValue::Str(format!("fromString:{raw}"))));
    let target = SemanticType::Custom(tagged);
    assert_eq!(to_value(Some("x"), &target).unwrap().as_str(), Some("valueOf:x"));

    let names: Vec<_> = STRATEGIES.iter().map(|s| s.name).collect();
    assert_eq!(names, ["string-constructor", "valueOf", "fromString"]);
    assert!(matches!(
        STRATEGIES[0].apply("x", &target).unwrap(),
        Coercion::NotApplicable
    ));
}

#[test]
fn test_failing_mechanism_is_not_swallowed() {
    let strict = CustomType::new("Strict")
        .with_constructor(|_| Err(anyhow::anyhow!("constructor refused")))
        .with_from_string(|raw| Ok(BoundValue::Str(raw.to_string())));
    let err = to_value(Some("x"), &SemanticType::Custom(strict)).unwrap_err();
    assert!(err.to_string().contains("constructor refused"), "{err}");
}

#[test]
fn test_identity_fallback_only_for_string_types() {
    let opaque = SemanticType::Custom(CustomType::new("Opaque"));
    let err = to_value(Some("x"), &opaque).unwrap_err();
    assert!(matches!(err, CoercionError::Unsupported { .. }));

    let text_like = SemanticType::Custom(CustomType::new("TextLike").accepting_strings());
    assert_eq!(to_value(Some("x"), &text_like).unwrap().as_str(), Some("x"));
    assert_eq!(to_value(Some("x"), &SemanticType::String).unwrap().as_str(), Some("x"));
}

#[test]
fn test_list_from_comma_separated_text() {
    let ints = SemanticType::list_of(SemanticType::Int);
    let value = to_value(Some("3,1,2"), &ints).unwrap();
    let items: Vec<_> = value.as_list().unwrap().iter().filter_map(BoundValue::as_i64).collect();
    assert_eq!(items, vec![3, 1, 2]);

    assert!(to_value(Some(""), &ints).unwrap().as_list().unwrap().is_empty());
    assert!(to_value(Some("1,x"), &ints).is_err());
}
