//! # Coerce Module
//!
//! Converts a single textual value (path, query or header) into a handler parameter's
//! declared [`SemanticType`](crate::types::SemanticType).
//!
//! ## Rules
//!
//! 1. An absent value always becomes [`BoundValue::Null`](crate::value::BoundValue::Null),
//!    whatever the target type.
//! 2. Primitive numeric kinds use the canonical `FromStr` parse of that width. Booleans
//!    accept `true` and `false` in any ASCII case. A malformed literal is a
//!    [`CoercionError::Malformed`](crate::error::CoercionError).
//! 3. Any other type walks the ordered [`STRATEGIES`] table:
//!    string constructor, then `valueOf`, then `fromString`. The first strategy whose
//!    mechanism exists on the target wins.
//! 4. When no mechanism exists the raw string is bound unchanged, provided the target
//!    accepts a string.
//!
//! ## Applicability versus failure
//!
//! A strategy whose mechanism does not exist reports [`Coercion::NotApplicable`] and the
//! walk continues. A strategy whose mechanism exists but rejects the value stops the walk
//! with [`CoercionError::Rejected`](crate::error::CoercionError). An unknown enumeration
//! constant is therefore an error, never a silent null.
//!
//! ```rust
//! use brrtbind::coerce::to_value;
//! use brrtbind::types::{EnumType, SemanticType};
//!
//! let size = SemanticType::Enum(EnumType::new("EntityType", ["big", "small"]));
//! assert_eq!(to_value(Some("big"), &size).unwrap().as_variant(), Some("big"));
//! assert!(to_value(Some("huge"), &size).is_err());
//! assert!(to_value(None, &size).unwrap().is_null());
//! ```

mod core;

pub use core::{to_value, Coercion, Strategy, STRATEGIES};
