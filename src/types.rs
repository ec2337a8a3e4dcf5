//! # Semantic Types
//!
//! Declared parameter types, expressed as data instead of runtime reflection.
//!
//! A [`SemanticType`] tells the binder how a raw value becomes a handler argument:
//!
//! - Primitive numeric and boolean kinds parse with their canonical `FromStr` rule
//! - [`EnumType`] exposes a `valueOf` mechanism that selects a constant by exact name
//! - [`CustomType`] exposes any subset of the three textual conversion mechanisms
//!   (string constructor, `valueOf`, `fromString`)
//! - [`ObjectType`] decodes a structured body into a concrete `serde` type
//! - [`SemanticType::List`] is a first-class container of one element type, decoded
//!   element by element
//!
//! ## Example
//!
//! ```rust
//! use brrtbind::types::{EnumType, SemanticType};
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Entity {
//!     id: i64,
//!     query1: String,
//! }
//!
//! let size = SemanticType::Enum(EnumType::new("EntityType", ["big", "small"]));
//! let batch = SemanticType::list_of(SemanticType::object::<Entity>());
//! assert_eq!(batch.name(), "List<Entity>");
//! assert!(!size.is_primitive());
//! ```

use crate::value::{BoundValue, EnumVariant};
use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Textual conversion mechanism exposed by a target type.
pub type TextParser = Arc<dyn Fn(&str) -> anyhow::Result<BoundValue> + Send + Sync>;

/// Decoder from a structured value into a concrete object.
pub type ObjectDecoder =
    Arc<dyn Fn(Value) -> Result<Box<dyn Any + Send>, serde_json::Error> + Send + Sync>;

/// The three textual conversion mechanisms a type may expose, in lookup order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mechanism {
    /// Construction from a single string argument
    StringConstructor,
    /// Static `valueOf(String)` factory; enumerations expose this
    ValueOf,
    /// Static `fromString(String)` factory
    FromString,
}

/// Declared type of a handler parameter.
#[derive(Clone)]
pub enum SemanticType {
    Bool,
    /// 8-bit signed integer
    Byte,
    /// 16-bit signed integer
    Short,
    /// 32-bit signed integer
    Int,
    /// 64-bit signed integer
    Long,
    Float,
    Double,
    String,
    Enum(EnumType),
    Custom(CustomType),
    Object(ObjectType),
    /// Untyped structured value
    Json,
    /// Generic container of one element type
    List(Box<SemanticType>),
    /// The host's injectable execution context
    Context,
}

impl SemanticType {
    #[must_use]
    pub fn list_of(element: SemanticType) -> Self {
        SemanticType::List(Box::new(element))
    }

    #[must_use]
    pub fn object<T: DeserializeOwned + Send + 'static>() -> Self {
        SemanticType::Object(ObjectType::of::<T>())
    }

    /// Primitive numeric or boolean kind.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            SemanticType::Bool
                | SemanticType::Byte
                | SemanticType::Short
                | SemanticType::Int
                | SemanticType::Long
                | SemanticType::Float
                | SemanticType::Double
        )
    }

    /// Exactly the string type; custom string-accepting types do not count.
    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, SemanticType::String)
    }

    #[must_use]
    pub fn is_context(&self) -> bool {
        matches!(self, SemanticType::Context)
    }

    /// Whether an unconverted raw string is a valid value of this type.
    #[must_use]
    pub fn accepts_string(&self) -> bool {
        match self {
            SemanticType::String | SemanticType::Json => true,
            SemanticType::Custom(custom) => custom.accepts_string,
            _ => false,
        }
    }

    /// Human-readable type name, e.g. `List<Entity>`.
    #[must_use]
    pub fn name(&self) -> String {
        match self {
            SemanticType::Bool => "bool".to_string(),
            SemanticType::Byte => "i8".to_string(),
            SemanticType::Short => "i16".to_string(),
            SemanticType::Int => "i32".to_string(),
            SemanticType::Long => "i64".to_string(),
            SemanticType::Float => "f32".to_string(),
            SemanticType::Double => "f64".to_string(),
            SemanticType::String => "String".to_string(),
            SemanticType::Enum(e) => e.name.to_string(),
            SemanticType::Custom(c) => c.name.to_string(),
            SemanticType::Object(o) => o.name.to_string(),
            SemanticType::Json => "Json".to_string(),
            SemanticType::List(element) => format!("List<{}>", element.name()),
            SemanticType::Context => "ExecutionContext".to_string(),
        }
    }

    /// Run `mechanism` on `raw` if this type exposes it.
    ///
    /// `None` means the mechanism does not exist on the type. `Some(Err(_))` means it exists
    /// and rejected the value.
    #[must_use]
    pub fn convert_with(&self, mechanism: Mechanism, raw: &str) -> Option<anyhow::Result<BoundValue>> {
        match (self, mechanism) {
            (SemanticType::Enum(e), Mechanism::ValueOf) => Some(e.value_of(raw)),
            (SemanticType::Custom(c), mechanism) => c.mechanism(mechanism).map(|parse| parse(raw)),
            _ => None,
        }
    }
}

impl fmt::Debug for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Enumeration with a fixed set of constant names.
#[derive(Debug, Clone)]
pub struct EnumType {
    name: Arc<str>,
    variants: Arc<[Arc<str>]>,
}

impl EnumType {
    pub fn new<I, S>(name: &str, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: Arc::from(name),
            variants: variants.into_iter().map(|v| Arc::from(v.as_ref())).collect(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variants(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|v| &**v)
    }

    /// Select the constant named exactly `literal` (case-sensitive).
    pub fn value_of(&self, literal: &str) -> anyhow::Result<BoundValue> {
        self.variants
            .iter()
            .find(|v| &***v == literal)
            .map(|v| {
                BoundValue::Variant(EnumVariant {
                    type_name: Arc::clone(&self.name),
                    name: Arc::clone(v),
                })
            })
            .ok_or_else(|| anyhow!("no enum constant {}.{}", self.name, literal))
    }
}

/// Type converted from text by its own mechanisms.
#[derive(Clone)]
pub struct CustomType {
    name: Arc<str>,
    constructor: Option<TextParser>,
    value_of: Option<TextParser>,
    from_string: Option<TextParser>,
    accepts_string: bool,
}

impl CustomType {
    /// A custom type exposing no mechanisms yet.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: Arc::from(name),
            constructor: None,
            value_of: None,
            from_string: None,
            accepts_string: false,
        }
    }

    /// A custom type whose string constructor is `T::from_str`.
    #[must_use]
    pub fn parsed<T>() -> Self
    where
        T: FromStr + Send + 'static,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        Self::new(short_type_name::<T>()).with_constructor(|raw| {
            let value = raw.parse::<T>()?;
            Ok(BoundValue::Custom(Box::new(value)))
        })
    }

    #[must_use]
    pub fn with_constructor<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<BoundValue> + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_value_of<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<BoundValue> + Send + Sync + 'static,
    {
        self.value_of = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_from_string<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<BoundValue> + Send + Sync + 'static,
    {
        self.from_string = Some(Arc::new(f));
        self
    }

    /// Mark the type as a string supertype: when no mechanism applies, the raw string is
    /// bound unchanged.
    #[must_use]
    pub fn accepting_strings(mut self) -> Self {
        self.accepts_string = true;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn mechanism(&self, mechanism: Mechanism) -> Option<&TextParser> {
        match mechanism {
            Mechanism::StringConstructor => self.constructor.as_ref(),
            Mechanism::ValueOf => self.value_of.as_ref(),
            Mechanism::FromString => self.from_string.as_ref(),
        }
    }
}

impl fmt::Debug for CustomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomType")
            .field("name", &self.name)
            .field("constructor", &self.constructor.is_some())
            .field("value_of", &self.value_of.is_some())
            .field("from_string", &self.from_string.is_some())
            .field("accepts_string", &self.accepts_string)
            .finish()
    }
}

/// Structured type decoded through `serde`.
#[derive(Clone)]
pub struct ObjectType {
    name: &'static str,
    decode: ObjectDecoder,
}

impl ObjectType {
    #[must_use]
    pub fn of<T: DeserializeOwned + Send + 'static>() -> Self {
        Self {
            name: short_type_name::<T>(),
            decode: Arc::new(|value: Value| -> Result<Box<dyn Any + Send>, serde_json::Error> {
                let decoded: T = crate::codec::from_value(value)?;
                Ok(Box::new(decoded) as Box<dyn Any + Send>)
            }),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn decode(&self, value: Value) -> Result<Box<dyn Any + Send>, serde_json::Error> {
        (self.decode)(value)
    }
}

impl fmt::Debug for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectType").field("name", &self.name).finish()
    }
}

/// Last path segment of a type name, generics included.
fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let end = full.find('<').unwrap_or(full.len());
    match full[..end].rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Entity {
        id: i64,
    }

    #[test]
    fn test_enum_value_of_exact_name() {
        let e = EnumType::new("EntityType", ["big", "small"]);
        let v = e.value_of("big").unwrap();
        assert_eq!(v.as_variant(), Some("big"));
    }

    #[test]
    fn test_enum_value_of_is_case_sensitive() {
        let e = EnumType::new("EntityType", ["big", "small"]);
        let err = e.value_of("BIG").unwrap_err();
        assert_eq!(err.to_string(), "no enum constant EntityType.BIG");
    }

    #[test]
    fn test_object_type_name_and_decode() {
        let ty = ObjectType::of::<Entity>();
        assert_eq!(ty.name(), "Entity");
        let decoded = ty.decode(serde_json::json!({"id": 7})).unwrap();
        assert_eq!(decoded.downcast_ref::<Entity>().unwrap().id, 7);
        let decoded = ty.decode(serde_json::json!({"id": "8"})).unwrap();
        assert_eq!(decoded.downcast_ref::<Entity>().unwrap().id, 8);
    }

    #[test]
    fn test_string_carrying_types() {
        assert!(SemanticType::String.accepts_string());
        assert!(SemanticType::Json.accepts_string());
        assert!(SemanticType::Custom(CustomType::new("Alias").accepting_strings()).accepts_string());
        assert!(!SemanticType::Long.accepts_string());
        assert!(!SemanticType::list_of(SemanticType::String).accepts_string());
        assert!(!SemanticType::object::<Entity>().accepts_string());
    }

    #[test]
    fn test_list_name_is_nested() {
        let ty = SemanticType::list_of(SemanticType::list_of(SemanticType::Long));
        assert_eq!(ty.name(), "List<List<i64>>");
    }

    #[test]
    fn test_mechanism_absent_on_primitive() {
        assert!(SemanticType::Long
            .convert_with(Mechanism::ValueOf, "1")
            .is_none());
    }

    #[test]
    fn test_parsed_custom_type_exposes_constructor_only() {
        let ty = SemanticType::Custom(CustomType::parsed::<std::net::IpAddr>());
        assert!(ty.convert_with(Mechanism::StringConstructor, "127.0.0.1").is_some());
        assert!(ty.convert_with(Mechanism::ValueOf, "127.0.0.1").is_none());
        assert!(ty.convert_with(Mechanism::FromString, "127.0.0.1").is_none());
        assert_eq!(ty.name(), "IpAddr");
    }
}
