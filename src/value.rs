//! Bound argument values.
//!
//! [`BoundValue`] is what one handler parameter receives after source resolution and
//! coercion or decoding. [`Arguments`] is the full positional list handed to the handler.
//! Its length always equals the descriptor's parameter count; absent values are
//! [`BoundValue::Null`], never skipped.

use crate::context::ExecutionContext;
use anyhow::anyhow;
use serde_json::Value;
use smallvec::SmallVec;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Maximum inline arguments before heap allocation.
/// Handler signatures rarely exceed eight parameters.
pub const MAX_INLINE_ARGUMENTS: usize = 8;

/// Selected constant of an enumeration type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    /// Name of the enumeration type
    pub type_name: Arc<str>,
    /// Name of the selected constant
    pub name: Arc<str>,
}

/// Value bound to one handler parameter.
pub enum BoundValue {
    /// Absent value: missing key, empty body, or JSON `null`
    Null,
    Bool(bool),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Str(String),
    Variant(EnumVariant),
    /// Untyped structured value (raw structured body or `SemanticType::Json`)
    Json(Value),
    /// Value produced by a custom type's textual conversion mechanism
    Custom(Box<dyn Any + Send>),
    /// Structured object decoded into its declared Rust type
    Object(Box<dyn Any + Send>),
    /// Generic container, element order preserved
    List(Vec<BoundValue>),
    /// The host execution context
    Context(Arc<ExecutionContext>),
}

impl BoundValue {
    /// Short label used in logs and error messages.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            BoundValue::Null => "null",
            BoundValue::Bool(_) => "bool",
            BoundValue::Byte(_) => "byte",
            BoundValue::Short(_) => "short",
            BoundValue::Int(_) => "int",
            BoundValue::Long(_) => "long",
            BoundValue::Float(_) => "float",
            BoundValue::Double(_) => "double",
            BoundValue::Str(_) => "string",
            BoundValue::Variant(_) => "enum",
            BoundValue::Json(_) => "json",
            BoundValue::Custom(_) => "custom",
            BoundValue::Object(_) => "object",
            BoundValue::List(_) => "list",
            BoundValue::Context(_) => "context",
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, BoundValue::Null)
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BoundValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integral value widened to `i64`.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BoundValue::Byte(v) => Some(i64::from(*v)),
            BoundValue::Short(v) => Some(i64::from(*v)),
            BoundValue::Int(v) => Some(i64::from(*v)),
            BoundValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// Floating point value widened to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            BoundValue::Float(v) => Some(f64::from(*v)),
            BoundValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BoundValue::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Name of the selected enumeration constant.
    #[must_use]
    pub fn as_variant(&self) -> Option<&str> {
        match self {
            BoundValue::Variant(v) => Some(&v.name),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            BoundValue::Json(v) => Some(v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[BoundValue]> {
        match self {
            BoundValue::List(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_context(&self) -> Option<&Arc<ExecutionContext>> {
        match self {
            BoundValue::Context(ctx) => Some(ctx),
            _ => None,
        }
    }

    /// Borrow a decoded object or custom value as its concrete type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            BoundValue::Object(v) | BoundValue::Custom(v) => v.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Move a decoded object or custom value out as its concrete type.
    ///
    /// Returns the value unchanged when it holds something else.
    pub fn downcast<T: Any>(self) -> Result<T, BoundValue> {
        match self {
            BoundValue::Object(v) => v.downcast::<T>().map(|b| *b).map_err(BoundValue::Object),
            BoundValue::Custom(v) => v.downcast::<T>().map(|b| *b).map_err(BoundValue::Custom),
            other => Err(other),
        }
    }
}

impl fmt::Debug for BoundValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundValue::Null => write!(f, "Null"),
            BoundValue::Bool(v) => write!(f, "Bool({v})"),
            BoundValue::Byte(v) => write!(f, "Byte({v})"),
            BoundValue::Short(v) => write!(f, "Short({v})"),
            BoundValue::Int(v) => write!(f, "Int({v})"),
            BoundValue::Long(v) => write!(f, "Long({v})"),
            BoundValue::Float(v) => write!(f, "Float({v})"),
            BoundValue::Double(v) => write!(f, "Double({v})"),
            BoundValue::Str(v) => write!(f, "Str({v:?})"),
            BoundValue::Variant(v) => write!(f, "Variant({}.{})", v.type_name, v.name),
            BoundValue::Json(v) => write!(f, "Json({v})"),
            BoundValue::Custom(_) => write!(f, "Custom(..)"),
            BoundValue::Object(_) => write!(f, "Object(..)"),
            BoundValue::List(items) => f.debug_tuple("List").field(items).finish(),
            BoundValue::Context(ctx) => write!(f, "Context({})", ctx.request_id),
        }
    }
}

/// Positional argument list passed to a handler method.
#[derive(Debug, Default)]
pub struct Arguments {
    values: SmallVec<[BoundValue; MAX_INLINE_ARGUMENTS]>,
}

impl Arguments {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            values: SmallVec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, value: BoundValue) {
        self.values.push(value);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&BoundValue> {
        self.values.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundValue> {
        self.values.iter()
    }

    /// Take the value at `index`, leaving `Null` in its place so positions never shift.
    pub fn take(&mut self, index: usize) -> anyhow::Result<BoundValue> {
        let slot = self
            .values
            .get_mut(index)
            .ok_or_else(|| anyhow!("no argument at position {index}"))?;
        Ok(std::mem::replace(slot, BoundValue::Null))
    }

    /// Take a decoded structured object of type `T`.
    pub fn take_object<T: Any>(&mut self, index: usize) -> anyhow::Result<T> {
        let value = self.take(index)?;
        let kind = value.kind();
        value.downcast::<T>().map_err(|_| {
            anyhow!(
                "argument {index} is {kind}, not {}",
                std::any::type_name::<T>()
            )
        })
    }

    /// Take a decoded list whose elements are objects of type `T`, in source order.
    pub fn take_list<T: Any>(&mut self, index: usize) -> anyhow::Result<Vec<T>> {
        match self.take(index)? {
            BoundValue::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(pos, item)| {
                    let kind = item.kind();
                    item.downcast::<T>().map_err(|_| {
                        anyhow!(
                            "element {pos} of argument {index} is {kind}, not {}",
                            std::any::type_name::<T>()
                        )
                    })
                })
                .collect(),
            other => Err(anyhow!("argument {index} is {}, not a list", other.kind())),
        }
    }
}

impl IntoIterator for Arguments {
    type Item = BoundValue;
    type IntoIter = smallvec::IntoIter<[BoundValue; MAX_INLINE_ARGUMENTS]>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.into_iter()
    }
}
