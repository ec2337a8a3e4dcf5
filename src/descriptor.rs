//! # Descriptor Module
//!
//! Immutable metadata describing a selected handler: the callable, its ordered parameter
//! specs and the media types it consumes.
//!
//! A descriptor is built once per handler signature and shared across every invocation
//! (`Clone` is an `Arc` bump). Building it classifies each parameter's
//! [`SourceKind`](crate::source::SourceKind), so no metadata is derived per request.
//!
//! ## Example
//!
//! ```rust
//! use brrtbind::descriptor::{HandlerDescriptor, Invocable, ParameterSpec};
//! use brrtbind::response::HandlerResponse;
//! use brrtbind::source::SourceKind;
//! use brrtbind::types::SemanticType;
//! use brrtbind::value::Arguments;
//!
//! #[derive(Default)]
//! struct EntityController;
//!
//! impl EntityController {
//!     fn get_entity(&mut self, args: Arguments) -> anyhow::Result<HandlerResponse> {
//!         let id = args.get(0).and_then(|v| v.as_i64()).unwrap_or_default();
//!         Ok(HandlerResponse::json(200, serde_json::json!({ "id": id })))
//!     }
//! }
//!
//! let descriptor = HandlerDescriptor::builder(
//!     "get_entity",
//!     Invocable::new("get_entity", EntityController::get_entity),
//! )
//! .param(ParameterSpec::path("id", SemanticType::Long))
//! .build();
//!
//! assert_eq!(descriptor.plan(), &[SourceKind::Path]);
//! ```

use crate::response::HandlerResponse;
use crate::source::{self, SourceKind};
use crate::types::SemanticType;
use crate::value::Arguments;
use http::Method;
use std::fmt;
use std::sync::Arc;

/// JSON media type; consuming it turns unannotated `String` parameters into raw body
/// pass-through.
pub const APPLICATION_JSON: &str = "application/json";

/// Whether any consumed media type is JSON, ignoring parameters and case.
#[must_use]
pub fn consumes_json(consumes: &[String]) -> bool {
    consumes.iter().any(|media_type| {
        media_type
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(APPLICATION_JSON))
    })
}

/// Explicit source annotation on a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "Path"),
            ParameterLocation::Query => write!(f, "Query"),
            ParameterLocation::Header => write!(f, "Header"),
        }
    }
}

/// One declared handler parameter.
#[derive(Debug, Clone)]
pub struct ParameterSpec {
    /// Lookup name for path, query and header sources
    pub name: Option<String>,
    /// Declared type
    pub ty: SemanticType,
    /// Explicit source annotation, at most one
    pub location: Option<ParameterLocation>,
}

impl ParameterSpec {
    #[must_use]
    pub fn path(name: impl Into<String>, ty: SemanticType) -> Self {
        Self::annotated(ParameterLocation::Path, name, ty)
    }

    #[must_use]
    pub fn query(name: impl Into<String>, ty: SemanticType) -> Self {
        Self::annotated(ParameterLocation::Query, name, ty)
    }

    #[must_use]
    pub fn header(name: impl Into<String>, ty: SemanticType) -> Self {
        Self::annotated(ParameterLocation::Header, name, ty)
    }

    #[must_use]
    pub fn annotated(location: ParameterLocation, name: impl Into<String>, ty: SemanticType) -> Self {
        Self {
            name: Some(name.into()),
            ty,
            location: Some(location),
        }
    }

    /// Parameter without a source annotation: bound from the body or the context.
    #[must_use]
    pub fn unannotated(ty: SemanticType) -> Self {
        Self {
            name: None,
            ty,
            location: None,
        }
    }

    /// Parameter receiving the host execution context.
    #[must_use]
    pub fn context() -> Self {
        Self::unannotated(SemanticType::Context)
    }

    /// Name for logs and errors; `#index` when the parameter is unnamed.
    #[must_use]
    pub fn display_name(&self, index: usize) -> String {
        self.name.clone().unwrap_or_else(|| format!("#{index}"))
    }
}

/// A handler instance ready to receive its bound arguments.
///
/// Implemented for every instance built by [`Invocable`]; hosts with hand-written
/// handlers can implement it directly and use [`Invocable::from_constructor`].
pub trait ResourceMethod: Send {
    /// Call the designated method with the full argument list.
    fn call(&mut self, args: Arguments) -> anyhow::Result<HandlerResponse>;
}

type Constructor = dyn Fn() -> anyhow::Result<Box<dyn ResourceMethod>> + Send + Sync;

/// Callable handle: how to construct a fresh handler and which method to call.
#[derive(Clone)]
pub struct Invocable {
    handler_type: &'static str,
    method_name: Arc<str>,
    construct: Arc<Constructor>,
}

struct BoundMethod<H, F> {
    instance: H,
    method: Arc<F>,
}

impl<H, F> ResourceMethod for BoundMethod<H, F>
where
    H: Send,
    F: Fn(&mut H, Arguments) -> anyhow::Result<HandlerResponse> + Send + Sync,
{
    fn call(&mut self, args: Arguments) -> anyhow::Result<HandlerResponse> {
        (self.method)(&mut self.instance, args)
    }
}

impl Invocable {
    /// Handler constructed with `H::default()` for every invocation.
    pub fn new<H, F>(method_name: &str, method: F) -> Self
    where
        H: Default + Send + 'static,
        F: Fn(&mut H, Arguments) -> anyhow::Result<HandlerResponse> + Send + Sync + 'static,
    {
        Self::with_constructor(method_name, || Ok(H::default()), method)
    }

    /// Handler built by a fallible no-argument constructor for every invocation.
    pub fn with_constructor<H, C, F>(method_name: &str, construct: C, method: F) -> Self
    where
        H: Send + 'static,
        C: Fn() -> anyhow::Result<H> + Send + Sync + 'static,
        F: Fn(&mut H, Arguments) -> anyhow::Result<HandlerResponse> + Send + Sync + 'static,
    {
        let method = Arc::new(method);
        let construct = move || -> anyhow::Result<Box<dyn ResourceMethod>> {
            let instance = construct()?;
            Ok(Box::new(BoundMethod {
                instance,
                method: Arc::clone(&method),
            }))
        };
        Self {
            handler_type: std::any::type_name::<H>(),
            method_name: Arc::from(method_name),
            construct: Arc::new(construct),
        }
    }

    /// Handler implementing [`ResourceMethod`] itself.
    pub fn from_constructor<R, C>(method_name: &str, construct: C) -> Self
    where
        R: ResourceMethod + 'static,
        C: Fn() -> anyhow::Result<R> + Send + Sync + 'static,
    {
        Self {
            handler_type: std::any::type_name::<R>(),
            method_name: Arc::from(method_name),
            construct: Arc::new(move || {
                construct().map(|r| Box::new(r) as Box<dyn ResourceMethod>)
            }),
        }
    }

    #[must_use]
    pub fn handler_type(&self) -> &'static str {
        self.handler_type
    }

    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Construct a fresh handler instance.
    pub fn instantiate(&self) -> anyhow::Result<Box<dyn ResourceMethod>> {
        (self.construct)()
    }
}

impl fmt::Debug for Invocable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.handler_type, self.method_name)
    }
}

/// Immutable handler metadata shared across invocations.
#[derive(Clone)]
pub struct HandlerDescriptor {
    inner: Arc<DescriptorInner>,
}

struct DescriptorInner {
    handler_name: String,
    invocable: Invocable,
    parameters: Vec<ParameterSpec>,
    consumes: Vec<String>,
    plan: Vec<SourceKind>,
    method: Option<Method>,
    path_template: Option<String>,
}

impl HandlerDescriptor {
    #[must_use]
    pub fn builder(handler_name: impl Into<String>, invocable: Invocable) -> DescriptorBuilder {
        DescriptorBuilder {
            handler_name: handler_name.into(),
            invocable,
            parameters: Vec::new(),
            consumes: Vec::new(),
            method: None,
            path_template: None,
        }
    }

    #[must_use]
    pub fn handler_name(&self) -> &str {
        &self.inner.handler_name
    }

    #[must_use]
    pub fn invocable(&self) -> &Invocable {
        &self.inner.invocable
    }

    /// Parameters in declared signature order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.inner.parameters
    }

    #[must_use]
    pub fn consumes(&self) -> &[String] {
        &self.inner.consumes
    }

    /// Source kind of each parameter, aligned with [`parameters`](Self::parameters).
    #[must_use]
    pub fn plan(&self) -> &[SourceKind] {
        &self.inner.plan
    }

    #[must_use]
    pub fn method(&self) -> Option<&Method> {
        self.inner.method.as_ref()
    }

    #[must_use]
    pub fn path_template(&self) -> Option<&str> {
        self.inner.path_template.as_deref()
    }
}

impl fmt::Debug for HandlerDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerDescriptor")
            .field("handler_name", &self.inner.handler_name)
            .field("invocable", &self.inner.invocable)
            .field("parameters", &self.inner.parameters)
            .field("consumes", &self.inner.consumes)
            .field("plan", &self.inner.plan)
            .finish()
    }
}

/// Builder for [`HandlerDescriptor`].
pub struct DescriptorBuilder {
    handler_name: String,
    invocable: Invocable,
    parameters: Vec<ParameterSpec>,
    consumes: Vec<String>,
    method: Option<Method>,
    path_template: Option<String>,
}

impl DescriptorBuilder {
    /// Append the next parameter of the signature.
    #[must_use]
    pub fn param(mut self, spec: ParameterSpec) -> Self {
        self.parameters.push(spec);
        self
    }

    #[must_use]
    pub fn consumes(mut self, media_type: impl Into<String>) -> Self {
        self.consumes.push(media_type.into());
        self
    }

    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn path_template(mut self, template: impl Into<String>) -> Self {
        self.path_template = Some(template.into());
        self
    }

    #[must_use]
    pub fn build(self) -> HandlerDescriptor {
        let plan = self
            .parameters
            .iter()
            .map(|p| source::classify(p, &self.consumes))
            .collect();
        HandlerDescriptor {
            inner: Arc::new(DescriptorInner {
                handler_name: self.handler_name,
                invocable: self.invocable,
                parameters: self.parameters,
                consumes: self.consumes,
                plan,
                method: self.method,
                path_template: self.path_template,
            }),
        }
    }
}
