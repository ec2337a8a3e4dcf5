//! # Source Module
//!
//! Decides, per declared parameter, which part of the request supplies its raw value.
//!
//! ## Precedence
//!
//! First match wins:
//!
//! 1. Explicit `Path` annotation: `path_parameters[name]`
//! 2. Explicit `Query` annotation: `query_params[name]`
//! 3. Explicit `Header` annotation: `request_headers[name]`
//! 4. No annotation, the handler consumes `application/json` and the declared type is
//!    exactly `String`: the raw body, unmodified ([`SourceKind::BodyRaw`])
//! 5. No annotation and the declared type is the execution context
//!    ([`SourceKind::Context`])
//! 6. Anything else is decoded from the body ([`SourceKind::BodyJson`])
//!
//! A missing key at steps 1-3 is not an error; the raw value is simply absent.
//!
//! The kind depends only on the parameter and the consumed media types, so
//! [`HandlerDescriptor`](crate::descriptor::HandlerDescriptor) classifies every parameter
//! once at build time. [`fetch`] then reads the per-request raw value.

use crate::descriptor::{consumes_json, ParameterLocation, ParameterSpec};
use crate::request::{RequestBody, RequestContext};
use std::fmt;

/// Where a parameter's raw value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Path,
    Query,
    Header,
    /// Raw request body, passed through verbatim
    BodyRaw,
    /// Request body decoded into the declared type
    BodyJson,
    /// Host execution context
    Context,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Path => write!(f, "PATH"),
            SourceKind::Query => write!(f, "QUERY"),
            SourceKind::Header => write!(f, "HEADER"),
            SourceKind::BodyRaw => write!(f, "BODY_RAW"),
            SourceKind::BodyJson => write!(f, "BODY_JSON"),
            SourceKind::Context => write!(f, "CONTEXT"),
        }
    }
}

/// Raw value fetched for one parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue<'r> {
    /// Path, query or header text; `None` when the key is absent
    Text(Option<&'r str>),
    /// Body to pass through unmodified
    RawBody(&'r RequestBody),
    /// Body to decode into the declared type
    StructuredBody(&'r RequestBody),
    /// Placeholder for the host execution context, supplied by the invoker
    Context,
}

/// Classify a parameter by the precedence rules.
#[must_use]
pub fn classify(param: &ParameterSpec, consumes: &[String]) -> SourceKind {
    match param.location {
        Some(ParameterLocation::Path) => SourceKind::Path,
        Some(ParameterLocation::Query) => SourceKind::Query,
        Some(ParameterLocation::Header) => SourceKind::Header,
        None if consumes_json(consumes) && param.ty.is_string() => SourceKind::BodyRaw,
        None if param.ty.is_context() => SourceKind::Context,
        None => SourceKind::BodyJson,
    }
}

/// Read the raw value for an already classified parameter.
#[must_use]
pub fn fetch<'r>(kind: SourceKind, param: &ParameterSpec, request: &'r RequestContext) -> RawValue<'r> {
    let name = param.name.as_deref();
    match kind {
        SourceKind::Path => RawValue::Text(name.and_then(|n| request.path_param(n))),
        SourceKind::Query => RawValue::Text(name.and_then(|n| request.query_param(n))),
        SourceKind::Header => RawValue::Text(name.and_then(|n| request.header(n))),
        SourceKind::BodyRaw => RawValue::RawBody(&request.request_body),
        SourceKind::BodyJson => RawValue::StructuredBody(&request.request_body),
        SourceKind::Context => RawValue::Context,
    }
}

/// Classify and fetch in one step.
#[must_use]
pub fn resolve<'r>(
    param: &ParameterSpec,
    consumes: &[String],
    request: &'r RequestContext,
) -> (SourceKind, RawValue<'r>) {
    let kind = classify(param, consumes);
    (kind, fetch(kind, param, request))
}
