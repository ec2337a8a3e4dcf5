//! Error taxonomy of the binding and invocation engine.
//!
//! Binding-phase errors ([`CoercionError`], [`BindingError`], [`InstantiationError`]) are
//! raised before any argument reaches the handler. [`HandlerInvocationError`] is raised only
//! by the handler's own logic. [`InvokeError`] unifies all four so the response renderer can
//! tell a bad request from a handler failure.

use thiserror::Error;

/// A textual value could not be converted to its target type.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// A primitive literal failed its canonical parse rule.
    #[error("cannot parse {value:?} as {target}: {reason}")]
    Malformed {
        /// Target type name
        target: String,
        /// Raw textual value
        value: String,
        /// Parser message
        reason: String,
    },

    /// A conversion mechanism exists on the target type and rejected the value.
    #[error("{strategy} of {target} rejected {value:?}: {source}")]
    Rejected {
        /// Name of the strategy whose mechanism failed
        strategy: &'static str,
        /// Target type name
        target: String,
        /// Raw textual value
        value: String,
        /// Error raised by the mechanism
        source: anyhow::Error,
    },

    /// No mechanism applies and the target type does not accept a raw string.
    #[error("{target} has no textual conversion for {value:?}")]
    Unsupported {
        /// Target type name
        target: String,
        /// Raw textual value
        value: String,
    },
}

/// The structured-decoding collaborator could not produce the requested type.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed payload or serde data mismatch.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The payload's shape does not match the requested type.
    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        /// Requested type name
        expected: String,
        /// JSON kind actually found
        found: &'static str,
    },

    /// A container element failed to decode.
    #[error("element {index}: {source}")]
    Element {
        /// Position of the element in the source container
        index: usize,
        /// Element failure
        source: Box<DecodeError>,
    },

    /// A string scalar could not be coerced into the requested type.
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// The requested type cannot come from a request body at all.
    #[error("{target} cannot be decoded from a request body")]
    Unsupported {
        /// Requested type name
        target: String,
    },
}

/// A body-sourced parameter could not be decoded.
///
/// Always aborts the invocation: a parameter is never dropped from the argument list.
#[derive(Debug, Error)]
#[error("parameter #{index} ({target}) could not be decoded from the request body: {source}")]
pub struct BindingError {
    /// Position of the parameter in the handler signature
    pub index: usize,
    /// Declared type name
    pub target: String,
    /// Decoding failure reported by the codec
    pub source: DecodeError,
}

/// The handler could not be default-constructed.
#[derive(Debug, Error)]
#[error("cannot instantiate handler {handler}: {source}")]
pub struct InstantiationError {
    /// Handler type name
    pub handler: &'static str,
    /// Constructor failure
    pub source: anyhow::Error,
}

/// The handler's own logic failed during the call.
#[derive(Debug, Error)]
#[error("handler {handler}::{method} failed: {cause}")]
pub struct HandlerInvocationError {
    /// Handler type name
    pub handler: &'static str,
    /// Handler method name
    pub method: String,
    /// Whether the failure was a panic rather than a returned error
    pub panicked: bool,
    /// Original cause, preserved as raised by the handler
    #[source]
    pub cause: anyhow::Error,
}

/// Any failure of [`Invoker::invoke`](crate::invoker::Invoker::invoke).
#[derive(Debug, Error)]
pub enum InvokeError {
    /// A path, query or header value could not be coerced.
    #[error("parameter #{index} `{name}`: {source}")]
    Coercion {
        /// Position of the parameter in the handler signature
        index: usize,
        /// Declared parameter name
        name: String,
        /// Coercion failure
        source: CoercionError,
    },

    #[error(transparent)]
    Binding(#[from] BindingError),

    #[error(transparent)]
    Instantiation(#[from] InstantiationError),

    #[error(transparent)]
    Handler(#[from] HandlerInvocationError),
}

impl InvokeError {
    /// True for failures detected before the handler was called.
    #[must_use]
    pub fn is_binding_phase(&self) -> bool {
        !matches!(self, InvokeError::Handler(_))
    }

    /// Status hint for the response renderer: 400 for bad input, 500 otherwise.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            InvokeError::Coercion { .. } | InvokeError::Binding(_) => 400,
            InvokeError::Instantiation(_) | InvokeError::Handler(_) => 500,
        }
    }
}
