//! Invoker core module - hot path for binding and invocation.
//!
//! Every inbound request passes through [`Invoker::invoke`] once. Binding allocates only
//! the argument list and the decoded values themselves; handler and constructor panics
//! are contained here when `catch_panics` is enabled.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]

use crate::body;
use crate::codec::{JsonCodec, StructuredCodec};
use crate::coerce;
use crate::context::ExecutionContext;
use crate::descriptor::HandlerDescriptor;
use crate::error::{HandlerInvocationError, InstantiationError, InvokeError};
use crate::request::RequestContext;
use crate::response::HandlerResponse;
use crate::runtime_config::InvokerConfig;
use crate::source::{self, RawValue};
use crate::value::{Arguments, BoundValue};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Binding-and-invocation engine.
#[derive(Clone)]
pub struct Invoker {
    codec: Arc<dyn StructuredCodec>,
    config: InvokerConfig,
}

impl Default for Invoker {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker").field("config", &self.config).finish()
    }
}

impl Invoker {
    /// Invoker with the JSON codec and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(InvokerConfig::default())
    }

    /// Invoker configured from `BRRTBIND_*` environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::with_config(InvokerConfig::from_env())
    }

    #[must_use]
    pub fn with_config(config: InvokerConfig) -> Self {
        Self {
            codec: Arc::new(JsonCodec),
            config,
        }
    }

    /// Replace the structured-decoding collaborator.
    #[must_use]
    pub fn with_codec(mut self, codec: Arc<dyn StructuredCodec>) -> Self {
        self.codec = codec;
        self
    }

    #[must_use]
    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Bind every parameter of `descriptor` from `request`, in declared order.
    ///
    /// The returned list has exactly one entry per declared parameter.
    ///
    /// # Errors
    ///
    /// [`InvokeError::Coercion`] or [`InvokeError::Binding`] for the first parameter that
    /// cannot be bound.
    pub fn bind(
        &self,
        descriptor: &HandlerDescriptor,
        request: &RequestContext,
        execution: &Arc<ExecutionContext>,
    ) -> Result<Arguments, InvokeError> {
        let parameters = descriptor.parameters();
        let mut args = Arguments::with_capacity(parameters.len());

        for (index, (param, kind)) in parameters.iter().zip(descriptor.plan()).enumerate() {
            let value = match source::fetch(*kind, param, request) {
                RawValue::Text(raw) => {
                    coerce::to_value(raw, &param.ty).map_err(|source| InvokeError::Coercion {
                        index,
                        name: param.display_name(index),
                        source,
                    })?
                }
                RawValue::RawBody(body) => body::bind_raw(body),
                RawValue::StructuredBody(body) => {
                    body::bind_structured(self.codec.as_ref(), index, body, &param.ty)?
                }
                RawValue::Context => BoundValue::Context(Arc::clone(execution)),
            };

            if self.config.trace_arguments {
                debug!(
                    request_id = %execution.request_id,
                    handler_name = %descriptor.handler_name(),
                    param_index = index,
                    param_name = %param.display_name(index),
                    source = %kind,
                    value_kind = value.kind(),
                    "Parameter bound"
                );
            }
            args.push(value);
        }

        debug_assert_eq!(args.len(), parameters.len());
        Ok(args)
    }

    /// Bind, instantiate and call the handler described by `descriptor`.
    ///
    /// The handler's response is returned verbatim.
    ///
    /// # Errors
    ///
    /// - [`InvokeError::Coercion`] / [`InvokeError::Binding`]: bad request data, handler not called
    /// - [`InvokeError::Instantiation`]: the handler could not be constructed, not called
    /// - [`InvokeError::Handler`]: the handler returned an error or panicked
    pub fn invoke(
        &self,
        descriptor: &HandlerDescriptor,
        request: &RequestContext,
        execution: &Arc<ExecutionContext>,
    ) -> Result<HandlerResponse, InvokeError> {
        let request_id = execution.request_id;
        let invocable = descriptor.invocable();

        info!(
            request_id = %request_id,
            handler_name = %descriptor.handler_name(),
            method = ?descriptor.method(),
            path_template = ?descriptor.path_template(),
            param_count = descriptor.parameters().len(),
            "Invocation start"
        );

        let args = self.bind(descriptor, request, execution).map_err(|e| {
            warn!(
                request_id = %request_id,
                handler_name = %descriptor.handler_name(),
                error = %e,
                "Parameter binding failed - handler not called"
            );
            e
        })?;

        let constructed = if self.config.catch_panics {
            catch_unwind(AssertUnwindSafe(|| invocable.instantiate())).unwrap_or_else(|panic| {
                Err(anyhow::anyhow!(
                    "constructor panicked: {}",
                    panic_message(panic.as_ref())
                ))
            })
        } else {
            invocable.instantiate()
        };

        let mut instance = constructed.map_err(|source| {
            error!(
                request_id = %request_id,
                handler_type = invocable.handler_type(),
                error = %source,
                "Handler instantiation failed"
            );
            InstantiationError {
                handler: invocable.handler_type(),
                source,
            }
        })?;

        let start = Instant::now();
        let outcome = if self.config.catch_panics {
            catch_unwind(AssertUnwindSafe(|| instance.call(args)))
        } else {
            Ok(instance.call(args))
        };
        let latency_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match outcome {
            Ok(Ok(response)) => {
                info!(
                    request_id = %request_id,
                    handler_name = %descriptor.handler_name(),
                    status = response.status,
                    latency_ms = latency_ms,
                    "Invocation complete"
                );
                Ok(response)
            }
            Ok(Err(cause)) => {
                error!(
                    request_id = %request_id,
                    handler_type = invocable.handler_type(),
                    method = invocable.method_name(),
                    latency_ms = latency_ms,
                    error = %cause,
                    "Handler returned an error"
                );
                Err(HandlerInvocationError {
                    handler: invocable.handler_type(),
                    method: invocable.method_name().to_string(),
                    panicked: false,
                    cause,
                }
                .into())
            }
            Err(panic) => {
                let panic_message = panic_message(panic.as_ref());
                error!(
                    request_id = %request_id,
                    handler_type = invocable.handler_type(),
                    method = invocable.method_name(),
                    panic_message = %panic_message,
                    "Handler panicked - CRITICAL"
                );
                Err(HandlerInvocationError {
                    handler: invocable.handler_type(),
                    method: invocable.method_name().to_string(),
                    panicked: true,
                    cause: anyhow::anyhow!("handler panicked: {panic_message}"),
                }
                .into())
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
