//! # brrtbind
//!
//! **brrtbind** is the parameter-binding and invocation engine behind a routed request: it
//! turns the request's textual path, query and header values and its body into the exact
//! typed arguments a handler method declares, constructs a fresh handler and calls it.
//!
//! ## Overview
//!
//! Routing and request construction happen upstream. By the time brrtbind sees a request
//! the router has already picked a [`HandlerDescriptor`] and a collaborator has already
//! produced a [`RequestContext`]. brrtbind then:
//!
//! - decides, once per descriptor, where every parameter comes from ([`source`])
//! - converts textual values into primitives, enums and custom types ([`coerce`])
//! - decodes body payloads into structured types ([`codec`], [`body`])
//! - injects the host [`ExecutionContext`] where a handler asks for it
//! - calls the handler with an argument list of exactly the declared arity ([`invoker`])
//!
//! ## Architecture
//!
//! - **[`types`]** - Semantic type descriptions handed over by descriptor construction
//! - **[`descriptor`]** - Handler descriptors, parameter specs and the callable handle
//! - **[`source`]** - Source classification and raw value lookup
//! - **[`coerce`]** - Ordered text-to-type coercion strategies
//! - **[`codec`]** - Structured (JSON) decoding collaborator
//! - **[`body`]** - Raw and structured body binding
//! - **[`invoker`]** - Binding, instantiation and invocation
//! - **[`registry`]** - Concurrent handler descriptor registry
//! - **[`logging`]** / **[`runtime_config`]** - Environment-driven logging and invoker settings
//!
//! ### Invocation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Router
//!     participant Registry as HandlerRegistry
//!     participant Invoker
//!     participant Source as source::fetch
//!     participant Coerce as coerce::to_value
//!     participant Body as body::bind_*
//!     participant Handler
//!
//!     Router->>Registry: get(handler_name)
//!     Registry-->>Router: HandlerDescriptor
//!     Router->>Invoker: invoke(descriptor, request, execution)
//!     loop every declared parameter
//!         Invoker->>Source: fetch(plan[i], param, request)
//!         alt PATH / QUERY / HEADER
//!             Source-->>Invoker: Text(raw)
//!             Invoker->>Coerce: to_value(raw, type)
//!             alt coercion fails
//!                 Invoker-->>Router: InvokeError::Coercion (400)
//!             end
//!         else BODY_RAW / BODY_JSON
//!             Source-->>Invoker: body
//!             Invoker->>Body: bind_raw / bind_structured
//!             alt decoding fails
//!                 Invoker-->>Router: InvokeError::Binding (400)
//!             end
//!         else CONTEXT
//!             Invoker->>Invoker: inject ExecutionContext
//!         end
//!     end
//!     Invoker->>Handler: instantiate()
//!     Invoker->>Handler: call(arguments)
//!     alt error or panic
//!         Invoker-->>Router: InvokeError::Handler (500)
//!     else success
//!         Handler-->>Invoker: HandlerResponse
//!         Invoker-->>Router: HandlerResponse (verbatim)
//!     end
//! ```
//!
//! ### Source Precedence
//!
//! Evaluated once per parameter when the descriptor is built, first match wins:
//!
//! 1. **PATH** - annotated path parameter
//! 2. **QUERY** - annotated query parameter
//! 3. **HEADER** - annotated header parameter
//! 4. **BODY_RAW** - unannotated `String` on a JSON-consuming handler
//! 5. **CONTEXT** - unannotated execution-context parameter
//! 6. **BODY_JSON** - anything else, decoded from the body
//!
//! ## Quick Start
//!
//! ```rust
//! use brrtbind::{
//!     Arguments, ExecutionContext, HandlerDescriptor, HandlerRegistry, HandlerResponse,
//!     Invocable, Invoker, ParameterSpec, RequestContext, SemanticType,
//! };
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Pets;
//!
//! impl Pets {
//!     fn get_pet(&mut self, args: Arguments) -> anyhow::Result<HandlerResponse> {
//!         let id = args.get(0).and_then(|v| v.as_i64()).unwrap_or_default();
//!         Ok(HandlerResponse::json(200, serde_json::json!({ "id": id, "name": "Rex" })))
//!     }
//! }
//!
//! let registry = HandlerRegistry::new();
//! registry.register(
//!     HandlerDescriptor::builder("get_pet", Invocable::new("get_pet", Pets::get_pet))
//!         .param(ParameterSpec::path("id", SemanticType::Long))
//!         .build(),
//! );
//!
//! let request: RequestContext =
//!     serde_json::from_str(r#"{ "path": { "id": "42" } }"#).unwrap();
//! let descriptor = registry.get("get_pet").unwrap();
//! let response = Invoker::new()
//!     .invoke(&descriptor, &request, &Arc::new(ExecutionContext::default()))
//!     .unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(response.body["id"], 42);
//! ```
//!
//! ## Error Handling
//!
//! All failures surface as [`InvokeError`]. Binding-phase failures
//! ([`CoercionError`], [`BindingError`], [`InstantiationError`]) mean the handler was never
//! called; [`HandlerInvocationError`] carries the handler's own error or panic.
//! [`InvokeError::status_code`] gives the renderer a 400/500 hint. The engine never
//! retries.
//!
//! ## Runtime Considerations
//!
//! The engine is synchronous and runtime-agnostic: it performs no I/O, spawns nothing and
//! can be called from OS threads or coroutines alike. Descriptors are immutable and shared
//! behind an `Arc`; every invocation builds its own handler instance.

pub mod body;
pub mod codec;
pub mod coerce;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod ids;
pub mod invoker;
pub mod logging;
pub mod registry;
pub mod request;
pub mod response;
pub mod runtime_config;
pub mod source;
pub mod types;
pub mod value;

pub use codec::{JsonCodec, StructuredCodec};
pub use context::ExecutionContext;
pub use descriptor::{
    HandlerDescriptor, Invocable, ParameterLocation, ParameterSpec, ResourceMethod,
};
pub use error::{
    BindingError, CoercionError, DecodeError, HandlerInvocationError, InstantiationError,
    InvokeError,
};
pub use ids::RequestId;
pub use invoker::Invoker;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use registry::HandlerRegistry;
pub use request::{RequestBody, RequestContext};
pub use response::HandlerResponse;
pub use runtime_config::InvokerConfig;
pub use source::SourceKind;
pub use types::{CustomType, EnumType, ObjectType, SemanticType};
pub use value::{Arguments, BoundValue};
