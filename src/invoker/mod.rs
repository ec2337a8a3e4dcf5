//! # Invoker Module
//!
//! The invocation engine: binds a routed request to a handler's parameter list, constructs
//! a fresh handler and calls it.
//!
//! ## Request Flow
//!
//! 1. The router hands over a [`HandlerDescriptor`](crate::descriptor::HandlerDescriptor)
//!    and the [`RequestContext`](crate::request::RequestContext)
//! 2. Every parameter, in declared order, reads its raw value from the source kind
//!    precomputed in the descriptor's plan
//! 3. Path, query and header values go through the [`coerce`](crate::coerce) module;
//!    body values go through the [`body`](crate::body) binder; context parameters receive
//!    the host [`ExecutionContext`](crate::context::ExecutionContext)
//! 4. A fresh handler instance is constructed
//! 5. The designated method is called once with the full argument list and its
//!    [`HandlerResponse`](crate::response::HandlerResponse) is returned verbatim
//!
//! ## Error Handling
//!
//! Every binding-phase failure (coercion, body decoding, construction) is raised before the
//! handler is called; no partial call ever happens. Failures of the handler itself, returned
//! errors and panics alike, come back as
//! [`HandlerInvocationError`](crate::error::HandlerInvocationError) with the original
//! cause. Nothing is retried.
//!
//! ## Concurrency
//!
//! An [`Invoker`] holds only its codec and configuration and is `Send + Sync`. Any number of
//! threads may invoke through the same invoker and the same descriptor at once; each call
//! owns its handler instance.
//!
//! ```rust
//! use brrtbind::context::ExecutionContext;
//! use brrtbind::descriptor::{HandlerDescriptor, Invocable, ParameterSpec};
//! use brrtbind::invoker::Invoker;
//! use brrtbind::request::RequestContext;
//! use brrtbind::response::HandlerResponse;
//! use brrtbind::types::SemanticType;
//! use brrtbind::value::Arguments;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Echo;
//!
//! impl Echo {
//!     fn echo(&mut self, args: Arguments) -> anyhow::Result<HandlerResponse> {
//!         let id = args.get(0).and_then(|v| v.as_i64());
//!         Ok(HandlerResponse::json(200, serde_json::json!({ "id": id })))
//!     }
//! }
//!
//! let descriptor = HandlerDescriptor::builder("echo", Invocable::new("echo", Echo::echo))
//!     .param(ParameterSpec::path("id", SemanticType::Long))
//!     .build();
//! let request = RequestContext::new().with_path_param("id", "123");
//! let execution = Arc::new(ExecutionContext::default());
//!
//! let response = Invoker::new().invoke(&descriptor, &request, &execution).unwrap();
//! assert_eq!(response.body["id"], 123);
//! ```

mod core;

pub use core::Invoker;
