//! Host-provided execution context.
//!
//! The host (a serverless runtime, a coroutine server, a test harness) hands one
//! [`ExecutionContext`] to every invocation. Handlers may declare a parameter of type
//! [`SemanticType::Context`](crate::types::SemanticType::Context) to receive it.
//!
//! The deadline is informational: the invoker never checks it. Enforcing time budgets
//! belongs to the host.

use crate::ids::RequestId;
use crate::request::RequestContext;
use std::time::{Duration, Instant};

/// Invocation metadata supplied by the host.
#[derive(Debug, Clone, Default)]
pub struct ExecutionContext {
    /// Correlation id for this invocation
    pub request_id: RequestId,
    /// Name of the deployed function or service, if the host has one
    pub function_name: Option<String>,
    /// Memory limit granted by the host, in megabytes
    pub memory_limit_mb: Option<u32>,
    deadline: Option<Instant>,
}

impl ExecutionContext {
    #[must_use]
    pub fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            ..Self::default()
        }
    }

    /// Context for `request`, reusing its upstream id when that id is a valid ULID.
    #[must_use]
    pub fn for_request(request: &RequestContext) -> Self {
        Self::new(RequestId::parse_or_new(request.request_id.as_deref()))
    }

    #[must_use]
    pub fn with_function_name(mut self, name: impl Into<String>) -> Self {
        self.function_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_memory_limit_mb(mut self, limit: u32) -> Self {
        self.memory_limit_mb = Some(limit);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set the deadline relative to now.
    #[must_use]
    pub fn with_time_budget(self, budget: Duration) -> Self {
        self.with_deadline(Instant::now() + budget)
    }

    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the host deadline; `Some(Duration::ZERO)` once it has passed.
    #[must_use]
    pub fn remaining_time(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_request_reuses_upstream_id() {
        let upstream = RequestId::new();
        let request = RequestContext::new().with_request_id(upstream.to_string());
        assert_eq!(ExecutionContext::for_request(&request).request_id, upstream);

        let fresh = ExecutionContext::for_request(&RequestContext::new().with_request_id("nope"));
        assert_ne!(fresh.request_id.to_string(), "nope");
    }

    #[test]
    fn test_remaining_time_without_deadline() {
        let ctx = ExecutionContext::default();
        assert!(ctx.remaining_time().is_none());
    }

    #[test]
    fn test_remaining_time_is_bounded_by_budget() {
        let ctx = ExecutionContext::default().with_time_budget(Duration::from_secs(5));
        let remaining = ctx.remaining_time().unwrap();
        assert!(remaining <= Duration::from_secs(5));
        assert!(remaining > Duration::from_secs(4));
    }

    #[test]
    fn test_expired_deadline_saturates() {
        let ctx = ExecutionContext::default().with_deadline(Instant::now());
        std::thread::sleep(Duration::from_millis(2));
        assert_eq!(ctx.remaining_time(), Some(Duration::ZERO));
    }
}
