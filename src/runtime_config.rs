//! # Runtime Configuration Module
//!
//! Environment variable-based configuration for the invoker.
//!
//! ## Environment Variables
//!
//! ### `BRRTBIND_CATCH_PANICS`
//!
//! When `true` (default), a panicking handler is reported as a
//! [`HandlerInvocationError`](crate::error::HandlerInvocationError) with `panicked = true`
//! instead of unwinding into the host. Set to `false` when the host runs its own panic
//! recovery (for example a coroutine supervisor).
//!
//! ### `BRRTBIND_TRACE_ARGUMENTS`
//!
//! When `true`, every bound parameter is logged at debug level with its source and value
//! kind. Values themselves are never logged. Default: `false`.
//!
//! ## Usage
//!
//! ```rust
//! use brrtbind::runtime_config::InvokerConfig;
//!
//! let config = InvokerConfig::from_env();
//! println!("catch panics: {}", config.catch_panics);
//! ```

use std::env;

/// Invoker configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvokerConfig {
    /// Convert handler panics into handler invocation errors
    pub catch_panics: bool,
    /// Log each bound parameter at debug level
    pub trace_arguments: bool,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            catch_panics: true,
            trace_arguments: false,
        }
    }
}

impl InvokerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catch_panics: env_flag("BRRTBIND_CATCH_PANICS").unwrap_or(defaults.catch_panics),
            trace_arguments: env_flag("BRRTBIND_TRACE_ARGUMENTS")
                .unwrap_or(defaults.trace_arguments),
        }
    }

    #[must_use]
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }

    #[must_use]
    pub fn with_trace_arguments(mut self, trace_arguments: bool) -> Self {
        self.trace_arguments = trace_arguments;
        self
    }
}

fn env_flag(name: &str) -> Option<bool> {
    env::var(name).ok().and_then(|v| parse_flag(&v))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
