//! Handler descriptor registry.
//!
//! Maps handler names to their immutable [`HandlerDescriptor`]s. The router resolves a
//! request to a handler name, looks the descriptor up here and hands it to the
//! [`Invoker`](crate::invoker::Invoker). Lookups are lock-free reads and may run on any
//! number of threads while registration happens.

use crate::descriptor::HandlerDescriptor;
use dashmap::DashMap;
use tracing::{info, warn};

/// Concurrent name → descriptor map.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    descriptors: DashMap<String, HandlerDescriptor>,
}

impl HandlerRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `descriptor` under its handler name.
    ///
    /// An existing descriptor with the same name is replaced and returned. In-flight
    /// invocations keep the descriptor they already hold.
    pub fn register(&self, descriptor: HandlerDescriptor) -> Option<HandlerDescriptor> {
        let handler_name = descriptor.handler_name().to_string();
        let previous = self.descriptors.insert(handler_name.clone(), descriptor);

        if previous.is_some() {
            warn!(
                handler_name = %handler_name,
                total_handlers = self.descriptors.len(),
                "Replaced existing handler descriptor"
            );
        } else {
            info!(
                handler_name = %handler_name,
                total_handlers = self.descriptors.len(),
                "Handler registered successfully"
            );
        }
        previous
    }

    /// Descriptor registered under `handler_name`.
    ///
    /// Returns a cheap clone so no map guard outlives the call.
    #[must_use]
    pub fn get(&self, handler_name: &str) -> Option<HandlerDescriptor> {
        self.descriptors.get(handler_name).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, handler_name: &str) -> Option<HandlerDescriptor> {
        let removed = self.descriptors.remove(handler_name).map(|(_, d)| d);
        if removed.is_some() {
            info!(handler_name = %handler_name, "Handler deregistered");
        }
        removed
    }

    #[must_use]
    pub fn contains(&self, handler_name: &str) -> bool {
        self.descriptors.contains_key(handler_name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Registered handler names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.descriptors.iter().map(|e| e.key().clone()).collect();
        names.sort_unstable();
        names
    }
}
