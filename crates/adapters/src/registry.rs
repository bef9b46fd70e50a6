// SPDX-License-Identifier: MIT

//! `RuntimeRegistry`: a name → factory map populated at daemon startup from
//! `RuntimeConfig` entries (spec.md §4.2, §9's "interface abstraction with a
//! registry mapping id → factory"). Adapters are stateless, so the registry
//! hands out one shared `Arc` per variant rather than constructing afresh
//! per lookup.

use crate::adapter::RuntimeAdapter;
use crate::error::AgentAdapterError;
use crate::variants::{Headless, Hybrid, InteractiveTui};
use std::collections::HashMap;
use std::sync::Arc;

pub struct RuntimeRegistry {
    adapters: HashMap<&'static str, Arc<dyn RuntimeAdapter>>,
}

impl RuntimeRegistry {
    /// An empty registry with none of the built-in variants registered.
    pub fn empty() -> Self {
        Self { adapters: HashMap::new() }
    }

    /// A registry pre-populated with the three built-in variants.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(InteractiveTui));
        registry.register(Arc::new(Headless));
        registry.register(Arc::new(Hybrid));
        registry
    }

    pub fn register(&mut self, adapter: Arc<dyn RuntimeAdapter>) {
        self.adapters.insert(adapter.id(), adapter);
    }

    pub fn get(&self, id: &str) -> Result<Arc<dyn RuntimeAdapter>, AgentAdapterError> {
        self.adapters.get(id).cloned().ok_or_else(|| AgentAdapterError::UnknownRuntime(id.to_string()))
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.adapters.keys().copied().collect()
    }
}

impl Default for RuntimeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
