//! Shared binding state: one registry tied to one configuration source.
//!
//! # Design Decisions
//! - Registry, executor and source live and die together, so every field in
//!   the registry is rebound from the source its item was subscribed on
//! - Change bridges hold the engine strongly; a bridge keeps working after
//!   any binder that used the engine is dropped
//! - The source holds the bridges and the bridges hold the source, so an
//!   engine with subscriptions lives until process exit

use std::sync::Arc;

use crate::binding::executor::RebindExecutor;
use crate::binding::registry::BindingRegistry;
use crate::source::ConfigSource;

/// Registry plus the executor that rebinds its fields.
pub struct BindingEngine {
    registry: BindingRegistry,
    executor: RebindExecutor,
}

impl BindingEngine {
    pub fn new(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            registry: BindingRegistry::new(),
            executor: RebindExecutor::new(source),
        }
    }

    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    pub fn executor(&self) -> &RebindExecutor {
        &self.executor
    }

    pub fn source(&self) -> &Arc<dyn ConfigSource> {
        self.executor.source()
    }
}
