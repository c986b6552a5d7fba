//! Application context providing dependency injection root.

use std::sync::Arc;

use crate::config::Config;
use crate::di::FromRef;
use crate::registry::TypeRegistry;

/// Root application context.
///
/// Holds the shared dependencies services are built from. The type
/// registry is derived from the configuration once, at construction.
#[derive(Clone)]
pub struct Context {
    /// Application configuration.
    pub config: Arc<Config>,
    /// Types field kinds resolve against.
    pub registry: Arc<TypeRegistry>,
}

impl Context {
    /// Creates a new context, populating the registry from `config.types`.
    pub fn new(config: Config) -> Self {
        let registry = TypeRegistry::from_entries(&config.types);
        tracing::debug!(types = registry.len(), "Type registry populated");
        Self {
            config: Arc::new(config),
            registry: Arc::new(registry),
        }
    }
}

impl FromRef<Context> for Arc<Config> {
    fn from_ref(ctx: &Context) -> Self {
        ctx.config.clone()
    }
}

impl FromRef<Context> for Arc<TypeRegistry> {
    fn from_ref(ctx: &Context) -> Self {
        ctx.registry.clone()
    }
}
