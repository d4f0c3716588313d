use std::sync::{Arc, RwLock};

use crate::{
    container::{Container, ContainerConfig},
    errors::RegistryError,
    factories::{Factory, TryFactory},
    providers::{CallableProvider, Composite, CompositeProvider, LiteralProvider, Provider},
    registry::{ProviderRegistry, ProviderSource},
    types::Injectable,
};

/// Collects providers and creates a [Container] from them
///
/// Nothing is validated until [DiBuilder::build] is called.
pub struct DiBuilder {
    /// Registered providers and registries, in registration order
    pub(crate) sources: Vec<ProviderSource>,
    pub(crate) config: ContainerConfig,
}
impl Default for DiBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DiBuilder {
    pub fn new() -> Self {
        DiBuilder {
            sources: Vec::new(),
            config: ContainerConfig::default(),
        }
    }
}
impl DiBuilder {
    /// Provides an already created value
    pub fn add_instance<T: Injectable>(self, instance: T) -> Self {
        self.add_provider(LiteralProvider::new(instance))
    }

    /// Provides the return type of `factory`, resolving its parameters first
    pub fn add_factory<F, Args>(self, factory: F) -> Self
    where
        F: Factory<Args>,
        Args: 'static,
    {
        self.add_provider(CallableProvider::new(factory))
    }

    /// Provides `T` for a `factory` returning `Result<T, E>`
    pub fn add_try_factory<F, Args>(self, factory: F) -> Self
    where
        F: TryFactory<Args>,
        Args: 'static,
    {
        self.add_provider(CallableProvider::fallible(factory))
    }

    /// Provides every listed field of `record`, as it is when built
    pub fn add_composite<R: Composite>(self, record: Arc<RwLock<R>>) -> Self {
        self.add_provider(CompositeProvider::new(record))
    }

    pub fn add_provider(mut self, provider: impl Provider + 'static) -> Self {
        self.sources.push(ProviderSource::Provider(Arc::new(provider)));
        self
    }

    /// Provides everything `registry` provides
    pub fn add_registry(mut self, registry: &ProviderRegistry) -> Self {
        self.sources.push(ProviderSource::Registry(registry.clone()));
        self
    }

    /// Whether the container caches instances by default, `true` unless changed
    pub fn shared_mode(mut self, shared_mode: bool) -> Self {
        self.config.shared_mode = shared_mode;
        self
    }

    pub fn build_registry(self) -> Result<ProviderRegistry, RegistryError> {
        ProviderRegistry::new(self.sources)
    }

    pub fn build(self) -> Result<Container, RegistryError> {
        let config = self.config;
        let registry = self.build_registry()?;

        Ok(Container::with_config(registry, config))
    }
}
