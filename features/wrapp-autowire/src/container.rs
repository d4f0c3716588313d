use std::{
    fmt::Debug,
    iter,
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    context::{BuildContext, BuildOption, InstanceMap},
    dependency_graph::{self, DependencyGraph, DependencyGraphErrors, GraphWalker},
    errors::BuildError,
    registry::ProviderRegistry,
    types::{Injectable, Instance, TypeInfo},
};

/// Default behavior of a [Container]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerConfig {
    /// Cache built instances and reuse them in later builds
    pub shared_mode: bool,
}
impl Default for ContainerConfig {
    fn default() -> Self {
        Self { shared_mode: true }
    }
}

/// Container building instances from the providers of its registry
///
/// Cheap to clone, all clones share the same registry and cached instances.
#[derive(Clone)]
pub struct Container(Arc<ContainerInner>);
struct ContainerInner {
    config: ContainerConfig,
    registry: ProviderRegistry,
    instances: Mutex<InstanceMap>,
}
impl Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let instances = self.0.instances.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("Container")
            .field("shared_mode", &self.0.config.shared_mode)
            .field("registry", &self.0.registry)
            .field(
                "instances",
                &instances.keys().map(|info| info.type_name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Container {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self::with_config(registry, ContainerConfig::default())
    }

    pub fn with_config(registry: ProviderRegistry, config: ContainerConfig) -> Self {
        Self(Arc::new(ContainerInner {
            config,
            registry,
            instances: Mutex::new(InstanceMap::new()),
        }))
    }

    /// Builds `target` and everything it depends on
    ///
    /// Options are applied in order before anything is looked up,
    /// so an overwrite can replace the provider of `target` itself.
    pub fn build_type(
        &self,
        target: TypeInfo,
        options: impl IntoIterator<Item = BuildOption>,
    ) -> Result<Instance, BuildError> {
        let mut ctx = BuildContext::new(
            self.0.config.shared_mode,
            self.0.registry.isolate(),
            &self.0.instances,
        );
        for option in options {
            ctx.apply(option);
        }

        tracing::trace!("Building {}", target);
        ctx.resolve(target)
    }

    pub fn build<T: Injectable>(&self) -> Result<Arc<T>, BuildError> {
        self.build_with::<T>([])
    }

    pub fn build_with<T: Injectable>(
        &self,
        options: impl IntoIterator<Item = BuildOption>,
    ) -> Result<Arc<T>, BuildError> {
        self.build_type(TypeInfo::of::<T>(), options)?.downcast::<T>()
    }

    /// Builds `T` with `ambient` available to every provider of this call
    ///
    /// `ambient` overwrites any provider of its type, after all other options.
    pub fn build_with_context<T: Injectable, A: Injectable>(
        &self,
        ambient: A,
        options: impl IntoIterator<Item = BuildOption>,
    ) -> Result<Arc<T>, BuildError> {
        let options = options
            .into_iter()
            .chain(iter::once(BuildOption::overwrite(ambient)));

        self.build_with::<T>(options)
    }

    /// Cached instance of `target`, never builds anything
    pub fn get_type(&self, target: TypeInfo) -> Result<Instance, BuildError> {
        self.0
            .instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target)
            .cloned()
            .ok_or(BuildError::NotFound(target))
    }

    pub fn get<T: Injectable>(&self) -> Result<Arc<T>, BuildError> {
        self.get_type(TypeInfo::of::<T>())?.downcast::<T>()
    }

    /// Tree of everything `target` depends on, without building anything
    pub fn resolve_type(&self, target: TypeInfo) -> Result<DependencyGraph, BuildError> {
        GraphWalker::new(&self.0.registry).resolve(target)
    }

    pub fn resolve<T: Injectable>(&self) -> Result<DependencyGraph, BuildError> {
        self.resolve_type(TypeInfo::of::<T>())
    }

    /// Validates the whole registry, returning every missing dependency and cycle
    pub fn check(&self) -> Result<(), DependencyGraphErrors> {
        dependency_graph::check(&self.0.registry)
    }

    pub fn shared_mode(&self) -> bool {
        self.0.config.shared_mode
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.0.registry
    }
}
