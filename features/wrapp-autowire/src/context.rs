use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, PoisonError},
};

use crate::{
    errors::BuildError,
    providers::{LiteralProvider, Provider},
    registry::ProviderRegistry,
    types::{Injectable, Instance, TypeInfo},
};

/// Instances cached by a container, per type
pub type InstanceMap = HashMap<TypeInfo, Instance>;

/// Options changing a single build call
pub enum BuildOption {
    /// Neither reads nor writes cached instances during this call
    NonShared,
    /// Uses the given provider for its primary target type during this call
    Overwrite(Arc<dyn Provider>),
}
impl BuildOption {
    /// Uses `value` for its type during this call
    pub fn overwrite<T: Injectable>(value: T) -> Self {
        Self::Overwrite(Arc::new(LiteralProvider::new(value)))
    }

    /// Uses `value` for `T` during this call, handing out the same `Arc`
    pub fn overwrite_shared<T: Injectable>(value: Arc<T>) -> Self {
        Self::Overwrite(Arc::new(LiteralProvider::from_arc(value)))
    }
}

/// State of a single build call
///
/// Shared by every provider taking part in the call, so the cache and the
/// cycle guard cover the whole tree of dependencies.
pub struct BuildContext<'a> {
    shared_mode: bool,
    registry: ProviderRegistry,
    instances: &'a Mutex<InstanceMap>,
    /// Types currently being built on the call stack
    resolving: HashSet<TypeInfo>,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        shared_mode: bool,
        registry: ProviderRegistry,
        instances: &'a Mutex<InstanceMap>,
    ) -> Self {
        Self {
            shared_mode,
            registry,
            instances,
            resolving: HashSet::with_capacity(10),
        }
    }

    pub(crate) fn apply(&mut self, option: BuildOption) {
        match option {
            BuildOption::NonShared => self.shared_mode = false,
            BuildOption::Overwrite(provider) => self.registry.overwrite(provider),
        }
    }

    /// Whether instances are cached during this call
    pub fn shared_mode(&self) -> bool {
        self.shared_mode
    }

    /// The registry of this call, including its overwrites
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Builds `target` with the provider registered for it
    pub fn resolve(&mut self, target: TypeInfo) -> Result<Instance, BuildError> {
        let provider = match self.registry.lookup_for(target) {
            Ok(provider) => provider,
            Err(err) => {
                tracing::error!("Tried to require an unregistered type: {}", target);
                return Err(err);
            }
        };

        provider.build(self, target)
    }

    /// Cached instance for `target` - always `None` outside of shared mode
    pub fn cached(&self, target: TypeInfo) -> Option<Instance> {
        if !self.shared_mode {
            return None;
        }

        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&target)
            .cloned()
    }

    /// Caches `instance` for `target` if in shared mode
    ///
    /// Returns the cached instance, which is an earlier one if `target` was already cached.
    pub fn store(&self, target: TypeInfo, instance: Instance) -> Instance {
        if !self.shared_mode {
            return instance;
        }

        self.instances
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(target)
            .or_insert(instance)
            .clone()
    }

    /// Marks `target` as being built
    ///
    /// Fails if it is already being built further up the call stack.
    pub fn enter(&mut self, target: TypeInfo) -> Result<(), BuildError> {
        if !self.resolving.insert(target) {
            return Err(BuildError::CircularDependency(target));
        }

        Ok(())
    }

    /// Removes the mark set by [BuildContext::enter]
    pub fn leave(&mut self, target: TypeInfo) {
        self.resolving.remove(&target);
    }

    pub fn is_resolving(&self, target: TypeInfo) -> bool {
        self.resolving.contains(&target)
    }
}
