use std::{fmt::Debug, sync::Arc};

use indexmap::{map::Entry, IndexMap};

use crate::{
    errors::{BuildError, RegistryError},
    providers::Provider,
    types::TypeInfo,
};

/// Providers by the type they build, in registration order
pub type ProviderMap = IndexMap<TypeInfo, Arc<dyn Provider>>;

/// Anything a registry can be created from
pub enum ProviderSource {
    Provider(Arc<dyn Provider>),
    /// All entries of another registry, overwrites included
    Registry(ProviderRegistry),
}

/// Set of unique providers for unique types
///
/// The base providers are fixed once the registry is created and shared between clones.
/// Overwrites are layered on top and belong to a single clone.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Arc<ProviderMap>,
    overwrites: Option<ProviderMap>,
}
impl Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.all().iter().map(|(info, _)| info.type_name))
            .finish()
    }
}

impl ProviderRegistry {
    /// Merges all sources into a new registry
    ///
    /// Fails on the first invalid provider or the first type provided twice.
    pub fn new(sources: impl IntoIterator<Item = ProviderSource>) -> Result<Self, RegistryError> {
        let mut providers = ProviderMap::new();

        for source in sources {
            match source {
                ProviderSource::Provider(provider) => {
                    provider.validate()?;
                    for target in provider.target_types() {
                        insert_unique(&mut providers, target, provider.clone())?;
                    }
                }
                ProviderSource::Registry(registry) => {
                    for (target, provider) in registry.all() {
                        insert_unique(&mut providers, target, provider)?;
                    }
                }
            }
        }

        if providers.is_empty() {
            return Err(RegistryError::ProviderInvalid {
                provider: TypeInfo::of::<Self>(),
                reason: "no provider provided".to_string(),
            });
        }

        tracing::debug!("Registered providers for {} types", providers.len());

        Ok(Self {
            providers: Arc::new(providers),
            overwrites: None,
        })
    }

    /// Provider for `target` - overwrites first, then the base providers
    pub fn lookup_for(&self, target: TypeInfo) -> Result<Arc<dyn Provider>, BuildError> {
        self.overwrites
            .as_ref()
            .and_then(|overwrites| overwrites.get(&target))
            .or_else(|| self.providers.get(&target))
            .cloned()
            .ok_or(BuildError::NotFound(target))
    }

    /// All entries, overwrites replacing the base providers they shadow
    pub fn all(&self) -> Vec<(TypeInfo, Arc<dyn Provider>)> {
        let overwrites = self.overwrites.as_ref();
        let base = self
            .providers
            .iter()
            .filter(|(target, _)| !overwrites.is_some_and(|o| o.contains_key(*target)));

        base.chain(overwrites.into_iter().flatten())
            .map(|(target, provider)| (*target, provider.clone()))
            .collect()
    }

    /// Replaces the provider of its primary target type, without touching other clones
    pub fn overwrite(&mut self, provider: Arc<dyn Provider>) {
        let Some(target) = provider.target_types().first().copied() else {
            tracing::debug!("Ignoring overwrite from '{}' without target", provider.source());
            return;
        };

        tracing::debug!("Overwriting provider for '{}'", target);
        self.overwrites
            .get_or_insert_with(ProviderMap::new)
            .insert(target, provider);
    }

    /// Clone sharing the base providers, with its own overwrites
    pub fn isolate(&self) -> Self {
        self.clone()
    }

    pub fn contains(&self, target: TypeInfo) -> bool {
        self.lookup_for(target).is_ok()
    }

    /// Number of provided types
    pub fn len(&self) -> usize {
        let added = self.overwrites.as_ref().map_or(0, |overwrites| {
            overwrites
                .keys()
                .filter(|target| !self.providers.contains_key(*target))
                .count()
        });
        self.providers.len() + added
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_unique(
    providers: &mut ProviderMap,
    target: TypeInfo,
    provider: Arc<dyn Provider>,
) -> Result<(), RegistryError> {
    match providers.entry(target) {
        Entry::Occupied(_) => Err(RegistryError::ProviderDuplicated {
            target,
            fields: None,
        }),
        Entry::Vacant(entry) => {
            entry.insert(provider);
            Ok(())
        }
    }
}
