use std::collections::HashSet;

use crate::{
    context::BuildContext,
    errors::{BuildError, RegistryError},
    factories::{Factory, TryFactory},
    providers::Provider,
    types::{Instance, TypeInfo},
};

type ConstructFn =
    Box<dyn Fn(&mut BuildContext<'_>) -> Result<Instance, BuildError> + Send + Sync>;

/// Builds its target by calling a function with its resolved parameters
pub struct CallableProvider {
    source: TypeInfo,
    target: TypeInfo,
    dependencies: Vec<TypeInfo>,
    construct: ConstructFn,
}

impl CallableProvider {
    /// Wraps a function returning the value directly
    pub fn new<F, Args>(factory: F) -> Self
    where
        F: Factory<Args>,
        Args: 'static,
    {
        Self {
            source: TypeInfo::of::<F>(),
            target: TypeInfo::of::<F::Output>(),
            dependencies: F::dependencies(),
            construct: Box::new(move |ctx: &mut BuildContext<'_>| {
                factory.construct(ctx).map(Instance::new)
            }),
        }
    }

    /// Wraps a function returning `Result<T, E>`, providing `T`
    pub fn fallible<F, Args>(factory: F) -> Self
    where
        F: TryFactory<Args>,
        Args: 'static,
    {
        Self {
            source: TypeInfo::of::<F>(),
            target: TypeInfo::of::<F::Output>(),
            dependencies: F::dependencies(),
            construct: Box::new(move |ctx: &mut BuildContext<'_>| {
                factory.try_construct(ctx).map(Instance::new)
            }),
        }
    }
}

impl Provider for CallableProvider {
    fn source(&self) -> TypeInfo {
        self.source
    }

    fn target_types(&self) -> Vec<TypeInfo> {
        vec![self.target]
    }

    fn dependent_types(&self) -> Vec<TypeInfo> {
        self.dependencies.clone()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut seen = HashSet::with_capacity(self.dependencies.len());
        for dependency in &self.dependencies {
            if !seen.insert(dependency) {
                return Err(RegistryError::ProviderInvalid {
                    provider: self.source,
                    reason: format!("duplicated function argument type '{dependency}'"),
                });
            }
        }

        Ok(())
    }

    fn build(&self, ctx: &mut BuildContext<'_>, target: TypeInfo) -> Result<Instance, BuildError> {
        if let Some(instance) = ctx.cached(target) {
            tracing::trace!("Reusing cached instance of {}", target);
            return Ok(instance);
        }

        ctx.enter(target)?;
        let result = (self.construct)(ctx);
        ctx.leave(target);

        let instance = result?;
        tracing::debug!("Constructed instance of {}", target);

        Ok(ctx.store(target, instance))
    }
}
