use crate::{
    context::BuildContext,
    errors::{BuildError, RegistryError},
    types::{Instance, TypeInfo},
};

pub mod callable;
pub mod composite;
pub mod literal;

pub use callable::CallableProvider;
pub use composite::{Composite, CompositeProvider, Fields};
pub use literal::LiteralProvider;

/// Produces instances of its target types, from instances of its dependent types
pub trait Provider: Send + Sync {
    /// Type of whatever the provider was created from - the factory, the record or the literal
    fn source(&self) -> TypeInfo;

    /// Types this provider can build
    ///
    /// The first entry is the primary target, used as key when overwriting.
    fn target_types(&self) -> Vec<TypeInfo>;

    /// Types which must be built before this provider can build its targets, in call order
    fn dependent_types(&self) -> Vec<TypeInfo>;

    /// Checks the provider once, when it is registered
    fn validate(&self) -> Result<(), RegistryError> {
        Ok(())
    }

    /// Builds an instance of `target`, resolving dependencies through `ctx`
    fn build(&self, ctx: &mut BuildContext<'_>, target: TypeInfo) -> Result<Instance, BuildError>;
}
