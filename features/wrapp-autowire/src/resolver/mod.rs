use crate::{context::BuildContext, errors::BuildError, types::TypeInfo};

pub mod arc;

/// A factory parameter which can be resolved from a [BuildContext]
///
/// Implement this for wrapper types to customize how a dependency is handed to factories.
pub trait Resolver: Sized {
    fn resolve(ctx: &mut BuildContext<'_>) -> Result<Self, BuildError>;

    /// The type which is requested from the container
    fn dependency_info() -> TypeInfo;
}
