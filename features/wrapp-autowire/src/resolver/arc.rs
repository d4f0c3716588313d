use std::sync::Arc;

use crate::{
    context::BuildContext,
    errors::BuildError,
    resolver::Resolver,
    types::{Injectable, TypeInfo},
};

impl<T: Injectable> Resolver for Arc<T> {
    fn resolve(ctx: &mut BuildContext<'_>) -> Result<Self, BuildError> {
        ctx.resolve(TypeInfo::of::<T>())?.downcast::<T>()
    }

    fn dependency_info() -> TypeInfo {
        TypeInfo::of::<T>()
    }
}
