use std::sync::Arc;

use crate::{
    context::BuildContext,
    errors::BuildError,
    resolver::Resolver,
    types::{DynError, Injectable, TypeInfo},
};

/// A function constructing a value from its parameters
///
/// Implemented for every `Fn(P1, .., Pn) -> T` where each parameter is a [Resolver],
/// usually `Arc<Dependency>`.
pub trait Factory<Args>: Send + Sync + 'static {
    type Output: Injectable;

    /// Types required by the parameters, in declared order
    fn dependencies() -> Vec<TypeInfo>;

    /// Resolves all parameters in order, then calls the function
    fn construct(&self, ctx: &mut BuildContext<'_>) -> Result<Self::Output, BuildError>;
}

/// A function constructing a value from its parameters, which might fail
///
/// Implemented for every `Fn(P1, .., Pn) -> Result<T, E>`.
/// The returned error is kept as is inside [BuildError::FactoryFailed].
pub trait TryFactory<Args>: Send + Sync + 'static {
    type Output: Injectable;

    /// Types required by the parameters, in declared order
    fn dependencies() -> Vec<TypeInfo>;

    /// Resolves all parameters in order, then calls the function
    fn try_construct(&self, ctx: &mut BuildContext<'_>) -> Result<Self::Output, BuildError>;
}

macro_rules! define_factory ({ $($param:ident)* } => {
    impl<F, R, $($param,)*> Factory<($($param,)*)> for F
    where
        F: Fn($($param),*) -> R + Send + Sync + 'static,
        R: Injectable,
        $($param: Resolver,)*
    {
        type Output = R;

        fn dependencies() -> Vec<TypeInfo> {
            vec![$(<$param as Resolver>::dependency_info()),*]
        }

        #[inline]
        #[allow(non_snake_case, unused_variables)]
        fn construct(&self, ctx: &mut BuildContext<'_>) -> Result<R, BuildError> {
            $(let $param = <$param as Resolver>::resolve(ctx)?;)*
            Ok((self)($($param),*))
        }
    }

    impl<F, R, E, $($param,)*> TryFactory<($($param,)*)> for F
    where
        F: Fn($($param),*) -> Result<R, E> + Send + Sync + 'static,
        R: Injectable,
        E: Into<DynError>,
        $($param: Resolver,)*
    {
        type Output = R;

        fn dependencies() -> Vec<TypeInfo> {
            vec![$(<$param as Resolver>::dependency_info()),*]
        }

        #[inline]
        #[allow(non_snake_case, unused_variables)]
        fn try_construct(&self, ctx: &mut BuildContext<'_>) -> Result<R, BuildError> {
            $(let $param = <$param as Resolver>::resolve(ctx)?;)*
            (self)($($param),*).map_err(|error| BuildError::FactoryFailed {
                product: TypeInfo::of::<R>(),
                error: Arc::new(error.into()),
            })
        }
    }
});

define_factory! {}
define_factory! { T1 }
define_factory! { T1 T2 }
define_factory! { T1 T2 T3 }
define_factory! { T1 T2 T3 T4 }
define_factory! { T1 T2 T3 T4 T5 }
define_factory! { T1 T2 T3 T4 T5 T6 }
define_factory! { T1 T2 T3 T4 T5 T6 T7 }
define_factory! { T1 T2 T3 T4 T5 T6 T7 T8 }
