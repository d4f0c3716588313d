use std::sync::Arc;

use thiserror::Error;

use crate::types::{DynError, TypeInfo};

/// Errors while registering providers
///
/// These can only happen while a registry is built, never during a build or resolve.
#[derive(Error, Debug, Clone)]
pub enum RegistryError {
    /// The provider can never be used as given, or nothing was registered at all
    #[error("Invalid provider '{provider}': {reason}")]
    ProviderInvalid {
        provider: TypeInfo,
        reason: String,
    },
    /// Two providers claim the same type
    ///
    /// `fields` is set when both are fields of the same composite record, possibly nested.
    #[error("Duplicated provider for type '{target}'{}", at_fields(.fields))]
    ProviderDuplicated {
        target: TypeInfo,
        fields: Option<FieldCollision>,
    },
}

/// Paths of two fields of `record` which have the same type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCollision {
    pub record: TypeInfo,
    pub first: String,
    pub second: String,
}

fn at_fields(fields: &Option<FieldCollision>) -> String {
    match fields {
        Some(FieldCollision {
            record,
            first,
            second,
        }) => format!(", error at '{record}[{first}]' and '{record}[{second}]'"),
        None => String::new(),
    }
}

/// Errors while building, getting or resolving a type
#[derive(Error, Debug, Clone)]
pub enum BuildError {
    /// Neither a provider nor an overwrite exists for the type
    #[error("Provider not found for type '{0}'")]
    NotFound(TypeInfo),
    /// The type was requested while it was already being built on the current call stack
    #[error("Circular dependency detected at type '{0}'")]
    CircularDependency(TypeInfo),
    /// An instance did not hold the type it was registered for
    #[error("Unable to cast '{actual}' as '{required}'")]
    TypeCast {
        required: TypeInfo,
        actual: TypeInfo,
    },
    /// A factory returned an error
    #[error("Factory for '{product}' failed - error: {error}")]
    FactoryFailed {
        product: TypeInfo,
        error: Arc<DynError>,
    },
}

impl BuildError {
    /// The error returned by a failed factory, as it was returned
    ///
    /// Use `downcast_ref` on the result to test for a specific error.
    pub fn factory_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            BuildError::FactoryFailed { error, .. } => Some(&***error),
            _ => None,
        }
    }

    /// The type the error is about
    pub fn type_info(&self) -> TypeInfo {
        match self {
            BuildError::NotFound(info) | BuildError::CircularDependency(info) => *info,
            BuildError::TypeCast { required, .. } => *required,
            BuildError::FactoryFailed { product, .. } => *product,
        }
    }
}
