use std::sync::Arc;

use crate::{
    context::BuildContext,
    errors::BuildError,
    providers::Provider,
    types::{Injectable, Instance, TypeInfo},
};

/// Provides an existing value, as is
pub struct LiteralProvider {
    value: Instance,
}

impl LiteralProvider {
    pub fn new<T: Injectable>(value: T) -> Self {
        Self {
            value: Instance::new(value),
        }
    }

    pub fn from_arc<T: Injectable>(value: Arc<T>) -> Self {
        Self {
            value: Instance::from_arc(value),
        }
    }
}

impl Provider for LiteralProvider {
    fn source(&self) -> TypeInfo {
        self.value.info
    }

    fn target_types(&self) -> Vec<TypeInfo> {
        vec![self.value.info]
    }

    fn dependent_types(&self) -> Vec<TypeInfo> {
        Vec::new()
    }

    fn build(&self, _: &mut BuildContext<'_>, _: TypeInfo) -> Result<Instance, BuildError> {
        Ok(self.value.clone())
    }
}
