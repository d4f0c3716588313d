//! Runtime dependency injection, building values from their declared dependencies on request
//!
//! Providers are registered on a [DiBuilder], which validates them and creates a [Container].
//! The container builds any registered type by building its dependencies first,
//! caching every constructed instance unless shared mode is disabled.
//!
//! ```
//! use std::sync::Arc;
//! use wrapp_autowire::DiBuilder;
//!
//! struct Database {
//!     url: String,
//! }
//! struct Repository {
//!     db: Arc<Database>,
//! }
//!
//! let container = DiBuilder::new()
//!     .add_instance(Database {
//!         url: "postgres://localhost".to_string(),
//!     })
//!     .add_factory(|db: Arc<Database>| Repository { db })
//!     .build()?;
//!
//! let repository = container.build::<Repository>()?;
//! assert_eq!(repository.db.url, "postgres://localhost");
//! assert!(Arc::ptr_eq(&repository, &container.get::<Repository>()?));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod builder;
pub mod container;
pub mod context;
pub mod dependency_graph;
pub mod errors;
pub mod factories;
pub mod providers;
pub mod registry;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod test_utils;

pub use builder::DiBuilder;
pub use container::{Container, ContainerConfig};
pub use context::{BuildContext, BuildOption};
pub use dependency_graph::{DependencyGraph, DependencyGraphError, DependencyGraphErrors};
pub use errors::{BuildError, FieldCollision, RegistryError};
pub use registry::{ProviderRegistry, ProviderSource};
pub use resolver::Resolver;
pub use types::{Injectable, Instance, TypeInfo};
