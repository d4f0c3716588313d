use std::{collections::HashSet, fmt::Display};

use thiserror::Error;

use crate::{errors::BuildError, registry::ProviderRegistry, types::TypeInfo};

/// Tree of everything needed to build `target`
///
/// Children follow the declaration order of the dependencies, duplicates included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyGraph {
    pub target: TypeInfo,
    pub dependencies: Vec<DependencyGraph>,
}

impl DependencyGraph {
    /// Number of nodes in the tree, including the root
    pub fn node_count(&self) -> usize {
        1 + self
            .dependencies
            .iter()
            .map(DependencyGraph::node_count)
            .sum::<usize>()
    }

    fn fmt_indented(&self, f: &mut std::fmt::Formatter<'_>, depth: usize) -> std::fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.target, indent = depth * 2)?;
        for dependency in &self.dependencies {
            dependency.fmt_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

impl Display for DependencyGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.fmt_indented(f, 0)
    }
}

/// Walks the providers of a registry without building anything
pub struct GraphWalker<'a> {
    registry: &'a ProviderRegistry,
    /// Types on the current path
    resolving: HashSet<TypeInfo>,
}

impl<'a> GraphWalker<'a> {
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self {
            registry,
            resolving: HashSet::new(),
        }
    }

    pub fn resolve(&mut self, target: TypeInfo) -> Result<DependencyGraph, BuildError> {
        if !self.resolving.insert(target) {
            return Err(BuildError::CircularDependency(target));
        }

        let result = self.walk(target);
        self.resolving.remove(&target);
        result
    }

    fn walk(&mut self, target: TypeInfo) -> Result<DependencyGraph, BuildError> {
        let provider = self.registry.lookup_for(target)?;

        let dependencies = provider
            .dependent_types()
            .into_iter()
            .map(|dependency| self.resolve(dependency))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DependencyGraph {
            target,
            dependencies,
        })
    }
}

/// Validate every provider of the registry
///
/// Unlike [GraphWalker], this does not stop at the first issue and returns a list of all of them.
pub fn check(registry: &ProviderRegistry) -> Result<(), DependencyGraphErrors> {
    let mut checked = HashSet::new();
    let mut errors = Vec::new();
    for (target, _) in registry.all() {
        let mut dependency_chain = Vec::new();
        check_recurse(
            registry,
            &mut checked,
            &mut errors,
            &mut dependency_chain,
            target,
        );
    }

    if !errors.is_empty() {
        return Err(DependencyGraphErrors { errors });
    }

    Ok(())
}

fn check_recurse(
    registry: &ProviderRegistry,
    checked: &mut HashSet<TypeInfo>,
    errors: &mut Vec<DependencyGraphError>,
    dependency_chain: &mut Vec<TypeInfo>,
    target: TypeInfo,
) {
    // Circular Dependency Check
    if let Some(position) = dependency_chain.iter().position(|info| *info == target) {
        let mut chain = dependency_chain[position..].to_vec();
        let from = chain.last().copied().unwrap_or(target);
        chain.push(target);

        errors.push(DependencyGraphError::CircularDependency {
            from,
            to: target,
            chain,
        });
        return;
    }

    // Skip other checks if already checked
    if !checked.insert(target) {
        return;
    }

    let Ok(provider) = registry.lookup_for(target) else {
        return;
    };

    dependency_chain.push(target);

    for dependency in provider.dependent_types() {
        if !registry.contains(dependency) {
            errors.push(DependencyGraphError::MissingDependency {
                dependency,
                required_by: target,
            });
            continue;
        }

        check_recurse(registry, checked, errors, dependency_chain, dependency);
    }

    dependency_chain.pop();
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DependencyGraphError {
    #[error("'{required_by}' needs '{dependency}' but it is missing")]
    MissingDependency {
        dependency: TypeInfo,
        required_by: TypeInfo,
    },
    #[error("A Circular Dependency exists between '{from}' and '{to}' through {}", display_chain(.chain))]
    CircularDependency {
        from: TypeInfo,
        to: TypeInfo,
        chain: Vec<TypeInfo>,
    },
}

fn display_chain(chain: &[TypeInfo]) -> String {
    chain
        .iter()
        .map(|info| info.type_name)
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Every issue found by [check]
#[derive(Error, Debug, Clone)]
#[error("The dependency graph had one or more errors:{}", list_errors(.errors))]
pub struct DependencyGraphErrors {
    pub errors: Vec<DependencyGraphError>,
}

fn list_errors(errors: &[DependencyGraphError]) -> String {
    errors.iter().map(|error| format!("\n- {error}")).collect()
}
