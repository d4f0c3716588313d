//! Fixtures shared between the unit tests

use std::sync::Arc;

use crate::{
    composite,
    providers::{CallableProvider, LiteralProvider, Provider},
    registry::{ProviderRegistry, ProviderSource},
};

#[derive(Debug)]
pub struct A {
    pub b: Arc<B>,
    pub c: Arc<C>,
}

#[derive(Debug)]
pub struct B {
    pub d: Arc<D>,
}

#[derive(Debug, PartialEq)]
pub struct C(pub u32);

#[derive(Debug, PartialEq)]
pub struct D(pub &'static str);

pub fn new_a(b: Arc<B>, c: Arc<C>) -> A {
    A { b, c }
}

pub fn new_b(d: Arc<D>) -> B {
    B { d }
}

fn provider(provider: impl Provider + 'static) -> ProviderSource {
    ProviderSource::Provider(Arc::new(provider))
}

/// A(B, C), B(D), literal C(3) and literal D("d")
pub fn registry_for_a() -> ProviderRegistry {
    ProviderRegistry::new([
        provider(CallableProvider::new(new_a)),
        provider(CallableProvider::new(new_b)),
        provider(LiteralProvider::new(C(3))),
        provider(LiteralProvider::new(D("d"))),
    ])
    .expect("fixture registry is valid")
}

#[derive(Debug)]
pub struct SelfDependent;

pub fn new_self_dependent(_: Arc<SelfDependent>) -> SelfDependent {
    SelfDependent
}

#[derive(Debug)]
pub struct Cyclic1;
#[derive(Debug)]
pub struct Cyclic2;
#[derive(Debug)]
pub struct Cyclic3;

pub fn new_cyclic1(_: Arc<Cyclic2>) -> Cyclic1 {
    Cyclic1
}

pub fn new_cyclic2(_: Arc<Cyclic3>) -> Cyclic2 {
    Cyclic2
}

pub fn new_cyclic3(_: Arc<Cyclic1>) -> Cyclic3 {
    Cyclic3
}

/// Cyclic1 -> Cyclic2 -> Cyclic3 -> Cyclic1
pub fn cyclic_registry() -> ProviderRegistry {
    ProviderRegistry::new([
        provider(CallableProvider::new(new_cyclic1)),
        provider(CallableProvider::new(new_cyclic2)),
        provider(CallableProvider::new(new_cyclic3)),
    ])
    .expect("fixture registry is valid")
}

#[derive(Debug)]
pub struct Failing;

#[derive(Debug, PartialEq)]
pub enum FactoryError {
    Unavailable,
}
impl std::fmt::Display for FactoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("unavailable")
    }
}
impl std::error::Error for FactoryError {}

pub fn new_failing() -> Result<Failing, FactoryError> {
    Err(FactoryError::Unavailable)
}

#[derive(Debug)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub limits: Limits,
    #[allow(dead_code)]
    secret: String,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            limits: Limits::default(),
            secret: "hidden".to_string(),
        }
    }
}
composite!(Settings { host, port, #[nested] limits });

#[derive(Debug, Clone)]
pub struct Limits {
    pub max_connections: usize,
    pub ratio: f64,
}
impl Default for Limits {
    fn default() -> Self {
        Self {
            max_connections: 16,
            ratio: 0.5,
        }
    }
}
composite!(Limits { max_connections, ratio });

#[derive(Debug, Default)]
pub struct Duplicated {
    pub numbers: Vec<i32>,
    pub inner: Inner,
}
composite!(Duplicated { numbers, #[nested] inner });

#[derive(Debug, Clone, Default)]
pub struct Inner {
    pub values: Vec<i32>,
}
composite!(Inner { values });

/// Same fields as [Duplicated], but `inner` is not provided
#[derive(Debug, Default)]
pub struct DuplicatedHidden {
    pub numbers: Vec<i32>,
    #[allow(dead_code)]
    inner: Inner,
}
composite!(DuplicatedHidden { numbers });

#[derive(Debug)]
pub struct Pool {
    pub size: u32,
    #[allow(dead_code)]
    name: String,
}
impl Pool {
    pub fn new(size: u32, name: &str) -> Self {
        Self {
            size,
            name: name.to_string(),
        }
    }
}
composite!(Pool { size });

#[derive(Debug)]
pub struct Platform {
    pub pool: Arc<Pool>,
    pub region: String,
}
composite!(Platform { #[nested_shared] pool, region });
