use std::sync::{Arc, RwLock};

use wrapp_autowire::{
    composite, BuildError, BuildOption, Container, DiBuilder, RegistryError, TypeInfo,
};

#[derive(Debug)]
struct A {
    b: Arc<B>,
    c: Arc<C>,
}

#[derive(Debug)]
struct B {
    d: Arc<D>,
}

#[derive(Debug, PartialEq)]
struct C(u32);

#[derive(Debug, PartialEq)]
struct D(&'static str);

fn example_container() -> Container {
    DiBuilder::new()
        .add_factory(|b: Arc<B>, c: Arc<C>| A { b, c })
        .add_factory(|d: Arc<D>| B { d })
        .add_instance(C(3))
        .add_instance(D("d"))
        .build()
        .unwrap()
}

#[test]
fn it_fails_for_types_never_registered() {
    let container = example_container();

    let err = container.build::<String>().unwrap_err();

    assert!(matches!(err, BuildError::NotFound(info) if info == TypeInfo::of::<String>()));
    assert!(matches!(
        container.resolve::<String>(),
        Err(BuildError::NotFound(_))
    ));
}

#[test]
fn it_shares_the_dependencies_it_built() {
    let container = example_container();

    let a = container.build::<A>().unwrap();
    let b = container.get::<B>().unwrap();

    assert!(Arc::ptr_eq(&a.b, &b));
    assert!(Arc::ptr_eq(&a.b.d, &b.d));
    assert_eq!(*a.c, C(3));
}

#[test]
fn it_builds_fresh_instances_for_non_shared_calls() {
    let container = example_container();

    let first = container.build_with::<A>([BuildOption::NonShared]).unwrap();
    let second = container.build_with::<A>([BuildOption::NonShared]).unwrap();

    assert!(!Arc::ptr_eq(&first, &second));
    assert!(!Arc::ptr_eq(&first.b, &second.b));
    assert!(matches!(container.get::<A>(), Err(BuildError::NotFound(_))));
    assert!(matches!(container.get::<B>(), Err(BuildError::NotFound(_))));
}

#[test]
fn it_keeps_returning_the_first_shared_instance() {
    let container = example_container();

    let first = container.build::<B>().unwrap();
    let overwritten = container
        .build_with::<B>([BuildOption::overwrite(D("other"))])
        .unwrap();

    // B is cached, the overwrite is never used
    assert!(Arc::ptr_eq(&first, &overwritten));
    assert_eq!(*overwritten.d, D("d"));
}

#[test]
fn it_limits_ambient_values_to_their_call() {
    let container = example_container();

    let with_ambient = container
        .build_with_context::<A, _>(C(42), [BuildOption::NonShared])
        .unwrap();
    let without = container.build::<A>().unwrap();

    assert_eq!(*with_ambient.c, C(42));
    assert_eq!(*without.c, C(3));
    assert_eq!(container.registry().all().len(), 4);
}

#[test]
fn it_fails_on_duplicated_providers_without_partial_registry() {
    let err = DiBuilder::new()
        .add_instance(C(1))
        .add_factory(|d: Arc<D>| B { d })
        .add_factory(|| C(2))
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::ProviderDuplicated { target, fields: None } if target == TypeInfo::of::<C>()
    ));
}

#[test]
fn it_rejects_factories_with_repeated_parameter_types() {
    let err = DiBuilder::new()
        .add_instance(C(1))
        .add_factory(|first: Arc<C>, second: Arc<C>| first.0 + second.0)
        .build()
        .unwrap_err();

    assert!(matches!(err, RegistryError::ProviderInvalid { .. }));
}

#[test]
fn it_fails_without_any_provider() {
    let err = DiBuilder::new().build().unwrap_err();

    assert!(matches!(err, RegistryError::ProviderInvalid { .. }));
}

struct Top {
    left: Arc<Left>,
    right: Arc<Right>,
}
struct Left {
    bottom: Arc<Bottom>,
}
struct Right {
    bottom: Arc<Bottom>,
}
struct Bottom;

fn diamond_container() -> Container {
    DiBuilder::new()
        .add_factory(|left: Arc<Left>, right: Arc<Right>| Top { left, right })
        .add_factory(|bottom: Arc<Bottom>| Left { bottom })
        .add_factory(|bottom: Arc<Bottom>| Right { bottom })
        .add_factory(|| Bottom)
        .build()
        .unwrap()
}

#[test]
fn it_builds_a_type_reached_twice_in_one_non_shared_call() {
    let container = diamond_container();

    let top = container.build_with::<Top>([BuildOption::NonShared]).unwrap();

    // Bottom is entered once per branch, the first branch must not leave it marked
    assert!(!Arc::ptr_eq(&top.left.bottom, &top.right.bottom));
    assert!(matches!(container.get::<Bottom>(), Err(BuildError::NotFound(_))));
}

#[test]
fn it_shares_a_type_reached_twice_in_one_shared_call() {
    let container = diamond_container();

    let top = container.build::<Top>().unwrap();

    assert!(Arc::ptr_eq(&top.left.bottom, &top.right.bottom));
    assert!(Arc::ptr_eq(&top.left.bottom, &container.get::<Bottom>().unwrap()));
}

struct Ping;
struct Pong;
struct Echo;

fn cyclic_container() -> Container {
    DiBuilder::new()
        .add_factory(|_: Arc<Pong>| Ping)
        .add_factory(|_: Arc<Echo>| Pong)
        .add_factory(|_: Arc<Ping>| Echo)
        .add_factory(|_: Arc<u8>| 0_u8)
        .build()
        .unwrap()
}

#[test]
fn it_detects_transitive_and_self_cycles() {
    let container = cyclic_container();

    for info in [
        TypeInfo::of::<Ping>(),
        TypeInfo::of::<Pong>(),
        TypeInfo::of::<Echo>(),
        TypeInfo::of::<u8>(),
    ] {
        let err = container.build_type(info, []).unwrap_err();
        assert!(matches!(err, BuildError::CircularDependency(at) if at == info));

        let err = container.resolve_type(info).unwrap_err();
        assert!(matches!(err, BuildError::CircularDependency(at) if at == info));
    }
}

#[test]
fn it_does_not_leak_markers_after_a_cycle() {
    let container = DiBuilder::new()
        .add_factory(|_: Arc<u16>| 0_u8)
        .add_factory(|_: Arc<u8>| 0_u16)
        .add_instance(7_u32)
        .build()
        .unwrap();

    assert!(container.build::<u8>().is_err());

    // Overwriting u16 breaks the cycle, nothing from the failed call is left behind
    let value = container
        .build_with::<u8>([BuildOption::overwrite(1_u16)])
        .unwrap();
    assert_eq!(*value, 0);
    assert_eq!(*container.build::<u32>().unwrap(), 7);
}

#[derive(Clone, Default)]
struct Limits {
    timeouts: Vec<u64>,
}
composite!(Limits { timeouts });

#[derive(Default)]
struct Exposed {
    retries: Vec<u64>,
    limits: Limits,
}
composite!(Exposed { retries, #[nested] limits });

#[derive(Default)]
struct Hidden {
    retries: Vec<u64>,
    #[allow(dead_code)]
    limits: Limits,
}
composite!(Hidden { retries });

#[test]
fn it_fails_on_nested_fields_of_the_same_type() {
    let err = DiBuilder::new()
        .add_composite(Arc::new(RwLock::new(Exposed::default())))
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        RegistryError::ProviderDuplicated { target, fields: Some(_) } if target == TypeInfo::of::<Vec<u64>>()
    ));
    assert!(err.to_string().contains("[retries]' and '"));
    assert!(err.to_string().contains("[limits.timeouts]'"));
}

#[test]
fn it_accepts_the_record_once_the_field_is_not_provided() {
    let hidden = Arc::new(RwLock::new(Hidden {
        retries: vec![1, 2],
        ..Default::default()
    }));

    let container = DiBuilder::new().add_composite(hidden).build().unwrap();

    assert_eq!(*container.build::<Vec<u64>>().unwrap(), vec![1, 2]);
    assert!(matches!(
        container.build::<Limits>(),
        Err(BuildError::NotFound(_))
    ));
}

#[test]
fn it_reports_missing_dependencies_of_the_whole_registry() {
    let container = DiBuilder::new()
        .add_factory(|b: Arc<B>, c: Arc<C>| A { b, c })
        .add_factory(|d: Arc<D>| B { d })
        .build()
        .unwrap();

    let errors = container.check().unwrap_err().errors;

    assert_eq!(errors.len(), 2);
    assert!(example_container().check().is_ok());
}
