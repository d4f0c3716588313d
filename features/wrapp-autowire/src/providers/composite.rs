use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use indexmap::IndexMap;

use crate::{
    context::BuildContext,
    errors::{BuildError, FieldCollision, RegistryError},
    providers::Provider,
    types::{Injectable, Instance, TypeInfo},
};

/// A record whose fields can be provided, one type per field
///
/// Only the fields listed in [Composite::fields] are provided, everything else stays private.
/// Use [composite!](crate::composite) to implement this for a struct.
pub trait Composite: Injectable + Sized {
    fn fields(fields: &mut Fields<Self>);
}

type ReadFn<R> = Arc<dyn Fn(&R) -> Instance + Send + Sync>;

struct FieldEntry<R> {
    info: TypeInfo,
    path: Vec<&'static str>,
    read: ReadFn<R>,
}
impl<R> FieldEntry<R> {
    fn path(&self) -> String {
        self.path.join(".")
    }
}

/// Description of the provided fields of a record `R`
///
/// Nested records are flattened, so all their fields are provided next to the fields of `R`.
pub struct Fields<R> {
    entries: Vec<FieldEntry<R>>,
}

impl<R: 'static> Fields<R> {
    fn describe() -> Self
    where
        R: Composite,
    {
        let mut fields = Fields {
            entries: Vec::new(),
        };
        R::fields(&mut fields);
        fields
    }

    /// Provides a field by cloning it
    pub fn field<F: Injectable + Clone>(
        &mut self,
        name: &'static str,
        access: fn(&R) -> &F,
    ) -> &mut Self {
        self.push(
            TypeInfo::of::<F>(),
            vec![name],
            Arc::new(move |record: &R| Instance::new(access(record).clone())),
        )
    }

    /// Provides the content of an `Arc` field, handing out the same `Arc`
    pub fn shared<F: Injectable>(
        &mut self,
        name: &'static str,
        access: fn(&R) -> &Arc<F>,
    ) -> &mut Self {
        self.push(
            TypeInfo::of::<F>(),
            vec![name],
            Arc::new(move |record: &R| Instance::from_arc(access(record).clone())),
        )
    }

    /// Provides a nested record and all of its fields
    pub fn nested<N: Composite + Clone>(
        &mut self,
        name: &'static str,
        access: fn(&R) -> &N,
    ) -> &mut Self {
        self.field(name, access);
        for entry in Fields::<N>::describe().entries {
            let read = entry.read;
            self.push(
                entry.info,
                prefixed(name, entry.path),
                Arc::new(move |record: &R| read(access(record))),
            );
        }
        self
    }

    /// Provides a nested record behind an `Arc` and all of its fields
    pub fn nested_shared<N: Composite>(
        &mut self,
        name: &'static str,
        access: fn(&R) -> &Arc<N>,
    ) -> &mut Self {
        self.shared(name, access);
        for entry in Fields::<N>::describe().entries {
            let read = entry.read;
            self.push(
                entry.info,
                prefixed(name, entry.path),
                Arc::new(move |record: &R| read(access(record).as_ref())),
            );
        }
        self
    }

    fn push(&mut self, info: TypeInfo, path: Vec<&'static str>, read: ReadFn<R>) -> &mut Self {
        self.entries.push(FieldEntry { info, path, read });
        self
    }
}

fn prefixed(name: &'static str, path: Vec<&'static str>) -> Vec<&'static str> {
    let mut prefixed = Vec::with_capacity(path.len() + 1);
    prefixed.push(name);
    prefixed.extend(path);
    prefixed
}

/// Provides the fields of a shared record
///
/// Fields are read when they are built, so changes made to the record
/// after registration are seen by later builds.
pub struct CompositeProvider<R: Composite> {
    record: Arc<RwLock<R>>,
    fields: Vec<FieldEntry<R>>,
    /// Index of the first field of each type
    index: IndexMap<TypeInfo, usize>,
}

impl<R: Composite> CompositeProvider<R> {
    pub fn new(record: Arc<RwLock<R>>) -> Self {
        let fields = Fields::<R>::describe().entries;
        let mut index = IndexMap::with_capacity(fields.len());
        for (position, field) in fields.iter().enumerate() {
            index.entry(field.info).or_insert(position);
        }

        Self {
            record,
            fields,
            index,
        }
    }
}

impl<R: Composite> Provider for CompositeProvider<R> {
    fn source(&self) -> TypeInfo {
        TypeInfo::of::<R>()
    }

    fn target_types(&self) -> Vec<TypeInfo> {
        self.index.keys().copied().collect()
    }

    fn dependent_types(&self) -> Vec<TypeInfo> {
        Vec::new()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let mut seen: HashMap<TypeInfo, &FieldEntry<R>> =
            HashMap::with_capacity(self.fields.len());
        for field in &self.fields {
            if let Some(first) = seen.insert(field.info, field) {
                return Err(RegistryError::ProviderDuplicated {
                    target: field.info,
                    fields: Some(FieldCollision {
                        record: TypeInfo::of::<R>(),
                        first: first.path(),
                        second: field.path(),
                    }),
                });
            }
        }

        Ok(())
    }

    fn build(&self, _: &mut BuildContext<'_>, target: TypeInfo) -> Result<Instance, BuildError> {
        let Some(&position) = self.index.get(&target) else {
            return Err(BuildError::NotFound(target));
        };

        let record = self.record.read().unwrap_or_else(PoisonError::into_inner);
        Ok((self.fields[position].read)(&*record))
    }
}

/// Implements [Composite] for a struct, listing the fields to provide
///
/// Fields are provided by cloning them. Mark a field to change that:
/// - `#[shared]` for an `Arc<T>` field providing `T`, handing out the same `Arc`
/// - `#[nested]` for a field which itself is a [Composite], providing it and its fields
/// - `#[nested_shared]` for an `Arc<T>` field where `T` is a [Composite]
///
/// ```
/// use std::sync::{Arc, RwLock};
/// use wrapp_autowire::{composite, providers::CompositeProvider, providers::Provider};
///
/// #[derive(Clone)]
/// pub struct Limits {
///     pub max_connections: usize,
/// }
///
/// pub struct Settings {
///     pub host: String,
///     pub limits: Limits,
///     secret: String,
/// }
///
/// composite!(Limits { max_connections });
/// composite!(Settings { host, #[nested] limits });
///
/// let settings = Settings {
///     host: "localhost".to_string(),
///     limits: Limits { max_connections: 10 },
///     secret: "hidden".to_string(),
/// };
/// let provider = CompositeProvider::new(Arc::new(RwLock::new(settings)));
///
/// assert_eq!(provider.target_types().len(), 3);
/// ```
#[macro_export]
macro_rules! composite {
    (@field $fields:ident, $field:ident) => {
        $fields.field(stringify!($field), |record| &record.$field);
    };
    (@field $fields:ident, $field:ident, shared) => {
        $fields.shared(stringify!($field), |record| &record.$field);
    };
    (@field $fields:ident, $field:ident, nested) => {
        $fields.nested(stringify!($field), |record| &record.$field);
    };
    (@field $fields:ident, $field:ident, nested_shared) => {
        $fields.nested_shared(stringify!($field), |record| &record.$field);
    };
    ($record:ty { $( $(#[$kind:ident])? $field:ident ),* $(,)? }) => {
        impl $crate::providers::Composite for $record {
            #[allow(unused_variables)]
            fn fields(fields: &mut $crate::providers::Fields<Self>) {
                $( $crate::composite!(@field fields, $field $(, $kind)?); )*
            }
        }
    };
}
