//! Value factories
//!
//! A `TypeFactory` produces fresh random `Value`s of one declared type. The
//! registry holds the leaf factories from [`basic`] plus anything users
//! register; the lookup strategy derives the rest on demand:
//!
//! - [`collections`]: arrays, lists, sets, queues and maps.
//! - [`enums`]: uniform choice among declared constants.
//! - [`beans`]: nested beans populated property by property.
//!
//! [`equivalent`] is different in kind: it produces whole bean instances that
//! are distinct but value-equal, for the verifiers.

pub mod basic;
pub mod beans;
pub mod collections;
pub mod enums;
pub mod equivalent;

use crate::error::FactoryError;
use crate::value::Value;
use std::fmt;

pub use basic::{
    BooleanFactory, CharFactory, DateFactory, F32Factory, F64Factory, I16Factory, I32Factory, I64Factory,
    I8Factory, StringFactory, U16Factory, U32Factory, U64Factory, U8Factory,
};
pub use beans::PopulatedBeanFactory;
pub use collections::{CollectionFactory, CollectionKind, MapFactory};
pub use enums::EnumConstantFactory;
pub use equivalent::{equivalent_from_fn, EquivalentFactory, EquivalentPopulatedBeanFactory};

/// Producer of random values for one declared type.
pub trait TypeFactory: fmt::Debug + Send + Sync {
    fn create(&self) -> Result<Value, FactoryError>;
}

type CreateFn = dyn Fn() -> Result<Value, FactoryError> + Send + Sync;

/// Factory backed by a closure.
pub struct FnFactory {
    name: String,
    create: Box<CreateFn>,
}

impl FnFactory {
    pub fn new<F>(name: impl Into<String>, create: F) -> Self
    where
        F: Fn() -> Result<Value, FactoryError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            create: Box::new(create),
        }
    }
}

impl TypeFactory for FnFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        (self.create)()
    }
}

impl fmt::Debug for FnFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnFactory").field("name", &self.name).finish()
    }
}
