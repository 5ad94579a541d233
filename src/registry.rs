//! Factory registry
//!
//! Maps a declared `ValueType` to the factory that produces its values.
//! Registration overwrites silently; a lookup for an absent type is an explicit
//! `FactoryError::NoSuchFactory`, never an empty result.
//!
//! A process-wide registry is created on first use and comes with a factory
//! for every leaf type. Tests that want isolation build their own
//! `FactoryRegistry` and `FactoryLookupStrategy` instead.

use crate::error::FactoryError;
use crate::factories::basic::leaf_factories;
use crate::factories::{FnFactory, TypeFactory};
use crate::lookup::FactoryLookupStrategy;
use crate::random::RandomValueGenerator;
use crate::value::{Datum, Value, ValueType};
use log::debug;
use std::any::type_name;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub struct FactoryRegistry {
    factories: RwLock<HashMap<ValueType, Arc<dyn TypeFactory>>>,
    random: Arc<RandomValueGenerator>,
}

impl FactoryRegistry {
    /// An empty registry; leaf types are not producible until registered.
    pub fn new(random: Arc<RandomValueGenerator>) -> Self {
        Self {
            factories: RwLock::new(HashMap::new()),
            random,
        }
    }

    /// A registry with a factory for every leaf type.
    pub fn with_defaults(random: Arc<RandomValueGenerator>) -> Self {
        let registry = Self::new(random);
        for (value_type, factory) in leaf_factories(&registry.random) {
            registry.register(value_type, factory);
        }
        registry
    }

    /// The random stream shared by this registry's default factories.
    pub fn random(&self) -> &Arc<RandomValueGenerator> {
        &self.random
    }

    pub fn register(&self, value_type: ValueType, factory: Arc<dyn TypeFactory>) {
        debug!("Registering factory for type [{}]", value_type);
        self.factories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(value_type, factory);
    }

    pub fn register_fn<F>(&self, value_type: ValueType, create: F)
    where
        F: Fn() -> Result<Value, FactoryError> + Send + Sync + 'static,
    {
        let factory = FnFactory::new(value_type.to_string(), create);
        self.register(value_type, Arc::new(factory));
    }

    /// Register a factory for an arbitrary user type. The closure receives this
    /// registry's random generator.
    pub fn register_custom<T, F>(&self, make: F)
    where
        T: Datum + Clone + PartialEq,
        F: Fn(&RandomValueGenerator) -> T + Send + Sync + 'static,
    {
        let random = self.random.clone();
        let factory = FnFactory::new(type_name::<T>(), move || Ok(Value::custom(make(&random))));
        self.register(ValueType::custom::<T>(), Arc::new(factory));
    }

    pub fn lookup(&self, value_type: &ValueType) -> Result<Arc<dyn TypeFactory>, FactoryError> {
        self.get(value_type)
            .ok_or_else(|| FactoryError::NoSuchFactory { requested: value_type.clone() })
    }

    pub fn get(&self, value_type: &ValueType) -> Option<Arc<dyn TypeFactory>> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(value_type)
            .cloned()
    }

    pub fn has(&self, value_type: &ValueType) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(value_type)
    }

    pub fn len(&self) -> usize {
        self.factories.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for FactoryRegistry {
    fn default() -> Self {
        Self::with_defaults(Arc::new(RandomValueGenerator::new()))
    }
}

impl fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryRegistry").field("factories", &self.len()).finish()
    }
}

lazy_static::lazy_static! {
    static ref GLOBAL_LOOKUP: Arc<FactoryLookupStrategy> =
        FactoryLookupStrategy::new(Arc::new(FactoryRegistry::default()));
}

/// The process-wide lookup strategy, backed by `global_registry()`.
pub fn global_lookup_strategy() -> Arc<FactoryLookupStrategy> {
    GLOBAL_LOOKUP.clone()
}

/// The process-wide registry.
pub fn global_registry() -> Arc<FactoryRegistry> {
    GLOBAL_LOOKUP.registry().clone()
}

/// Register a factory in the process-wide registry.
pub fn register_factory(value_type: ValueType, factory: Arc<dyn TypeFactory>) {
    GLOBAL_LOOKUP.registry().register(value_type, factory);
}

/// Resolve a factory through the process-wide lookup strategy.
pub fn lookup_factory(value_type: &ValueType) -> Result<Arc<dyn TypeFactory>, FactoryError> {
    GLOBAL_LOOKUP.lookup(value_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Money {
        cents: i64,
    }

    fn registry() -> FactoryRegistry {
        FactoryRegistry::with_defaults(Arc::new(RandomValueGenerator::seeded(4)))
    }

    #[test]
    fn test_defaults_cover_leaves() {
        let registry = registry();
        assert_eq!(registry.len(), ValueType::leaves().len());
        for leaf in ValueType::leaves() {
            assert!(registry.has(&leaf));
        }
        assert!(!registry.has(&ValueType::list(ValueType::I32)));
        assert!(FactoryRegistry::new(registry.random().clone()).is_empty());
    }

    #[test]
    fn test_lookup_of_absent_type_fails() {
        let registry = registry();
        match registry.lookup(&ValueType::custom::<Money>()) {
            Err(FactoryError::NoSuchFactory { requested }) => {
                assert_eq!(requested, ValueType::custom::<Money>())
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_register_overwrites() {
        let registry = registry();
        registry.register_fn(ValueType::I32, || Ok(Value::I32(1)));
        registry.register_fn(ValueType::I32, || Ok(Value::I32(2)));
        let factory = registry.lookup(&ValueType::I32).unwrap();
        assert_eq!(factory.create().unwrap(), Value::I32(2));
    }

    #[test]
    fn test_custom_type_produces_its_own_type() {
        let registry = registry();
        registry.register_custom(|random| Money { cents: random.next_below(1000) as i64 });
        let factory = registry.lookup(&ValueType::custom::<Money>()).unwrap();
        for _ in 0..10 {
            let money = factory.create().unwrap().into_custom::<Money>().unwrap();
            assert!((0..1000).contains(&money.cents));
        }
    }

    #[test]
    fn test_has_is_pure() {
        let registry = registry();
        let before = registry.len();
        assert!(!registry.has(&ValueType::custom::<Money>()));
        assert_eq!(registry.len(), before);
    }
}
