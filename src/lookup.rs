//! Factory lookup strategy
//!
//! Resolves a factory for any declared type with an ordered fallback:
//!
//! 1. a factory registered for exactly this type;
//! 2. arrays, from a recursively resolved element factory;
//! 3. lists, sets, queues and maps, from recursively resolved element (and key)
//!    factories;
//! 4. enums, choosing uniformly among the declared constants;
//! 5. beans that declare properties, through a structural factory;
//! 6. otherwise `FactoryError::NoSuchFactory`.
//!
//! Structural factories are memoized per bean type, so resolving a
//! self-referencing type returns the factory already being built instead of
//! constructing a new one.

use crate::bean::BeanType;
use crate::error::FactoryError;
use crate::factories::{
    CollectionFactory, CollectionKind, EnumConstantFactory, MapFactory, PopulatedBeanFactory, TypeFactory,
};
use crate::random::RandomValueGenerator;
use crate::registry::FactoryRegistry;
use crate::value::ValueType;
use log::debug;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, Weak};

pub const DEFAULT_MAX_COLLECTION_SIZE: usize = 8;

pub struct FactoryLookupStrategy {
    registry: Arc<FactoryRegistry>,
    max_collection_size: usize,
    structural: Mutex<HashMap<BeanType, Arc<dyn TypeFactory>>>,
    this: Weak<FactoryLookupStrategy>,
}

impl FactoryLookupStrategy {
    pub fn new(registry: Arc<FactoryRegistry>) -> Arc<Self> {
        Self::with_max_collection_size(registry, DEFAULT_MAX_COLLECTION_SIZE)
    }

    pub fn with_max_collection_size(registry: Arc<FactoryRegistry>, max_collection_size: usize) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            registry,
            max_collection_size: max_collection_size.max(1),
            structural: Mutex::new(HashMap::new()),
            this: this.clone(),
        })
    }

    pub fn registry(&self) -> &Arc<FactoryRegistry> {
        &self.registry
    }

    pub fn random(&self) -> &Arc<RandomValueGenerator> {
        self.registry.random()
    }

    pub fn max_collection_size(&self) -> usize {
        self.max_collection_size
    }

    pub fn lookup(&self, value_type: &ValueType) -> Result<Arc<dyn TypeFactory>, FactoryError> {
        if let Some(factory) = self.registry.get(value_type) {
            return Ok(factory);
        }

        let factory: Arc<dyn TypeFactory> = match value_type {
            ValueType::Array(element) => self.collection(CollectionKind::Array, element)?,
            ValueType::List(element) => self.collection(CollectionKind::List, element)?,
            ValueType::Set(element) => self.collection(CollectionKind::Set, element)?,
            ValueType::Queue(element) => self.collection(CollectionKind::Queue, element)?,
            ValueType::Map(key, value) => Arc::new(MapFactory::new(
                self.lookup(key)?,
                self.lookup(value)?,
                self.random().clone(),
                self.max_collection_size,
            )),
            ValueType::Enum(enum_type) => Arc::new(EnumConstantFactory::new(*enum_type, self.random().clone())),
            ValueType::Bean(bean_type) => self.structural(*bean_type)?,
            _ => return Err(FactoryError::NoSuchFactory { requested: value_type.clone() }),
        };
        debug!("Derived factory for type [{}]", value_type);
        Ok(factory)
    }

    /// Whether `lookup` would succeed for this type.
    pub fn can_produce(&self, value_type: &ValueType) -> bool {
        self.lookup(value_type).is_ok()
    }

    fn collection(&self, kind: CollectionKind, element: &ValueType) -> Result<Arc<dyn TypeFactory>, FactoryError> {
        Ok(Arc::new(CollectionFactory::new(
            kind,
            self.lookup(element)?,
            self.random().clone(),
            self.max_collection_size,
        )))
    }

    fn structural(&self, bean_type: BeanType) -> Result<Arc<dyn TypeFactory>, FactoryError> {
        if bean_type.properties().is_empty() {
            return Err(FactoryError::NoSuchFactory { requested: ValueType::Bean(bean_type) });
        }
        let mut cache = self.structural.lock().unwrap_or_else(PoisonError::into_inner);
        let factory = cache.entry(bean_type).or_insert_with(|| {
            debug!("Creating structural factory for [{}]", bean_type.name());
            Arc::new(PopulatedBeanFactory::new(bean_type, self.this.clone()))
        });
        Ok(factory.clone())
    }
}

impl fmt::Debug for FactoryLookupStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryLookupStrategy")
            .field("registry", &self.registry)
            .field("max_collection_size", &self.max_collection_size)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Employee {
        name: String,
        manager: Option<Box<Employee>>,
        reports: Vec<Employee>,
    }

    crate::impl_equality!(Employee);
    crate::impl_bean!(Employee {
        "name" => name: ValueType::String,
        "manager" => manager: ValueType::bean::<Employee>(),
        "reports" => reports: ValueType::list(ValueType::bean::<Employee>()),
    });

    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Empty;

    crate::impl_equality!(Empty);
    crate::impl_bean!(Empty {});

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    crate::impl_enum_constants!(Level { Low, High });

    #[derive(Debug, Clone, PartialEq)]
    struct Unknown;

    fn strategy() -> Arc<FactoryLookupStrategy> {
        let random = Arc::new(RandomValueGenerator::seeded(8));
        FactoryLookupStrategy::with_max_collection_size(Arc::new(FactoryRegistry::with_defaults(random)), 3)
    }

    #[test]
    fn test_registered_factory_wins() {
        let strategy = strategy();
        strategy
            .registry()
            .register_fn(ValueType::list(ValueType::I32), || Ok(Value::List(vec![])));
        let factory = strategy.lookup(&ValueType::list(ValueType::I32)).unwrap();
        assert_eq!(factory.create().unwrap(), Value::List(vec![]));
    }

    #[test]
    fn test_nested_containers_are_derived() {
        let strategy = strategy();
        let value_type = ValueType::map(ValueType::String, ValueType::array(ValueType::set(ValueType::Char)));
        match strategy.lookup(&value_type).unwrap().create().unwrap() {
            Value::Map(entries) => {
                assert!((1..=3).contains(&entries.len()));
                for (key, value) in entries {
                    assert!(matches!(key, Value::String(_)));
                    assert!(matches!(value, Value::Array(ref inner) if inner.iter().all(|v| matches!(v, Value::Set(_)))));
                }
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_enum_values_are_declared_constants() {
        let strategy = strategy();
        let factory = strategy.lookup(&ValueType::enumeration::<Level>()).unwrap();
        for _ in 0..20 {
            let level = factory.create().unwrap().into_enum::<Level>().unwrap();
            assert!(level == Level::Low || level == Level::High);
        }
    }

    #[test]
    fn test_structural_factories_are_memoized() {
        let strategy = strategy();
        let first = strategy.lookup(&ValueType::bean::<Employee>()).unwrap();
        let second = strategy.lookup(&ValueType::bean::<Employee>()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let employee = first.create().unwrap().into_bean::<Employee>().unwrap();
        assert!(!employee.name.is_empty());
        assert!(employee.manager.is_some());
        assert!(employee.reports.iter().all(|report| report.name.is_empty()));
    }

    #[test]
    fn test_underivable_types_fail() {
        let strategy = strategy();
        for value_type in [
            ValueType::custom::<Unknown>(),
            ValueType::list(ValueType::custom::<Unknown>()),
            ValueType::bean::<Empty>(),
        ] {
            assert!(matches!(
                strategy.lookup(&value_type),
                Err(FactoryError::NoSuchFactory { .. })
            ));
            assert!(!strategy.can_produce(&value_type));
        }
    }
}
