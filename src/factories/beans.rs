//! Structural factory for nested beans
//!
//! Builds a default instance of the bean type and writes a fresh random value
//! into every readable and writable property, resolving property factories
//! through the lookup strategy that created this factory.
//!
//! Self-referencing types would recurse forever, so population is guarded per
//! thread: while an instance of a type is being populated, a nested request for
//! the same type yields a default, unpopulated instance.

use super::TypeFactory;
use crate::bean::{BeanType, PropertyDescriptor};
use crate::error::{BeanTestError, FactoryError};
use crate::lookup::FactoryLookupStrategy;
use crate::value::Value;
use log::debug;
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Weak;

thread_local! {
    static IN_PROGRESS: RefCell<HashSet<TypeId>> = RefCell::new(HashSet::new());
}

/// Marks a bean type as being populated on this thread until dropped.
struct PopulationGuard {
    type_id: TypeId,
}

impl PopulationGuard {
    /// `None` if the type is already being populated further up the stack.
    fn enter(type_id: TypeId) -> Option<Self> {
        IN_PROGRESS
            .with(|in_progress| in_progress.borrow_mut().insert(type_id))
            .then(|| Self { type_id })
    }
}

impl Drop for PopulationGuard {
    fn drop(&mut self) {
        IN_PROGRESS.with(|in_progress| {
            in_progress.borrow_mut().remove(&self.type_id);
        });
    }
}

#[derive(Debug)]
pub struct PopulatedBeanFactory {
    bean_type: BeanType,
    lookup: Weak<FactoryLookupStrategy>,
}

impl PopulatedBeanFactory {
    pub fn new(bean_type: BeanType, lookup: Weak<FactoryLookupStrategy>) -> Self {
        Self { bean_type, lookup }
    }

    pub fn bean_type(&self) -> BeanType {
        self.bean_type
    }

    fn nested_failure(error: BeanTestError) -> FactoryError {
        FactoryError::BeanCreation(Box::new(error))
    }
}

impl TypeFactory for PopulatedBeanFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        let name = self.bean_type.name();
        let lookup = self.lookup.upgrade().ok_or(FactoryError::LookupUnavailable)?;
        let mut bean = self
            .bean_type
            .construct()
            .map_err(|e| Self::nested_failure(BeanTestError::construction(name, e)))?;

        let _guard = match PopulationGuard::enter(self.bean_type.type_id()) {
            Some(guard) => guard,
            None => {
                debug!("Returning shallow [{}] instance for recursive reference", name);
                return Ok(Value::Bean(bean));
            }
        };

        for property in self.bean_type.properties().iter().filter(|p| p.is_read_write()) {
            let PropertyDescriptor { name: property, value_type, .. } = property;
            let value = lookup
                .lookup(value_type)
                .and_then(|factory| factory.create())
                .map_err(|e| Self::nested_failure(BeanTestError::factory(name, property, e)))?;
            bean.write_property(property, value)
                .map_err(|e| Self::nested_failure(BeanTestError::access(name, property, e)))?;
        }

        debug!("Populated nested [{}] instance", name);
        Ok(Value::Bean(bean))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::BeanDescriptor;
    use crate::registry::FactoryRegistry;
    use crate::random::RandomValueGenerator;
    use crate::value::ValueType;
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Node {
        label: String,
        next: Option<Box<Node>>,
    }

    crate::impl_equality!(Node);
    crate::impl_bean!(Node {
        "label" => label: ValueType::String,
        "next" => next: ValueType::bean::<Node>(),
    });

    #[test]
    fn test_self_reference_is_cut_after_one_level() {
        let registry = Arc::new(FactoryRegistry::with_defaults(Arc::new(RandomValueGenerator::seeded(2))));
        let lookup = FactoryLookupStrategy::new(registry);
        let factory = PopulatedBeanFactory::new(BeanType::of::<Node>(), Arc::downgrade(&lookup));

        let node = factory.create().unwrap().into_bean::<Node>().unwrap();
        assert!(!node.label.is_empty());
        let next = node.next.expect("nested node populated");
        assert_eq!(*next, Node::construct().unwrap());
    }

    #[test]
    fn test_dropped_lookup_is_reported() {
        let registry = Arc::new(FactoryRegistry::with_defaults(Arc::new(RandomValueGenerator::seeded(2))));
        let lookup = FactoryLookupStrategy::new(registry);
        let factory = PopulatedBeanFactory::new(BeanType::of::<Node>(), Arc::downgrade(&lookup));
        drop(lookup);
        assert!(matches!(factory.create(), Err(FactoryError::LookupUnavailable)));
    }
}
