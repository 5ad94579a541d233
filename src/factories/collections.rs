//! Container factories
//!
//! Element (and key) factories are resolved once, when the lookup strategy
//! derives the container factory. Each `create()` draws a size in
//! `1..=max_size` and fills it; sets and maps drop duplicate draws, so they may
//! come out smaller but never empty.

use super::TypeFactory;
use crate::error::FactoryError;
use crate::random::RandomValueGenerator;
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    Array,
    List,
    Set,
    Queue,
}

#[derive(Debug)]
pub struct CollectionFactory {
    kind: CollectionKind,
    element: Arc<dyn TypeFactory>,
    random: Arc<RandomValueGenerator>,
    max_size: usize,
}

impl CollectionFactory {
    pub fn new(
        kind: CollectionKind,
        element: Arc<dyn TypeFactory>,
        random: Arc<RandomValueGenerator>,
        max_size: usize,
    ) -> Self {
        Self { kind, element, random, max_size }
    }
}

impl TypeFactory for CollectionFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        let size = self.random.next_size(1, self.max_size);
        let mut items = Vec::with_capacity(size);
        for _ in 0..size {
            let item = self.element.create()?;
            if self.kind == CollectionKind::Set && items.contains(&item) {
                continue;
            }
            items.push(item);
        }

        Ok(match self.kind {
            CollectionKind::Array => Value::Array(items),
            CollectionKind::List => Value::List(items),
            CollectionKind::Set => Value::Set(items),
            CollectionKind::Queue => Value::Queue(VecDeque::from(items)),
        })
    }
}

#[derive(Debug)]
pub struct MapFactory {
    key: Arc<dyn TypeFactory>,
    value: Arc<dyn TypeFactory>,
    random: Arc<RandomValueGenerator>,
    max_size: usize,
}

impl MapFactory {
    pub fn new(
        key: Arc<dyn TypeFactory>,
        value: Arc<dyn TypeFactory>,
        random: Arc<RandomValueGenerator>,
        max_size: usize,
    ) -> Self {
        Self { key, value, random, max_size }
    }
}

impl TypeFactory for MapFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        let size = self.random.next_size(1, self.max_size);
        let mut entries: Vec<(Value, Value)> = Vec::with_capacity(size);
        for _ in 0..size {
            let key = self.key.create()?;
            if entries.iter().any(|(existing, _)| *existing == key) {
                continue;
            }
            let value = self.value.create()?;
            entries.push((key, value));
        }
        Ok(Value::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::basic::{BooleanFactory, I64Factory, StringFactory};

    fn random() -> Arc<RandomValueGenerator> {
        Arc::new(RandomValueGenerator::seeded(5))
    }

    #[test]
    fn test_list_sizes_within_bounds() {
        let random = random();
        let factory = CollectionFactory::new(
            CollectionKind::List,
            Arc::new(StringFactory::new(random.clone())),
            random,
            4,
        );
        for _ in 0..50 {
            match factory.create().unwrap() {
                Value::List(items) => {
                    assert!((1..=4).contains(&items.len()));
                    assert!(items.iter().all(|item| matches!(item, Value::String(_))));
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_sets_hold_unique_elements() {
        let random = random();
        let factory = CollectionFactory::new(
            CollectionKind::Set,
            Arc::new(BooleanFactory::new(random.clone())),
            random,
            8,
        );
        for _ in 0..50 {
            match factory.create().unwrap() {
                Value::Set(items) => {
                    assert!(!items.is_empty() && items.len() <= 2);
                    if items.len() == 2 {
                        assert_ne!(items[0], items[1]);
                    }
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_queue_and_array_shapes() {
        let random = random();
        let element: Arc<dyn TypeFactory> = Arc::new(I64Factory::new(random.clone()));
        let queue = CollectionFactory::new(CollectionKind::Queue, element.clone(), random.clone(), 3);
        let array = CollectionFactory::new(CollectionKind::Array, element, random, 3);
        assert!(matches!(queue.create().unwrap(), Value::Queue(_)));
        assert!(matches!(array.create().unwrap(), Value::Array(_)));
    }

    #[test]
    fn test_map_keys_are_unique() {
        let random = random();
        let factory = MapFactory::new(
            Arc::new(BooleanFactory::new(random.clone())),
            Arc::new(StringFactory::new(random.clone())),
            random,
            8,
        );
        for _ in 0..50 {
            match factory.create().unwrap() {
                Value::Map(entries) => {
                    assert!(!entries.is_empty() && entries.len() <= 2);
                    if entries.len() == 2 {
                        assert_ne!(entries[0].0, entries[1].0);
                    }
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
