//! Factories of distinct but value-equal bean instances
//!
//! The verifiers need several instances of a type that are separate objects yet
//! equal by construction. `EquivalentPopulatedBeanFactory` draws one value per
//! property the first time it is asked for an instance, remembers that value
//! set, and writes clones of it into every instance it creates afterwards.

use crate::bean::{Bean, BeanType};
use crate::config::Configuration;
use crate::error::BeanTestError;
use crate::lookup::FactoryLookupStrategy;
use crate::value::Value;
use log::debug;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Source of equivalent instances for the verifiers.
///
/// `Ok(None)` means the factory produced no instance at all, which the
/// verifiers reject as an input error.
pub trait EquivalentFactory {
    fn create(&self) -> Result<Option<Box<dyn Bean>>, BeanTestError>;

    /// The lookup strategy this factory draws property values from, if any.
    fn lookup(&self) -> Option<Arc<FactoryLookupStrategy>> {
        None
    }
}

impl<F> EquivalentFactory for F
where
    F: Fn() -> Result<Option<Box<dyn Bean>>, BeanTestError>,
{
    fn create(&self) -> Result<Option<Box<dyn Bean>>, BeanTestError> {
        self()
    }
}

/// Adapt a plain constructor closure into an `EquivalentFactory`.
pub fn equivalent_from_fn<T, F>(make: F) -> impl EquivalentFactory
where
    T: Bean,
    F: Fn() -> T,
{
    move || -> Result<Option<Box<dyn Bean>>, BeanTestError> { Ok(Some(Box::new(make()))) }
}

#[derive(Debug)]
pub struct EquivalentPopulatedBeanFactory {
    bean_type: BeanType,
    lookup: Arc<FactoryLookupStrategy>,
    configuration: Configuration,
    values: OnceCell<Vec<(&'static str, Value)>>,
}

impl EquivalentPopulatedBeanFactory {
    pub fn new(bean_type: BeanType, lookup: Arc<FactoryLookupStrategy>, configuration: Configuration) -> Self {
        Self {
            bean_type,
            lookup,
            configuration,
            values: OnceCell::new(),
        }
    }

    pub fn bean_type(&self) -> BeanType {
        self.bean_type
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    fn resolve_values(&self) -> Result<Vec<(&'static str, Value)>, BeanTestError> {
        let name = self.bean_type.name();
        let mut values = Vec::new();
        for property in self.bean_type.properties() {
            if !property.is_read_write() || self.configuration.is_ignored(property.name) {
                continue;
            }
            let value = match self.configuration.override_factory(property.name) {
                Some(factory) => factory.create(),
                None => self
                    .lookup
                    .lookup(&property.value_type)
                    .and_then(|factory| factory.create()),
            }
            .map_err(|e| BeanTestError::factory(name, property.name, e))?;
            values.push((property.name, value));
        }
        debug!("Resolved {} property values for [{}]", values.len(), name);
        Ok(values)
    }
}

impl EquivalentFactory for EquivalentPopulatedBeanFactory {
    fn create(&self) -> Result<Option<Box<dyn Bean>>, BeanTestError> {
        let name = self.bean_type.name();
        let values = self.values.get_or_try_init(|| self.resolve_values())?;
        let mut bean = self
            .bean_type
            .construct()
            .map_err(|e| BeanTestError::construction(name, e))?;
        for (property, value) in values {
            bean.write_property(property, value.clone())
                .map_err(|e| BeanTestError::access(name, property, e))?;
        }
        Ok(Some(bean))
    }

    fn lookup(&self) -> Option<Arc<FactoryLookupStrategy>> {
        Some(self.lookup.clone())
    }
}
