//! Per-type test configuration and tester settings
//!
//! A `Configuration` is built once and never changes afterwards. Property names
//! in it are plain strings and are only checked against the bean type when a
//! verifier uses them.

use crate::bean::BeanType;
use crate::factories::TypeFactory;
use std::collections::HashMap;
use std::sync::Arc;

/// Properties to skip, properties known not to affect equality, and
/// per-property factory overrides.
#[derive(Debug, Clone, Default)]
pub struct Configuration {
    ignored: Vec<String>,
    insignificant: Vec<String>,
    overrides: HashMap<String, Arc<dyn TypeFactory>>,
}

impl Configuration {
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    pub fn ignored_properties(&self) -> &[String] {
        &self.ignored
    }

    pub fn insignificant_properties(&self) -> &[String] {
        &self.insignificant
    }

    pub fn is_ignored(&self, property: &str) -> bool {
        self.ignored.iter().any(|name| name == property)
    }

    pub fn override_factory(&self, property: &str) -> Option<&Arc<dyn TypeFactory>> {
        self.overrides.get(property)
    }

    /// Ignored and overridden property names that `bean_type` does not
    /// declare, ignored names first. Insignificant names are checked by the
    /// significance verifier together with its explicit arguments.
    pub fn unknown_properties(&self, bean_type: &BeanType) -> Vec<String> {
        let mut override_names: Vec<&String> = self.overrides.keys().collect();
        override_names.sort();

        let mut unknown: Vec<String> = Vec::new();
        for name in self.ignored.iter().chain(override_names) {
            if !bean_type.has_property(name) && !unknown.contains(name) {
                unknown.push(name.clone());
            }
        }
        unknown
    }
}

#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    configuration: Configuration,
}

impl ConfigurationBuilder {
    /// Exclude a property from population and testing.
    pub fn ignore_property(mut self, property: impl Into<String>) -> Self {
        let property = property.into();
        if !self.configuration.ignored.contains(&property) {
            self.configuration.ignored.push(property);
        }
        self
    }

    /// Declare a property that must not influence equality.
    pub fn insignificant_property(mut self, property: impl Into<String>) -> Self {
        let property = property.into();
        if !self.configuration.insignificant.contains(&property) {
            self.configuration.insignificant.push(property);
        }
        self
    }

    /// Produce values for a property with `factory` instead of the one
    /// resolved from its declared type. A later override replaces an earlier one.
    pub fn override_factory(mut self, property: impl Into<String>, factory: Arc<dyn TypeFactory>) -> Self {
        self.configuration.overrides.insert(property.into(), factory);
        self
    }

    pub fn build(self) -> Configuration {
        self.configuration
    }
}

/// Tuning knobs for `BeanTester`.
#[derive(Debug, Clone)]
pub struct TesterConfig {
    /// Fresh instances per bean type in round-trip testing
    pub iterations: u32,

    /// Repetitions of the consistency checks
    pub consistency_checks: u32,

    /// Redraws allowed when looking for a value distinct from the current one
    pub distinct_value_attempts: u32,

    /// Upper bound on generated collection sizes
    pub max_collection_size: usize,

    /// Seed for the random generator; drawn from the OS when absent
    pub seed: Option<u64>,
}

impl Default for TesterConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            consistency_checks: 100,
            distinct_value_attempts: 32,
            max_collection_size: 8,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factories::FnFactory;
    use crate::value::{Value, ValueType};

    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Pair {
        left: String,
        right: String,
    }

    crate::impl_equality!(Pair);
    crate::impl_bean!(Pair {
        "left" => left: ValueType::String,
        "right" => right: ValueType::String,
    });

    #[test]
    fn test_builder_collects_settings() {
        let configuration = Configuration::builder()
            .ignore_property("left")
            .ignore_property("left")
            .insignificant_property("right")
            .override_factory("right", Arc::new(FnFactory::new("fixed", || Ok(Value::String("x".into())))))
            .build();

        assert_eq!(configuration.ignored_properties(), ["left".to_string()]);
        assert!(configuration.is_ignored("left"));
        assert!(!configuration.is_ignored("right"));
        assert_eq!(configuration.insignificant_properties(), ["right".to_string()]);
        let factory = configuration.override_factory("right").unwrap();
        assert_eq!(factory.create().unwrap(), Value::String("x".into()));
        assert!(configuration.override_factory("left").is_none());
    }

    #[test]
    fn test_unknown_properties_are_reported_lazily() {
        let configuration = Configuration::builder()
            .ignore_property("middle")
            .insignificant_property("bottom")
            .override_factory("top", Arc::new(FnFactory::new("top", || Ok(Value::Null))))
            .override_factory("left", Arc::new(FnFactory::new("left", || Ok(Value::Null))))
            .build();
        let bean_type = crate::bean::BeanType::of::<Pair>();
        assert_eq!(configuration.unknown_properties(&bean_type), vec!["middle", "top"]);
        assert!(Configuration::default().unknown_properties(&bean_type).is_empty());
    }

    #[test]
    fn test_tester_config_defaults() {
        let config = TesterConfig::default();
        assert_eq!(config.iterations, 100);
        assert_eq!(config.distinct_value_attempts, 32);
        assert_eq!(config.max_collection_size, 8);
        assert!(config.seed.is_none());
    }
}
