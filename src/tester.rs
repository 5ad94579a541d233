//! Bean tester
//!
//! Ties the registry, lookup strategy and verifiers together behind one
//! entry point. `test_bean` round-trips every testable property on fresh
//! instances; `test_equals_and_hash_code` runs the equality, hash-code and
//! significance checks against populated equivalent instances.
//!
//! ```rust
//! use beancheck::{impl_bean, impl_equality, BeanTester, BeanType, Configuration, ValueType};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Hash)]
//! struct Song {
//!     title: String,
//!     plays: u32,
//! }
//!
//! impl_equality!(Song);
//! impl_bean!(Song {
//!     "title" => title: ValueType::String,
//!     "plays" => plays: ValueType::U32,
//! });
//!
//! let tester = BeanTester::builder().iterations(10).seed(7).build();
//! let song = BeanType::of::<Song>();
//! tester.test_bean(song, &Configuration::default()).unwrap();
//! tester.test_equals_and_hash_code(song, &Configuration::default(), &[]).unwrap();
//! ```

use crate::bean::BeanType;
use crate::config::{Configuration, TesterConfig};
use crate::error::{BeanTestError, VerificationResult};
use crate::factories::{EquivalentPopulatedBeanFactory, TypeFactory};
use crate::lookup::FactoryLookupStrategy;
use crate::random::RandomValueGenerator;
use crate::registry::FactoryRegistry;
use crate::verify::{
    ensure_configured_properties_exist, validate_property_names, EqualsContractVerifier, HashCodeVerifier,
    PropertySignificanceVerifier, PropertyTester,
};
use log::debug;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct BeanTester {
    config: TesterConfig,
    lookup: Arc<FactoryLookupStrategy>,
    property_tester: PropertyTester,
    equals_verifier: EqualsContractVerifier,
    hash_code_verifier: HashCodeVerifier,
    significance_verifier: PropertySignificanceVerifier,
}

impl BeanTester {
    /// A tester with its own default registry, seeded from `config.seed` when set.
    pub fn new(config: TesterConfig) -> Self {
        let random = match config.seed {
            Some(seed) => RandomValueGenerator::seeded(seed),
            None => RandomValueGenerator::new(),
        };
        let registry = Arc::new(FactoryRegistry::with_defaults(Arc::new(random)));
        Self::with_registry(config, registry)
    }

    /// A tester drawing values from `registry`. The registry's own random
    /// generator is used, so `config.seed` has no effect here.
    pub fn with_registry(config: TesterConfig, registry: Arc<FactoryRegistry>) -> Self {
        let lookup = FactoryLookupStrategy::with_max_collection_size(registry, config.max_collection_size);
        let significance_verifier = PropertySignificanceVerifier::new(lookup.clone())
            .with_distinct_value_attempts(config.distinct_value_attempts);
        Self {
            lookup,
            property_tester: PropertyTester::new(),
            equals_verifier: EqualsContractVerifier::with_consistency_checks(config.consistency_checks),
            hash_code_verifier: HashCodeVerifier::with_consistency_checks(config.consistency_checks),
            significance_verifier,
            config,
        }
    }

    pub fn builder() -> BeanTesterBuilder {
        BeanTesterBuilder::default()
    }

    pub fn config(&self) -> &TesterConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<FactoryRegistry> {
        self.lookup.registry()
    }

    pub fn lookup(&self) -> &Arc<FactoryLookupStrategy> {
        &self.lookup
    }

    pub fn equals_verifier(&self) -> &EqualsContractVerifier {
        &self.equals_verifier
    }

    pub fn hash_code_verifier(&self) -> &HashCodeVerifier {
        &self.hash_code_verifier
    }

    pub fn significance_verifier(&self) -> &PropertySignificanceVerifier {
        &self.significance_verifier
    }

    /// Round-trip every readable, writable and non-ignored property of
    /// `bean_type` on `iterations` freshly constructed instances.
    pub fn test_bean(&self, bean_type: BeanType, configuration: &Configuration) -> VerificationResult {
        let name = bean_type.name();
        ensure_configured_properties_exist(&bean_type, configuration)?;

        let mut testable = Vec::new();
        for property in bean_type.properties() {
            if !property.is_read_write() || configuration.is_ignored(property.name) {
                debug!("Skipping property [{}] of [{}]", property.name, name);
                continue;
            }
            let factory: Arc<dyn TypeFactory> = match configuration.override_factory(property.name) {
                Some(factory) => factory.clone(),
                None => self
                    .lookup
                    .lookup(&property.value_type)
                    .map_err(|e| BeanTestError::factory(name, property.name, e))?,
            };
            testable.push((property, factory));
        }

        debug!(
            "Testing {} properties of [{}] over {} iterations",
            testable.len(),
            name,
            self.config.iterations
        );
        for _ in 0..self.config.iterations {
            let mut bean = bean_type.construct().map_err(|e| BeanTestError::construction(name, e))?;
            for (property, factory) in &testable {
                self.property_tester.test_property(&mut *bean, property, &**factory)?;
            }
        }
        Ok(())
    }

    /// `test_bean` with an empty configuration for each type, stopping at the
    /// first failure.
    pub fn test_beans(&self, bean_types: &[BeanType]) -> VerificationResult {
        let configuration = Configuration::default();
        for bean_type in bean_types {
            self.test_bean(*bean_type, &configuration)?;
        }
        Ok(())
    }

    /// Equality laws, hash-code laws and property significance of
    /// `bean_type`, checked against populated equivalent instances. Property
    /// names are validated before any law is evaluated.
    pub fn test_equals_and_hash_code(
        &self,
        bean_type: BeanType,
        configuration: &Configuration,
        insignificant: &[&str],
    ) -> VerificationResult {
        validate_property_names(&bean_type, configuration, insignificant)?;
        let factory = EquivalentPopulatedBeanFactory::new(bean_type, self.lookup.clone(), configuration.clone());
        self.equals_verifier.verify_equals_method(&factory)?;
        self.hash_code_verifier.verify_hash_code_method(&factory)?;
        self.significance_verifier.verify(&factory, configuration, insignificant)
    }
}

impl Default for BeanTester {
    fn default() -> Self {
        Self::new(TesterConfig::default())
    }
}

#[derive(Debug, Default)]
pub struct BeanTesterBuilder {
    config: TesterConfig,
    registry: Option<Arc<FactoryRegistry>>,
}

impl BeanTesterBuilder {
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.config.iterations = iterations;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn consistency_checks(mut self, consistency_checks: u32) -> Self {
        self.config.consistency_checks = consistency_checks;
        self
    }

    pub fn distinct_value_attempts(mut self, attempts: u32) -> Self {
        self.config.distinct_value_attempts = attempts;
        self
    }

    pub fn max_collection_size(mut self, max_collection_size: usize) -> Self {
        self.config.max_collection_size = max_collection_size;
        self
    }

    /// Draw values from `registry` instead of a fresh default one.
    pub fn registry(mut self, registry: Arc<FactoryRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn build(self) -> BeanTester {
        match self.registry {
            Some(registry) => BeanTester::with_registry(self.config, registry),
            None => BeanTester::new(self.config),
        }
    }
}
