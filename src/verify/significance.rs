//! Property significance verifier
//!
//! Checks that equality depends on exactly the properties it should. For each
//! readable and writable property P that is not ignored:
//!
//! 1. take a control instance A and an instance B from the factory;
//! 2. read P from both (a null or differing baseline is an input error);
//! 3. draw a replacement for P, either from the configured override factory or
//!    by redrawing from P's default factory until the value differs from A's;
//! 4. write the replacement into B only;
//! 5. require `A.equals(B)` to be false if P is significant and the value
//!    changed, and true otherwise.
//!
//! Over-inclusive equality shows up as a violation with expectation `Equal`,
//! under-inclusive equality as one with expectation `NotEqual`.

use super::{bean_equals, create_instance, EqualsContractVerifier};
use crate::bean::{Bean, BeanType, PropertyDescriptor};
use crate::config::Configuration;
use crate::error::{
    BeanTestError, ContractViolation, EqualityExpectation, ExecutionCause, FactoryError, VerificationError,
    VerificationResult,
};
use crate::factories::EquivalentFactory;
use crate::lookup::FactoryLookupStrategy;
use crate::value::Value;
use log::{debug, warn};
use std::sync::Arc;

pub const DEFAULT_DISTINCT_VALUE_ATTEMPTS: u32 = 32;

/// Reject insignificant names the bean type does not declare. All unknown names
/// are reported at once, in the order given.
pub fn ensure_insignificant_properties_exist<S: AsRef<str>>(
    bean_type: &BeanType,
    insignificant: &[S],
) -> VerificationResult {
    let unknown: Vec<&str> = insignificant
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !bean_type.has_property(name))
        .collect();
    if unknown.is_empty() {
        return Ok(());
    }
    Err(VerificationError::illegal_argument(format!(
        "Insignificant properties [{}] do not exist on {}.",
        unknown.join(","),
        bean_type.name()
    )))
}

/// Reject ignored and overridden names the bean type does not declare.
pub fn ensure_configured_properties_exist(bean_type: &BeanType, configuration: &Configuration) -> VerificationResult {
    let unknown = configuration.unknown_properties(bean_type);
    if unknown.is_empty() {
        return Ok(());
    }
    Err(VerificationError::illegal_argument(format!(
        "Configured properties [{}] do not exist on {}.",
        unknown.join(","),
        bean_type.name()
    )))
}

/// Check every configured and insignificant name against `bean_type`, and
/// return the insignificant set: the configuration's names followed by
/// `insignificant`, duplicates dropped.
pub fn validate_property_names(
    bean_type: &BeanType,
    configuration: &Configuration,
    insignificant: &[&str],
) -> Result<Vec<String>, VerificationError> {
    ensure_configured_properties_exist(bean_type, configuration)?;

    let mut names: Vec<String> = configuration.insignificant_properties().to_vec();
    for &name in insignificant {
        if !names.iter().any(|existing| existing == name) {
            names.push(name.to_string());
        }
    }
    ensure_insignificant_properties_exist(bean_type, &names)?;
    Ok(names)
}

#[derive(Debug, Clone)]
pub struct PropertySignificanceVerifier {
    lookup: Arc<FactoryLookupStrategy>,
    equals_verifier: EqualsContractVerifier,
    distinct_value_attempts: u32,
}

impl PropertySignificanceVerifier {
    pub fn new(lookup: Arc<FactoryLookupStrategy>) -> Self {
        Self {
            lookup,
            equals_verifier: EqualsContractVerifier::new(),
            distinct_value_attempts: DEFAULT_DISTINCT_VALUE_ATTEMPTS,
        }
    }

    pub fn with_distinct_value_attempts(mut self, attempts: u32) -> Self {
        self.distinct_value_attempts = attempts.max(1);
        self
    }

    pub fn lookup(&self) -> &Arc<FactoryLookupStrategy> {
        &self.lookup
    }

    /// `insignificant` is merged after the configuration's own insignificant
    /// names; duplicates are dropped.
    pub fn verify(
        &self,
        factory: &dyn EquivalentFactory,
        configuration: &Configuration,
        insignificant: &[&str],
    ) -> VerificationResult {
        let bean_type = create_instance(factory)?.bean_type();
        self.equals_verifier.verify_symmetric(factory)?;

        let names = validate_property_names(&bean_type, configuration, insignificant)?;

        debug!(
            "Verifying property significance of [{}] with insignificant {:?}",
            bean_type.name(),
            names
        );
        for property in bean_type.properties() {
            if !property.is_read_write() || configuration.is_ignored(property.name) {
                continue;
            }
            let significant = !names.iter().any(|name| name == property.name);
            self.verify_property(factory, configuration, &property, significant)?;
        }
        Ok(())
    }

    fn verify_property(
        &self,
        factory: &dyn EquivalentFactory,
        configuration: &Configuration,
        property: &PropertyDescriptor,
        significant: bool,
    ) -> VerificationResult {
        let control = create_instance(factory)?;
        let mut mutated = create_instance(factory)?;
        let bean = control.bean_type().name();
        let read = |instance: &dyn Bean| {
            instance
                .read_property(property.name)
                .map_err(|e| BeanTestError::access(bean, property.name, e))
        };

        let original = read(&*control)?;
        let current = read(&*mutated)?;
        if original.is_null() || current.is_null() {
            return Err(VerificationError::illegal_argument(format!(
                "Cannot test equals if property [{}] of [{}] is null.",
                property.name, bean
            )));
        }
        if original != current {
            return Err(VerificationError::illegal_argument(format!(
                "Cannot test equals if factory creates [{}] instances with different [{}] values.",
                bean, property.name
            )));
        }

        let replacement = self.replacement_value(bean, property, configuration, &original)?;
        let expected = if significant && replacement != original {
            EqualityExpectation::NotEqual
        } else {
            EqualityExpectation::Equal
        };
        mutated
            .write_property(property.name, replacement)
            .map_err(|e| BeanTestError::access(bean, property.name, e))?;

        let equal = bean_equals(&*control, &*mutated);
        debug!("Property [{}] of [{}]: equal after change = {}", property.name, bean, equal);
        match (expected, equal) {
            (EqualityExpectation::NotEqual, true) => Err(ContractViolation::PropertySignificance {
                property: property.name.to_string(),
                expected,
                detail: format!(
                    "[{}] instances stayed equal although significant property [{}] changed",
                    bean, property.name
                ),
            }
            .into()),
            (EqualityExpectation::Equal, false) => Err(ContractViolation::PropertySignificance {
                property: property.name.to_string(),
                expected,
                detail: format!(
                    "[{}] instances became unequal although property [{}] is {}",
                    bean,
                    property.name,
                    if significant { "unchanged" } else { "insignificant" }
                ),
            }
            .into()),
            _ => Ok(()),
        }
    }

    /// An override factory is drawn once and its value used as is; the default
    /// factory is redrawn until it yields something other than `original`.
    fn replacement_value(
        &self,
        bean: &str,
        property: &PropertyDescriptor,
        configuration: &Configuration,
        original: &Value,
    ) -> Result<Value, VerificationError> {
        let factory_error = |e: FactoryError| BeanTestError::factory(bean, property.name, e);

        if let Some(factory) = configuration.override_factory(property.name) {
            return factory.create().map_err(|e| factory_error(e).into());
        }

        let factory = self.lookup.lookup(&property.value_type).map_err(factory_error)?;
        for _ in 0..self.distinct_value_attempts {
            let candidate = factory.create().map_err(factory_error)?;
            if candidate != *original {
                return Ok(candidate);
            }
        }

        warn!(
            "No value distinct from the current one for property [{}] of [{}] after {} attempts",
            property.name, bean, self.distinct_value_attempts
        );
        Err(BeanTestError::new(
            bean,
            Some(property.name),
            ExecutionCause::DistinctValueExhausted {
                attempts: self.distinct_value_attempts,
            },
        )
        .into())
    }
}
