//! Property round-trip tester
//!
//! A value written through a property's write accessor must come back
//! unchanged from its read accessor.

use crate::bean::{Bean, PropertyDescriptor};
use crate::error::{BeanTestError, ContractViolation, VerificationError, VerificationResult};
use crate::factories::TypeFactory;
use log::debug;

#[derive(Debug, Clone, Default)]
pub struct PropertyTester;

impl PropertyTester {
    pub fn new() -> Self {
        Self
    }

    /// Write a fresh value from `factory` into `property` of `bean` and read it back.
    pub fn test_property(
        &self,
        bean: &mut dyn Bean,
        property: &PropertyDescriptor,
        factory: &dyn TypeFactory,
    ) -> VerificationResult {
        let bean_name = bean.bean_type().name();
        if !property.is_read_write() {
            return Err(VerificationError::illegal_argument(format!(
                "Property [{}] of [{}] must be readable and writable to be tested.",
                property.name, bean_name
            )));
        }

        let value = factory
            .create()
            .map_err(|e| BeanTestError::factory(bean_name, property.name, e))?;
        bean.write_property(property.name, value.clone())
            .map_err(|e| BeanTestError::access(bean_name, property.name, e))?;
        let read = bean
            .read_property(property.name)
            .map_err(|e| BeanTestError::access(bean_name, property.name, e))?;

        if read != value {
            return Err(ContractViolation::PropertyRoundTrip {
                property: property.name.to_string(),
                detail: format!("[{}] stored {:?} but returned {:?}", bean_name, value, read),
            }
            .into());
        }
        debug!("Property [{}] of [{}] round-trips", property.name, bean_name);
        Ok(())
    }
}
