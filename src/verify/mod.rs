//! Contract verifiers
//!
//! Every verifier takes instances from an `EquivalentFactory` and reports
//! through `VerificationResult`, keeping input errors, contract violations and
//! execution errors apart. Input validation always happens before any law is
//! evaluated.

pub mod equals;
pub mod hash_code;
pub mod property;
pub mod significance;

pub use equals::EqualsContractVerifier;
pub use hash_code::HashCodeVerifier;
pub use property::PropertyTester;
pub use significance::{
    ensure_configured_properties_exist, ensure_insignificant_properties_exist, validate_property_names,
    PropertySignificanceVerifier,
};

use crate::bean::Bean;
use crate::config::Configuration;
use crate::error::{VerificationError, VerificationResult};
use crate::factories::EquivalentFactory;
use crate::registry::global_lookup_strategy;

/// Take one instance from the factory, rejecting a factory that yields none.
pub(crate) fn create_instance(factory: &dyn EquivalentFactory) -> Result<Box<dyn Bean>, VerificationError> {
    factory
        .create()?
        .ok_or_else(|| VerificationError::illegal_argument("Factory must create non-null objects."))
}

/// `a.equals(b)` as seen by the type under test.
pub(crate) fn bean_equals(a: &dyn Bean, b: &dyn Bean) -> bool {
    a.equals(Some(b.as_any()))
}

/// Check all six equality laws with default settings.
pub fn verify_equals_laws(factory: &dyn EquivalentFactory) -> VerificationResult {
    EqualsContractVerifier::new().verify_equals_method(factory)
}

/// Check that equality depends on exactly the significant properties.
///
/// Replacement values come from the factory's own lookup strategy, or from the
/// process-wide one when the factory has none.
pub fn verify_property_significance(
    factory: &dyn EquivalentFactory,
    configuration: &Configuration,
    insignificant: &[&str],
) -> VerificationResult {
    let lookup = factory.lookup().unwrap_or_else(global_lookup_strategy);
    PropertySignificanceVerifier::new(lookup).verify(factory, configuration, insignificant)
}
