//! Hash-code law verifier
//!
//! Equal objects must have equal hash codes, and one object's hash code must
//! not change between calls while the object is unchanged.

use super::equals::DEFAULT_CONSISTENCY_CHECKS;
use super::{bean_equals, create_instance};
use crate::error::{ContractViolation, HashCodeLaw, VerificationError, VerificationResult};
use crate::factories::EquivalentFactory;
use log::debug;

fn violation(law: HashCodeLaw, detail: String) -> VerificationError {
    ContractViolation::HashCode { law, detail }.into()
}

#[derive(Debug, Clone)]
pub struct HashCodeVerifier {
    consistency_checks: u32,
}

impl HashCodeVerifier {
    pub fn new() -> Self {
        Self::with_consistency_checks(DEFAULT_CONSISTENCY_CHECKS)
    }

    pub fn with_consistency_checks(consistency_checks: u32) -> Self {
        Self {
            consistency_checks: consistency_checks.max(1),
        }
    }

    pub fn verify_hash_codes_equal(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        let b = create_instance(factory)?;
        if !bean_equals(&*a, &*b) {
            return Err(VerificationError::illegal_argument(format!(
                "Cannot test hash codes of [{}] instances that are not equal.",
                a.bean_type().name()
            )));
        }
        let (hash_a, hash_b) = (a.hash_code(), b.hash_code());
        if hash_a != hash_b {
            return Err(violation(
                HashCodeLaw::EqualObjects,
                format!(
                    "[{}] equal instances have hash codes 0x{:X} and 0x{:X}",
                    a.bean_type().name(),
                    hash_a,
                    hash_b
                ),
            ));
        }
        Ok(())
    }

    pub fn verify_hash_code_consistent(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        let first = a.hash_code();
        for call in 1..self.consistency_checks {
            let next = a.hash_code();
            if next != first {
                return Err(violation(
                    HashCodeLaw::Consistent,
                    format!(
                        "[{}] hash code changed from 0x{:X} to 0x{:X} on call {}",
                        a.bean_type().name(),
                        first,
                        next,
                        call + 1
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn verify_hash_code_method(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let prototype = create_instance(factory)?;
        debug!("Verifying hash code laws of [{}]", prototype.bean_type().name());

        self.verify_hash_codes_equal(factory)?;
        self.verify_hash_code_consistent(factory)
    }
}

impl Default for HashCodeVerifier {
    fn default() -> Self {
        Self::new()
    }
}
