//! Equality law verifier
//!
//! Checks the six laws of the equality contract against instances from an
//! `EquivalentFactory`:
//!
//! | Law        | Check                                               |
//! |------------|-----------------------------------------------------|
//! | reflexive  | `a.equals(a)`                                       |
//! | symmetric  | `a.equals(b) == b.equals(a)`, given `a.equals(b)`   |
//! | transitive | `a.equals(b) && b.equals(c)` implies `a.equals(c)`  |
//! | consistent | `a.equals(b)` gives the same answer on every call   |
//! | null-safe  | `a.equals(None)` is false                           |
//! | type-safe  | `a` never equals a value of an unrelated type       |
//!
//! Each law can be checked alone; `verify_equals_method` runs them all.

use super::{bean_equals, create_instance};
use crate::error::{ContractViolation, EqualsLaw, VerificationError, VerificationResult};
use crate::factories::EquivalentFactory;
use log::debug;
use std::any::Any;

pub const DEFAULT_CONSISTENCY_CHECKS: u32 = 100;

/// A type no bean can legitimately be equal to.
struct Unrelated;

fn violation(law: EqualsLaw, detail: String) -> VerificationError {
    ContractViolation::EqualsLaw { law, detail }.into()
}

#[derive(Debug, Clone)]
pub struct EqualsContractVerifier {
    consistency_checks: u32,
}

impl EqualsContractVerifier {
    pub fn new() -> Self {
        Self::with_consistency_checks(DEFAULT_CONSISTENCY_CHECKS)
    }

    pub fn with_consistency_checks(consistency_checks: u32) -> Self {
        Self {
            consistency_checks: consistency_checks.max(1),
        }
    }

    pub fn verify_reflexive(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        if !bean_equals(&*a, &*a) {
            return Err(violation(
                EqualsLaw::Reflexive,
                format!("[{}] instance is not equal to itself", a.bean_type().name()),
            ));
        }
        Ok(())
    }

    pub fn verify_symmetric(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        let b = create_instance(factory)?;
        if !bean_equals(&*a, &*b) {
            return Err(VerificationError::illegal_argument(format!(
                "Cannot test equals symmetry of [{}] instances that are not equal.",
                a.bean_type().name()
            )));
        }
        if !bean_equals(&*b, &*a) {
            return Err(violation(
                EqualsLaw::Symmetric,
                format!("[{}] x.equals(y) is true but y.equals(x) is false", a.bean_type().name()),
            ));
        }
        Ok(())
    }

    pub fn verify_transitive(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        let b = create_instance(factory)?;
        let c = create_instance(factory)?;
        if !bean_equals(&*a, &*b) || !bean_equals(&*b, &*c) {
            return Err(VerificationError::illegal_argument(format!(
                "Cannot test equals transitivity of [{}] instances that are not equal.",
                a.bean_type().name()
            )));
        }
        if !bean_equals(&*a, &*c) {
            return Err(violation(
                EqualsLaw::Transitive,
                format!(
                    "[{}] x.equals(y) and y.equals(z) are true but x.equals(z) is false",
                    a.bean_type().name()
                ),
            ));
        }
        Ok(())
    }

    pub fn verify_consistent(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        let b = create_instance(factory)?;
        let first = bean_equals(&*a, &*b);
        for call in 1..self.consistency_checks {
            if bean_equals(&*a, &*b) != first {
                return Err(violation(
                    EqualsLaw::Consistent,
                    format!(
                        "[{}] x.equals(y) returned {} and then {} on call {}",
                        a.bean_type().name(),
                        first,
                        !first,
                        call + 1
                    ),
                ));
            }
        }
        Ok(())
    }

    pub fn verify_null(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        if a.equals(None) {
            return Err(violation(
                EqualsLaw::NullSafe,
                format!("[{}] instance is equal to null", a.bean_type().name()),
            ));
        }
        Ok(())
    }

    pub fn verify_different_type(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let a = create_instance(factory)?;
        if a.equals(Some(&Unrelated as &dyn Any)) {
            return Err(violation(
                EqualsLaw::TypeSafe,
                format!("[{}] instance is equal to a value of an unrelated type", a.bean_type().name()),
            ));
        }
        Ok(())
    }

    /// Check every law, stopping at the first failure.
    pub fn verify_equals_method(&self, factory: &dyn EquivalentFactory) -> VerificationResult {
        let prototype = create_instance(factory)?;
        debug!("Verifying equals laws of [{}]", prototype.bean_type().name());

        self.verify_reflexive(factory)?;
        self.verify_symmetric(factory)?;
        self.verify_transitive(factory)?;
        self.verify_consistent(factory)?;
        self.verify_null(factory)?;
        self.verify_different_type(factory)
    }
}

impl Default for EqualsContractVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bean::{hash_code_of, Bean, Equality};
    use crate::error::BeanTestError;
    use crate::factories::equivalent_from_fn;
    use crate::value::ValueType;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Point {
        x: i32,
        y: i32,
    }

    crate::impl_equality!(Point);
    crate::impl_bean!(Point {
        "x" => x: ValueType::I32,
        "y" => y: ValueType::I32,
    });

    /// Equality answers with a fixed flag, whatever it is compared with.
    #[derive(Debug, Clone, Default)]
    struct FixedAnswer {
        answer: bool,
    }

    impl Equality for FixedAnswer {
        fn equals(&self, _other: Option<&dyn Any>) -> bool {
            self.answer
        }

        fn hash_code(&self) -> u64 {
            0
        }
    }

    crate::impl_bean!(FixedAnswer {});

    /// Equality is true for the first `limit` comparisons across all instances.
    #[derive(Debug, Clone, Default)]
    struct Countdown {
        calls: Arc<AtomicUsize>,
        limit: usize,
    }

    impl Equality for Countdown {
        fn equals(&self, other: Option<&dyn Any>) -> bool {
            other.is_some() && self.calls.fetch_add(1, Ordering::SeqCst) < self.limit
        }

        fn hash_code(&self) -> u64 {
            0
        }
    }

    crate::impl_bean!(Countdown {});

    /// Compares by value but also claims equality with anything of another type.
    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Promiscuous {
        id: u8,
    }

    impl Equality for Promiscuous {
        fn equals(&self, other: Option<&dyn Any>) -> bool {
            match other {
                Some(other) => other.downcast_ref::<Self>().map_or(true, |other| self == other),
                None => false,
            }
        }

        fn hash_code(&self) -> u64 {
            hash_code_of(self)
        }
    }

    crate::impl_bean!(Promiscuous {});

    fn points() -> impl EquivalentFactory {
        equivalent_from_fn(|| Point { x: 3, y: 4 })
    }

    fn fixed(answer: bool) -> impl EquivalentFactory {
        equivalent_from_fn(move || FixedAnswer { answer })
    }

    fn countdown(limit: usize) -> impl EquivalentFactory {
        let calls = Arc::new(AtomicUsize::new(0));
        equivalent_from_fn(move || Countdown { calls: calls.clone(), limit })
    }

    fn null_factory() -> Result<Option<Box<dyn Bean>>, BeanTestError> {
        Ok(None)
    }

    #[test]
    fn test_correct_equality_passes_every_law() {
        let verifier = EqualsContractVerifier::new();
        verifier.verify_equals_method(&points()).unwrap();
        verifier.verify_reflexive(&points()).unwrap();
        verifier.verify_symmetric(&points()).unwrap();
        verifier.verify_transitive(&points()).unwrap();
        verifier.verify_consistent(&points()).unwrap();
        verifier.verify_null(&points()).unwrap();
        verifier.verify_different_type(&points()).unwrap();
    }

    #[test]
    fn test_null_instances_are_an_input_error_for_every_law() {
        let verifier = EqualsContractVerifier::new();
        let checks: [fn(&EqualsContractVerifier, &dyn EquivalentFactory) -> VerificationResult; 7] = [
            EqualsContractVerifier::verify_reflexive,
            EqualsContractVerifier::verify_symmetric,
            EqualsContractVerifier::verify_transitive,
            EqualsContractVerifier::verify_consistent,
            EqualsContractVerifier::verify_null,
            EqualsContractVerifier::verify_different_type,
            EqualsContractVerifier::verify_equals_method,
        ];
        for check in checks {
            assert!(check(&verifier, &null_factory).unwrap_err().is_illegal_argument());
        }
    }

    #[test]
    fn test_not_reflexive() {
        let error = EqualsContractVerifier::new().verify_reflexive(&fixed(false)).unwrap_err();
        assert!(matches!(
            error.violation(),
            Some(ContractViolation::EqualsLaw { law: EqualsLaw::Reflexive, .. })
        ));
    }

    #[test]
    fn test_unequal_baseline_is_an_input_error() {
        let verifier = EqualsContractVerifier::new();
        assert!(verifier.verify_symmetric(&fixed(false)).unwrap_err().is_illegal_argument());
        assert!(verifier.verify_transitive(&fixed(false)).unwrap_err().is_illegal_argument());
    }

    #[test]
    fn test_not_symmetric() {
        let created = AtomicUsize::new(0);
        let factory = equivalent_from_fn(move || FixedAnswer {
            answer: created.fetch_add(1, Ordering::SeqCst) != 1,
        });
        let error = EqualsContractVerifier::new().verify_symmetric(&factory).unwrap_err();
        assert!(matches!(
            error.violation(),
            Some(ContractViolation::EqualsLaw { law: EqualsLaw::Symmetric, .. })
        ));
    }

    #[test]
    fn test_not_transitive() {
        let error = EqualsContractVerifier::new().verify_transitive(&countdown(2)).unwrap_err();
        assert!(matches!(
            error.violation(),
            Some(ContractViolation::EqualsLaw { law: EqualsLaw::Transitive, .. })
        ));
    }

    #[test]
    fn test_not_consistent() {
        let error = EqualsContractVerifier::new().verify_consistent(&countdown(97)).unwrap_err();
        assert!(matches!(
            error.violation(),
            Some(ContractViolation::EqualsLaw { law: EqualsLaw::Consistent, .. })
        ));
    }

    #[test]
    fn test_equal_to_null() {
        let error = EqualsContractVerifier::new().verify_null(&fixed(true)).unwrap_err();
        assert!(matches!(
            error.violation(),
            Some(ContractViolation::EqualsLaw { law: EqualsLaw::NullSafe, .. })
        ));
    }

    #[test]
    fn test_equal_to_unrelated_type() {
        let factory = equivalent_from_fn(|| Promiscuous { id: 1 });
        let verifier = EqualsContractVerifier::new();
        verifier.verify_null(&factory).unwrap();
        let error = verifier.verify_different_type(&factory).unwrap_err();
        assert!(matches!(
            error.violation(),
            Some(ContractViolation::EqualsLaw { law: EqualsLaw::TypeSafe, .. })
        ));
        assert!(verifier.verify_equals_method(&factory).unwrap_err().is_violation());
    }

    #[test]
    fn test_factory_failure_is_an_execution_error() {
        let failing = || -> Result<Option<Box<dyn Bean>>, BeanTestError> {
            Err(BeanTestError::factory_failure("Point", "exhausted"))
        };
        let error = EqualsContractVerifier::new().verify_reflexive(&failing).unwrap_err();
        assert!(error.is_execution());
    }
}
