//! Error types for bean verification.
//!
//! Failures fall into three disjoint categories and callers are expected to
//! tell them apart:
//!
//! - **Input errors** (`VerificationError::IllegalArgument`): the verifier was
//!   misused, e.g. the factory produced nothing, the baseline instances were
//!   not equal, or a property name does not exist on the type.
//! - **Contract violations** (`VerificationError::Violation`): the type under
//!   test breaks an equality law, a hash-code law, a significance expectation
//!   or a property round-trip.
//! - **Execution errors** (`VerificationError::Execution`): an accessor,
//!   constructor or factory failed while the verifier was running.
//!
//! Lower level errors (`AccessError`, `FactoryError`) are wrapped into a
//! `BeanTestError` as soon as the bean and property they concern are known.

use crate::value::ValueType;
use std::error::Error;
use std::fmt;

/// Failure raised by a bean's accessor capability.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessError {
    /// The type has no property with this name
    NoSuchProperty { property: String },
    /// The property exists but cannot be read
    NotReadable { property: String },
    /// The property exists but cannot be written
    NotWritable { property: String },
    /// The value handed to the write accessor has the wrong shape
    TypeMismatch { property: String, expected: String, found: String },
    /// The accessor itself failed
    Failed { property: String, reason: String },
    /// A default instance could not be constructed
    Construction { reason: String },
}

impl AccessError {
    pub fn no_such_property(property: &str) -> Self {
        AccessError::NoSuchProperty { property: property.to_string() }
    }

    pub fn failed(property: &str, reason: impl Into<String>) -> Self {
        AccessError::Failed { property: property.to_string(), reason: reason.into() }
    }

    /// The property this error concerns, if any.
    pub fn property(&self) -> Option<&str> {
        match self {
            AccessError::NoSuchProperty { property }
            | AccessError::NotReadable { property }
            | AccessError::NotWritable { property }
            | AccessError::TypeMismatch { property, .. }
            | AccessError::Failed { property, .. } => Some(property),
            AccessError::Construction { .. } => None,
        }
    }
}

impl fmt::Display for AccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessError::NoSuchProperty { property } => write!(f, "No property named [{}]", property),
            AccessError::NotReadable { property } => write!(f, "Property [{}] is not readable", property),
            AccessError::NotWritable { property } => write!(f, "Property [{}] is not writable", property),
            AccessError::TypeMismatch { property, expected, found } => write!(
                f,
                "Property [{}] expects a value of type [{}] but was given [{}]",
                property, expected, found
            ),
            AccessError::Failed { property, reason } => {
                write!(f, "Accessor for property [{}] failed: {}", property, reason)
            }
            AccessError::Construction { reason } => write!(f, "Cannot construct instance: {}", reason),
        }
    }
}

impl Error for AccessError {}

/// A sample was requested from an empty collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptySampleError;

impl fmt::Display for EmptySampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Cannot sample from an empty collection")
    }
}

impl Error for EmptySampleError {}

/// Failure to produce a value from the factory registry.
#[derive(Debug)]
pub enum FactoryError {
    /// Neither a registered nor a derivable factory exists for the type
    NoSuchFactory { requested: ValueType },
    /// An enumerated type declares no constants to choose from
    EmptyEnum { name: &'static str },
    /// The lookup strategy backing a structural factory has been dropped
    LookupUnavailable,
    /// A nested bean could not be created or populated
    BeanCreation(Box<BeanTestError>),
    /// A factory could not produce a value of its type
    Failed { requested: ValueType, reason: String },
}

impl FactoryError {
    pub fn failed(requested: ValueType, reason: impl Into<String>) -> Self {
        FactoryError::Failed { requested, reason: reason.into() }
    }
}

impl fmt::Display for FactoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactoryError::NoSuchFactory { requested } => {
                write!(f, "No factory found for type [{}]", requested)
            }
            FactoryError::EmptyEnum { name } => write!(f, "Enum [{}] declares no constants", name),
            FactoryError::LookupUnavailable => write!(f, "Factory lookup strategy is no longer available"),
            FactoryError::BeanCreation(cause) => write!(f, "Cannot create nested bean: {}", cause),
            FactoryError::Failed { requested, reason } => {
                write!(f, "Factory for type [{}] failed: {}", requested, reason)
            }
        }
    }
}

impl Error for FactoryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            FactoryError::BeanCreation(cause) => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// What went wrong underneath a `BeanTestError`.
#[derive(Debug)]
pub enum ExecutionCause {
    /// The default instance could not be constructed
    Construction(AccessError),
    /// A read or write accessor failed
    Access(AccessError),
    /// No value could be produced for a property
    Factory(FactoryError),
    /// The equivalent factory under test failed on its own
    FactoryFailure(String),
    /// Redrawing never produced a value distinct from the current one
    DistinctValueExhausted { attempts: u32 },
}

impl fmt::Display for ExecutionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionCause::Construction(cause) => write!(f, "{}", cause),
            ExecutionCause::Access(cause) => write!(f, "{}", cause),
            ExecutionCause::Factory(cause) => write!(f, "{}", cause),
            ExecutionCause::FactoryFailure(reason) => write!(f, "factory failed: {}", reason),
            ExecutionCause::DistinctValueExhausted { attempts } => write!(
                f,
                "no value distinct from the current one was produced after {} attempts",
                attempts
            ),
        }
    }
}

/// A fixture or environment defect hit while verifying a bean.
///
/// Carries the bean type, the property being exercised when known, and the
/// original cause.
#[derive(Debug)]
pub struct BeanTestError {
    bean: String,
    property: Option<String>,
    cause: ExecutionCause,
}

impl BeanTestError {
    pub fn new(bean: impl Into<String>, property: Option<&str>, cause: ExecutionCause) -> Self {
        Self {
            bean: bean.into(),
            property: property.map(str::to_string),
            cause,
        }
    }

    pub fn construction(bean: &str, cause: AccessError) -> Self {
        Self::new(bean, None, ExecutionCause::Construction(cause))
    }

    pub fn access(bean: &str, property: &str, cause: AccessError) -> Self {
        Self::new(bean, Some(property), ExecutionCause::Access(cause))
    }

    pub fn factory(bean: &str, property: &str, cause: FactoryError) -> Self {
        Self::new(bean, Some(property), ExecutionCause::Factory(cause))
    }

    /// Failure reported by a hand-written `EquivalentFactory`.
    pub fn factory_failure(bean: &str, reason: impl Into<String>) -> Self {
        Self::new(bean, None, ExecutionCause::FactoryFailure(reason.into()))
    }

    pub fn bean(&self) -> &str {
        &self.bean
    }

    pub fn property(&self) -> Option<&str> {
        self.property.as_deref()
    }

    pub fn cause(&self) -> &ExecutionCause {
        &self.cause
    }
}

impl fmt::Display for BeanTestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(
                f,
                "Failed to test property [{}] of bean [{}]: {}",
                property, self.bean, self.cause
            ),
            None => write!(f, "Failed to test bean [{}]: {}", self.bean, self.cause),
        }
    }
}

impl Error for BeanTestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            ExecutionCause::Construction(cause) | ExecutionCause::Access(cause) => Some(cause),
            ExecutionCause::Factory(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Rules of the equality contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqualsLaw {
    Reflexive,
    Symmetric,
    Transitive,
    Consistent,
    NullSafe,
    TypeSafe,
}

impl fmt::Display for EqualsLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EqualsLaw::Reflexive => "reflexive",
            EqualsLaw::Symmetric => "symmetric",
            EqualsLaw::Transitive => "transitive",
            EqualsLaw::Consistent => "consistent",
            EqualsLaw::NullSafe => "null-safe",
            EqualsLaw::TypeSafe => "type-safe",
        };
        f.write_str(name)
    }
}

/// Rules of the hash-code contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashCodeLaw {
    /// Equal objects have equal hash codes
    EqualObjects,
    /// Repeated calls on one object agree
    Consistent,
}

impl fmt::Display for HashCodeLaw {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashCodeLaw::EqualObjects => f.write_str("equal objects, equal hash codes"),
            HashCodeLaw::Consistent => f.write_str("consistent"),
        }
    }
}

/// The equality outcome a significance check expected after mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityExpectation {
    Equal,
    NotEqual,
}

impl fmt::Display for EqualityExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EqualityExpectation::Equal => f.write_str("equal"),
            EqualityExpectation::NotEqual => f.write_str("not equal"),
        }
    }
}

/// A contract the type under test does not honour.
#[derive(Debug, Clone, PartialEq)]
pub enum ContractViolation {
    EqualsLaw { law: EqualsLaw, detail: String },
    HashCode { law: HashCodeLaw, detail: String },
    PropertySignificance { property: String, expected: EqualityExpectation, detail: String },
    PropertyRoundTrip { property: String, detail: String },
}

impl fmt::Display for ContractViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractViolation::EqualsLaw { law, detail } => {
                write!(f, "equals is not {}: {}", law, detail)
            }
            ContractViolation::HashCode { law, detail } => {
                write!(f, "hash code is not {}: {}", law, detail)
            }
            ContractViolation::PropertySignificance { property, expected, detail } => write!(
                f,
                "objects should be {} after changing property [{}]: {}",
                expected, property, detail
            ),
            ContractViolation::PropertyRoundTrip { property, detail } => {
                write!(f, "property [{}] does not round-trip: {}", property, detail)
            }
        }
    }
}

/// Outcome of a failed verification.
#[derive(Debug)]
pub enum VerificationError {
    /// The verifier was used incorrectly; nothing was tested
    IllegalArgument(String),
    /// The type under test breaks a contract
    Violation(ContractViolation),
    /// A fixture or accessor failed mid-verification
    Execution(BeanTestError),
}

impl VerificationError {
    pub fn illegal_argument(message: impl Into<String>) -> Self {
        VerificationError::IllegalArgument(message.into())
    }

    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, VerificationError::IllegalArgument(_))
    }

    pub fn is_violation(&self) -> bool {
        matches!(self, VerificationError::Violation(_))
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, VerificationError::Execution(_))
    }

    pub fn violation(&self) -> Option<&ContractViolation> {
        match self {
            VerificationError::Violation(violation) => Some(violation),
            _ => None,
        }
    }
}

impl fmt::Display for VerificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationError::IllegalArgument(message) => write!(f, "{}", message),
            VerificationError::Violation(violation) => write!(f, "{}", violation),
            VerificationError::Execution(cause) => write!(f, "{}", cause),
        }
    }
}

impl Error for VerificationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VerificationError::Execution(cause) => Some(cause),
            _ => None,
        }
    }
}

impl From<BeanTestError> for VerificationError {
    fn from(cause: BeanTestError) -> Self {
        VerificationError::Execution(cause)
    }
}

impl From<ContractViolation> for VerificationError {
    fn from(violation: ContractViolation) -> Self {
        VerificationError::Violation(violation)
    }
}

/// Result of a verification step.
pub type VerificationResult = Result<(), VerificationError>;
