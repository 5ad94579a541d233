//! # beancheck
//!
//! Fixture-free verification of bean-like types: property round-trips,
//! the equality laws, the hash-code laws and which properties equality
//! actually depends on.
//!
//! Values for properties come from a registry of typed factories backed by a
//! seedable random stream. Types without a registered factory are derived on
//! demand: collections from their element factories, enums from their
//! constants and nested beans structurally from their own properties.

pub mod bean;
pub mod config;
pub mod error;
pub mod factories;
pub mod lookup;
pub mod random;
pub mod registry;
pub mod tester;
pub mod value;
pub mod verify;

// Re-export core types for easy access
pub use bean::{equals_by_partial_eq, hash_code_of, Bean, BeanDescriptor, BeanType, Equality, PropertyDescriptor};
pub use config::{Configuration, ConfigurationBuilder, TesterConfig};
pub use error::{
    AccessError, BeanTestError, ContractViolation, EmptySampleError, EqualityExpectation, EqualsLaw, ExecutionCause,
    FactoryError, HashCodeLaw, VerificationError, VerificationResult,
};
pub use factories::{
    equivalent_from_fn, EquivalentFactory, EquivalentPopulatedBeanFactory, FnFactory, PopulatedBeanFactory,
    TypeFactory,
};
pub use lookup::FactoryLookupStrategy;
pub use random::RandomValueGenerator;
pub use registry::{global_lookup_strategy, global_registry, lookup_factory, register_factory, FactoryRegistry};
pub use tester::{BeanTester, BeanTesterBuilder};
pub use value::{CustomType, Datum, EnumConstant, EnumConstants, EnumType, FromValue, IntoValue, Value, ValueType};
pub use verify::{
    ensure_configured_properties_exist, ensure_insignificant_properties_exist, validate_property_names,
    verify_equals_laws, verify_property_significance, EqualsContractVerifier, HashCodeVerifier,
    PropertySignificanceVerifier, PropertyTester,
};
