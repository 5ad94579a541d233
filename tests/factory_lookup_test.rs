//! # Factory Registry and Lookup Test Suite
//!
//! Covers registration of custom types, the fallback chain for collections,
//! enums and nested beans, self-referencing beans and the numeric boundary
//! coverage of the default leaf factories.

use beancheck::{
    impl_bean, impl_enum_constants, impl_equality, lookup_factory, register_factory, BeanType, EnumConstant,
    FactoryError, FactoryLookupStrategy, FactoryRegistry, FnFactory, RandomValueGenerator, TypeFactory, Value,
    ValueType,
};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
struct Currency {
    code: String,
}

#[derive(Debug, Clone, PartialEq)]
struct Unregistered;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
}

impl_enum_constants!(Weekday { Monday, Tuesday, Wednesday });

/// A linked chain of people; `manager` refers back to the same type.
#[derive(Debug, Clone, Default, PartialEq, Hash)]
struct Employee {
    name: String,
    manager: Option<Box<Employee>>,
}

impl_equality!(Employee);
impl_bean!(Employee {
    "name" => name: ValueType::String,
    "manager" => manager: ValueType::bean::<Employee>(),
});

/// Test helper to create an isolated, seeded lookup strategy
fn seeded_lookup(seed: u64) -> Arc<FactoryLookupStrategy> {
    FactoryLookupStrategy::new(Arc::new(FactoryRegistry::with_defaults(Arc::new(
        RandomValueGenerator::seeded(seed),
    ))))
}

#[test]
fn test_registered_custom_type_yields_values_of_that_type() {
    let registry = FactoryRegistry::with_defaults(Arc::new(RandomValueGenerator::seeded(5)));
    registry.register_custom(|random| Currency {
        code: random.next_alphanumeric_string(3),
    });

    let factory = registry.lookup(&ValueType::custom::<Currency>()).unwrap();
    for _ in 0..20 {
        let value = factory.create().unwrap();
        let currency = value.as_custom::<Currency>().unwrap();
        assert_eq!(currency.code.len(), 3);
    }
}

#[test]
fn test_unregistered_type_has_no_factory() {
    let lookup = seeded_lookup(1);
    let error = lookup.lookup(&ValueType::custom::<Unregistered>()).unwrap_err();
    assert!(matches!(error, FactoryError::NoSuchFactory { .. }));
    assert!(!lookup.can_produce(&ValueType::custom::<Unregistered>()));
    assert!(lookup_factory(&ValueType::custom::<Unregistered>()).is_err());
}

#[test]
fn test_process_wide_registration() {
    #[derive(Debug, Clone, PartialEq)]
    struct Token(u32);

    register_factory(
        ValueType::custom::<Token>(),
        Arc::new(FnFactory::new("token", || Ok(Value::custom(Token(42))))),
    );
    let value = lookup_factory(&ValueType::custom::<Token>()).unwrap().create().unwrap();
    assert_eq!(value.as_custom::<Token>(), Some(&Token(42)));

    let list = lookup_factory(&ValueType::list(ValueType::custom::<Token>())).unwrap();
    assert!(matches!(list.create().unwrap(), Value::List(items) if !items.is_empty()));
}

#[test]
fn test_enum_values_come_from_declared_constants() {
    let factory = seeded_lookup(2).lookup(&ValueType::enumeration::<Weekday>()).unwrap();
    let mut seen = Vec::new();
    for _ in 0..100 {
        match factory.create().unwrap() {
            Value::Enum(EnumConstant { constant, .. }) => {
                assert!(["Monday", "Tuesday", "Wednesday"].contains(&constant));
                if !seen.contains(&constant) {
                    seen.push(constant);
                }
            }
            other => panic!("expected an enum constant, got {:?}", other),
        }
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_nested_collections_resolve_recursively() {
    let lookup = seeded_lookup(3);
    let nested = ValueType::map(ValueType::String, ValueType::set(ValueType::I16));
    let factory = lookup.lookup(&nested).unwrap();
    match factory.create().unwrap() {
        Value::Map(entries) => {
            assert!(!entries.is_empty() && entries.len() <= lookup.max_collection_size());
            for (key, value) in entries {
                assert!(matches!(key, Value::String(_)));
                assert!(matches!(value, Value::Set(_)));
            }
        }
        other => panic!("expected a map, got {:?}", other),
    }

    let unknown_element = ValueType::array(ValueType::custom::<Unregistered>());
    assert!(lookup.lookup(&unknown_element).is_err());
}

#[test]
fn test_self_referencing_bean_terminates() {
    let lookup = seeded_lookup(4);
    let factory = lookup.lookup(&ValueType::bean::<Employee>()).unwrap();
    for _ in 0..10 {
        let employee = factory.create().unwrap().into_bean::<Employee>().unwrap();
        assert!(!employee.name.is_empty());
        // The nested manager is shallow: constructed but not populated.
        let manager = employee.manager.expect("manager is populated");
        assert!(manager.name.is_empty());
        assert!(manager.manager.is_none());
    }

    // The structural factory is memoized per type.
    let again = lookup.lookup(&ValueType::bean::<Employee>()).unwrap();
    assert!(Arc::ptr_eq(&factory, &again));
    assert_eq!(BeanType::of::<Employee>().name(), "Employee");
}

#[test]
fn test_numeric_factories_cover_signs_and_magnitudes() {
    let lookup = seeded_lookup(6);
    let factory = lookup.lookup(&ValueType::I64).unwrap();
    let (mut negative, mut positive, mut huge, mut tiny) = (false, false, false, false);
    for _ in 0..2000 {
        if let Value::I64(n) = factory.create().unwrap() {
            negative |= n < 0;
            positive |= n > 0;
            huge |= n.unsigned_abs() > u64::MAX / 4;
            tiny |= n.unsigned_abs() < 1 << 16;
        }
    }
    assert!(negative && positive && huge && tiny);

    let floats = lookup.lookup(&ValueType::F64).unwrap();
    let (mut negative, mut positive, mut huge, mut tiny) = (false, false, false, false);
    for _ in 0..2000 {
        if let Value::F64(x) = floats.create().unwrap() {
            assert!(x.is_finite());
            negative |= x < 0.0;
            positive |= x > 0.0;
            huge |= x.abs() > 1e300;
            tiny |= x != 0.0 && x.abs() < 1e-300;
        }
    }
    assert!(negative && positive && huge && tiny);
}
