//! Bean capability: named, typed properties behind read/write accessors
//!
//! A type takes part in verification by implementing three traits:
//!
//! - [`Equality`]: its own equality and hash code, never redefined here.
//! - [`Bean`]: object-safe accessors used while verifying.
//! - [`BeanDescriptor`]: the static side, i.e. its name, its property table and
//!   how to construct a default instance.
//!
//! The dynamic view of a `BeanDescriptor` is a [`BeanType`], a small `Copy`
//! handle that identifies the type by `TypeId` and can enumerate properties and
//! construct instances without knowing the concrete type.
//!
//! ## Usage
//!
//! ```rust
//! use beancheck::{impl_bean, impl_equality, ValueType};
//!
//! #[derive(Debug, Clone, Default, PartialEq, Hash)]
//! struct Person {
//!     first_name: String,
//!     last_name: String,
//! }
//!
//! impl_equality!(Person);
//! impl_bean!(Person {
//!     "firstName" => first_name: ValueType::String,
//!     "lastName" => last_name: ValueType::String,
//! });
//! ```

use crate::error::AccessError;
use crate::value::{Value, ValueType};
use std::any::{Any, TypeId};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Equality and hash code of the system under test.
///
/// `other` is `None` for the null comparison, and may hold a value of any
/// type for the type-safety comparison.
pub trait Equality {
    fn equals(&self, other: Option<&dyn Any>) -> bool;

    fn hash_code(&self) -> u64;
}

/// `Equality::equals` in terms of the type's own `PartialEq`.
pub fn equals_by_partial_eq<T: PartialEq + Any>(this: &T, other: Option<&dyn Any>) -> bool {
    other
        .and_then(|other| other.downcast_ref::<T>())
        .map_or(false, |other| this == other)
}

/// `Equality::hash_code` in terms of the type's own `Hash`.
pub fn hash_code_of<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Object-safe accessor capability.
pub trait Bean: Equality + Any + Send + Sync + fmt::Debug {
    fn bean_type(&self) -> BeanType;

    fn read_property(&self, property: &str) -> Result<Value, AccessError>;

    fn write_property(&mut self, property: &str, value: Value) -> Result<(), AccessError>;

    fn clone_bean(&self) -> Box<dyn Bean>;

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Static descriptor table of a bean type.
pub trait BeanDescriptor: Bean + Sized {
    const NAME: &'static str;

    fn properties() -> Vec<PropertyDescriptor>;

    /// Produce a new default instance.
    fn construct() -> Result<Self, AccessError>;
}

/// Name, declared type and accessibility of one property.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub value_type: ValueType,
    pub readable: bool,
    pub writable: bool,
}

impl PropertyDescriptor {
    pub fn new(name: &'static str, value_type: ValueType, readable: bool, writable: bool) -> Self {
        Self { name, value_type, readable, writable }
    }

    pub fn read_write(name: &'static str, value_type: ValueType) -> Self {
        Self::new(name, value_type, true, true)
    }

    pub fn read_only(name: &'static str, value_type: ValueType) -> Self {
        Self::new(name, value_type, true, false)
    }

    pub fn write_only(name: &'static str, value_type: ValueType) -> Self {
        Self::new(name, value_type, false, true)
    }

    pub fn is_read_write(&self) -> bool {
        self.readable && self.writable
    }
}

fn construct_boxed<T: BeanDescriptor>() -> Result<Box<dyn Bean>, AccessError> {
    T::construct().map(|bean| Box::new(bean) as Box<dyn Bean>)
}

/// Type-erased handle on a `BeanDescriptor`.
#[derive(Clone, Copy)]
pub struct BeanType {
    name: &'static str,
    id: fn() -> TypeId,
    properties: fn() -> Vec<PropertyDescriptor>,
    construct: fn() -> Result<Box<dyn Bean>, AccessError>,
}

impl BeanType {
    pub fn of<T: BeanDescriptor>() -> Self {
        Self {
            name: T::NAME,
            id: TypeId::of::<T>,
            properties: T::properties,
            construct: construct_boxed::<T>,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn type_id(&self) -> TypeId {
        (self.id)()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.type_id() == TypeId::of::<T>()
    }

    pub fn properties(&self) -> Vec<PropertyDescriptor> {
        (self.properties)()
    }

    pub fn property(&self, name: &str) -> Option<PropertyDescriptor> {
        self.properties().into_iter().find(|property| property.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties().iter().any(|property| property.name == name)
    }

    pub fn construct(&self) -> Result<Box<dyn Bean>, AccessError> {
        (self.construct)()
    }
}

impl PartialEq for BeanType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id() == other.type_id()
    }
}

impl Eq for BeanType {}

impl Hash for BeanType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id().hash(state);
    }
}

impl fmt::Debug for BeanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BeanType").field(&self.name).finish()
    }
}

/// Implement `Equality` by forwarding to the type's `PartialEq` and `Hash`.
#[macro_export]
macro_rules! impl_equality {
    ($($t:ty),+ $(,)?) => {
        $(
            impl $crate::bean::Equality for $t {
                fn equals(&self, other: ::std::option::Option<&dyn ::std::any::Any>) -> bool {
                    $crate::bean::equals_by_partial_eq(self, other)
                }

                fn hash_code(&self) -> u64 {
                    $crate::bean::hash_code_of(self)
                }
            }
        )+
    };
}

/// Implement `Bean`, `BeanDescriptor` and value conversions for a struct.
///
/// Each entry maps a property name to a field and its declared type. Every
/// listed property is readable and writable; the struct must be
/// `Clone + Default + Debug + Send + Sync` and implement `Equality`.
#[macro_export]
macro_rules! impl_bean {
    ($bean:ident { $($name:literal => $field:ident : $value_type:expr),* $(,)? }) => {
        impl $crate::bean::BeanDescriptor for $bean {
            const NAME: &'static str = stringify!($bean);

            fn properties() -> ::std::vec::Vec<$crate::bean::PropertyDescriptor> {
                ::std::vec![$($crate::bean::PropertyDescriptor::read_write($name, $value_type)),*]
            }

            fn construct() -> ::std::result::Result<Self, $crate::error::AccessError> {
                ::std::result::Result::Ok(<$bean as ::std::default::Default>::default())
            }
        }

        impl $crate::bean::Bean for $bean {
            fn bean_type(&self) -> $crate::bean::BeanType {
                $crate::bean::BeanType::of::<$bean>()
            }

            fn read_property(
                &self,
                property: &str,
            ) -> ::std::result::Result<$crate::value::Value, $crate::error::AccessError> {
                match property {
                    $(
                        $name => ::std::result::Result::Ok($crate::value::IntoValue::into_value(
                            ::std::clone::Clone::clone(&self.$field),
                        )),
                    )*
                    _ => ::std::result::Result::Err($crate::error::AccessError::no_such_property(property)),
                }
            }

            fn write_property(
                &mut self,
                property: &str,
                value: $crate::value::Value,
            ) -> ::std::result::Result<(), $crate::error::AccessError> {
                match property {
                    $(
                        $name => {
                            self.$field = $crate::value::FromValue::from_value(value)
                                .map_err(|mismatch: $crate::value::ValueMismatch| mismatch.for_property(property))?;
                            ::std::result::Result::Ok(())
                        }
                    )*
                    _ => {
                        let _ = value;
                        ::std::result::Result::Err($crate::error::AccessError::no_such_property(property))
                    }
                }
            }

            fn clone_bean(&self) -> ::std::boxed::Box<dyn $crate::bean::Bean> {
                ::std::boxed::Box::new(::std::clone::Clone::clone(self))
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::value::FromValue for $bean {
            fn from_value(
                value: $crate::value::Value,
            ) -> ::std::result::Result<Self, $crate::value::ValueMismatch> {
                value.into_bean::<$bean>()
            }
        }

        impl $crate::value::IntoValue for $bean {
            fn into_value(self) -> $crate::value::Value {
                $crate::value::Value::Bean(::std::boxed::Box::new(self))
            }
        }
    };
}

/// Implement `EnumConstants` and value conversions for a unit-variant enum.
#[macro_export]
macro_rules! impl_enum_constants {
    ($enum:ident { $($variant:ident),+ $(,)? }) => {
        impl $crate::value::EnumConstants for $enum {
            const ENUM_TYPE: $crate::value::EnumType =
                $crate::value::EnumType::new(stringify!($enum), &[$(stringify!($variant)),+]);

            fn constant(&self) -> &'static str {
                match self {
                    $($enum::$variant => stringify!($variant),)+
                }
            }

            fn from_constant(constant: &str) -> ::std::option::Option<Self> {
                $(
                    if constant == stringify!($variant) {
                        return ::std::option::Option::Some($enum::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }

        impl $crate::value::FromValue for $enum {
            fn from_value(
                value: $crate::value::Value,
            ) -> ::std::result::Result<Self, $crate::value::ValueMismatch> {
                value.into_enum::<$enum>()
            }
        }

        impl $crate::value::IntoValue for $enum {
            fn into_value(self) -> $crate::value::Value {
                $crate::value::Value::Enum($crate::value::EnumConstant::of(&self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq, Hash)]
    struct Address {
        street: String,
        number: u32,
        previous: Option<Box<Address>>,
    }

    crate::impl_equality!(Address);
    crate::impl_bean!(Address {
        "street" => street: ValueType::String,
        "number" => number: ValueType::U32,
        "previous" => previous: ValueType::bean::<Address>(),
    });

    #[test]
    fn test_descriptor_table() {
        let bean_type = BeanType::of::<Address>();
        assert_eq!(bean_type.name(), "Address");
        assert!(bean_type.is::<Address>());

        let names: Vec<_> = bean_type.properties().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["street", "number", "previous"]);
        assert!(bean_type.properties().iter().all(PropertyDescriptor::is_read_write));
        assert_eq!(
            bean_type.property("previous").map(|p| p.value_type),
            Some(ValueType::Bean(bean_type))
        );
        assert!(!bean_type.has_property("city"));
    }

    #[test]
    fn test_accessors_round_trip_values() {
        let mut bean = BeanType::of::<Address>().construct().unwrap();
        bean.write_property("street", Value::String("Main".into())).unwrap();
        bean.write_property("number", Value::U32(12)).unwrap();

        assert_eq!(bean.read_property("street").unwrap(), Value::String("Main".into()));
        assert_eq!(bean.read_property("number").unwrap(), Value::U32(12));
        assert_eq!(bean.read_property("previous").unwrap(), Value::Null);
    }

    #[test]
    fn test_accessor_errors() {
        let mut bean = Address::default();
        assert_eq!(
            bean.read_property("city").unwrap_err(),
            AccessError::no_such_property("city")
        );

        let error = bean.write_property("number", Value::String("x".into())).unwrap_err();
        assert!(matches!(error, AccessError::TypeMismatch { ref property, .. } if property == "number"));
    }

    #[test]
    fn test_nested_bean_values() {
        let inner = Address { street: "Old".into(), number: 1, previous: None };
        let mut outer = Address::default();
        outer.write_property("previous", Value::Bean(Box::new(inner.clone()))).unwrap();
        assert_eq!(outer.previous.as_deref(), Some(&inner));

        let read = outer.read_property("previous").unwrap();
        assert_eq!(read, Value::Bean(Box::new(inner)));
    }

    #[test]
    fn test_equality_forwards_to_partial_eq() {
        let a = Address { street: "A".into(), ..Address::default() };
        let b = a.clone();
        assert!(a.equals(Some(&b as &dyn Any)));
        assert!(!a.equals(None));
        assert!(!a.equals(Some(&"A".to_string() as &dyn Any)));
        assert_eq!(a.hash_code(), b.hash_code());
    }
}
