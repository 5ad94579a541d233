//! Dynamic values and declared types
//!
//! Property values cross the accessor boundary as `Value`, a tagged variant
//! that mirrors `ValueType`, the declared type of a property. `ValueType` is
//! also the key of the factory registry, so it is `Eq + Hash`: leaf and
//! container types compare structurally, enums by name, beans and custom types
//! by Rust `TypeId`.

use crate::bean::{Bean, BeanType};
use chrono::{DateTime, Utc};
use std::any::{type_name, Any, TypeId};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Declared type of a property, and registry key for factories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Char,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Date,
    Array(Box<ValueType>),
    List(Box<ValueType>),
    Set(Box<ValueType>),
    Queue(Box<ValueType>),
    Map(Box<ValueType>, Box<ValueType>),
    Enum(EnumType),
    Bean(BeanType),
    Custom(CustomType),
}

impl ValueType {
    pub fn array(element: ValueType) -> Self {
        ValueType::Array(Box::new(element))
    }

    pub fn list(element: ValueType) -> Self {
        ValueType::List(Box::new(element))
    }

    pub fn set(element: ValueType) -> Self {
        ValueType::Set(Box::new(element))
    }

    pub fn queue(element: ValueType) -> Self {
        ValueType::Queue(Box::new(element))
    }

    pub fn map(key: ValueType, value: ValueType) -> Self {
        ValueType::Map(Box::new(key), Box::new(value))
    }

    pub fn enumeration<E: EnumConstants>() -> Self {
        ValueType::Enum(E::ENUM_TYPE)
    }

    pub fn bean<T: crate::bean::BeanDescriptor>() -> Self {
        ValueType::Bean(BeanType::of::<T>())
    }

    pub fn custom<T: Any>() -> Self {
        ValueType::Custom(CustomType::of::<T>())
    }

    /// Every leaf type the default registry knows how to produce.
    pub fn leaves() -> [ValueType; 14] {
        [
            ValueType::Bool,
            ValueType::Char,
            ValueType::I8,
            ValueType::I16,
            ValueType::I32,
            ValueType::I64,
            ValueType::U8,
            ValueType::U16,
            ValueType::U32,
            ValueType::U64,
            ValueType::F32,
            ValueType::F64,
            ValueType::String,
            ValueType::Date,
        ]
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueType::Bool => f.write_str("bool"),
            ValueType::Char => f.write_str("char"),
            ValueType::I8 => f.write_str("i8"),
            ValueType::I16 => f.write_str("i16"),
            ValueType::I32 => f.write_str("i32"),
            ValueType::I64 => f.write_str("i64"),
            ValueType::U8 => f.write_str("u8"),
            ValueType::U16 => f.write_str("u16"),
            ValueType::U32 => f.write_str("u32"),
            ValueType::U64 => f.write_str("u64"),
            ValueType::F32 => f.write_str("f32"),
            ValueType::F64 => f.write_str("f64"),
            ValueType::String => f.write_str("String"),
            ValueType::Date => f.write_str("Date"),
            ValueType::Array(element) => write!(f, "[{}]", element),
            ValueType::List(element) => write!(f, "List<{}>", element),
            ValueType::Set(element) => write!(f, "Set<{}>", element),
            ValueType::Queue(element) => write!(f, "Queue<{}>", element),
            ValueType::Map(key, value) => write!(f, "Map<{}, {}>", key, value),
            ValueType::Enum(enum_type) => f.write_str(enum_type.name()),
            ValueType::Bean(bean_type) => f.write_str(bean_type.name()),
            ValueType::Custom(custom) => f.write_str(custom.name()),
        }
    }
}

/// Descriptor of an enumerated type: its name and declared constants.
#[derive(Debug, Clone, Copy)]
pub struct EnumType {
    name: &'static str,
    constants: &'static [&'static str],
}

impl EnumType {
    pub const fn new(name: &'static str, constants: &'static [&'static str]) -> Self {
        Self { name, constants }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn constants(&self) -> &'static [&'static str] {
        self.constants
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EnumType {}

impl Hash for EnumType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// Identity of a user type with a registered factory.
#[derive(Debug, Clone, Copy)]
pub struct CustomType {
    name: &'static str,
    id: TypeId,
}

impl CustomType {
    pub fn of<T: Any>() -> Self {
        Self {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for CustomType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CustomType {}

impl Hash for CustomType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// One constant of an enumerated type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnumConstant {
    pub enum_name: &'static str,
    pub constant: &'static str,
}

impl EnumConstant {
    pub fn of<E: EnumConstants>(value: &E) -> Self {
        Self {
            enum_name: E::ENUM_TYPE.name(),
            constant: value.constant(),
        }
    }
}

/// A Rust enum whose unit variants take part in random generation.
///
/// Usually implemented with `impl_enum_constants!`.
pub trait EnumConstants: Sized {
    const ENUM_TYPE: EnumType;

    fn constant(&self) -> &'static str;

    fn from_constant(constant: &str) -> Option<Self>;
}

/// Value of a custom registered type.
///
/// Blanket-implemented for every `Clone + PartialEq + Debug + Send + Sync`
/// type, so registering a closure is enough to make a type producible.
pub trait Datum: Any + Send + Sync + fmt::Debug {
    fn datum_eq(&self, other: &dyn Datum) -> bool;

    fn clone_datum(&self) -> Box<dyn Datum>;

    fn datum_any(&self) -> &dyn Any;

    fn into_datum_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T> Datum for T
where
    T: Any + Clone + PartialEq + fmt::Debug + Send + Sync,
{
    fn datum_eq(&self, other: &dyn Datum) -> bool {
        other.datum_any().downcast_ref::<T>().map_or(false, |other| self == other)
    }

    fn clone_datum(&self) -> Box<dyn Datum> {
        Box::new(self.clone())
    }

    fn datum_any(&self) -> &dyn Any {
        self
    }

    fn into_datum_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// A dynamically typed property value.
#[derive(Debug)]
pub enum Value {
    /// Absence of a value, e.g. an unset optional property
    Null,
    Bool(bool),
    Char(char),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Vec<Value>),
    List(Vec<Value>),
    /// Elements are unique; equality ignores order
    Set(Vec<Value>),
    Queue(VecDeque<Value>),
    /// Keys are unique; equality ignores order
    Map(Vec<(Value, Value)>),
    Enum(EnumConstant),
    Bean(Box<dyn Bean>),
    Custom(Box<dyn Datum>),
}

impl Value {
    pub fn custom<T: Datum>(value: T) -> Self {
        Value::Custom(Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Short name of the variant, for messages.
    pub fn kind(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Char(_) => "char".to_string(),
            Value::I8(_) => "i8".to_string(),
            Value::I16(_) => "i16".to_string(),
            Value::I32(_) => "i32".to_string(),
            Value::I64(_) => "i64".to_string(),
            Value::U8(_) => "u8".to_string(),
            Value::U16(_) => "u16".to_string(),
            Value::U32(_) => "u32".to_string(),
            Value::U64(_) => "u64".to_string(),
            Value::F32(_) => "f32".to_string(),
            Value::F64(_) => "f64".to_string(),
            Value::String(_) => "String".to_string(),
            Value::Date(_) => "Date".to_string(),
            Value::Array(_) => "array".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Set(_) => "set".to_string(),
            Value::Queue(_) => "queue".to_string(),
            Value::Map(_) => "map".to_string(),
            Value::Enum(constant) => constant.enum_name.to_string(),
            Value::Bean(bean) => bean.bean_type().name().to_string(),
            Value::Custom(_) => "custom".to_string(),
        }
    }

    /// Downcast a bean value into its concrete type.
    pub fn into_bean<T: Bean>(self) -> Result<T, ValueMismatch> {
        match self {
            Value::Bean(bean) => {
                let found = bean.bean_type().name();
                bean.into_any()
                    .downcast::<T>()
                    .map(|bean| *bean)
                    .map_err(|_| ValueMismatch::new(type_name::<T>(), found))
            }
            other => Err(ValueMismatch::new(type_name::<T>(), other.kind())),
        }
    }

    /// Resolve an enum value back into its Rust variant.
    pub fn into_enum<E: EnumConstants>(self) -> Result<E, ValueMismatch> {
        let expected = E::ENUM_TYPE.name();
        match self {
            Value::Enum(constant) if constant.enum_name == expected => E::from_constant(constant.constant)
                .ok_or_else(|| ValueMismatch::new(expected, constant.constant)),
            other => Err(ValueMismatch::new(expected, other.kind())),
        }
    }

    /// Downcast a custom value into its concrete type.
    pub fn into_custom<T: Any>(self) -> Result<T, ValueMismatch> {
        match self {
            Value::Custom(datum) => datum
                .into_datum_any()
                .downcast::<T>()
                .map(|value| *value)
                .map_err(|_| ValueMismatch::new(type_name::<T>(), "another custom type")),
            other => Err(ValueMismatch::new(type_name::<T>(), other.kind())),
        }
    }

    pub fn as_custom<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Custom(datum) => datum.datum_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    pub fn as_bean(&self) -> Option<&dyn Bean> {
        match self {
            Value::Bean(bean) => Some(&**bean),
            _ => None,
        }
    }
}

impl Clone for Value {
    fn clone(&self) -> Self {
        match self {
            Value::Null => Value::Null,
            Value::Bool(v) => Value::Bool(*v),
            Value::Char(v) => Value::Char(*v),
            Value::I8(v) => Value::I8(*v),
            Value::I16(v) => Value::I16(*v),
            Value::I32(v) => Value::I32(*v),
            Value::I64(v) => Value::I64(*v),
            Value::U8(v) => Value::U8(*v),
            Value::U16(v) => Value::U16(*v),
            Value::U32(v) => Value::U32(*v),
            Value::U64(v) => Value::U64(*v),
            Value::F32(v) => Value::F32(*v),
            Value::F64(v) => Value::F64(*v),
            Value::String(v) => Value::String(v.clone()),
            Value::Date(v) => Value::Date(*v),
            Value::Array(v) => Value::Array(v.clone()),
            Value::List(v) => Value::List(v.clone()),
            Value::Set(v) => Value::Set(v.clone()),
            Value::Queue(v) => Value::Queue(v.clone()),
            Value::Map(v) => Value::Map(v.clone()),
            Value::Enum(v) => Value::Enum(*v),
            Value::Bean(bean) => Value::Bean(bean.clone_bean()),
            Value::Custom(datum) => Value::Custom(datum.clone_datum()),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::I8(a), Value::I8(b)) => a == b,
            (Value::I16(a), Value::I16(b)) => a == b,
            (Value::I32(a), Value::I32(b)) => a == b,
            (Value::I64(a), Value::I64(b)) => a == b,
            (Value::U8(a), Value::U8(b)) => a == b,
            (Value::U16(a), Value::U16(b)) => a == b,
            (Value::U32(a), Value::U32(b)) => a == b,
            (Value::U64(a), Value::U64(b)) => a == b,
            (Value::F32(a), Value::F32(b)) => a == b,
            (Value::F64(a), Value::F64(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::List(a), Value::List(b)) => a == b,
            (Value::Set(a), Value::Set(b)) => a.len() == b.len() && a.iter().all(|item| b.contains(item)),
            (Value::Queue(a), Value::Queue(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
            }
            (Value::Enum(a), Value::Enum(b)) => a == b,
            (Value::Bean(a), Value::Bean(b)) => a.equals(Some((**b).as_any())),
            (Value::Custom(a), Value::Custom(b)) => a.datum_eq(&**b),
            _ => false,
        }
    }
}

/// A value did not have the shape its destination expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueMismatch {
    pub expected: String,
    pub found: String,
}

impl ValueMismatch {
    pub fn new(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Attach the property being written.
    pub fn for_property(self, property: &str) -> crate::error::AccessError {
        crate::error::AccessError::TypeMismatch {
            property: property.to_string(),
            expected: self.expected,
            found: self.found,
        }
    }
}

impl fmt::Display for ValueMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected [{}] but found [{}]", self.expected, self.found)
    }
}

impl std::error::Error for ValueMismatch {}

/// Conversion out of a `Value`, used by write accessors.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ValueMismatch>;
}

/// Conversion into a `Value`, used by read accessors.
pub trait IntoValue {
    fn into_value(self) -> Value;
}

macro_rules! leaf_value {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ValueMismatch> {
                    match value {
                        Value::$variant(inner) => Ok(inner),
                        other => Err(ValueMismatch::new(stringify!($t), other.kind())),
                    }
                }
            }

            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    Value::$variant(self)
                }
            }
        )*
    };
}

leaf_value!(
    bool => Bool,
    char => Char,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    String => String,
    DateTime<Utc> => Date,
);

impl IntoValue for &str {
    fn into_value(self) -> Value {
        Value::String(self.to_string())
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        Ok(value)
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(inner) => inner.into_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Box<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        T::from_value(value).map(Box::new)
    }
}

impl<T: IntoValue> IntoValue for Box<T> {
    fn into_value(self) -> Value {
        (*self).into_value()
    }
}

fn elements<T: FromValue>(items: impl IntoIterator<Item = Value>) -> Result<Vec<T>, ValueMismatch> {
    items.into_iter().map(T::from_value).collect()
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::List(items) | Value::Array(items) => elements(items),
            Value::Queue(items) => elements(items),
            other => Err(ValueMismatch::new("list", other.kind())),
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for VecDeque<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Queue(items) => Ok(elements(items)?.into()),
            Value::List(items) | Value::Array(items) => Ok(elements(items)?.into()),
            other => Err(ValueMismatch::new("queue", other.kind())),
        }
    }
}

impl<T: IntoValue> IntoValue for VecDeque<T> {
    fn into_value(self) -> Value {
        Value::Queue(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue + Eq + Hash> FromValue for HashSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Set(items) => Ok(elements(items)?.into_iter().collect()),
            other => Err(ValueMismatch::new("set", other.kind())),
        }
    }
}

impl<T: IntoValue> IntoValue for HashSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue + Ord> FromValue for BTreeSet<T> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Set(items) => Ok(elements(items)?.into_iter().collect()),
            other => Err(ValueMismatch::new("set", other.kind())),
        }
    }
}

impl<T: IntoValue> IntoValue for BTreeSet<T> {
    fn into_value(self) -> Value {
        Value::Set(self.into_iter().map(IntoValue::into_value).collect())
    }
}

fn entries<K: FromValue, V: FromValue>(
    items: Vec<(Value, Value)>,
) -> Result<Vec<(K, V)>, ValueMismatch> {
    items
        .into_iter()
        .map(|(key, value)| Ok((K::from_value(key)?, V::from_value(value)?)))
        .collect()
}

impl<K: FromValue + Eq + Hash, V: FromValue> FromValue for HashMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Map(items) => Ok(entries(items)?.into_iter().collect()),
            other => Err(ValueMismatch::new("map", other.kind())),
        }
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for HashMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, value)| (key.into_value(), value.into_value()))
                .collect(),
        )
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ValueMismatch> {
        match value {
            Value::Map(items) => Ok(entries(items)?.into_iter().collect()),
            other => Err(ValueMismatch::new("map", other.kind())),
        }
    }
}

impl<K: IntoValue, V: IntoValue> IntoValue for BTreeMap<K, V> {
    fn into_value(self) -> Value {
        Value::Map(
            self.into_iter()
                .map(|(key, value)| (key.into_value(), value.into_value()))
                .collect(),
        )
    }
}
