//! Leaf factories
//!
//! Integer factories cover the whole representable range and lean on its
//! edges. Each draw picks one of three shapes with equal odds: a magnitude
//! close to zero, a magnitude close to the type's maximum, or a value uniform
//! over the full range. Signed extremes then flip a sign coin. Floats pick a
//! magnitude scaled by `MAX` or by `MIN_POSITIVE`, then a sign.

use super::TypeFactory;
use crate::error::FactoryError;
use crate::random::RandomValueGenerator;
use crate::value::{Value, ValueType};
use chrono::{TimeZone, Utc};
use log::debug;
use std::sync::Arc;

/// Magnitudes are drawn within this distance of zero or of `MAX`.
const EXTREME_WINDOW: u64 = 64;

const MAX_STRING_LENGTH: usize = 32;

/// 1970-01-01T00:00:00Z
const MIN_DATE_MILLIS: i64 = 0;
/// 2100-01-01T00:00:00Z
const MAX_DATE_MILLIS: i64 = 4_102_444_800_000;

macro_rules! leaf_factory {
    ($name:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            random: Arc<RandomValueGenerator>,
        }

        impl $name {
            pub fn new(random: Arc<RandomValueGenerator>) -> Self {
                Self { random }
            }
        }
    };
}

macro_rules! signed_factory {
    ($name:ident, $t:ty, $variant:ident) => {
        leaf_factory!($name);

        impl TypeFactory for $name {
            fn create(&self) -> Result<Value, FactoryError> {
                let offset = self.random.next_below(EXTREME_WINDOW) as $t;
                let magnitude = match self.random.next_below(3) {
                    0 => offset,
                    1 => <$t>::MAX - offset,
                    // Truncating keeps the draw uniform over the whole range, sign included
                    _ => return Ok(Value::$variant(self.random.next_u64() as $t)),
                };
                // `!m == -m - 1`, so the negative side reaches MIN and never overflows
                let value = if self.random.next_bool() { !magnitude } else { magnitude };
                Ok(Value::$variant(value))
            }
        }
    };
}

macro_rules! unsigned_factory {
    ($name:ident, $t:ty, $variant:ident) => {
        leaf_factory!($name);

        impl TypeFactory for $name {
            fn create(&self) -> Result<Value, FactoryError> {
                let offset = self.random.next_below(EXTREME_WINDOW) as $t;
                let value = match self.random.next_below(3) {
                    0 => offset,
                    1 => <$t>::MAX - offset,
                    _ => self.random.next_u64() as $t,
                };
                Ok(Value::$variant(value))
            }
        }
    };
}

macro_rules! float_factory {
    ($name:ident, $t:ty, $variant:ident) => {
        leaf_factory!($name);

        impl TypeFactory for $name {
            fn create(&self) -> Result<Value, FactoryError> {
                let unit = self.random.next_f64() as $t;
                let magnitude = if self.random.next_bool() {
                    unit * <$t>::MAX
                } else {
                    unit * <$t>::MIN_POSITIVE
                };
                let value = if self.random.next_bool() { -magnitude } else { magnitude };
                Ok(Value::$variant(value))
            }
        }
    };
}

signed_factory!(I8Factory, i8, I8);
signed_factory!(I16Factory, i16, I16);
signed_factory!(I32Factory, i32, I32);
signed_factory!(I64Factory, i64, I64);
unsigned_factory!(U8Factory, u8, U8);
unsigned_factory!(U16Factory, u16, U16);
unsigned_factory!(U32Factory, u32, U32);
unsigned_factory!(U64Factory, u64, U64);
float_factory!(F32Factory, f32, F32);
float_factory!(F64Factory, f64, F64);

leaf_factory!(BooleanFactory);

impl TypeFactory for BooleanFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        Ok(Value::Bool(self.random.next_bool()))
    }
}

leaf_factory!(CharFactory);

impl TypeFactory for CharFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        Ok(Value::Char(self.random.next_alphanumeric()))
    }
}

leaf_factory!(StringFactory);

impl TypeFactory for StringFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        let length = self.random.next_size(1, MAX_STRING_LENGTH);
        Ok(Value::String(self.random.next_alphanumeric_string(length)))
    }
}

leaf_factory!(DateFactory);

impl TypeFactory for DateFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        let millis = self.random.next_i64_in(MIN_DATE_MILLIS..MAX_DATE_MILLIS);
        Utc.timestamp_millis_opt(millis)
            .single()
            .map(Value::Date)
            .ok_or_else(|| FactoryError::failed(ValueType::Date, format!("{} ms is out of range", millis)))
    }
}

/// One factory per leaf type, in `ValueType::leaves()` order.
pub fn leaf_factories(random: &Arc<RandomValueGenerator>) -> Vec<(ValueType, Arc<dyn TypeFactory>)> {
    let factories: Vec<(ValueType, Arc<dyn TypeFactory>)> = vec![
        (ValueType::Bool, Arc::new(BooleanFactory::new(random.clone()))),
        (ValueType::Char, Arc::new(CharFactory::new(random.clone()))),
        (ValueType::I8, Arc::new(I8Factory::new(random.clone()))),
        (ValueType::I16, Arc::new(I16Factory::new(random.clone()))),
        (ValueType::I32, Arc::new(I32Factory::new(random.clone()))),
        (ValueType::I64, Arc::new(I64Factory::new(random.clone()))),
        (ValueType::U8, Arc::new(U8Factory::new(random.clone()))),
        (ValueType::U16, Arc::new(U16Factory::new(random.clone()))),
        (ValueType::U32, Arc::new(U32Factory::new(random.clone()))),
        (ValueType::U64, Arc::new(U64Factory::new(random.clone()))),
        (ValueType::F32, Arc::new(F32Factory::new(random.clone()))),
        (ValueType::F64, Arc::new(F64Factory::new(random.clone()))),
        (ValueType::String, Arc::new(StringFactory::new(random.clone()))),
        (ValueType::Date, Arc::new(DateFactory::new(random.clone()))),
    ];
    debug!("Built {} leaf factories", factories.len());
    factories
}
