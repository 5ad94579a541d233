use super::TypeFactory;
use crate::error::FactoryError;
use crate::random::RandomValueGenerator;
use crate::value::{EnumConstant, EnumType, Value};
use std::sync::Arc;

/// Uniform choice among the declared constants of an enum.
#[derive(Debug)]
pub struct EnumConstantFactory {
    enum_type: EnumType,
    random: Arc<RandomValueGenerator>,
}

impl EnumConstantFactory {
    pub fn new(enum_type: EnumType, random: Arc<RandomValueGenerator>) -> Self {
        Self { enum_type, random }
    }
}

impl TypeFactory for EnumConstantFactory {
    fn create(&self) -> Result<Value, FactoryError> {
        let constant = self
            .random
            .get_from(self.enum_type.constants())
            .map_err(|_| FactoryError::EmptyEnum { name: self.enum_type.name() })?;
        Ok(Value::Enum(EnumConstant {
            enum_name: self.enum_type.name(),
            constant: *constant,
        }))
    }
}
