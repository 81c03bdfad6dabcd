use crate::{catalog::{AggregateFunction, AggregateSignature}, types::DataType};

pub struct SumImpl;

impl AggregateFunction for SumImpl {
    fn name(&self) -> &'static str { "sum" }

    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> {
        match arg_types {
            [DataType::Bigint | DataType::Integer] => Some(AggregateSignature::uniform(DataType::Bigint)),
            [DataType::Double] => Some(AggregateSignature::uniform(DataType::Double)),
            _ => None,
        }
    }
}
