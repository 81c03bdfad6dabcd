use crate::{catalog::{AggregateFunction, AggregateSignature}, types::DataType};

pub struct CountImpl;

impl AggregateFunction for CountImpl {
    fn name(&self) -> &'static str { "count" }

    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> {
        // COUNT(*) arrives with no arguments, COUNT(expr) with one of any type
        match arg_types {
            [] | [_] => Some(AggregateSignature::uniform(DataType::Bigint)),
            _ => None,
        }
    }
}
