use crate::{catalog::{AggregateFunction, AggregateSignature}, types::DataType};

pub struct AvgImpl;

impl AggregateFunction for AvgImpl {
    fn name(&self) -> &'static str { "avg" }

    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> {
        // partial state is (sum, count)
        match arg_types {
            [t] if t.is_numeric() => Some(AggregateSignature::new(
                DataType::Row(vec![DataType::Double, DataType::Bigint]),
                DataType::Double,
            )),
            _ => None,
        }
    }
}
