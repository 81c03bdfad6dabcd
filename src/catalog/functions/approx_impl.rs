use crate::{catalog::{AggregateFunction, AggregateSignature}, types::DataType};

/// `approx_distinct(x)`: sketch while partial, estimate on final.
pub struct ApproxDistinctImpl;
impl AggregateFunction for ApproxDistinctImpl {
    fn name(&self) -> &'static str { "approx_distinct" }

    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> {
        match arg_types {
            [_] => Some(AggregateSignature::new(DataType::HyperLogLog, DataType::Bigint)),
            _ => None,
        }
    }
}

/// `approx_set(x)`: builds a sketch and returns it as is.
pub struct ApproxSetImpl;
impl AggregateFunction for ApproxSetImpl {
    fn name(&self) -> &'static str { "approx_set" }

    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> {
        match arg_types {
            [_] => Some(AggregateSignature::uniform(DataType::HyperLogLog)),
            _ => None,
        }
    }
}

/// `merge(sketch)`: unions sketches.
pub struct MergeImpl;
impl AggregateFunction for MergeImpl {
    fn name(&self) -> &'static str { "merge" }

    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> {
        match arg_types {
            [DataType::HyperLogLog] => Some(AggregateSignature::uniform(DataType::HyperLogLog)),
            _ => None,
        }
    }
}
