use crate::{catalog::{AggregateFunction, AggregateSignature}, types::DataType};

fn bind_extremum(arg_types: &[DataType]) -> Option<AggregateSignature> {
    match arg_types {
        [t] if t.is_orderable() => Some(AggregateSignature::uniform(t.clone())),
        _ => None,
    }
}

pub struct MinImpl;
impl AggregateFunction for MinImpl {
    fn name(&self) -> &'static str { "min" }
    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> { bind_extremum(arg_types) }
}

pub struct MaxImpl;
impl AggregateFunction for MaxImpl {
    fn name(&self) -> &'static str { "max" }
    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature> { bind_extremum(arg_types) }
}
