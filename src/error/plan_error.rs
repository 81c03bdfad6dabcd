use thiserror::Error;

use crate::{catalog::QualifiedName, types::DataType};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// Malformed planner input: output/aggregation mismatch, both or neither
    /// combine stage present, or an allocator that handed out a used name.
    #[error("contract violation: {0}")]
    ContractViolation(String),

    #[error("function not found: {0}")]
    FunctionNotFound(QualifiedName),

    #[error("no overload of {name} matches ({})", join_types(.arguments))]
    NoMatchingOverload { name: QualifiedName, arguments: Vec<DataType> },

    #[error("invalid qualified name: '{0}'")]
    InvalidQualifiedName(String),

    #[error("invalid type signature: '{0}'")]
    InvalidType(String),
}

impl PlanError {
    pub fn contract(message: impl Into<String>) -> Self {
        PlanError::ContractViolation(message.into())
    }
}

fn join_types(types: &[DataType]) -> String {
    types.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
