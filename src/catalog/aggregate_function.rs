use crate::types::DataType;

/// Intermediate and final types of one bound aggregate overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSignature {
    pub intermediate: DataType,
    pub final_type: DataType,
}

impl AggregateSignature {
    pub fn new(intermediate: DataType, final_type: DataType) -> Self {
        Self { intermediate, final_type }
    }

    /// Same type on both steps.
    pub fn uniform(ty: DataType) -> Self {
        Self { intermediate: ty.clone(), final_type: ty }
    }
}

/// Per-aggregate metadata.
/// One instance is registered per function name.
/// It is stateless and thread-safe to share.
pub trait AggregateFunction: Send + Sync {
    /// Canonical lowercase function name ("count", "sum", ...).
    fn name(&self) -> &'static str;

    /// Bind this aggregate to concrete argument types.
    /// Returns `None` when no overload accepts them.
    fn bind(&self, arg_types: &[DataType]) -> Option<AggregateSignature>;
}
