use crate::{catalog::{FunctionHandle, QualifiedName}, types::DataType, PlanError};

/// Function resolution as seen by the planner.
///
/// Implementations must be shareable across planning threads.
pub trait FunctionCatalog: Send + Sync {
    /// Resolve `name` to the overload matching `arg_types`.
    ///
    /// Unknown names yield `FunctionNotFound`; a known name without a matching
    /// overload yields `NoMatchingOverload`.
    fn resolve_function(&self, name: &QualifiedName, arg_types: &[DataType]) -> Result<FunctionHandle, PlanError>;

    /// Resolve `name` against a single fixed argument type, independent of
    /// any call site.
    fn resolve_with_fixed_signature(&self, name: &QualifiedName, signature: &DataType) -> Result<FunctionHandle, PlanError> {
        self.resolve_function(name, std::slice::from_ref(signature))
    }

    /// Type produced by the partial step of `handle`.
    fn intermediate_type(&self, handle: &FunctionHandle) -> Result<DataType, PlanError>;

    /// Type produced by the final step of `handle`.
    fn final_type(&self, handle: &FunctionHandle) -> Result<DataType, PlanError>;
}
