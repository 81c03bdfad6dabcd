use std::{collections::HashMap, sync::Arc};

use tracing::trace;

use crate::{
    catalog::{
        AggregateFunction, AggregateSignature, ApproxDistinctImpl, ApproxSetImpl, AvgImpl, CountImpl,
        FunctionCatalog, FunctionHandle, MaxImpl, MergeImpl, MinImpl, QualifiedName, SumImpl,
    },
    config::PlannerConfig,
    types::DataType,
    PlanError,
};

/// Case-insensitive registry of aggregates living in a single namespace.
pub struct FunctionRegistry {
    namespace: String,
    by_name: HashMap<String, Arc<dyn AggregateFunction>>,
}

impl FunctionRegistry {
    /// Empty registry for the `catalog.schema` in `config`.
    pub fn new(config: &PlannerConfig) -> Self {
        Self { namespace: config.function_namespace.to_ascii_lowercase(), by_name: HashMap::new() }
    }

    pub fn register<I: AggregateFunction + 'static>(&mut self, impl_: I) {
        self.by_name.insert(impl_.name().to_string(), Arc::new(impl_));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn AggregateFunction>> {
        self.by_name.get(&name.to_ascii_lowercase()).cloned()
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn list(&self) -> Vec<String> {
        let mut v: Vec<_> = self.by_name.keys().cloned().collect();
        v.sort();
        v
    }

    pub fn with_builtins(config: &PlannerConfig) -> Self {
        let mut registry = Self::new(config);
        registry.register(CountImpl);
        registry.register(SumImpl);
        registry.register(AvgImpl);
        registry.register(MinImpl);
        registry.register(MaxImpl);
        registry.register(ApproxDistinctImpl);
        registry.register(ApproxSetImpl);
        registry.register(MergeImpl);
        registry
    }

    fn lookup(&self, name: &QualifiedName) -> Result<Arc<dyn AggregateFunction>, PlanError> {
        if name.namespace() != self.namespace {
            return Err(PlanError::FunctionNotFound(name.clone()));
        }
        self.get(name.object_name()).ok_or_else(|| PlanError::FunctionNotFound(name.clone()))
    }

    fn signature_of(&self, handle: &FunctionHandle) -> Result<AggregateSignature, PlanError> {
        self.lookup(handle.name())?
            .bind(handle.argument_types())
            .ok_or_else(|| PlanError::NoMatchingOverload {
                name: handle.name().clone(),
                arguments: handle.argument_types().to_vec(),
            })
    }
}

impl FunctionCatalog for FunctionRegistry {
    fn resolve_function(&self, name: &QualifiedName, arg_types: &[DataType]) -> Result<FunctionHandle, PlanError> {
        let function = self.lookup(name)?;
        if function.bind(arg_types).is_none() {
            return Err(PlanError::NoMatchingOverload { name: name.clone(), arguments: arg_types.to_vec() });
        }
        trace!(function = %name, ?arg_types, "resolved aggregate overload");
        Ok(FunctionHandle::new(name.clone(), arg_types.to_vec()))
    }

    fn intermediate_type(&self, handle: &FunctionHandle) -> Result<DataType, PlanError> {
        Ok(self.signature_of(handle)?.intermediate)
    }

    fn final_type(&self, handle: &FunctionHandle) -> Result<DataType, PlanError> {
        Ok(self.signature_of(handle)?.final_type)
    }
}
