//! Aggregates whose partial and combine steps run different functions.
//!
//! Most aggregates split into the same function run twice. The ones listed in
//! [`KnownAggregate`] instead resolve a dedicated function for each side; the
//! match in [`KnownAggregate::rule`] is the whole table.

use tracing::debug;

use crate::{
    catalog::{FunctionCatalog, FunctionHandle, QualifiedName},
    planner::AggregateCall,
    types::DataType,
    PlanError,
};

/// Builtin aggregates with a stage rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownAggregate {
    /// `approx_distinct(x)` → `approx_set(x)` then `merge(sketch)`
    ApproxDistinct,
}

impl KnownAggregate {
    pub const ALL: [KnownAggregate; 1] = [KnownAggregate::ApproxDistinct];

    pub fn object_name(self) -> &'static str {
        match self {
            KnownAggregate::ApproxDistinct => "approx_distinct",
        }
    }

    /// Identify `handle` as a builtin of `namespace` with a rewrite.
    pub fn identify(handle: &FunctionHandle, namespace: &str) -> Option<Self> {
        let name = handle.name();
        if name.namespace() != namespace {
            return None;
        }
        Self::ALL.into_iter().find(|k| k.object_name() == name.object_name())
    }

    pub fn rule(self) -> RewriteRule {
        match self {
            KnownAggregate::ApproxDistinct => RewriteRule {
                partial: PartialResolver::ByArguments { function: "approx_set" },
                combine: CombineResolver::FixedSignature { function: "merge", signature: DataType::HyperLogLog },
            },
        }
    }
}

/// How the partial-side function is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialResolver {
    /// Resolve `function` against the original argument types.
    ByArguments { function: &'static str },
}

impl PartialResolver {
    fn resolve(&self, catalog: &dyn FunctionCatalog, namespace: &str, arg_types: &[DataType]) -> Result<FunctionHandle, PlanError> {
        match self {
            PartialResolver::ByArguments { function } => {
                catalog.resolve_function(&QualifiedName::in_namespace(namespace, function)?, arg_types)
            }
        }
    }
}

/// How the combine-side function is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineResolver {
    /// Resolve `function` against one fixed type, ignoring the call site.
    FixedSignature { function: &'static str, signature: DataType },
}

impl CombineResolver {
    fn resolve(&self, catalog: &dyn FunctionCatalog, namespace: &str) -> Result<FunctionHandle, PlanError> {
        match self {
            CombineResolver::FixedSignature { function, signature } => {
                catalog.resolve_with_fixed_signature(&QualifiedName::in_namespace(namespace, function)?, signature)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    pub partial: PartialResolver,
    pub combine: CombineResolver,
}

/// Functions to run on each side of a split call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageFunctions {
    pub partial: FunctionHandle,
    pub combine: FunctionHandle,
    /// Set when a rewrite rule replaced the original function.
    pub rewritten: Option<KnownAggregate>,
}

impl StageFunctions {
    /// Pick the partial and combine functions for `call`. Without a rule the
    /// original handle is used on both sides.
    pub fn for_call(call: &AggregateCall, catalog: &dyn FunctionCatalog, namespace: &str) -> Result<Self, PlanError> {
        let Some(known) = KnownAggregate::identify(call.function(), namespace) else {
            return Ok(Self {
                partial: call.function().clone(),
                combine: call.function().clone(),
                rewritten: None,
            });
        };

        let rule = known.rule();
        let partial = rule.partial.resolve(catalog, namespace, &call.argument_types())?;
        let combine = rule.combine.resolve(catalog, namespace)?;
        debug!(function = %call.function(), partial = %partial, combine = %combine, "applying stage rewrite");
        Ok(Self { partial, combine, rewritten: Some(known) })
    }
}
