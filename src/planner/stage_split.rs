use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    catalog::FunctionCatalog,
    config::PlannerConfig,
    planner::{AggregateCall, AggregationSet, StageFunctions, VariableAllocator, VariableRef},
    PlanError,
};

/// Shape of a distributed aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitMode {
    /// partial → final, one merge step produces the answer
    TwoStage,
    /// partial → intermediate → final, an exchange sits before the last merge
    ThreeStage,
}

/// The combining side of a split, tagged by the stage it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineStage {
    Final(AggregationSet),
    Intermediate(AggregationSet),
}

impl CombineStage {
    pub fn aggregation(&self) -> &AggregationSet {
        match self {
            CombineStage::Final(set) | CombineStage::Intermediate(set) => set,
        }
    }

    pub fn mode(&self) -> SplitMode {
        match self {
            CombineStage::Final(_) => SplitMode::TwoStage,
            CombineStage::Intermediate(_) => SplitMode::ThreeStage,
        }
    }

    fn wrap(mode: SplitMode, set: AggregationSet) -> Self {
        match mode {
            SplitMode::TwoStage => CombineStage::Final(set),
            SplitMode::ThreeStage => CombineStage::Intermediate(set),
        }
    }
}

/// Result of splitting an aggregation set: the partial stage plus exactly one
/// of a final or an intermediate stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "PartsRepr", try_from = "PartsRepr")]
pub struct Parts {
    partial: AggregationSet,
    combine: CombineStage,
}

impl Parts {
    pub fn new(partial: AggregationSet, combine: CombineStage) -> Self {
        Self { partial, combine }
    }

    /// Build from the optional pair used on the wire. Exactly one of
    /// `final_` and `intermediate` must be present.
    pub fn from_optional(
        partial: AggregationSet,
        final_: Option<AggregationSet>,
        intermediate: Option<AggregationSet>,
    ) -> Result<Self, PlanError> {
        let combine = match (final_, intermediate) {
            (Some(set), None) => CombineStage::Final(set),
            (None, Some(set)) => CombineStage::Intermediate(set),
            _ => {
                return Err(PlanError::contract(
                    "only final or only intermediate aggregation is expected to be present",
                ))
            }
        };
        Ok(Self { partial, combine })
    }

    pub fn partial(&self) -> &AggregationSet { &self.partial }
    pub fn combine(&self) -> &CombineStage { &self.combine }
    pub fn mode(&self) -> SplitMode { self.combine.mode() }

    pub fn try_final_aggregation(&self) -> Option<&AggregationSet> {
        match &self.combine {
            CombineStage::Final(set) => Some(set),
            CombineStage::Intermediate(_) => None,
        }
    }

    pub fn try_intermediate_aggregation(&self) -> Option<&AggregationSet> {
        match &self.combine {
            CombineStage::Intermediate(set) => Some(set),
            CombineStage::Final(_) => None,
        }
    }

    /// # Panics
    /// When the parts were split in three-stage mode.
    pub fn final_aggregation(&self) -> &AggregationSet {
        match self.try_final_aggregation() {
            Some(set) => set,
            None => panic!("final aggregation is not present"),
        }
    }

    /// # Panics
    /// When the parts were split in two-stage mode.
    pub fn intermediate_aggregation(&self) -> &AggregationSet {
        match self.try_intermediate_aggregation() {
            Some(set) => set,
            None => panic!("intermediate aggregation is not present"),
        }
    }

    pub fn into_inner(self) -> (AggregationSet, CombineStage) {
        (self.partial, self.combine)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartsRepr {
    partial_aggregation: AggregationSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_aggregation: Option<AggregationSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    intermediate_aggregation: Option<AggregationSet>,
}

impl From<Parts> for PartsRepr {
    fn from(value: Parts) -> Self {
        let (final_aggregation, intermediate_aggregation) = match value.combine {
            CombineStage::Final(set) => (Some(set), None),
            CombineStage::Intermediate(set) => (None, Some(set)),
        };
        Self { partial_aggregation: value.partial, final_aggregation, intermediate_aggregation }
    }
}

impl TryFrom<PartsRepr> for Parts {
    type Error = PlanError;

    fn try_from(value: PartsRepr) -> Result<Self, Self::Error> {
        Parts::from_optional(value.partial_aggregation, value.final_aggregation, value.intermediate_aggregation)
    }
}

type SplitEntry = (VariableRef, AggregateCall);

/// Rewrites an aggregation set into partial and combine stages.
pub struct StageSplitter<'a> {
    catalog: &'a dyn FunctionCatalog,
    allocator: &'a dyn VariableAllocator,
    namespace: String,
}

impl<'a> StageSplitter<'a> {
    /// Splitter for builtins in the default namespace.
    pub fn new(catalog: &'a dyn FunctionCatalog, allocator: &'a dyn VariableAllocator) -> Self {
        Self::with_config(catalog, allocator, &PlannerConfig::default())
    }

    pub fn with_config(catalog: &'a dyn FunctionCatalog, allocator: &'a dyn VariableAllocator, config: &PlannerConfig) -> Self {
        Self { catalog, allocator, namespace: config.function_namespace.to_ascii_lowercase() }
    }

    pub fn split_into_partial_and_final(&self, set: &AggregationSet) -> Result<Parts, PlanError> {
        self.split(set, SplitMode::TwoStage)
    }

    pub fn split_into_partial_and_intermediate(&self, set: &AggregationSet) -> Result<Parts, PlanError> {
        self.split(set, SplitMode::ThreeStage)
    }

    /// Split every aggregation of `set` into a partial call keyed by a fresh
    /// variable and a combine call keyed by the original output.
    ///
    /// Any resolution failure fails the whole split.
    pub fn split(&self, set: &AggregationSet, mode: SplitMode) -> Result<Parts, PlanError> {
        debug!(?mode, aggregations = set.len(), grouping_keys = set.grouping_keys().len(), "splitting aggregation set");

        let pairs = set
            .iter()
            .map(|(output, call)| self.split_one(output, call))
            .collect::<Result<Vec<_>, _>>()?;
        let (partial, combine): (IndexMap<_, _>, IndexMap<_, _>) = pairs.into_iter().unzip();

        let minted: HashSet<&str> = partial.keys().map(VariableRef::name).collect();
        if partial.len() != set.len() || minted.len() != set.len() {
            return Err(PlanError::contract("allocator returned the same variable twice"));
        }
        let originals: HashSet<&str> = set.variables().into_iter().map(VariableRef::name).collect();
        if let Some(clash) = partial.keys().find(|v| originals.contains(v.name())) {
            return Err(PlanError::contract(format!("allocator returned {clash}, which the plan already uses")));
        }

        let grouping_keys = set.grouping_keys().to_vec();
        let partial = AggregationSet::from_aggregations(partial, grouping_keys.clone());
        let combine = AggregationSet::from_aggregations(combine, grouping_keys);
        Ok(Parts::new(partial, CombineStage::wrap(mode, combine)))
    }

    fn split_one(&self, output: &VariableRef, call: &AggregateCall) -> Result<(SplitEntry, SplitEntry), PlanError> {
        let functions = StageFunctions::for_call(call, self.catalog, &self.namespace)?;
        // types come from the original function so the combine side keeps the output's type
        let partial_type = self.catalog.intermediate_type(call.function())?;
        let final_type = self.catalog.final_type(call.function())?;

        let fresh = self.allocator.new_variable(call.function().name().object_name(), partial_type.clone());

        let (partial_name, combine_name) = match functions.rewritten {
            Some(_) => (
                functions.partial.name().object_name().to_string(),
                functions.combine.name().object_name().to_string(),
            ),
            None => (call.display_name().to_string(), call.display_name().to_string()),
        };

        trace!(
            output = %output,
            intermediate = %fresh,
            partial = %functions.partial,
            combine = %functions.combine,
            "split aggregation"
        );

        let partial = call.to_partial(functions.partial, partial_name, partial_type);
        let combine = call.to_combine(functions.combine, combine_name, fresh.clone(), final_type);
        Ok(((fresh, partial), (output.clone(), combine)))
    }
}

impl AggregationSet {
    /// Shorthand for [`StageSplitter::split`] in the default namespace.
    pub fn split(
        &self,
        mode: SplitMode,
        catalog: &dyn FunctionCatalog,
        allocator: &dyn VariableAllocator,
    ) -> Result<Parts, PlanError> {
        StageSplitter::new(catalog, allocator).split(self, mode)
    }
}
