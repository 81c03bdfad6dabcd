use std::{collections::HashSet, fmt::{self, Display}};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{planner::{AggregateCall, VariableRef}, PlanError};

/// Grouped aggregate computations of one aggregation node.
///
/// `outputs` lists the output variables in emission order; every output is
/// keyed in `aggregations` and the two have the same length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "AggregationSetRepr", try_from = "AggregationSetRepr")]
pub struct AggregationSet {
    outputs: Vec<VariableRef>,
    aggregations: IndexMap<VariableRef, AggregateCall>,
    grouping_keys: Vec<VariableRef>,
}

impl AggregationSet {
    /// Build a set with an explicit output order.
    ///
    /// Fails with `ContractViolation` when `outputs` and `aggregations`
    /// differ in size, an output has no aggregation, or an output name
    /// repeats (even under a different type).
    pub fn try_new(
        outputs: Vec<VariableRef>,
        aggregations: IndexMap<VariableRef, AggregateCall>,
        grouping_keys: Vec<VariableRef>,
    ) -> Result<Self, PlanError> {
        if outputs.len() != aggregations.len() {
            return Err(PlanError::contract(format!(
                "outputs and aggregations sizes are different ({} vs {})",
                outputs.len(),
                aggregations.len()
            )));
        }
        let mut seen = HashSet::with_capacity(outputs.len());
        for output in &outputs {
            if !aggregations.contains_key(output) {
                return Err(PlanError::contract(format!("output {output} has no aggregation")));
            }
            if !seen.insert(output.name()) {
                return Err(PlanError::contract(format!("output {output} is listed twice")));
            }
        }
        Ok(Self { outputs, aggregations, grouping_keys })
    }

    /// Outputs follow the insertion order of `aggregations`.
    pub fn from_aggregations(aggregations: IndexMap<VariableRef, AggregateCall>, grouping_keys: Vec<VariableRef>) -> Self {
        let outputs = aggregations.keys().cloned().collect();
        Self { outputs, aggregations, grouping_keys }
    }

    pub fn outputs(&self) -> &[VariableRef] { &self.outputs }
    pub fn aggregations(&self) -> &IndexMap<VariableRef, AggregateCall> { &self.aggregations }
    pub fn grouping_keys(&self) -> &[VariableRef] { &self.grouping_keys }

    pub fn get(&self, output: &VariableRef) -> Option<&AggregateCall> {
        self.aggregations.get(output)
    }

    pub fn len(&self) -> usize { self.outputs.len() }
    pub fn is_empty(&self) -> bool { self.outputs.is_empty() }

    /// `(output, call)` pairs in output order.
    pub fn iter(&self) -> impl Iterator<Item = (&VariableRef, &AggregateCall)> {
        // I1 guarantees the lookup
        self.outputs.iter().filter_map(|o| self.aggregations.get_key_value(o))
    }

    /// Every variable mentioned by the set: outputs, grouping keys and
    /// whatever the calls read.
    pub fn variables(&self) -> Vec<&VariableRef> {
        let mut out: Vec<&VariableRef> = self.outputs.iter().collect();
        out.extend(self.grouping_keys.iter());
        for call in self.aggregations.values() {
            out.extend(call.variables());
        }
        out
    }
}

impl Display for AggregationSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Aggregate[")?;
        for (i, key) in self.grouping_keys.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{key}")?;
        }
        f.write_str("]")?;
        for (output, call) in self.iter() {
            write!(f, "\n    {output} := {call}")?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregationSetRepr {
    output_variables: Vec<VariableRef>,
    aggregations: Vec<(VariableRef, AggregateCall)>,
    grouping_variables: Vec<VariableRef>,
}

impl From<AggregationSet> for AggregationSetRepr {
    fn from(value: AggregationSet) -> Self {
        Self {
            output_variables: value.outputs,
            aggregations: value.aggregations.into_iter().collect(),
            grouping_variables: value.grouping_keys,
        }
    }
}

impl TryFrom<AggregationSetRepr> for AggregationSet {
    type Error = PlanError;

    fn try_from(value: AggregationSetRepr) -> Result<Self, Self::Error> {
        let expected = value.aggregations.len();
        let aggregations: IndexMap<_, _> = value.aggregations.into_iter().collect();
        if aggregations.len() != expected {
            return Err(PlanError::contract("aggregation keys are not unique"));
        }
        AggregationSet::try_new(value.output_variables, aggregations, value.grouping_variables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::_tests::fixtures::{call, var};
    use crate::types::DataType;

    fn sum_x() -> (VariableRef, AggregateCall) {
        (var("s1", DataType::Bigint), call("sum", vec![var("x", DataType::Bigint)]))
    }

    fn count_y() -> (VariableRef, AggregateCall) {
        (var("c1", DataType::Bigint), call("count", vec![var("y", DataType::Varchar)]))
    }

    #[test]
    fn more_outputs_than_aggregations_is_a_contract_violation() {
        let aggs: IndexMap<_, _> = [sum_x()].into_iter().collect();
        let outputs = vec![var("s1", DataType::Bigint), var("c1", DataType::Bigint)];
        let err = AggregationSet::try_new(outputs, aggs, vec![]).unwrap_err();
        assert!(matches!(err, PlanError::ContractViolation(ref m) if m.contains("sizes are different")));
    }

    #[test]
    fn output_without_aggregation_is_rejected() {
        let aggs: IndexMap<_, _> = [sum_x()].into_iter().collect();
        let err = AggregationSet::try_new(vec![var("other", DataType::Bigint)], aggs, vec![]).unwrap_err();
        assert!(matches!(err, PlanError::ContractViolation(_)));
    }

    #[test]
    fn repeated_output_is_rejected() {
        let aggs: IndexMap<_, _> = [sum_x(), count_y()].into_iter().collect();
        let s1 = var("s1", DataType::Bigint);
        let err = AggregationSet::try_new(vec![s1.clone(), s1], aggs, vec![]).unwrap_err();
        assert!(matches!(err, PlanError::ContractViolation(ref m) if m.contains("twice")));
    }

    #[test]
    fn output_name_reused_with_another_type_is_rejected() {
        let aggs: IndexMap<_, _> = [
            (var("x", DataType::Bigint), call("sum", vec![var("a", DataType::Bigint)])),
            (var("x", DataType::Double), call("avg", vec![var("a", DataType::Bigint)])),
        ]
        .into_iter()
        .collect();
        let outputs = vec![var("x", DataType::Bigint), var("x", DataType::Double)];
        let err = AggregationSet::try_new(outputs, aggs, vec![]).unwrap_err();
        assert!(matches!(err, PlanError::ContractViolation(ref m) if m.contains("twice")));
    }

    #[test]
    fn explicit_output_order_drives_iteration() {
        let aggs: IndexMap<_, _> = [sum_x(), count_y()].into_iter().collect();
        let outputs = vec![var("c1", DataType::Bigint), var("s1", DataType::Bigint)];
        let set = AggregationSet::try_new(outputs, aggs, vec![var("region", DataType::Varchar)]).unwrap();
        let order: Vec<_> = set.iter().map(|(o, _)| o.name()).collect();
        assert_eq!(order, vec!["c1", "s1"]);
    }

    #[test]
    fn convenience_constructor_uses_insertion_order() {
        let aggs: IndexMap<_, _> = [count_y(), sum_x()].into_iter().collect();
        let set = AggregationSet::from_aggregations(aggs, vec![]);
        let names: Vec<_> = set.outputs().iter().map(VariableRef::name).collect();
        assert_eq!(names, vec!["c1", "s1"]);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn display_lists_grouping_and_assignments() {
        let aggs: IndexMap<_, _> = [sum_x()].into_iter().collect();
        let set = AggregationSet::from_aggregations(aggs, vec![var("region", DataType::Varchar)]);
        assert_eq!(set.to_string(), "Aggregate[region]\n    s1 := sum(x)");
    }

    #[test]
    fn json_round_trip_keeps_order_and_rechecks_sizes() {
        let aggs: IndexMap<_, _> = [sum_x(), count_y()].into_iter().collect();
        let set = AggregationSet::from_aggregations(aggs, vec![var("region", DataType::Varchar)]);
        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json["outputVariables"][0]["name"], "s1");
        assert_eq!(json["groupingVariables"][0]["type"], "varchar");

        let back: AggregationSet = serde_json::from_value(json.clone()).unwrap();
        assert_eq!(back, set);

        let mut broken = json;
        broken["outputVariables"].as_array_mut().unwrap().pop();
        let err = serde_json::from_value::<AggregationSet>(broken).unwrap_err();
        assert!(err.to_string().contains("sizes are different"));
    }

    #[test]
    fn variables_cover_outputs_keys_and_arguments() {
        let aggs: IndexMap<_, _> = [sum_x()].into_iter().collect();
        let set = AggregationSet::from_aggregations(aggs, vec![var("region", DataType::Varchar)]);
        let names: Vec<_> = set.variables().into_iter().map(VariableRef::name).collect();
        assert_eq!(names, vec!["s1", "region", "x"]);
    }
}
