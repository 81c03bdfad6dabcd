#[cfg(test)]
pub mod fixtures {
    use indexmap::IndexMap;

    use crate::{
        catalog::{FunctionCatalog, FunctionRegistry, QualifiedName},
        config::PlannerConfig,
        planner::{AggregateCall, AggregationSet, PlanVariableAllocator, RowExpression, VariableRef},
        types::DataType,
    };

    pub fn var(name: &str, ty: DataType) -> VariableRef {
        VariableRef::new(name, ty)
    }

    pub fn registry() -> FunctionRegistry {
        FunctionRegistry::with_builtins(&PlannerConfig::default())
    }

    /// Builtin aggregate over plain variables, resolved through the default
    /// registry. Panics on unknown functions.
    pub fn call(name: &str, args: Vec<VariableRef>) -> AggregateCall {
        let registry = registry();
        let arg_types: Vec<DataType> = args.iter().map(|a| a.ty().clone()).collect();
        let fq = QualifiedName::in_namespace("presto.default", name).unwrap();
        let handle = registry.resolve_function(&fq, &arg_types).unwrap();
        let return_type = registry.final_type(&handle).unwrap();
        AggregateCall::new(handle, return_type, args.into_iter().map(RowExpression::Variable).collect())
    }

    pub fn set(entries: Vec<(VariableRef, AggregateCall)>, grouping_keys: Vec<VariableRef>) -> AggregationSet {
        let aggregations: IndexMap<_, _> = entries.into_iter().collect();
        AggregationSet::from_aggregations(aggregations, grouping_keys)
    }

    pub fn allocator_for(set: &AggregationSet) -> PlanVariableAllocator {
        PlanVariableAllocator::default().reserving(set)
    }
}

#[cfg(test)]
mod properties {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::fixtures::{allocator_for, call, registry, set, var};
    use crate::{
        planner::{AggregateCall, SplitMode, StageSplitter, VariableRef},
        types::DataType,
    };

    fn arb_type() -> impl Strategy<Value = DataType> {
        prop_oneof![
            Just(DataType::Bigint),
            Just(DataType::Integer),
            Just(DataType::Double),
            Just(DataType::Varchar),
            Just(DataType::Date),
        ]
    }

    // Picks a builtin that accepts `ty`.
    fn arb_call(column: String, ty: DataType) -> impl Strategy<Value = AggregateCall> {
        let numeric = ty.is_numeric();
        let choices: Vec<&'static str> = if numeric {
            vec!["count", "sum", "avg", "min", "max", "approx_distinct"]
        } else {
            vec!["count", "min", "max", "approx_distinct"]
        };
        prop::sample::select(choices).prop_map(move |name| call(name, vec![var(&column, ty.clone())]))
    }

    fn arb_set() -> impl Strategy<Value = crate::planner::AggregationSet> {
        let entries = prop::collection::vec(arb_type(), 0..8).prop_flat_map(|types| {
            types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| arb_call(format!("c{i}"), ty))
                .collect::<Vec<_>>()
        });
        let keys = prop::collection::vec(arb_type(), 0..3);
        (entries, keys).prop_map(|(calls, key_types)| {
            let entries = calls
                .into_iter()
                .enumerate()
                .map(|(i, c)| (var(&format!("out{i}"), c.return_type().clone()), c))
                .collect();
            let keys = key_types
                .into_iter()
                .enumerate()
                .map(|(i, ty)| var(&format!("k{i}"), ty))
                .collect();
            set(entries, keys)
        })
    }

    fn arb_mode() -> impl Strategy<Value = SplitMode> {
        prop_oneof![Just(SplitMode::TwoStage), Just(SplitMode::ThreeStage)]
    }

    proptest! {
        #[test]
        fn split_preserves_counts_identity_and_grouping(original in arb_set(), mode in arb_mode()) {
            let catalog = registry();
            let allocator = allocator_for(&original);
            let parts = StageSplitter::new(&catalog, &allocator).split(&original, mode).unwrap();
            let combine = parts.combine().aggregation();

            prop_assert_eq!(parts.mode(), mode);
            prop_assert_eq!(parts.partial().len(), original.len());
            prop_assert_eq!(combine.len(), original.len());

            // combine side is keyed by the original outputs, in order
            prop_assert_eq!(combine.outputs(), original.outputs());

            prop_assert_eq!(parts.partial().grouping_keys(), original.grouping_keys());
            prop_assert_eq!(combine.grouping_keys(), original.grouping_keys());
        }

        #[test]
        fn minted_variables_are_fresh(original in arb_set(), mode in arb_mode()) {
            let catalog = registry();
            let allocator = allocator_for(&original);
            let parts = StageSplitter::new(&catalog, &allocator).split(&original, mode).unwrap();

            let originals: HashSet<&str> = original.variables().into_iter().map(VariableRef::name).collect();
            let minted: HashSet<&str> = parts.partial().outputs().iter().map(VariableRef::name).collect();
            prop_assert_eq!(minted.len(), original.len());
            prop_assert!(minted.is_disjoint(&originals));

            // every combine call reads exactly the partial output it was paired with
            for (output, combine_call) in parts.combine().aggregation().iter() {
                let input = combine_call.arguments()[0].variables()[0];
                prop_assert!(parts.partial().get(input).is_some(), "{} reads unknown {}", output, input);
            }
        }
    }
}
