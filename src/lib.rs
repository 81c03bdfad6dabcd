//! Planning-time splitting of grouped aggregations into partial and
//! final/intermediate stages for distributed execution.

pub mod types;
pub use types::DataType;

pub mod error;
pub use error::PlanError;

pub mod config;
pub use config::{PlannerConfig, SuffixKind};

pub mod catalog;
pub use catalog::{FunctionCatalog, FunctionHandle, FunctionRegistry, QualifiedName};

pub mod planner;
pub use planner::{
    AggregateCall, AggregationSet, CombineStage, Parts, PlanVariableAllocator, SplitMode, StageSplitter,
    VariableAllocator, VariableRef,
};
