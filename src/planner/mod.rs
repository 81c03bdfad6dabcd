pub mod expression;
pub use expression::*;

pub mod ordering;
pub use ordering::*;

pub mod aggregate_call;
pub use aggregate_call::*;

pub mod aggregation_set;
pub use aggregation_set::*;

pub mod variable_allocator;
pub use variable_allocator::*;

pub mod rewrite;
pub use rewrite::*;

pub mod stage_split;
pub use stage_split::*;

#[cfg(test)]
pub(crate) mod _tests;
