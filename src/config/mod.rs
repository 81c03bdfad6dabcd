pub mod suffix_kind;
pub use suffix_kind::*;

pub mod planner_config;
pub use planner_config::*;
