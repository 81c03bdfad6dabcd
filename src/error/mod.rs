pub mod plan_error;
pub use plan_error::*;
