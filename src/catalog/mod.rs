pub mod qualified_name;
pub use qualified_name::*;

pub mod function_handle;
pub use function_handle::*;

pub mod function_catalog;
pub use function_catalog::*;

pub mod aggregate_function;
pub use aggregate_function::*;

pub mod functions;
pub use functions::*;

pub mod function_registry;
pub use function_registry::*;
