use serde::{Deserialize, Serialize};

use crate::config::SuffixKind;

/// Planner configuration shared by the function registry and the variable
/// allocator.
///
/// - `function_namespace` is the `catalog.schema` prefix builtin aggregates
///   live in, and where stage rewrites resolve their replacement functions.
/// - `variable_suffix` picks how minted variable names are made unique.
/// - `suffix_separator` joins a hint and its suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlannerConfig {
    /// `catalog.schema` of builtin functions
    pub function_namespace: String,
    /// Uniqueness strategy for minted variables
    pub variable_suffix: SuffixKind,
    /// Separator between a hint and its suffix
    pub suffix_separator: String,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            function_namespace: "presto.default".to_string(),
            variable_suffix: Default::default(),
            suffix_separator: "_".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Create default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience: sequential suffixes in the default namespace.
    pub fn sequential() -> Self {
        Self {
            variable_suffix: SuffixKind::Sequential,
            ..Self::default()
        }
    }

    /// Convenience: UUID suffixes in the default namespace.
    pub fn uuid() -> Self {
        Self {
            variable_suffix: SuffixKind::Uuid,
            ..Self::default()
        }
    }

    /// Same configuration with builtins registered under `namespace`.
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.function_namespace = namespace.to_ascii_lowercase();
        self
    }
}
