use serde::{Deserialize, Serialize};

/// Strategy used to make a minted variable name unique.
///
/// - `Sequential`: bare hint first, then `hint_1`, `hint_2`, ...
/// - `Uuid`: always `hint_<uuid>`, unique without coordination.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixKind {
    /// Sequential numeric suffixes (default).
    #[default]
    Sequential,
    /// Random v4 UUID suffixes.
    Uuid,
}
