use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::planner::VariableRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    AscNullsFirst,
    AscNullsLast,
    DescNullsFirst,
    DescNullsLast,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortOrder::AscNullsFirst => "ASC NULLS FIRST",
            SortOrder::AscNullsLast => "ASC NULLS LAST",
            SortOrder::DescNullsFirst => "DESC NULLS FIRST",
            SortOrder::DescNullsLast => "DESC NULLS LAST",
        })
    }
}

/// ORDER BY inside an aggregate call, e.g. `array_agg(x ORDER BY y DESC)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrderingScheme {
    items: Vec<(VariableRef, SortOrder)>,
}

impl OrderingScheme {
    pub fn new(items: Vec<(VariableRef, SortOrder)>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[(VariableRef, SortOrder)] {
        &self.items
    }
}

impl Display for OrderingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (var, order)) in self.items.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{var} {order}")?;
        }
        Ok(())
    }
}
