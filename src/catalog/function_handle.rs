use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{catalog::QualifiedName, types::DataType};

/// A resolved function: its qualified name plus the argument types the
/// overload was bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionHandle {
    name: QualifiedName,
    argument_types: Vec<DataType>,
}

impl FunctionHandle {
    pub fn new(name: QualifiedName, argument_types: Vec<DataType>) -> Self {
        Self { name, argument_types }
    }

    pub fn name(&self) -> &QualifiedName { &self.name }

    pub fn argument_types(&self) -> &[DataType] { &self.argument_types }
}

impl Display for FunctionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (i, ty) in self.argument_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{ty}")?;
        }
        f.write_str(")")
    }
}
