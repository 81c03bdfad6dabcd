use std::fmt::{self, Display};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::PlanError;

static NAME_PART: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex")
});

/// Fully qualified function name: `catalog.schema.object`, stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct QualifiedName {
    catalog: String,
    schema: String,
    object: String,
}

impl QualifiedName {
    pub fn parse(text: &str) -> Result<Self, PlanError> {
        let parts: Vec<&str> = text.trim().split('.').collect();
        let [catalog, schema, object] = parts.as_slice() else {
            return Err(PlanError::InvalidQualifiedName(text.to_string()));
        };
        if !parts.iter().all(|p| NAME_PART.is_match(p)) {
            return Err(PlanError::InvalidQualifiedName(text.to_string()));
        }
        Ok(Self {
            catalog: catalog.to_ascii_lowercase(),
            schema: schema.to_ascii_lowercase(),
            object: object.to_ascii_lowercase(),
        })
    }

    /// `namespace` is a `catalog.schema` prefix.
    pub fn in_namespace(namespace: &str, object: &str) -> Result<Self, PlanError> {
        Self::parse(&format!("{namespace}.{object}"))
    }

    pub fn catalog(&self) -> &str { &self.catalog }
    pub fn schema(&self) -> &str { &self.schema }
    pub fn object_name(&self) -> &str { &self.object }

    /// `catalog.schema`
    pub fn namespace(&self) -> String {
        format!("{}.{}", self.catalog, self.schema)
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.object)
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        QualifiedName::parse(&value)
    }
}
