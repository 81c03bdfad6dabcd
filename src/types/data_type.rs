use std::{fmt::{self, Display}, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::PlanError;

/// Deepest `row(...)` nesting accepted when parsing a signature.
pub const MAX_ROW_DEPTH: usize = 32;

/// Statically known type of a plan expression.
///
/// Types are printed and parsed as type signatures (`bigint`, `HyperLogLog`,
/// `row(double,bigint)`, ...), which is also their serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DataType {
    /// SQL boolean
    Boolean,
    /// 64-bit integer
    Bigint,
    /// 32-bit integer
    Integer,
    /// Double precision float
    Double,
    /// Variable length string
    Varchar,
    /// Calendar date
    Date,
    /// Timestamp without time zone
    Timestamp,
    /// Opaque bytes
    Varbinary,
    /// Serialized cardinality-estimation sketch
    HyperLogLog,
    /// Anonymous row of fields, used for multi-field intermediate states
    Row(Vec<DataType>),
}

impl DataType {
    /// Whether values of this type can be compared for MIN/MAX.
    pub fn is_orderable(&self) -> bool {
        !matches!(self, DataType::HyperLogLog | DataType::Row(_) | DataType::Varbinary)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Bigint | DataType::Integer | DataType::Double)
    }

    fn parse_signature(text: &str) -> Result<DataType, PlanError> {
        DataType::parse_nested(text, 0)
    }

    fn parse_nested(text: &str, depth: usize) -> Result<DataType, PlanError> {
        let trimmed = text.trim();
        let lower = trimmed.to_ascii_lowercase();

        if let Some(inner) = lower.strip_prefix("row(").and_then(|s| s.strip_suffix(')')) {
            if depth >= MAX_ROW_DEPTH {
                return Err(PlanError::InvalidType(format!("row nesting deeper than {MAX_ROW_DEPTH}")));
            }
            let fields = split_top_level(inner)
                .ok_or_else(|| PlanError::InvalidType(trimmed.to_string()))?
                .into_iter()
                .map(|field| DataType::parse_nested(field, depth + 1))
                .collect::<Result<Vec<_>, _>>()?;
            if fields.is_empty() {
                return Err(PlanError::InvalidType(trimmed.to_string()));
            }
            return Ok(DataType::Row(fields));
        }

        match lower.as_str() {
            "boolean" => Ok(DataType::Boolean),
            "bigint" => Ok(DataType::Bigint),
            "integer" => Ok(DataType::Integer),
            "double" => Ok(DataType::Double),
            "varchar" => Ok(DataType::Varchar),
            "date" => Ok(DataType::Date),
            "timestamp" => Ok(DataType::Timestamp),
            "varbinary" => Ok(DataType::Varbinary),
            "hyperloglog" => Ok(DataType::HyperLogLog),
            _ => Err(PlanError::InvalidType(trimmed.to_string())),
        }
    }
}

// Splits "a,row(b,c),d" on the commas that are not nested in parentheses.
fn split_top_level(text: &str) -> Option<Vec<&str>> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    for (i, ch) in text.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    if !text.trim().is_empty() {
        parts.push(&text[start..]);
    }
    Some(parts)
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataType::Boolean => f.write_str("boolean"),
            DataType::Bigint => f.write_str("bigint"),
            DataType::Integer => f.write_str("integer"),
            DataType::Double => f.write_str("double"),
            DataType::Varchar => f.write_str("varchar"),
            DataType::Date => f.write_str("date"),
            DataType::Timestamp => f.write_str("timestamp"),
            DataType::Varbinary => f.write_str("varbinary"),
            DataType::HyperLogLog => f.write_str("HyperLogLog"),
            DataType::Row(fields) => {
                f.write_str("row(")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{field}")?;
                }
                f.write_str(")")
            }
        }
    }
}

impl FromStr for DataType {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DataType::parse_signature(s)
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for DataType {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("BIGINT".parse::<DataType>().unwrap(), DataType::Bigint);
        assert_eq!("hyperloglog".parse::<DataType>().unwrap(), DataType::HyperLogLog);
        assert_eq!(" Double ".parse::<DataType>().unwrap(), DataType::Double);
    }

    #[test]
    fn nested_row_signature_prints_and_parses() {
        let ty = DataType::Row(vec![
            DataType::Double,
            DataType::Row(vec![DataType::Bigint, DataType::Varchar]),
        ]);
        assert_eq!(ty.to_string(), "row(double,row(bigint,varchar))");
        assert_eq!("row(double, row(bigint, varchar))".parse::<DataType>().unwrap(), ty);
    }

    #[test]
    fn unknown_and_malformed_signatures_fail() {
        assert!(matches!("decimal".parse::<DataType>(), Err(PlanError::InvalidType(_))));
        assert!(matches!("row()".parse::<DataType>(), Err(PlanError::InvalidType(_))));
        assert!(matches!("row(bigint".parse::<DataType>(), Err(PlanError::InvalidType(_))));
    }

    #[test]
    fn row_nesting_is_capped() {
        let nested = |levels: usize| format!("{}bigint{}", "row(".repeat(levels), ")".repeat(levels));
        assert!(nested(MAX_ROW_DEPTH).parse::<DataType>().is_ok());
        assert!(matches!(nested(MAX_ROW_DEPTH + 1).parse::<DataType>(), Err(PlanError::InvalidType(_))));
        assert!(matches!(nested(10_000).parse::<DataType>(), Err(PlanError::InvalidType(_))));
    }

    #[test]
    fn serializes_as_signature_string() {
        let json = serde_json::to_string(&DataType::HyperLogLog).unwrap();
        assert_eq!(json, "\"HyperLogLog\"");
        let back: DataType = serde_json::from_str("\"row(double,bigint)\"").unwrap();
        assert_eq!(back, DataType::Row(vec![DataType::Double, DataType::Bigint]));
    }

    #[test]
    fn orderable_excludes_sketches_and_rows() {
        assert!(DataType::Varchar.is_orderable());
        assert!(!DataType::HyperLogLog.is_orderable());
        assert!(!DataType::Row(vec![DataType::Bigint]).is_orderable());
    }
}
