use std::fmt::{self, Display};

use chrono::NaiveDate;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::{catalog::FunctionHandle, types::DataType};

/// A typed plan variable. Identity is the name together with the type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariableRef {
    name: String,
    #[serde(rename = "type")]
    ty: DataType,
}

impl VariableRef {
    pub fn new(name: impl Into<String>, ty: DataType) -> Self {
        Self { name: name.into(), ty }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn ty(&self) -> &DataType { &self.ty }
}

impl Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Position of an expression in the query text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum ConstantValue {
    Null,
    Boolean(bool),
    Bigint(i64),
    Double(OrderedFloat<f64>),
    Varchar(String),
    Date(NaiveDate),
}

impl Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Null => f.write_str("NULL"),
            ConstantValue::Boolean(b) => write!(f, "{b}"),
            ConstantValue::Bigint(i) => write!(f, "{i}"),
            ConstantValue::Double(d) => write!(f, "{d}"),
            ConstantValue::Varchar(s) => write!(f, "'{s}'"),
            ConstantValue::Date(d) => write!(f, "DATE '{d}'"),
        }
    }
}

/// Scalar expression over plan variables, already resolved and typed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "@type", rename_all = "camelCase")]
pub enum RowExpression {
    Variable(VariableRef),
    Constant {
        value: ConstantValue,
        #[serde(rename = "type")]
        ty: DataType,
    },
    #[serde(rename_all = "camelCase")]
    Call {
        display_name: String,
        handle: FunctionHandle,
        return_type: DataType,
        arguments: Vec<RowExpression>,
    },
}

impl RowExpression {
    pub fn variable(name: impl Into<String>, ty: DataType) -> Self {
        RowExpression::Variable(VariableRef::new(name, ty))
    }

    pub fn constant(value: ConstantValue, ty: DataType) -> Self {
        RowExpression::Constant { value, ty }
    }

    /// Statically known type of this expression.
    pub fn ty(&self) -> &DataType {
        match self {
            RowExpression::Variable(v) => v.ty(),
            RowExpression::Constant { ty, .. } => ty,
            RowExpression::Call { return_type, .. } => return_type,
        }
    }

    /// Variables referenced anywhere in this expression, in visit order.
    pub fn variables(&self) -> Vec<&VariableRef> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a VariableRef>) {
        match self {
            RowExpression::Variable(v) => out.push(v),
            RowExpression::Constant { .. } => {}
            RowExpression::Call { arguments, .. } => {
                for a in arguments {
                    a.collect_variables(out);
                }
            }
        }
    }
}

impl From<VariableRef> for RowExpression {
    fn from(value: VariableRef) -> Self {
        RowExpression::Variable(value)
    }
}

impl Display for RowExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowExpression::Variable(v) => write!(f, "{v}"),
            RowExpression::Constant { value, .. } => write!(f, "{value}"),
            RowExpression::Call { display_name, arguments, .. } => {
                write!(f, "{display_name}(")?;
                for (i, a) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{a}")?;
                }
                f.write_str(")")
            }
        }
    }
}
