use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::{
    catalog::FunctionHandle,
    planner::{OrderingScheme, RowExpression, SourceLocation, VariableRef},
    types::DataType,
};

/// One aggregate function invocation inside an aggregation node.
///
/// Immutable once built: the `with_*` methods consume and return the call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateCall {
    display_name: String,
    function: FunctionHandle,
    return_type: DataType,
    arguments: Vec<RowExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_location: Option<SourceLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filter: Option<RowExpression>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    order_by: Option<OrderingScheme>,
    #[serde(default)]
    distinct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mask: Option<VariableRef>,
}

impl AggregateCall {
    /// A plain call displayed under the function's object name.
    pub fn new(function: FunctionHandle, return_type: DataType, arguments: Vec<RowExpression>) -> Self {
        Self {
            display_name: function.name().object_name().to_string(),
            function,
            return_type,
            arguments,
            source_location: None,
            filter: None,
            order_by: None,
            distinct: false,
            mask: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_source_location(mut self, location: SourceLocation) -> Self {
        self.source_location = Some(location);
        self
    }

    pub fn with_filter(mut self, filter: RowExpression) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_order_by(mut self, order_by: OrderingScheme) -> Self {
        self.order_by = Some(order_by);
        self
    }

    pub fn with_distinct(mut self, distinct: bool) -> Self {
        self.distinct = distinct;
        self
    }

    pub fn with_mask(mut self, mask: VariableRef) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn display_name(&self) -> &str { &self.display_name }
    pub fn function(&self) -> &FunctionHandle { &self.function }
    pub fn return_type(&self) -> &DataType { &self.return_type }
    pub fn arguments(&self) -> &[RowExpression] { &self.arguments }
    pub fn source_location(&self) -> Option<SourceLocation> { self.source_location }
    pub fn filter(&self) -> Option<&RowExpression> { self.filter.as_ref() }
    pub fn order_by(&self) -> Option<&OrderingScheme> { self.order_by.as_ref() }
    pub fn is_distinct(&self) -> bool { self.distinct }
    pub fn mask(&self) -> Option<&VariableRef> { self.mask.as_ref() }

    /// Static types of the arguments, in argument order.
    pub fn argument_types(&self) -> Vec<DataType> {
        self.arguments.iter().map(|a| a.ty().clone()).collect()
    }

    /// Every variable this call reads: arguments, filter, ordering and mask.
    pub fn variables(&self) -> Vec<&VariableRef> {
        let mut out: Vec<&VariableRef> = self.arguments.iter().flat_map(RowExpression::variables).collect();
        if let Some(filter) = &self.filter {
            out.extend(filter.variables());
        }
        if let Some(order_by) = &self.order_by {
            out.extend(order_by.items().iter().map(|(v, _)| v));
        }
        out.extend(self.mask.as_ref());
        out
    }

    /// The data-scanning half of this call: same inputs and modifiers, but
    /// running `function` and producing `return_type`.
    pub fn to_partial(&self, function: FunctionHandle, display_name: String, return_type: DataType) -> Self {
        Self {
            display_name,
            function,
            return_type,
            arguments: self.arguments.clone(),
            source_location: self.source_location,
            filter: self.filter.clone(),
            order_by: self.order_by.clone(),
            distinct: self.distinct,
            mask: self.mask.clone(),
        }
    }

    /// The combining half of this call: reads only `input`, with filter,
    /// ordering, distinct and mask dropped since they were applied upstream.
    pub fn to_combine(&self, function: FunctionHandle, display_name: String, input: VariableRef, return_type: DataType) -> Self {
        Self {
            display_name,
            function,
            return_type,
            arguments: vec![RowExpression::Variable(input)],
            source_location: self.source_location,
            filter: None,
            order_by: None,
            distinct: false,
            mask: None,
        }
    }
}

impl Display for AggregateCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.display_name)?;
        if self.distinct {
            f.write_str("DISTINCT ")?;
        }
        for (i, a) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{a}")?;
        }
        if let Some(order_by) = &self.order_by {
            write!(f, " ORDER BY {order_by}")?;
        }
        f.write_str(")")?;
        if let Some(filter) = &self.filter {
            write!(f, " FILTER (WHERE {filter})")?;
        }
        if let Some(mask) = &self.mask {
            write!(f, " (mask = {mask})")?;
        }
        Ok(())
    }
}
