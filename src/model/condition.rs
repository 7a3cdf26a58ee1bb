use super::VariableValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison used by a logic gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    LessThan,
    GreaterEqual,
    LessEqual,
    Contains,
    NotContains,
    /// Any operator name this engine does not know. Always evaluates to `false`.
    #[serde(other)]
    Unsupported,
}

impl ConditionOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            ConditionOperator::Equals => "==",
            ConditionOperator::NotEquals => "!=",
            ConditionOperator::GreaterThan => ">",
            ConditionOperator::LessThan => "<",
            ConditionOperator::GreaterEqual => ">=",
            ConditionOperator::LessEqual => "<=",
            ConditionOperator::Contains => "CONTAINS",
            ConditionOperator::NotContains => "NOT CONTAINS",
            ConditionOperator::Unsupported => "??",
        }
    }
}

/// A predicate over one variable and a literal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub variable_key: String,
    pub operator: ConditionOperator,
    pub target_value: VariableValue,
}

impl Condition {
    pub fn new(
        variable_key: impl Into<String>,
        operator: ConditionOperator,
        target_value: impl Into<VariableValue>,
    ) -> Self {
        Self {
            variable_key: variable_key.into(),
            operator,
            target_value: target_value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${} {} {}",
            self.variable_key,
            self.operator.symbol(),
            self.target_value
        )
    }
}
