use super::VariableValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of change a mutation performs on its target variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationOp {
    Set,
    Increment,
    Decrement,
    Toggle,
    Append,
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationOp::Set => "set",
            MutationOp::Increment => "increment",
            MutationOp::Decrement => "decrement",
            MutationOp::Toggle => "toggle",
            MutationOp::Append => "append",
        };
        write!(f, "{}", name)
    }
}

/// A single change to one variable, applied as part of a transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutation {
    pub variable_key: String,
    pub operation: MutationOp,
    /// Operand of the operation. `toggle` ignores it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<VariableValue>,
}

impl Mutation {
    pub fn new(variable_key: impl Into<String>, operation: MutationOp) -> Self {
        Self {
            variable_key: variable_key.into(),
            operation,
            value: None,
        }
    }

    pub fn set(variable_key: impl Into<String>, value: impl Into<VariableValue>) -> Self {
        Self::new(variable_key, MutationOp::Set).with_value(value)
    }

    pub fn increment(variable_key: impl Into<String>, delta: f64) -> Self {
        Self::new(variable_key, MutationOp::Increment).with_value(delta)
    }

    pub fn decrement(variable_key: impl Into<String>, delta: f64) -> Self {
        Self::new(variable_key, MutationOp::Decrement).with_value(delta)
    }

    pub fn toggle(variable_key: impl Into<String>) -> Self {
        Self::new(variable_key, MutationOp::Toggle)
    }

    pub fn append(variable_key: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self::new(variable_key, MutationOp::Append).with_value(suffix.into())
    }

    pub fn with_value(mut self, value: impl Into<VariableValue>) -> Self {
        self.value = Some(value.into());
        self
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "${} {} {}", self.variable_key, self.operation, value),
            None => write!(f, "${} {}", self.variable_key, self.operation),
        }
    }
}
