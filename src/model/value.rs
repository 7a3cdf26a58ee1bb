use serde::{Deserialize, Serialize};
use std::fmt;

/// The declared type of a scenario variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableType {
    Boolean,
    Number,
    String,
}

impl VariableType {
    /// The value a variable of this type falls back to when its declaration is unusable.
    pub fn zero_value(self) -> VariableValue {
        match self {
            VariableType::Boolean => VariableValue::Boolean(false),
            VariableType::Number => VariableValue::Number(0.0),
            VariableType::String => VariableValue::String(String::new()),
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableType::Boolean => write!(f, "boolean"),
            VariableType::Number => write!(f, "number"),
            VariableType::String => write!(f, "string"),
        }
    }
}

/// A runtime value, always tagged with exactly one of the three variable types.
///
/// Serialized untagged, so scenario documents can write `true`, `3` or `"text"` directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl VariableValue {
    pub fn value_type(&self) -> VariableType {
        match self {
            VariableValue::Boolean(_) => VariableType::Boolean,
            VariableValue::Number(_) => VariableType::Number,
            VariableValue::String(_) => VariableType::String,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            VariableValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VariableValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariableValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Number(n) => write!(f, "{}", n),
            VariableValue::Boolean(b) => write!(f, "{}", b),
            VariableValue::String(s) => write!(f, "\"{}\"", s),
        }
    }
}

impl From<bool> for VariableValue {
    fn from(value: bool) -> Self {
        VariableValue::Boolean(value)
    }
}

impl From<f64> for VariableValue {
    fn from(value: f64) -> Self {
        VariableValue::Number(value)
    }
}

impl From<i32> for VariableValue {
    fn from(value: i32) -> Self {
        VariableValue::Number(f64::from(value))
    }
}

impl From<&str> for VariableValue {
    fn from(value: &str) -> Self {
        VariableValue::String(value.to_string())
    }
}

impl From<String> for VariableValue {
    fn from(value: String) -> Self {
        VariableValue::String(value)
    }
}

/// A declared, typed piece of scenario state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    pub key: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub initial_value: VariableValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Variable {
    pub fn new(
        key: impl Into<String>,
        var_type: VariableType,
        initial_value: impl Into<VariableValue>,
    ) -> Self {
        let key = key.into();
        Self {
            label: key.clone(),
            key,
            var_type,
            initial_value: initial_value.into(),
            description: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
