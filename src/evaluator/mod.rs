use crate::model::{Condition, ConditionOperator, VariableValue};
use crate::trace::TraceFormatter;
use ahash::AHashMap;
use serde::Serialize;

/// A record of how a condition was evaluated, including the value that was observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionTrace {
    pub condition: Condition,
    /// The variable's value at evaluation time. `None` if the variable is not declared.
    pub observed: Option<VariableValue>,
    pub outcome: bool,
}

impl ConditionTrace {
    /// Human-readable explanation, e.g. `$trust (was 6) > 5`.
    pub fn reason(&self) -> String {
        TraceFormatter::format_condition(self)
    }
}

/// Evaluates a condition against the current variable values.
///
/// Never fails: type mismatches, undeclared variables and unsupported operators all
/// evaluate to `false`. Has no side effects and is safe to call speculatively.
pub fn evaluate(condition: &Condition, values: &AHashMap<String, VariableValue>) -> bool {
    match values.get(&condition.variable_key) {
        Some(observed) => compare(condition.operator, observed, &condition.target_value),
        None => false,
    }
}

/// Evaluates a condition and keeps a trace of the observed value.
pub fn explain(condition: &Condition, values: &AHashMap<String, VariableValue>) -> ConditionTrace {
    let observed = values.get(&condition.variable_key).cloned();
    let outcome = observed
        .as_ref()
        .is_some_and(|value| compare(condition.operator, value, &condition.target_value));
    ConditionTrace {
        condition: condition.clone(),
        observed,
        outcome,
    }
}

fn compare(operator: ConditionOperator, observed: &VariableValue, target: &VariableValue) -> bool {
    use VariableValue::{Number, String};
    match operator {
        ConditionOperator::Equals => observed == target,
        ConditionOperator::NotEquals => observed != target,
        ConditionOperator::GreaterThan
        | ConditionOperator::LessThan
        | ConditionOperator::GreaterEqual
        | ConditionOperator::LessEqual => match (observed, target) {
            (Number(a), Number(b)) => match operator {
                ConditionOperator::GreaterThan => a > b,
                ConditionOperator::LessThan => a < b,
                ConditionOperator::GreaterEqual => a >= b,
                _ => a <= b,
            },
            _ => false,
        },
        ConditionOperator::Contains => match (observed, target) {
            (String(haystack), String(needle)) => haystack.contains(needle.as_str()),
            _ => false,
        },
        ConditionOperator::NotContains => match (observed, target) {
            (String(haystack), String(needle)) => !haystack.contains(needle.as_str()),
            _ => false,
        },
        ConditionOperator::Unsupported => false,
    }
}
