use crate::evaluator::ConditionTrace;
use crate::model::VariableValue;
use crate::playback::Outcome;
use itertools::Itertools;

/// Formats condition traces, paths and outcomes into human-readable strings
pub struct TraceFormatter;

impl TraceFormatter {
    /// Format a condition trace, e.g. `$trust (was 6) > 5`.
    pub fn format_condition(trace: &ConditionTrace) -> String {
        let observed = trace
            .observed
            .as_ref()
            .map_or("undeclared".to_string(), Self::format_value);
        format!(
            "${} (was {}) {} {}",
            trace.condition.variable_key,
            observed,
            trace.condition.operator.symbol(),
            Self::format_value(&trace.condition.target_value)
        )
    }

    /// Format a path history as `start → d1 → d2`.
    pub fn format_path(path: &[String]) -> String {
        path.iter().join(" → ")
    }

    /// Multi-line summary of a finished run.
    pub fn format_outcome(outcome: &Outcome) -> String {
        let mut lines = vec![format!("Outcome: {} at '{}'", outcome.kind, outcome.node_id)];
        if !outcome.message.is_empty() {
            lines.push(format!("Message: {}", outcome.message));
        }
        if let Some(score) = outcome.score {
            lines.push(format!("Score: {}", Self::format_value(&VariableValue::Number(score))));
        }
        lines.push(format!("Path: {}", Self::format_path(&outcome.path_history)));
        let variables = outcome
            .variables
            .iter()
            .sorted_by(|a, b| a.0.cmp(b.0))
            .map(|(key, value)| format!("${} = {}", key, Self::format_value(value)))
            .join(", ");
        if !variables.is_empty() {
            lines.push(format!("Variables: {}", variables));
        }
        lines.join("\n")
    }

    /// Format a value for display.
    pub fn format_value(value: &VariableValue) -> String {
        value.to_string()
    }
}
