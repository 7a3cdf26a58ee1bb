use crate::model::{OutcomeKind, VariableValue};
use ahash::AHashMap;
use serde::Serialize;

/// A copy of the play session's mutable state, for presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioPlayState {
    pub current_node_id: Option<String>,
    pub variable_values: AHashMap<String, VariableValue>,
    pub path_history: Vec<String>,
    pub is_playing: bool,
}

impl ScenarioPlayState {
    pub fn variable(&self, key: &str) -> Option<&VariableValue> {
        self.variable_values.get(key)
    }
}

/// The terminal result of a run, captured when an end state is reached.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome {
    pub node_id: String,
    pub kind: OutcomeKind,
    pub message: String,
    pub score: Option<f64>,
    pub path_history: Vec<String>,
    pub variables: AHashMap<String, VariableValue>,
}

/// Where a session stands after an operation.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackStatus {
    /// Never started, or reset.
    Idle,
    /// Stopped by the host; state is preserved.
    Stopped { node_id: String },
    /// On a dialogue, waiting for `make_choice`.
    AwaitingChoice { node_id: String },
    /// An automatic transition is armed and fires after `due_in_ms`.
    Pending { node_id: String, due_in_ms: u64 },
    /// An end state was reached.
    Completed(Outcome),
    /// The graph could not continue from `node_id`.
    Halted { node_id: String },
}

impl PlaybackStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PlaybackStatus::Completed(_) | PlaybackStatus::Halted { .. }
        )
    }
}
