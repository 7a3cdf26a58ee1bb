use crate::model::{MutationOp, NodeKind, VariableType};
use thiserror::Error;

/// The scenario graph cannot support the transition that playback needs.
///
/// The session halts on the current node; nothing panics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("Start node '{0}' is not declared in the scenario")]
    MissingStartNode(String),

    #[error("Start node '{0}' has no outgoing target")]
    MissingStartTarget(String),

    #[error("Node '{source_node_id}' targets '{missing_node_id}', which is not declared")]
    UnresolvedTarget {
        source_node_id: String,
        missing_node_id: String,
    },

    #[error(
        "Cycle detected: more than {limit} automatic transitions without player input (halted at '{node_id}')"
    )]
    CycleDetected { node_id: String, limit: u32 },
}

/// A mutation does not fit the declared type of its variable. The mutation is not applied.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeMismatchError {
    #[error("Variable '{0}' is not declared in the scenario")]
    UndeclaredVariable(String),

    #[error("Operation '{operation}' cannot be applied to {declared} variable '{key}'")]
    UnsupportedOperation {
        key: String,
        operation: MutationOp,
        declared: VariableType,
    },

    #[error(
        "Operation '{operation}' on '{key}' expected a {expected} operand, but found {}",
        .found.map_or_else(|| "none".to_string(), |t| t.to_string())
    )]
    OperandType {
        key: String,
        operation: MutationOp,
        expected: VariableType,
        found: Option<VariableType>,
    },
}

/// `make_choice` was called when no choice can be taken. No state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidChoiceError {
    #[error("Scenario is not playing")]
    NotPlaying,

    #[error("Node '{node_id}' is not a dialogue ({kind})")]
    NotDialogue { node_id: String, kind: NodeKind },

    #[error("Dialogue '{node_id}' has no choice '{choice_id}'")]
    UnknownChoice { node_id: String, choice_id: String },

    #[error("Scenario already reached its end state at '{0}'")]
    Terminal(String),

    #[error("Scenario is halted at dead-end node '{0}'")]
    DeadEnd(String),
}

/// Errors returned from the playback controller's public operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    #[error(transparent)]
    InvalidChoice(#[from] InvalidChoiceError),
}

/// Errors that can occur when converting an authoring format into a `ScenarioGraph`.
#[derive(Error, Debug, Clone)]
pub enum ScenarioLoadError {
    #[error("Failed to parse scenario JSON: {0}")]
    JsonParseError(String),

    #[error("Could not read scenario file '{path}': {message}")]
    Io { path: String, message: String },

    #[error("Node '{node_id}' has an unregistered node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' has invalid {kind} data: {message}")]
    InvalidNodeData {
        node_id: String,
        kind: NodeKind,
        message: String,
    },

    #[error("Invalid scenario: {0}")]
    ValidationError(String),
}
