use crate::model::Variable;
use serde::{Deserialize, Serialize};

/// A scenario document as exported by an authoring tool.
///
/// Node payloads are kept as raw JSON until a `ScenarioLoader` maps each node's type name
/// to a node kind and validates its data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDefinition {
    #[serde(default)]
    pub variables: Vec<Variable>,
    pub nodes: Vec<NodeDefinition>,
    /// Defaults to the first node whose type maps to `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_node_id: Option<String>,
    /// Target for a start node that does not name one in its own data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_target_node_id: Option<String>,
}

/// One node of a scenario document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}
