use super::{NodeDefinition, ScenarioDefinition};
use crate::error::ScenarioLoadError;
use crate::model::{
    ActionData, DialogueData, EndStateData, LogicGateData, NodeData, NodeKind, ScenarioGraph,
    ScenarioNode, StartData,
};
use ahash::AHashMap;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Converts scenario documents into graphs, mapping node type names to node kinds.
///
/// Every canonical type name (`start`, `dialogue`, `action`, `logic_gate`, `end_state`) and
/// its camelCase spelling are registered by default. Authoring tools that use other names
/// can add aliases with [`ScenarioLoader::with_type_alias`].
#[derive(Debug, Clone)]
pub struct ScenarioLoader {
    registry: AHashMap<String, NodeKind>,
}

impl Default for ScenarioLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioLoader {
    pub fn new() -> Self {
        let mut registry = AHashMap::new();
        register_default_kinds(&mut registry);
        Self { registry }
    }

    pub fn with_type_alias(mut self, user_type_name: &str, kind: NodeKind) -> Self {
        self.registry.insert(user_type_name.to_string(), kind);
        self
    }

    pub fn load_str(&self, json: &str) -> Result<ScenarioGraph, ScenarioLoadError> {
        let definition: ScenarioDefinition = serde_json::from_str(json)
            .map_err(|e| ScenarioLoadError::JsonParseError(e.to_string()))?;
        self.load(definition)
    }

    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<ScenarioGraph, ScenarioLoadError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| ScenarioLoadError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        self.load_str(&json)
    }

    pub fn load(&self, definition: ScenarioDefinition) -> Result<ScenarioGraph, ScenarioLoadError> {
        let mut nodes = definition
            .nodes
            .into_iter()
            .map(|node| self.convert_node(node))
            .collect::<Result<Vec<_>, _>>()?;

        let start_node_id = match definition.start_node_id {
            Some(id) => id,
            None => nodes
                .iter()
                .find(|n| n.kind() == NodeKind::Start)
                .map(|n| n.id.clone())
                .ok_or_else(|| {
                    ScenarioLoadError::ValidationError("scenario has no start node".to_string())
                })?,
        };

        if let Some(fallback) = definition.start_target_node_id {
            for node in nodes.iter_mut().filter(|n| n.id == start_node_id) {
                if let NodeData::Start(start) = &mut node.data {
                    if start.target_node_id.is_none() {
                        start.target_node_id = Some(fallback.clone());
                    }
                }
            }
        }

        tracing::debug!(
            "Loaded scenario with {} nodes and {} variables, starting at '{}'",
            nodes.len(),
            definition.variables.len(),
            start_node_id
        );
        Ok(ScenarioGraph::new(definition.variables, nodes, start_node_id))
    }

    fn convert_node(&self, node: NodeDefinition) -> Result<ScenarioNode, ScenarioLoadError> {
        let kind = self.registry.get(&node.node_type).copied().ok_or_else(|| {
            ScenarioLoadError::UnknownNodeType {
                node_id: node.id.clone(),
                type_name: node.node_type.clone(),
            }
        })?;
        let data = match kind {
            NodeKind::Start => NodeData::Start(parse_data::<StartData>(&node, kind)?),
            NodeKind::Dialogue => NodeData::Dialogue(parse_data::<DialogueData>(&node, kind)?),
            NodeKind::Action => NodeData::Action(parse_data::<ActionData>(&node, kind)?),
            NodeKind::LogicGate => NodeData::LogicGate(parse_data::<LogicGateData>(&node, kind)?),
            NodeKind::EndState => NodeData::EndState(parse_data::<EndStateData>(&node, kind)?),
        };
        Ok(ScenarioNode::new(node.id, data))
    }
}

fn parse_data<T: DeserializeOwned>(
    node: &NodeDefinition,
    kind: NodeKind,
) -> Result<T, ScenarioLoadError> {
    let raw = if node.data.is_null() {
        serde_json::Value::Object(serde_json::Map::new())
    } else {
        node.data.clone()
    };
    serde_json::from_value(raw).map_err(|e| ScenarioLoadError::InvalidNodeData {
        node_id: node.id.clone(),
        kind,
        message: e.to_string(),
    })
}

fn register_default_kinds(registry: &mut AHashMap<String, NodeKind>) {
    for kind in NodeKind::ALL {
        registry.insert(kind.type_name().to_string(), kind);
    }
    registry.insert("logicGate".to_string(), NodeKind::LogicGate);
    registry.insert("endState".to_string(), NodeKind::EndState);
}
