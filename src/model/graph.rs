use super::{NodeData, ScenarioNode, Variable};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};

/// An immutable scenario definition: declared variables, nodes, and the designated start node.
///
/// Node lookups go through an id index built once at construction. When two nodes share an
/// id the first declaration wins; structural validation belongs to the authoring tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "GraphParts")]
pub struct ScenarioGraph {
    variables: Vec<Variable>,
    nodes: Vec<ScenarioNode>,
    start_node_id: String,
    #[serde(skip)]
    index: AHashMap<String, usize>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GraphParts {
    #[serde(default)]
    variables: Vec<Variable>,
    nodes: Vec<ScenarioNode>,
    start_node_id: String,
}

impl From<GraphParts> for ScenarioGraph {
    fn from(parts: GraphParts) -> Self {
        ScenarioGraph::new(parts.variables, parts.nodes, parts.start_node_id)
    }
}

/// A transition target that does not resolve to any node in the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingTarget {
    pub source_node_id: String,
    pub target_node_id: String,
}

impl ScenarioGraph {
    pub fn new(
        variables: Vec<Variable>,
        nodes: Vec<ScenarioNode>,
        start_node_id: impl Into<String>,
    ) -> Self {
        let mut index = AHashMap::with_capacity(nodes.len());
        for (position, node) in nodes.iter().enumerate() {
            index.entry(node.id.clone()).or_insert(position);
        }
        Self {
            variables,
            nodes,
            start_node_id: start_node_id.into(),
            index,
        }
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn nodes(&self) -> &[ScenarioNode] {
        &self.nodes
    }

    pub fn start_node_id(&self) -> &str {
        &self.start_node_id
    }

    pub fn node(&self, id: &str) -> Option<&ScenarioNode> {
        self.index.get(id).map(|&position| &self.nodes[position])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn variable(&self, key: &str) -> Option<&Variable> {
        self.variables.iter().find(|v| v.key == key)
    }

    /// Lists every transition target that points at an undeclared node.
    ///
    /// This is a lint for authoring tools. Playback never calls it: a dangling target only
    /// matters once the learner actually reaches it.
    pub fn dangling_targets(&self) -> Vec<DanglingTarget> {
        let mut dangling = Vec::new();
        for node in &self.nodes {
            for target in node.data.targets() {
                if !self.contains(target) {
                    dangling.push(DanglingTarget {
                        source_node_id: node.id.clone(),
                        target_node_id: target.to_string(),
                    });
                }
            }
            if let NodeData::Start(start) = &node.data {
                if start.target_node_id.is_none() {
                    dangling.push(DanglingTarget {
                        source_node_id: node.id.clone(),
                        target_node_id: String::new(),
                    });
                }
            }
        }
        dangling
    }
}
