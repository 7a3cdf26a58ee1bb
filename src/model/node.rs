use super::{Condition, Mutation};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The five kinds of state a scenario graph is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Start,
    Dialogue,
    Action,
    LogicGate,
    EndState,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Start,
        NodeKind::Dialogue,
        NodeKind::Action,
        NodeKind::LogicGate,
        NodeKind::EndState,
    ];

    /// The canonical type name used in scenario documents.
    pub fn type_name(&self) -> &'static str {
        match self {
            NodeKind::Start => "start",
            NodeKind::Dialogue => "dialogue",
            NodeKind::Action => "action",
            NodeKind::LogicGate => "logic_gate",
            NodeKind::EndState => "end_state",
        }
    }

    /// Automatic kinds advance without player input once the scheduler fires.
    pub fn is_automatic(&self) -> bool {
        matches!(self, NodeKind::Action | NodeKind::LogicGate)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartData {
    #[serde(default)]
    pub intro_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_node_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub mutations: Vec<Mutation>,
    pub target_node_id: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DialogueData {
    #[serde(default)]
    pub character_name: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionData {
    #[serde(default)]
    pub mutations: Vec<Mutation>,
    pub target_node_id: String,
    #[serde(default)]
    pub delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogicGateData {
    pub condition: Condition,
    pub true_path_node_id: String,
    pub false_path_node_id: String,
}

/// How a learner's run through the scenario ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Success,
    Failure,
    Partial,
    Neutral,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutcomeKind::Success => "success",
            OutcomeKind::Failure => "failure",
            OutcomeKind::Partial => "partial",
            OutcomeKind::Neutral => "neutral",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndStateData {
    pub outcome: OutcomeKind,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// The payload of a node, one variant per node kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum NodeData {
    Start(StartData),
    Dialogue(DialogueData),
    Action(ActionData),
    LogicGate(LogicGateData),
    EndState(EndStateData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Start(_) => NodeKind::Start,
            NodeData::Dialogue(_) => NodeKind::Dialogue,
            NodeData::Action(_) => NodeKind::Action,
            NodeData::LogicGate(_) => NodeKind::LogicGate,
            NodeData::EndState(_) => NodeKind::EndState,
        }
    }

    /// Every node id this payload can transition to, in declaration order.
    pub fn targets(&self) -> Vec<&str> {
        match self {
            NodeData::Start(data) => data.target_node_id.as_deref().into_iter().collect(),
            NodeData::Dialogue(data) => data
                .choices
                .iter()
                .map(|c| c.target_node_id.as_str())
                .collect(),
            NodeData::Action(data) => vec![data.target_node_id.as_str()],
            NodeData::LogicGate(data) => vec![
                data.true_path_node_id.as_str(),
                data.false_path_node_id.as_str(),
            ],
            NodeData::EndState(_) => Vec::new(),
        }
    }
}

/// A single state in the scenario graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioNode {
    pub id: String,
    #[serde(flatten)]
    pub data: NodeData,
}

impl ScenarioNode {
    pub fn new(id: impl Into<String>, data: NodeData) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.data, NodeData::EndState(_))
    }

    pub fn start(id: impl Into<String>, target_node_id: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeData::Start(StartData {
                intro_text: String::new(),
                target_node_id: Some(target_node_id.into()),
            }),
        )
    }

    pub fn dialogue(
        id: impl Into<String>,
        character_name: impl Into<String>,
        text: impl Into<String>,
        choices: Vec<Choice>,
    ) -> Self {
        Self::new(
            id,
            NodeData::Dialogue(DialogueData {
                character_name: character_name.into(),
                text: text.into(),
                choices,
            }),
        )
    }

    pub fn action(
        id: impl Into<String>,
        mutations: Vec<Mutation>,
        target_node_id: impl Into<String>,
        delay_ms: u64,
    ) -> Self {
        Self::new(
            id,
            NodeData::Action(ActionData {
                mutations,
                target_node_id: target_node_id.into(),
                delay_ms,
            }),
        )
    }

    pub fn logic_gate(
        id: impl Into<String>,
        condition: Condition,
        true_path_node_id: impl Into<String>,
        false_path_node_id: impl Into<String>,
    ) -> Self {
        Self::new(
            id,
            NodeData::LogicGate(LogicGateData {
                condition,
                true_path_node_id: true_path_node_id.into(),
                false_path_node_id: false_path_node_id.into(),
            }),
        )
    }

    pub fn end_state(
        id: impl Into<String>,
        outcome: OutcomeKind,
        message: impl Into<String>,
        score: Option<f64>,
    ) -> Self {
        Self::new(
            id,
            NodeData::EndState(EndStateData {
                outcome,
                message: message.into(),
                score,
            }),
        )
    }
}

impl Choice {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        target_node_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            mutations: Vec::new(),
            target_node_id: target_node_id.into(),
        }
    }

    pub fn with_mutation(mut self, mutation: Mutation) -> Self {
        self.mutations.push(mutation);
        self
    }
}
