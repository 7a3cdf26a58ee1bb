use crate::config::EngineConfig;
use crate::error::{DefinitionError, InvalidChoiceError, PlaybackError};
use crate::evaluator::{self, ConditionTrace};
use crate::model::{Choice, EndStateData, Mutation, NodeData, ScenarioGraph, ScenarioNode, VariableValue};
use ahash::AHashMap;

/// An automatic transition waiting on the scheduler. Its route is fixed when it is armed.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduledTransition {
    Action {
        node_id: String,
        mutations: Vec<Mutation>,
        target_node_id: String,
    },
    LogicGate {
        node_id: String,
        trace: ConditionTrace,
        target_node_id: String,
    },
}

impl ScheduledTransition {
    pub fn node_id(&self) -> &str {
        match self {
            ScheduledTransition::Action { node_id, .. }
            | ScheduledTransition::LogicGate { node_id, .. } => node_id,
        }
    }

    pub fn target_node_id(&self) -> &str {
        match self {
            ScheduledTransition::Action { target_node_id, .. }
            | ScheduledTransition::LogicGate { target_node_id, .. } => target_node_id,
        }
    }
}

/// What happens once playback arrives at a node.
#[derive(Debug, Clone, PartialEq)]
pub enum Arrival {
    /// A dialogue: nothing happens until the player chooses.
    AwaitChoice,
    /// A start node: move on right away.
    Immediate { target_node_id: String },
    /// An action or logic gate: move on when the scheduler fires.
    Delayed {
        delay_ms: u64,
        transition: ScheduledTransition,
    },
    /// An end state: the session is over.
    Terminal(EndStateData),
}

/// A validated dialogue choice, ready to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoicePlan {
    pub choice: Choice,
    pub target_node_id: String,
}

/// Per-node-type transition logic over an immutable graph.
///
/// The processor only decides; it never mutates the variable store or history.
pub struct NodeProcessor<'a> {
    graph: &'a ScenarioGraph,
    config: &'a EngineConfig,
}

impl<'a> NodeProcessor<'a> {
    pub fn new(graph: &'a ScenarioGraph, config: &'a EngineConfig) -> Self {
        Self { graph, config }
    }

    /// Looks up a transition target, reporting a dead end if it is not declared.
    pub fn resolve_target(
        &self,
        source_node_id: &str,
        target_node_id: &str,
    ) -> Result<&'a ScenarioNode, DefinitionError> {
        self.graph
            .node(target_node_id)
            .ok_or_else(|| DefinitionError::UnresolvedTarget {
                source_node_id: source_node_id.to_string(),
                missing_node_id: target_node_id.to_string(),
            })
    }

    /// Decides what arriving at `node` means. Logic gates are evaluated here, against the
    /// values as they are on arrival, so the route never depends on timer jitter.
    pub fn arrive(
        &self,
        node: &ScenarioNode,
        values: &AHashMap<String, VariableValue>,
    ) -> Result<Arrival, DefinitionError> {
        match &node.data {
            NodeData::Start(data) => {
                let target = data
                    .target_node_id
                    .as_deref()
                    .ok_or_else(|| DefinitionError::MissingStartTarget(node.id.clone()))?;
                self.resolve_target(&node.id, target)?;
                Ok(Arrival::Immediate {
                    target_node_id: target.to_string(),
                })
            }
            NodeData::Dialogue(_) => Ok(Arrival::AwaitChoice),
            NodeData::Action(data) => {
                self.resolve_target(&node.id, &data.target_node_id)?;
                Ok(Arrival::Delayed {
                    delay_ms: data.delay_ms,
                    transition: ScheduledTransition::Action {
                        node_id: node.id.clone(),
                        mutations: data.mutations.clone(),
                        target_node_id: data.target_node_id.clone(),
                    },
                })
            }
            NodeData::LogicGate(data) => {
                let trace = evaluator::explain(&data.condition, values);
                let target = if trace.outcome {
                    &data.true_path_node_id
                } else {
                    &data.false_path_node_id
                };
                tracing::debug!(
                    "Gate '{}': {} is {} -> '{}'",
                    node.id,
                    trace.reason(),
                    trace.outcome,
                    target
                );
                self.resolve_target(&node.id, target)?;
                Ok(Arrival::Delayed {
                    delay_ms: self.config.logic_gate_delay_ms,
                    transition: ScheduledTransition::LogicGate {
                        node_id: node.id.clone(),
                        trace,
                        target_node_id: target.clone(),
                    },
                })
            }
            NodeData::EndState(data) => Ok(Arrival::Terminal(data.clone())),
        }
    }

    /// Validates a player's choice on `node`.
    ///
    /// Fails with `InvalidChoice` if `node` is not a dialogue or has no such choice, and with
    /// `Definition` if the choice leads to an undeclared node.
    pub fn plan_choice(
        &self,
        node: &ScenarioNode,
        choice_id: &str,
    ) -> Result<ChoicePlan, PlaybackError> {
        let dialogue = match &node.data {
            NodeData::Dialogue(dialogue) => dialogue,
            NodeData::EndState(_) => {
                return Err(InvalidChoiceError::Terminal(node.id.clone()).into());
            }
            other => {
                return Err(InvalidChoiceError::NotDialogue {
                    node_id: node.id.clone(),
                    kind: other.kind(),
                }
                .into());
            }
        };
        let choice = dialogue
            .choices
            .iter()
            .find(|c| c.id == choice_id)
            .ok_or_else(|| InvalidChoiceError::UnknownChoice {
                node_id: node.id.clone(),
                choice_id: choice_id.to_string(),
            })?;
        self.resolve_target(&node.id, &choice.target_node_id)?;
        Ok(ChoicePlan {
            choice: choice.clone(),
            target_node_id: choice.target_node_id.clone(),
        })
    }
}
