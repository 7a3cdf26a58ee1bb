use crate::config::EngineConfig;
use crate::error::{DefinitionError, InvalidChoiceError, PlaybackError};
use crate::evaluator::{self, ConditionTrace};
use crate::events::{EventSink, ScenarioEvent};
use crate::history::PathHistory;
use crate::model::{
    Choice, Condition, EndStateData, NodeData, ScenarioGraph, ScenarioNode, VariableValue,
};
use crate::processor::{Arrival, NodeProcessor, ScheduledTransition};
use crate::scheduler::{Expired, Scheduler, TimerToken};
use crate::variables::VariableStore;

mod builder;
mod state;

pub use builder::PlaybackControllerBuilder;
pub use state::{Outcome, PlaybackStatus, ScenarioPlayState};

/// The public lifecycle surface of a play session.
///
/// Owns the only mutable play state. Every operation runs to completion synchronously:
/// it applies mutations, records history, arms at most one timer and emits its events
/// before returning. Observers get copies through [`PlaybackController::snapshot`].
///
/// Errors are returned, never panicked: a [`DefinitionError`] halts the session on the
/// current node, an [`InvalidChoiceError`] leaves the state untouched.
pub struct PlaybackController {
    graph: ScenarioGraph,
    config: EngineConfig,
    store: VariableStore,
    history: PathHistory,
    current_node_id: Option<String>,
    is_playing: bool,
    halted: Option<DefinitionError>,
    outcome: Option<Outcome>,
    armed: Option<TimerToken>,
    automatic_transitions: u32,
    scheduler: Box<dyn Scheduler<ScheduledTransition>>,
    sink: Box<dyn EventSink>,
}

impl PlaybackController {
    pub fn builder(graph: ScenarioGraph) -> PlaybackControllerBuilder {
        PlaybackControllerBuilder::new(graph)
    }

    /// A controller with the default config, a virtual-time scheduler and no event sink.
    pub fn new(graph: ScenarioGraph) -> Self {
        Self::builder(graph).build()
    }

    fn from_parts(
        graph: ScenarioGraph,
        config: EngineConfig,
        scheduler: Box<dyn Scheduler<ScheduledTransition>>,
        sink: Box<dyn EventSink>,
    ) -> Self {
        let store = VariableStore::new(graph.variables());
        Self {
            graph,
            config,
            store,
            history: PathHistory::new(),
            current_node_id: None,
            is_playing: false,
            halted: None,
            outcome: None,
            armed: None,
            automatic_transitions: 0,
            scheduler,
            sink,
        }
    }

    // --- Lifecycle ---

    /// Begins a fresh session at the graph's start node and takes the start transition.
    pub fn start(&mut self) -> Result<PlaybackStatus, PlaybackError> {
        self.clear_session();
        let start_node_id = self.graph.start_node_id().to_string();
        if !self.graph.contains(&start_node_id) {
            let error = DefinitionError::MissingStartNode(start_node_id);
            tracing::warn!("Cannot start scenario: {}", error);
            return Err(error.into());
        }

        tracing::info!("Starting scenario at '{}'", start_node_id);
        self.is_playing = true;
        self.enter(start_node_id.clone());
        self.emit(ScenarioEvent::Started { start_node_id });
        self.settle()?;
        Ok(self.status())
    }

    /// Pauses playback. The pending timer is cancelled; node, variables and history stay.
    pub fn stop(&mut self) -> PlaybackStatus {
        self.cancel_pending();
        if self.is_playing {
            tracing::info!("Stopped scenario at {:?}", self.current_node_id);
        }
        self.is_playing = false;
        self.status()
    }

    /// Discards the session: cancels the pending timer, clears history and re-seeds
    /// every variable from its declared initial value.
    pub fn reset(&mut self) -> PlaybackStatus {
        self.clear_session();
        tracing::info!("Scenario reset");
        self.status()
    }

    /// Takes a dialogue choice on the current node.
    ///
    /// An `InvalidChoice` error never changes state. A `Definition` error halts the session
    /// and may follow a committed choice. If the choice's own target is undeclared, nothing
    /// is applied and the session halts on the dialogue. If the target exists but leads
    /// nowhere, the choice's mutations and `choice` event stand, the target is appended to
    /// history, and the session halts on the target.
    pub fn make_choice(&mut self, choice_id: &str) -> Result<PlaybackStatus, PlaybackError> {
        let node_id = match (&self.current_node_id, self.is_playing) {
            (Some(node_id), true) => node_id.clone(),
            _ => return Err(Self::reject(InvalidChoiceError::NotPlaying)),
        };
        if self.halted.is_some() {
            return Err(Self::reject(InvalidChoiceError::DeadEnd(node_id)));
        }

        let planned = match self.graph.node(&node_id) {
            Some(node) => NodeProcessor::new(&self.graph, &self.config).plan_choice(node, choice_id),
            None => Err(InvalidChoiceError::DeadEnd(node_id.clone()).into()),
        };
        let plan = match planned {
            Ok(plan) => plan,
            Err(PlaybackError::Definition(error)) => return Err(self.halt(error).into()),
            Err(PlaybackError::InvalidChoice(error)) => return Err(Self::reject(error)),
        };

        let report = self.store.apply_all(&plan.choice.mutations);
        self.automatic_transitions = 0;
        self.enter(plan.target_node_id.clone());
        tracing::debug!(
            "Choice '{}' at '{}' -> '{}'",
            plan.choice.id,
            node_id,
            plan.target_node_id
        );
        self.emit(ScenarioEvent::Choice {
            node_id,
            choice_id: plan.choice.id,
            choice_label: plan.choice.label,
            target_node_id: plan.target_node_id,
            applied: report.applied,
            rejected: report.rejected,
        });
        self.settle()?;
        Ok(self.status())
    }

    /// Moves straight to `node_id`, bypassing the current node's transition rules.
    ///
    /// Meant for debugging and preview tools. Any armed timer is cancelled first, so the
    /// abandoned node's automatic transition can never fire afterwards.
    pub fn jump_to(&mut self, node_id: &str) -> Result<PlaybackStatus, PlaybackError> {
        if !self.is_playing {
            return Err(Self::reject(InvalidChoiceError::NotPlaying));
        }
        let source = self.current_node_id.clone().unwrap_or_default();
        if let Err(error) = NodeProcessor::new(&self.graph, &self.config).resolve_target(&source, node_id) {
            tracing::warn!("Jump rejected: {}", error);
            return Err(error.into());
        }

        self.cancel_pending();
        self.halted = None;
        self.outcome = None;
        self.automatic_transitions = 0;
        tracing::debug!("Jumping from '{}' to '{}'", source, node_id);
        self.enter(node_id.to_string());
        self.settle()?;
        Ok(self.status())
    }

    // --- Time ---

    /// Moves scenario time forward by `elapsed_ms`, firing every automatic transition that
    /// comes due, in order.
    ///
    /// A zero-delay transition armed by one of these firings is left pending for the next
    /// call, so every arrival is observable between two calls.
    pub fn advance(&mut self, elapsed_ms: u64) -> Result<PlaybackStatus, PlaybackError> {
        let deadline = self.scheduler.now_ms().saturating_add(elapsed_ms);
        let mut fired = Ok(());
        while let Some(expired) = self.scheduler.pop_due(deadline) {
            if let Err(error) = self.fire(expired) {
                fired = Err(error);
                break;
            }
            if self.armed.is_some() && self.scheduler.next_due_in() == Some(0) {
                break;
            }
        }
        self.scheduler.advance_to(deadline);
        fired?;
        Ok(self.status())
    }

    /// Fires armed transitions until the session waits on the player, ends, or halts.
    pub fn run_until_idle(&mut self) -> Result<PlaybackStatus, PlaybackError> {
        while self.armed.is_some() {
            let Some(due_in_ms) = self.scheduler.next_due_in() else {
                break;
            };
            self.advance(due_in_ms)?;
        }
        Ok(self.status())
    }

    // --- Introspection ---

    /// A copy of the current play state.
    pub fn snapshot(&self) -> ScenarioPlayState {
        ScenarioPlayState {
            current_node_id: self.current_node_id.clone(),
            variable_values: self.store.values().clone(),
            path_history: self.history.to_vec(),
            is_playing: self.is_playing,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        let Some(node_id) = self.current_node_id.clone() else {
            return PlaybackStatus::Idle;
        };
        if let Some(outcome) = &self.outcome {
            return PlaybackStatus::Completed(outcome.clone());
        }
        if self.halted.is_some() {
            return PlaybackStatus::Halted { node_id };
        }
        if !self.is_playing {
            return PlaybackStatus::Stopped { node_id };
        }
        match (self.armed, self.scheduler.next_due_in()) {
            (Some(_), Some(due_in_ms)) => PlaybackStatus::Pending {
                node_id,
                due_in_ms,
            },
            _ => PlaybackStatus::AwaitingChoice { node_id },
        }
    }

    pub fn graph(&self) -> &ScenarioGraph {
        &self.graph
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn history(&self) -> &PathHistory {
        &self.history
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_node(&self) -> Option<&ScenarioNode> {
        self.current_node_id
            .as_deref()
            .and_then(|id| self.graph.node(id))
    }

    pub fn variable(&self, key: &str) -> Option<VariableValue> {
        self.store.get(key).cloned()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// The error that halted the session, if it is stuck on a dead end.
    pub fn halt_reason(&self) -> Option<&DefinitionError> {
        self.halted.as_ref()
    }

    pub fn pending_timer(&self) -> Option<TimerToken> {
        self.armed
    }

    /// Scenario time in milliseconds, as kept by the scheduler.
    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// The choices the player can take right now. Empty unless playing on a dialogue.
    pub fn available_choices(&self) -> &[Choice] {
        if !self.is_playing || self.halted.is_some() {
            return &[];
        }
        match self.current_node().map(|node| &node.data) {
            Some(NodeData::Dialogue(dialogue)) => &dialogue.choices,
            _ => &[],
        }
    }

    /// Evaluates any condition against the live variables without side effects.
    pub fn preview_condition(&self, condition: &Condition) -> ConditionTrace {
        evaluator::explain(condition, self.store.values())
    }

    // --- Internals ---

    fn emit(&mut self, event: ScenarioEvent) {
        self.sink.emit(&event);
    }

    fn enter(&mut self, node_id: String) {
        self.history.append(node_id.clone());
        self.current_node_id = Some(node_id);
    }

    fn clear_session(&mut self) {
        self.cancel_pending();
        self.store.initialize(self.graph.variables());
        self.history.clear();
        self.current_node_id = None;
        self.is_playing = false;
        self.halted = None;
        self.outcome = None;
        self.automatic_transitions = 0;
    }

    fn cancel_pending(&mut self) {
        if let Some(token) = self.armed.take() {
            if self.scheduler.cancel(token) {
                tracing::debug!("Cancelled {}", token);
            }
        }
    }

    fn reject(error: InvalidChoiceError) -> PlaybackError {
        tracing::debug!("Rejected choice: {}", error);
        error.into()
    }

    /// Marks the current node as a dead end. No further transitions or events follow.
    fn halt(&mut self, error: DefinitionError) -> DefinitionError {
        tracing::warn!(
            "Scenario halted at {:?}: {}",
            self.current_node_id,
            error
        );
        self.cancel_pending();
        self.halted = Some(error.clone());
        error
    }

    fn count_automatic(&mut self, node_id: &str) -> Result<(), DefinitionError> {
        self.automatic_transitions += 1;
        let limit = self.config.max_automatic_transitions;
        if self.automatic_transitions > limit {
            return Err(self.halt(DefinitionError::CycleDetected {
                node_id: node_id.to_string(),
                limit,
            }));
        }
        Ok(())
    }

    /// Handles arrival at the current node, following start transitions until the session
    /// waits on the player, a timer, or reaches its end.
    fn settle(&mut self) -> Result<(), DefinitionError> {
        loop {
            let Some(node_id) = self.current_node_id.clone() else {
                return Ok(());
            };
            let arrival = match self.graph.node(&node_id) {
                Some(node) => NodeProcessor::new(&self.graph, &self.config)
                    .arrive(node, self.store.values()),
                None => return Ok(()),
            };
            let arrival = match arrival {
                Ok(arrival) => arrival,
                Err(error) => return Err(self.halt(error)),
            };

            match arrival {
                Arrival::AwaitChoice => {
                    tracing::debug!("Awaiting choice at '{}'", node_id);
                    return Ok(());
                }
                Arrival::Immediate { target_node_id } => {
                    self.count_automatic(&node_id)?;
                    tracing::debug!("'{}' -> '{}'", node_id, target_node_id);
                    self.enter(target_node_id);
                }
                Arrival::Delayed {
                    delay_ms,
                    transition,
                } => {
                    let token = self.scheduler.schedule(delay_ms, transition);
                    tracing::debug!("Armed {} for '{}' in {}ms", token, node_id, delay_ms);
                    self.armed = Some(token);
                    return Ok(());
                }
                Arrival::Terminal(end) => {
                    self.complete(node_id, end);
                    return Ok(());
                }
            }
        }
    }

    fn fire(&mut self, expired: Expired<ScheduledTransition>) -> Result<(), DefinitionError> {
        let live = self.armed == Some(expired.token)
            && self.is_playing
            && self.halted.is_none()
            && self.current_node_id.as_deref() == Some(expired.task.node_id());
        if !live {
            tracing::debug!("Ignoring stale {}", expired.token);
            return Ok(());
        }
        self.armed = None;
        self.count_automatic(expired.task.node_id())?;

        match expired.task {
            ScheduledTransition::Action {
                node_id,
                mutations,
                target_node_id,
            } => {
                let report = self.store.apply_all(&mutations);
                self.enter(target_node_id.clone());
                tracing::debug!("Action '{}' -> '{}'", node_id, target_node_id);
                self.emit(ScenarioEvent::ActionApplied {
                    node_id,
                    target_node_id,
                    applied: report.applied,
                    rejected: report.rejected,
                });
            }
            ScheduledTransition::LogicGate {
                node_id,
                trace,
                target_node_id,
            } => {
                self.enter(target_node_id.clone());
                let reason = trace.reason();
                self.emit(ScenarioEvent::ConditionEvaluated {
                    node_id,
                    condition: trace.condition,
                    result: trace.outcome,
                    target_node_id,
                    reason,
                });
            }
        }
        self.settle()
    }

    fn complete(&mut self, node_id: String, end: EndStateData) {
        let outcome = Outcome {
            node_id: node_id.clone(),
            kind: end.outcome,
            message: end.message,
            score: end.score,
            path_history: self.history.to_vec(),
            variables: self.store.values().clone(),
        };
        tracing::info!("Scenario completed at '{}' with {}", node_id, outcome.kind);
        self.outcome = Some(outcome.clone());
        self.emit(ScenarioEvent::Completed { node_id, outcome });
    }
}
