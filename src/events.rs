use crate::model::{Condition, Mutation};
use crate::playback::Outcome;
use crate::variables::RejectedMutation;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Emitted once, synchronously, after each transition completes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ScenarioEvent {
    #[serde(rename_all = "camelCase")]
    Started { start_node_id: String },

    #[serde(rename_all = "camelCase")]
    Choice {
        node_id: String,
        choice_id: String,
        choice_label: String,
        target_node_id: String,
        applied: Vec<Mutation>,
        rejected: Vec<RejectedMutation>,
    },

    #[serde(rename_all = "camelCase")]
    ActionApplied {
        node_id: String,
        target_node_id: String,
        applied: Vec<Mutation>,
        rejected: Vec<RejectedMutation>,
    },

    #[serde(rename_all = "camelCase")]
    ConditionEvaluated {
        node_id: String,
        condition: Condition,
        result: bool,
        target_node_id: String,
        reason: String,
    },

    #[serde(rename_all = "camelCase")]
    Completed { node_id: String, outcome: Outcome },
}

impl ScenarioEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            ScenarioEvent::Started { .. } => "started",
            ScenarioEvent::Choice { .. } => "choice",
            ScenarioEvent::ActionApplied { .. } => "action-applied",
            ScenarioEvent::ConditionEvaluated { .. } => "condition-evaluated",
            ScenarioEvent::Completed { .. } => "completed",
        }
    }

    /// The node the event happened at.
    pub fn node_id(&self) -> &str {
        match self {
            ScenarioEvent::Started { start_node_id } => start_node_id,
            ScenarioEvent::Choice { node_id, .. }
            | ScenarioEvent::ActionApplied { node_id, .. }
            | ScenarioEvent::ConditionEvaluated { node_id, .. }
            | ScenarioEvent::Completed { node_id, .. } => node_id,
        }
    }
}

/// Receives scenario events. Delivery beyond this call (queuing, retry, transport) is the
/// receiver's concern; the engine never looks at what happens next.
pub trait EventSink {
    fn emit(&mut self, event: &ScenarioEvent);
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &ScenarioEvent) {}
}

/// Logs every event through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &ScenarioEvent) {
        match event {
            ScenarioEvent::ConditionEvaluated {
                node_id,
                result,
                target_node_id,
                reason,
                ..
            } => tracing::info!(
                kind = event.kind(),
                node = %node_id,
                "{} is {} -> '{}'",
                reason,
                result,
                target_node_id
            ),
            ScenarioEvent::Completed { outcome, .. } => tracing::info!(
                kind = event.kind(),
                node = %event.node_id(),
                "Scenario completed with outcome {}",
                outcome.kind
            ),
            _ => tracing::info!(kind = event.kind(), node = %event.node_id(), "Scenario event"),
        }
    }
}

/// An in-memory event collector. Clones share the same buffer, so a caller can keep one
/// handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Rc<RefCell<Vec<ScenarioEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event received so far.
    pub fn events(&self) -> Vec<ScenarioEvent> {
        self.events.borrow().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events.borrow().iter().map(ScenarioEvent::kind).collect()
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &ScenarioEvent) {
        self.events.borrow_mut().push(event.clone());
    }
}

/// Adapts a closure into an `EventSink`.
pub struct FnSink<F>(pub F);

impl<F: FnMut(&ScenarioEvent)> EventSink for FnSink<F> {
    fn emit(&mut self, event: &ScenarioEvent) {
        (self.0)(event)
    }
}

/// Fans each event out to every sink, in order.
impl EventSink for Vec<Box<dyn EventSink>> {
    fn emit(&mut self, event: &ScenarioEvent) {
        for sink in self.iter_mut() {
            sink.emit(event);
        }
    }
}
