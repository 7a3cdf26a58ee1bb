//! Common test utilities for building scenario graphs and controllers.
use bunki::prelude::*;

/// The trust scenario as an authoring tool would export it.
///
/// `start → D1`; "Agree" raises trust and leads to the `D2` gate, "Refuse" lowers it and
/// ends in failure.
#[allow(dead_code)]
pub const TRUST_SCENARIO_JSON: &str = r#"{
  "variables": [
    { "key": "trust", "label": "Trust", "type": "number", "initialValue": 0 }
  ],
  "nodes": [
    { "id": "start", "type": "start", "data": { "introText": "A client walks in.", "targetNodeId": "D1" } },
    {
      "id": "D1",
      "type": "dialogue",
      "data": {
        "characterName": "Client",
        "text": "Will you take my case?",
        "choices": [
          {
            "id": "Agree",
            "label": "Agree",
            "mutations": [{ "variableKey": "trust", "operation": "increment", "value": 1 }],
            "targetNodeId": "D2"
          },
          {
            "id": "Refuse",
            "label": "Refuse",
            "mutations": [{ "variableKey": "trust", "operation": "decrement", "value": 1 }],
            "targetNodeId": "E2"
          }
        ]
      }
    },
    {
      "id": "D2",
      "type": "logicGate",
      "data": {
        "condition": { "variableKey": "trust", "operator": "greater_equal", "targetValue": 1 },
        "truePathNodeId": "success",
        "falsePathNodeId": "neutral"
      }
    },
    { "id": "success", "type": "end_state", "data": { "outcome": "success", "message": "The client trusts you.", "score": 100 } },
    { "id": "neutral", "type": "end_state", "data": { "outcome": "neutral", "message": "The client is unsure." } },
    { "id": "E2", "type": "endState", "data": { "outcome": "failure", "message": "The client leaves.", "score": 0 } }
  ]
}"#;

/// The trust scenario built directly from node constructors.
#[allow(dead_code)]
pub fn trust_scenario() -> ScenarioGraph {
    ScenarioGraph::new(
        vec![Variable::new("trust", VariableType::Number, 0).with_label("Trust")],
        vec![
            ScenarioNode::start("start", "D1"),
            ScenarioNode::dialogue(
                "D1",
                "Client",
                "Will you take my case?",
                vec![
                    Choice::new("Agree", "Agree", "D2")
                        .with_mutation(Mutation::increment("trust", 1.0)),
                    Choice::new("Refuse", "Refuse", "E2")
                        .with_mutation(Mutation::decrement("trust", 1.0)),
                ],
            ),
            ScenarioNode::logic_gate(
                "D2",
                Condition::new("trust", ConditionOperator::GreaterEqual, 1),
                "success",
                "neutral",
            ),
            ScenarioNode::end_state(
                "success",
                OutcomeKind::Success,
                "The client trusts you.",
                Some(100.0),
            ),
            ScenarioNode::end_state("neutral", OutcomeKind::Neutral, "The client is unsure.", None),
            ScenarioNode::end_state("E2", OutcomeKind::Failure, "The client leaves.", Some(0.0)),
        ],
        "start",
    )
}

/// `start → gate($trust > 5) → high | low`, with `trust` seeded to `initial_trust`.
#[allow(dead_code)]
pub fn gate_scenario(initial_trust: i32) -> ScenarioGraph {
    ScenarioGraph::new(
        vec![Variable::new("trust", VariableType::Number, initial_trust)],
        vec![
            ScenarioNode::start("start", "gate"),
            ScenarioNode::logic_gate(
                "gate",
                Condition::new("trust", ConditionOperator::GreaterThan, 5),
                "high",
                "low",
            ),
            ScenarioNode::end_state("high", OutcomeKind::Success, "High trust", None),
            ScenarioNode::end_state("low", OutcomeKind::Failure, "Low trust", None),
        ],
        "start",
    )
}

/// A dialogue whose "wait" choice leads through a delayed action back to itself.
///
/// `start → desk`; `wait` → `coffee` (action, +1 patience after `delay_ms`) → `desk`.
#[allow(dead_code)]
pub fn waiting_room_scenario(delay_ms: u64) -> ScenarioGraph {
    ScenarioGraph::new(
        vec![
            Variable::new("patience", VariableType::Number, 0),
            Variable::new("served", VariableType::Boolean, false),
            Variable::new("notes", VariableType::String, ""),
        ],
        vec![
            ScenarioNode::start("start", "desk"),
            ScenarioNode::dialogue(
                "desk",
                "Receptionist",
                "Please wait.",
                vec![
                    Choice::new("wait", "Wait", "coffee")
                        .with_mutation(Mutation::append("notes", "waited;")),
                    Choice::new("leave", "Leave", "gone")
                        .with_mutation(Mutation::toggle("served")),
                ],
            ),
            ScenarioNode::action(
                "coffee",
                vec![Mutation::increment("patience", 1.0)],
                "desk",
                delay_ms,
            ),
            ScenarioNode::end_state("gone", OutcomeKind::Partial, "You left early.", Some(50.0)),
        ],
        "start",
    )
}

/// Two zero-delay actions pointing at each other: an automatic loop with no player input.
#[allow(dead_code)]
pub fn action_loop_scenario() -> ScenarioGraph {
    ScenarioGraph::new(
        vec![Variable::new("ticks", VariableType::Number, 0)],
        vec![
            ScenarioNode::start("start", "ping"),
            ScenarioNode::action("ping", vec![Mutation::increment("ticks", 1.0)], "pong", 0),
            ScenarioNode::action("pong", vec![Mutation::increment("ticks", 1.0)], "ping", 0),
        ],
        "start",
    )
}

/// A dialogue with one choice into an undeclared node, one into a gate whose true path is
/// undeclared, and one into an action whose target is undeclared.
#[allow(dead_code)]
pub fn dead_end_scenario() -> ScenarioGraph {
    ScenarioGraph::new(
        vec![Variable::new("flag", VariableType::Boolean, true)],
        vec![
            ScenarioNode::start("start", "hub"),
            ScenarioNode::dialogue(
                "hub",
                "Guide",
                "Pick a door.",
                vec![
                    Choice::new("void", "Into the void", "missing")
                        .with_mutation(Mutation::toggle("flag")),
                    Choice::new("gate", "Through the gate", "check"),
                    Choice::new("work", "Get to work", "task"),
                ],
            ),
            ScenarioNode::logic_gate(
                "check",
                Condition::new("flag", ConditionOperator::Equals, true),
                "nowhere",
                "fine",
            ),
            ScenarioNode::action("task", vec![Mutation::toggle("flag")], "ghost", 0),
            ScenarioNode::end_state("fine", OutcomeKind::Neutral, "", None),
        ],
        "start",
    )
}

/// Builds a controller around `graph` with an event log attached.
#[allow(dead_code)]
pub fn controller_with_log(graph: ScenarioGraph) -> (PlaybackController, EventLog) {
    let log = EventLog::new();
    let controller = PlaybackController::builder(graph)
        .with_sink(log.clone())
        .build();
    (controller, log)
}

/// Asserts the path history invariant: non-empty while on a node, and its last entry is
/// the current node.
#[allow(dead_code)]
pub fn assert_history_tracks_current(controller: &PlaybackController) {
    let state = controller.snapshot();
    match &state.current_node_id {
        Some(current) => assert_eq!(state.path_history.last(), Some(current)),
        None => assert!(state.path_history.is_empty()),
    }
}

#[allow(dead_code)]
pub fn number(value: f64) -> VariableValue {
    VariableValue::Number(value)
}
