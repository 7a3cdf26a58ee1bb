//! Integration tests for Bunki
//!
//! These tests load scenario documents end to end and play them through the controller.
mod common;
use common::*;
use bunki::prelude::*;

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn load(json: &str) -> ScenarioGraph {
        ScenarioLoader::new()
            .load_str(json)
            .expect("Scenario should load")
    }

    #[test]
    fn test_loaded_scenario_matches_built_scenario() {
        let loaded = load(TRUST_SCENARIO_JSON);
        let built = trust_scenario();

        assert_eq!(loaded.start_node_id(), "start");
        assert_eq!(loaded.variables(), built.variables());
        for node in built.nodes() {
            let other = loaded.node(&node.id).expect("Node should be loaded");
            assert_eq!(other.kind(), node.kind(), "kind of '{}'", node.id);
            assert_eq!(other.data.targets(), node.data.targets(), "targets of '{}'", node.id);
        }
        assert!(loaded.dangling_targets().is_empty());
    }

    #[test]
    fn test_full_agree_session_from_json() {
        let (mut controller, log) = controller_with_log(load(TRUST_SCENARIO_JSON));

        controller.start().unwrap();
        controller.make_choice("Agree").unwrap();
        let status = controller.run_until_idle().unwrap();

        let PlaybackStatus::Completed(outcome) = status else {
            panic!("Expected a completed run, got {:?}", status);
        };
        assert_eq!(outcome.kind, OutcomeKind::Success);
        assert_eq!(outcome.message, "The client trusts you.");
        assert_eq!(outcome.path_history, vec!["start", "D1", "D2", "success"]);
        assert_eq!(controller.variable("trust"), Some(number(1.0)));
        assert_eq!(
            log.kinds(),
            vec!["started", "choice", "condition-evaluated", "completed"]
        );
    }

    #[test]
    fn test_full_refuse_session_from_json() {
        let mut controller = PlaybackController::new(load(TRUST_SCENARIO_JSON));

        controller.start().unwrap();
        let status = controller.make_choice("Refuse").unwrap();

        let PlaybackStatus::Completed(outcome) = status else {
            panic!("Expected a completed run, got {:?}", status);
        };
        assert_eq!(outcome.kind, OutcomeKind::Failure);
        assert_eq!(outcome.score, Some(0.0));
        assert_eq!(outcome.path_history, vec!["start", "D1", "E2"]);
        assert_eq!(outcome.variables.get("trust"), Some(&number(-1.0)));
    }

    #[test]
    fn test_demo_scenario_file() {
        let path = format!("{}/demos/trust.json", env!("CARGO_MANIFEST_DIR"));
        let graph = ScenarioLoader::new()
            .load_file(&path)
            .expect("Demo scenario should load");

        let mut controller = PlaybackController::new(graph);
        controller.start().unwrap();
        controller.make_choice("Agree").unwrap();
        controller.run_until_idle().unwrap();

        assert_eq!(controller.outcome().map(|o| o.kind), Some(OutcomeKind::Success));
    }

    #[test]
    fn test_choice_event_payload() {
        let (mut controller, log) = controller_with_log(load(TRUST_SCENARIO_JSON));
        controller.start().unwrap();
        controller.make_choice("Agree").unwrap();

        let events = log.events();
        let ScenarioEvent::Choice {
            node_id,
            choice_id,
            choice_label,
            target_node_id,
            applied,
            rejected,
        } = &events[1]
        else {
            panic!("Expected a choice event, got {:?}", events[1]);
        };
        assert_eq!(node_id, "D1");
        assert_eq!(choice_id, "Agree");
        assert_eq!(choice_label, "Agree");
        assert_eq!(target_node_id, "D2");
        assert_eq!(applied, &vec![Mutation::increment("trust", 1.0)]);
        assert!(rejected.is_empty());
    }

    #[test]
    fn test_unknown_node_type() {
        let json = r#"{
            "nodes": [
                { "id": "start", "type": "start", "data": { "targetNodeId": "clip" } },
                { "id": "clip", "type": "video", "data": {} }
            ]
        }"#;

        let err = ScenarioLoader::new().load_str(json).unwrap_err();

        assert!(matches!(
            err,
            ScenarioLoadError::UnknownNodeType { ref node_id, ref type_name }
                if node_id == "clip" && type_name == "video"
        ));
    }

    #[test]
    fn test_type_alias_registration() {
        let json = r#"{
            "nodes": [
                { "id": "start", "type": "entry", "data": { "targetNodeId": "talk" } },
                { "id": "talk", "type": "conversation", "data": { "text": "Hello", "choices": [] } }
            ]
        }"#;

        let graph = ScenarioLoader::new()
            .with_type_alias("entry", NodeKind::Start)
            .with_type_alias("conversation", NodeKind::Dialogue)
            .load_str(json)
            .unwrap();

        assert_eq!(graph.node("start").map(ScenarioNode::kind), Some(NodeKind::Start));
        assert_eq!(graph.node("talk").map(ScenarioNode::kind), Some(NodeKind::Dialogue));
    }

    #[test]
    fn test_invalid_node_data() {
        let json = r#"{
            "nodes": [
                { "id": "start", "type": "start", "data": { "targetNodeId": "gate" } },
                { "id": "gate", "type": "logic_gate", "data": { "truePathNodeId": "a" } }
            ]
        }"#;

        let err = ScenarioLoader::new().load_str(json).unwrap_err();

        let ScenarioLoadError::InvalidNodeData { node_id, kind, .. } = err else {
            panic!("Expected invalid node data, got {:?}", err);
        };
        assert_eq!(node_id, "gate");
        assert_eq!(kind, NodeKind::LogicGate);
    }

    #[test]
    fn test_malformed_json() {
        let err = ScenarioLoader::new().load_str("{ \"nodes\": [").unwrap_err();
        assert!(matches!(err, ScenarioLoadError::JsonParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ScenarioLoader::new()
            .load_file("does/not/exist.json")
            .unwrap_err();
        assert!(matches!(err, ScenarioLoadError::Io { ref path, .. } if path == "does/not/exist.json"));
    }

    #[test]
    fn test_scenario_without_start_node() {
        let json = r#"{ "nodes": [ { "id": "end", "type": "end_state", "data": { "outcome": "neutral" } } ] }"#;
        let err = ScenarioLoader::new().load_str(json).unwrap_err();
        assert!(matches!(err, ScenarioLoadError::ValidationError(_)));
    }

    #[test]
    fn test_start_target_fallback_and_null_data() {
        let json = r#"{
            "startTargetNodeId": "end",
            "nodes": [
                { "id": "begin", "type": "start", "data": null },
                { "id": "end", "type": "endState", "data": { "outcome": "partial", "score": 2.5 } }
            ]
        }"#;

        let graph = ScenarioLoader::new().load_str(json).unwrap();
        assert_eq!(graph.start_node_id(), "begin");

        let mut controller = PlaybackController::new(graph);
        let status = controller.start().unwrap();
        let PlaybackStatus::Completed(outcome) = status else {
            panic!("Expected a completed run, got {:?}", status);
        };
        assert_eq!(outcome.kind, OutcomeKind::Partial);
        assert_eq!(outcome.score, Some(2.5));
        assert_eq!(outcome.path_history, vec!["begin", "end"]);
    }

    #[test]
    fn test_unknown_operator_routes_false() {
        let json = r#"{
            "variables": [{ "key": "name", "type": "string", "initialValue": "Ada" }],
            "nodes": [
                { "id": "start", "type": "start", "data": { "targetNodeId": "gate" } },
                {
                    "id": "gate",
                    "type": "logic_gate",
                    "data": {
                        "condition": { "variableKey": "name", "operator": "starts_with", "targetValue": "A" },
                        "truePathNodeId": "yes",
                        "falsePathNodeId": "no"
                    }
                },
                { "id": "yes", "type": "end_state", "data": { "outcome": "success" } },
                { "id": "no", "type": "end_state", "data": { "outcome": "failure" } }
            ]
        }"#;

        let mut controller = PlaybackController::builder(load(json))
            .with_logic_gate_delay(0)
            .build();
        controller.start().unwrap();
        controller.run_until_idle().unwrap();

        assert_eq!(controller.outcome().map(|o| o.node_id.as_str()), Some("no"));
    }

    #[test]
    fn test_action_chain_with_mixed_delays() {
        let json = r#"{
            "variables": [
                { "key": "xp", "type": "number", "initialValue": 0 },
                { "key": "log", "type": "string", "initialValue": "" },
                { "key": "done", "type": "boolean", "initialValue": false }
            ],
            "nodes": [
                { "id": "start", "type": "start", "data": { "targetNodeId": "a1" } },
                {
                    "id": "a1",
                    "type": "action",
                    "data": {
                        "mutations": [
                            { "variableKey": "xp", "operation": "increment", "value": 10 },
                            { "variableKey": "log", "operation": "append", "value": "a1;" }
                        ],
                        "targetNodeId": "a2",
                        "delayMs": 200
                    }
                },
                {
                    "id": "a2",
                    "type": "action",
                    "data": {
                        "mutations": [
                            { "variableKey": "done", "operation": "toggle" },
                            { "variableKey": "log", "operation": "append", "value": "a2;" }
                        ],
                        "targetNodeId": "gate"
                    }
                },
                {
                    "id": "gate",
                    "type": "logic_gate",
                    "data": {
                        "condition": { "variableKey": "log", "operator": "contains", "targetValue": "a2" },
                        "truePathNodeId": "end",
                        "falsePathNodeId": "start"
                    }
                },
                { "id": "end", "type": "end_state", "data": { "outcome": "success", "message": "Done" } }
            ]
        }"#;

        let (mut controller, log) = controller_with_log(load(json));
        controller.start().unwrap();

        let status = controller.advance(199).unwrap();
        assert!(matches!(status, PlaybackStatus::Pending { ref node_id, .. } if node_id == "a1"));

        // a1 fires at 200; a2 has no delay and waits for the next step.
        let status = controller.advance(1).unwrap();
        assert_eq!(
            status,
            PlaybackStatus::Pending {
                node_id: "a2".to_string(),
                due_in_ms: 0
            }
        );
        assert_eq!(controller.variable("done"), Some(VariableValue::Boolean(false)));

        let status = controller.advance(0).unwrap();
        assert_eq!(
            status,
            PlaybackStatus::Pending {
                node_id: "gate".to_string(),
                due_in_ms: DEFAULT_GATE_DELAY
            }
        );
        assert_eq!(controller.variable("xp"), Some(number(10.0)));
        assert_eq!(controller.variable("log"), Some(VariableValue::from("a1;a2;")));
        assert_eq!(controller.variable("done"), Some(VariableValue::Boolean(true)));

        controller.run_until_idle().unwrap();
        assert_eq!(
            controller.history().as_slice(),
            ["start", "a1", "a2", "gate", "end"]
        );
        assert_eq!(
            log.kinds(),
            vec![
                "started",
                "action-applied",
                "action-applied",
                "condition-evaluated",
                "completed"
            ]
        );
        assert_eq!(controller.now_ms(), 200 + DEFAULT_GATE_DELAY);
    }

    const DEFAULT_GATE_DELAY: u64 = bunki::config::DEFAULT_LOGIC_GATE_DELAY_MS;

    #[test]
    fn test_definition_into_scenario() {
        let definition: ScenarioDefinition = serde_json::from_str(TRUST_SCENARIO_JSON).unwrap();
        assert_eq!(definition.nodes.len(), 6);

        let graph = definition.into_scenario().unwrap();
        let graph = graph.into_scenario().unwrap();

        assert_eq!(graph.nodes().len(), 6);
        assert_eq!(graph.variable("trust").map(|v| v.label.as_str()), Some("Trust"));
    }

    #[test]
    fn test_prelude_import_completeness() {
        let _config: EngineConfig = EngineConfig::default();
        let _loader: ScenarioLoader = ScenarioLoader::new();
        let _history: PathHistory = PathHistory::new();
        let _store: VariableStore = VariableStore::new(&[]);
        let _scheduler: VirtualScheduler<()> = VirtualScheduler::new();
        let _sinks: (NullSink, TracingSink, EventLog) = (NullSink, TracingSink, EventLog::new());
        let _formatter = TraceFormatter;
    }
}
