//! Tests for condition evaluation against variable values.
mod common;
use ahash::AHashMap;
use bunki::evaluator::{evaluate, explain};
use bunki::prelude::*;
use common::*;

fn values() -> AHashMap<String, VariableValue> {
    let mut values = AHashMap::new();
    values.insert("trust".to_string(), number(6.0));
    values.insert("verified".to_string(), VariableValue::Boolean(true));
    values.insert("notes".to_string(), VariableValue::from("asked;listened;"));
    values
}

fn check(key: &str, operator: ConditionOperator, target: impl Into<VariableValue>) -> bool {
    evaluate(&Condition::new(key, operator, target), &values())
}

#[test]
fn test_numeric_comparisons() {
    assert!(check("trust", ConditionOperator::GreaterThan, 5));
    assert!(!check("trust", ConditionOperator::GreaterThan, 6));
    assert!(check("trust", ConditionOperator::GreaterEqual, 6));
    assert!(check("trust", ConditionOperator::LessThan, 6.5));
    assert!(!check("trust", ConditionOperator::LessThan, 6));
    assert!(check("trust", ConditionOperator::LessEqual, 6));
    assert!(check("trust", ConditionOperator::Equals, 6));
    assert!(check("trust", ConditionOperator::NotEquals, 7));
}

#[test]
fn test_string_containment() {
    assert!(check("notes", ConditionOperator::Contains, "listened"));
    assert!(!check("notes", ConditionOperator::Contains, "ignored"));
    assert!(check("notes", ConditionOperator::NotContains, "ignored"));
    assert!(!check("notes", ConditionOperator::NotContains, "asked"));
    assert!(check("notes", ConditionOperator::Equals, "asked;listened;"));
}

#[test]
fn test_boolean_equality() {
    assert!(check("verified", ConditionOperator::Equals, true));
    assert!(check("verified", ConditionOperator::NotEquals, false));
    assert!(!check("verified", ConditionOperator::Equals, false));
}

#[test]
fn test_type_mismatches_evaluate_false() {
    // Ordering needs two numbers, containment needs two strings.
    assert!(!check("notes", ConditionOperator::GreaterThan, 1));
    assert!(!check("trust", ConditionOperator::LessThan, "10"));
    assert!(!check("verified", ConditionOperator::GreaterEqual, true));
    assert!(!check("trust", ConditionOperator::Contains, 6));
    assert!(!check("trust", ConditionOperator::NotContains, "6"));
    assert!(!check("trust", ConditionOperator::Equals, "6"));
}

#[test]
fn test_undeclared_variable_evaluates_false() {
    assert!(!check("ghost", ConditionOperator::Equals, 0));
    assert!(!check("ghost", ConditionOperator::NotEquals, 0));

    let trace = explain(
        &Condition::new("ghost", ConditionOperator::NotEquals, 0),
        &values(),
    );
    assert_eq!(trace.observed, None);
    assert!(!trace.outcome);
    assert_eq!(trace.reason(), "$ghost (was undeclared) != 0");
}

#[test]
fn test_unsupported_operator_evaluates_false() {
    assert!(!check("trust", ConditionOperator::Unsupported, 6));
}

#[test]
fn test_unknown_operator_name_deserializes_as_unsupported() {
    let condition: Condition = serde_json::from_str(
        r#"{ "variableKey": "trust", "operator": "matches_regex", "targetValue": "^6$" }"#,
    )
    .unwrap();

    assert_eq!(condition.operator, ConditionOperator::Unsupported);
    assert!(!evaluate(&condition, &values()));
}

#[test]
fn test_explain_matches_evaluate() {
    let conditions = [
        Condition::new("trust", ConditionOperator::GreaterThan, 5),
        Condition::new("trust", ConditionOperator::LessThan, 5),
        Condition::new("notes", ConditionOperator::Contains, "asked"),
        Condition::new("verified", ConditionOperator::Equals, "true"),
    ];
    let values = values();
    for condition in &conditions {
        let trace = explain(condition, &values);
        assert_eq!(trace.outcome, evaluate(condition, &values), "{}", condition);
        assert_eq!(&trace.condition, condition);
        assert_eq!(trace.observed.as_ref(), values.get(&condition.variable_key));
    }
}

#[test]
fn test_trace_reason_formatting() {
    let trace = explain(
        &Condition::new("notes", ConditionOperator::Contains, "listened"),
        &values(),
    );
    assert_eq!(
        trace.reason(),
        "$notes (was \"asked;listened;\") CONTAINS \"listened\""
    );
}
