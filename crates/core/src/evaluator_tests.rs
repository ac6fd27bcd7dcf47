// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::workflow::{Condition, ConditionCompound, ConditionLeaf, LogicalOp, Operator};
use serde_json::json;
use yare::parameterized;

fn leaf(field: &str, operator: Operator, value: Value) -> Condition {
    Condition::Leaf(ConditionLeaf { field: field.to_string(), operator, value })
}

#[parameterized(
    eq_match = { Operator::Eq, json!(1000), json!(1000), true },
    eq_mismatch = { Operator::Eq, json!(1000), json!(999), false },
    neq_match = { Operator::Neq, json!(1000), json!(999), true },
    gt_true = { Operator::Gt, json!(1500), json!(1000), true },
    gt_false = { Operator::Gt, json!(500), json!(1000), false },
    gte_equal = { Operator::Gte, json!(1000), json!(1000), true },
    lt_true = { Operator::Lt, json!(500), json!(1000), true },
    lte_equal = { Operator::Lte, json!(1000), json!(1000), true },
    contains_substring = { Operator::Contains, json!("hello world"), json!("world"), true },
    starts_with_true = { Operator::StartsWith, json!("hello world"), json!("hello"), true },
    ends_with_true = { Operator::EndsWith, json!("hello world"), json!("world"), true },
)]
fn leaf_operators(op: Operator, actual: Value, expected: Value, want: bool) {
    let ctx = json!({ "field": actual });
    let cond = leaf("field", op, expected);
    assert_eq!(evaluate(&cond, &ctx).unwrap(), want);
}

#[test]
fn missing_field_eq_undefined_is_true() {
    let ctx = json!({});
    let cond = leaf("missing", Operator::Eq, Value::Null);
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn missing_field_neq_value_is_false() {
    let ctx = json!({});
    let cond = leaf("missing", Operator::Neq, json!(5));
    assert!(!evaluate(&cond, &ctx).unwrap());
}

#[test]
fn missing_field_eq_value_is_false() {
    let ctx = json!({});
    let cond = leaf("missing", Operator::Eq, json!(5));
    assert!(!evaluate(&cond, &ctx).unwrap());
}

#[test]
fn dotted_path_resolves_through_nested_objects() {
    let ctx = json!({ "order": { "customer": { "country": "US" } } });
    let cond = leaf("order.customer.country", Operator::Eq, json!("US"));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn dotted_path_resolves_through_array_index() {
    let ctx = json!({ "items": [{ "sku": "A" }, { "sku": "B" }] });
    let cond = leaf("items.1.sku", Operator::Eq, json!("B"));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn in_operator_checks_membership() {
    let ctx = json!({ "country": "CA" });
    let cond = leaf("country", Operator::In, json!(["US", "CA", "MX"]));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn not_in_operator_negates_membership() {
    let ctx = json!({ "country": "FR" });
    let cond = leaf("country", Operator::NotIn, json!(["US", "CA", "MX"]));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn regex_operator_matches_pattern() {
    let ctx = json!({ "sku": "ABC-123" });
    let cond = leaf("sku", Operator::Regex, json!(r"^ABC-\d+$"));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn regex_operator_rejects_invalid_pattern() {
    let ctx = json!({ "sku": "ABC-123" });
    let cond = leaf("sku", Operator::Regex, json!("("));
    assert!(matches!(evaluate(&cond, &ctx), Err(EvalError::InvalidRegex(_))));
}

#[test]
fn and_short_circuits_on_first_false() {
    let ctx = json!({ "a": 1, "b": 2 });
    let compound = Condition::Compound(ConditionCompound {
        logical_op: LogicalOp::And,
        conditions: vec![
            leaf("a", Operator::Eq, json!(1)),
            leaf("b", Operator::Eq, json!(999)),
        ],
    });
    assert!(!evaluate(&compound, &ctx).unwrap());
}

#[test]
fn or_matches_if_any_child_true() {
    let ctx = json!({ "a": 1, "b": 2 });
    let compound = Condition::Compound(ConditionCompound {
        logical_op: LogicalOp::Or,
        conditions: vec![
            leaf("a", Operator::Eq, json!(999)),
            leaf("b", Operator::Eq, json!(2)),
        ],
    });
    assert!(evaluate(&compound, &ctx).unwrap());
}

#[test]
fn not_double_negation_is_identity() {
    let ctx = json!({ "a": 1 });
    let e = leaf("a", Operator::Eq, json!(1));
    let not_e = Condition::Compound(ConditionCompound { logical_op: LogicalOp::Not, conditions: vec![e.clone()] });
    let not_not_e =
        Condition::Compound(ConditionCompound { logical_op: LogicalOp::Not, conditions: vec![not_e] });
    assert_eq!(evaluate(&e, &ctx).unwrap(), evaluate(&not_not_e, &ctx).unwrap());
}

#[test]
fn not_with_wrong_arity_errors() {
    let compound = ConditionCompound {
        logical_op: LogicalOp::Not,
        conditions: vec![leaf("a", Operator::Eq, json!(1)), leaf("b", Operator::Eq, json!(2))],
    };
    assert_eq!(evaluate_compound(&compound, &json!({})), Err(EvalError::NotArity(2)));
}

#[test]
fn between_matches_inclusive_bounds() {
    let ctx = json!({ "total": 1000 });
    let cond = leaf("total", Operator::Between, json!([500, 1000]));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn within_last_matches_recent_timestamp() {
    let now = Utc::now();
    let ctx = json!({ "created_at": now.to_rfc3339() });
    let cond = leaf("created_at", Operator::WithinLast, json!(3600));
    assert!(evaluate(&cond, &ctx).unwrap());
}

#[test]
fn older_than_rejects_recent_timestamp() {
    let now = Utc::now();
    let ctx = json!({ "created_at": now.to_rfc3339() });
    let cond = leaf("created_at", Operator::OlderThan, json!(3600));
    assert!(!evaluate(&cond, &ctx).unwrap());
}
