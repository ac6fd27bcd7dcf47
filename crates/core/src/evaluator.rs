// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure, side-effect-free evaluation of [`Condition`] trees against a context
//! document. Never errors on missing or mistyped data — only on structurally
//! invalid expressions.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde_json::Value;

use crate::error::EvalError;
use crate::workflow::{Condition, ConditionCompound, ConditionLeaf, LogicalOp, Operator};

/// Evaluate `expr` against `ctx`, walking dotted field paths from `ctx`'s root.
pub fn evaluate(expr: &Condition, ctx: &Value) -> Result<bool, EvalError> {
    match expr {
        Condition::Leaf(leaf) => evaluate_leaf(leaf, ctx),
        Condition::Compound(compound) => evaluate_compound(compound, ctx),
    }
}

fn evaluate_compound(compound: &ConditionCompound, ctx: &Value) -> Result<bool, EvalError> {
    if compound.conditions.is_empty() {
        return Err(EvalError::EmptyCompound);
    }
    match compound.logical_op {
        LogicalOp::And => {
            for child in &compound.conditions {
                if !evaluate(child, ctx)? {
                    return Ok(false);
                }
            }
            Ok(true)
        }
        LogicalOp::Or => {
            for child in &compound.conditions {
                if evaluate(child, ctx)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        LogicalOp::Not => {
            if compound.conditions.len() != 1 {
                return Err(EvalError::NotArity(compound.conditions.len()));
            }
            Ok(!evaluate(&compound.conditions[0], ctx)?)
        }
    }
}

fn evaluate_leaf(leaf: &ConditionLeaf, ctx: &Value) -> Result<bool, EvalError> {
    if leaf.field.is_empty() {
        return Err(EvalError::MissingField);
    }
    let actual = resolve_path(ctx, &leaf.field);
    apply_operator(leaf.operator, actual.as_ref(), &leaf.value)
}

/// Walk a dotted path (`order.customer.country`) through nested objects and
/// arrays (numeric segments index into arrays). Missing segments resolve to
/// `None`, never an error.
pub fn resolve_path<'a>(ctx: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = ctx;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => {
                let idx: usize = segment.parse().ok()?;
                items.get(idx)?
            }
            _ => return None,
        };
    }
    Some(current)
}

fn apply_operator(op: Operator, actual: Option<&Value>, expected: &Value) -> Result<bool, EvalError> {
    match op {
        Operator::Eq => Ok(values_eq(actual, expected)),
        Operator::Neq => Ok(!values_eq(actual, expected)),
        Operator::Gt => Ok(compare_numeric(actual, expected).map(|o| o.is_gt()).unwrap_or(false)),
        Operator::Gte => Ok(compare_numeric(actual, expected).map(|o| o.is_ge()).unwrap_or(false)),
        Operator::Lt => Ok(compare_numeric(actual, expected).map(|o| o.is_lt()).unwrap_or(false)),
        Operator::Lte => Ok(compare_numeric(actual, expected).map(|o| o.is_le()).unwrap_or(false)),
        Operator::In => Ok(membership(expected, actual)),
        Operator::NotIn => Ok(!membership(expected, actual)),
        Operator::Contains => Ok(contains(actual, expected)),
        Operator::StartsWith => Ok(str_pair(actual, expected).map(|(a, e)| a.starts_with(e)).unwrap_or(false)),
        Operator::EndsWith => Ok(str_pair(actual, expected).map(|(a, e)| a.ends_with(e)).unwrap_or(false)),
        Operator::Regex => regex_match(actual, expected),
        Operator::Before => Ok(compare_dates(actual, expected).map(|o| o.is_lt()).unwrap_or(false)),
        Operator::After => Ok(compare_dates(actual, expected).map(|o| o.is_gt()).unwrap_or(false)),
        Operator::Between => Ok(between(actual, expected)),
        Operator::WithinLast => Ok(within_last(actual, expected)),
        Operator::OlderThan => Ok(!within_last(actual, expected) && actual_date(actual).is_some()),
    }
}

fn values_eq(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        None => expected.is_null(),
        Some(v) => v == expected,
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn compare_numeric(actual: Option<&Value>, expected: &Value) -> Option<std::cmp::Ordering> {
    let a = as_f64(actual?)?;
    let e = as_f64(expected)?;
    a.partial_cmp(&e)
}

fn membership(haystack: &Value, actual: Option<&Value>) -> bool {
    let actual = match actual {
        Some(v) => v,
        None => return false,
    };
    match haystack {
        Value::Array(items) => items.iter().any(|item| item == actual),
        _ => false,
    }
}

fn contains(actual: Option<&Value>, expected: &Value) -> bool {
    match actual {
        Some(Value::Array(items)) => items.iter().any(|item| item == expected),
        Some(Value::String(s)) => expected.as_str().map(|needle| s.contains(needle)).unwrap_or(false),
        _ => false,
    }
}

fn str_pair<'a>(actual: Option<&'a Value>, expected: &'a Value) -> Option<(&'a str, &'a str)> {
    Some((actual?.as_str()?, expected.as_str()?))
}

fn regex_match(actual: Option<&Value>, expected: &Value) -> Result<bool, EvalError> {
    let pattern = expected.as_str().ok_or_else(|| EvalError::InvalidRegex("pattern must be a string".to_string()))?;
    let re = Regex::new(pattern).map_err(|e| EvalError::InvalidRegex(e.to_string()))?;
    Ok(actual.and_then(Value::as_str).map(|s| re.is_match(s)).unwrap_or(false))
}

fn actual_date(actual: Option<&Value>) -> Option<DateTime<Utc>> {
    parse_date(actual?)
}

fn parse_date(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::String(s) => DateTime::parse_from_rfc3339(s).ok().map(|d| d.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().map(|ms| DateTime::from_timestamp_millis(ms).unwrap_or_default()),
        _ => None,
    }
}

fn compare_dates(actual: Option<&Value>, expected: &Value) -> Option<std::cmp::Ordering> {
    let a = actual_date(actual)?;
    let e = parse_date(expected)?;
    Some(a.cmp(&e))
}

fn between(actual: Option<&Value>, expected: &Value) -> bool {
    let bounds = match expected.as_array() {
        Some(b) if b.len() == 2 => b,
        _ => return false,
    };
    match (as_f64(actual.unwrap_or(&Value::Null)), as_f64(&bounds[0]), as_f64(&bounds[1])) {
        (Some(a), Some(lo), Some(hi)) => a >= lo && a <= hi,
        _ => {
            let (a, lo, hi) = match (actual_date(actual), parse_date(&bounds[0]), parse_date(&bounds[1])) {
                (Some(a), Some(lo), Some(hi)) => (a, lo, hi),
                _ => return false,
            };
            a >= lo && a <= hi
        }
    }
}

/// `expected` is a duration in seconds; true iff `actual` is a timestamp
/// within the last `expected` seconds of "now" (wall-clock `Utc::now`).
fn within_last(actual: Option<&Value>, expected: &Value) -> bool {
    let a = match actual_date(actual) {
        Some(a) => a,
        None => return false,
    };
    let seconds = match expected.as_i64().or_else(|| expected.as_f64().map(|f| f as i64)) {
        Some(s) => s,
        None => return false,
    };
    let threshold = Utc::now() - chrono::Duration::seconds(seconds);
    a >= threshold
}

#[cfg(test)]
#[path = "evaluator_tests.rs"]
mod tests;
