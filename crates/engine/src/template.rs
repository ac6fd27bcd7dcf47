// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `{{ .path }}` placeholder substitution against the execution context.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};
use wfe_core::evaluator::resolve_path;

use crate::error::ActionError;

/// Matches `{{ .a.b.c }}`, capturing the dotted path without the leading dot.
#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*\.([a-zA-Z_][a-zA-Z0-9_]*(?:\.[a-zA-Z_0-9]+)*)\s*\}\}").expect("constant regex pattern is valid")
});

fn value_to_template_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Substitute every `{{ .path }}` placeholder in `template` with the value
/// resolved from `ctx`. Fails if any placeholder path does not resolve —
/// unlike the evaluator, a template has no notion of "missing is fine".
pub fn substitute_str(template: &str, ctx: &Value) -> Result<String, ActionError> {
    let mut first_error = None;
    let result = PLACEHOLDER.replace_all(template, |caps: &regex::Captures| {
        let path = &caps[1];
        match resolve_path(ctx, path) {
            Some(value) => value_to_template_string(value),
            None => {
                first_error.get_or_insert_with(|| path.to_string());
                String::new()
            }
        }
    });
    match first_error {
        Some(path) => Err(ActionError::UnresolvedPath(path)),
        None => Ok(result.into_owned()),
    }
}

/// Substitute placeholders in every string value of a JSON object, one
/// level of recursion into nested objects/arrays. Non-string scalars pass
/// through untouched.
pub fn substitute_map(fields: &Map<String, Value>, ctx: &Value) -> Result<Map<String, Value>, ActionError> {
    let mut out = Map::with_capacity(fields.len());
    for (key, value) in fields {
        out.insert(key.clone(), substitute_value(value, ctx)?);
    }
    Ok(out)
}

fn substitute_value(value: &Value, ctx: &Value) -> Result<Value, ActionError> {
    match value {
        Value::String(s) => Ok(Value::String(substitute_str(s, ctx)?)),
        Value::Object(map) => Ok(Value::Object(substitute_map(map, ctx)?)),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                out.push(substitute_value(item, ctx)?);
            }
            Ok(Value::Array(out))
        }
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
