//! Query evaluation over JSON documents.
//!
//! Implements document-store matching semantics for backends that
//! hold documents in process: dotted paths fan out over arrays, an
//! equality condition matches if any reachable value is equal (or is
//! an array containing an equal element).

use serde_json::Value;

use super::{Filter, Stage};
use crate::core::error::{Result, ReviewError};

/// Collect every value reachable at a dotted path
///
/// Arrays met along the way are traversed element by element, so
/// `drinks.name` yields the name of every drink.
pub fn values_at<'a>(document: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut current = vec![document];

    for segment in path.split('.') {
        let mut next = Vec::new();
        for value in current {
            match value {
                Value::Object(map) => {
                    if let Some(v) = map.get(segment) {
                        next.push(v);
                    }
                }
                Value::Array(items) => {
                    for item in items {
                        if let Some(v) = item.as_object().and_then(|m| m.get(segment)) {
                            next.push(v);
                        }
                    }
                }
                _ => {}
            }
        }
        current = next;
    }

    current
}

/// Check a document against every condition of a filter
pub fn matches_filter(document: &Value, filter: &Filter) -> bool {
    filter.conditions().iter().all(|(path, expected)| {
        values_at(document, path).into_iter().any(|value| {
            value == expected
                || matches!(value, Value::Array(items) if items.contains(expected))
        })
    })
}

/// Run a pipeline over documents in order
pub fn apply_pipeline(documents: Vec<Value>, pipeline: &[Stage]) -> Result<Vec<Value>> {
    pipeline
        .iter()
        .try_fold(documents, |docs, stage| apply_stage(docs, stage))
}

fn apply_stage(documents: Vec<Value>, stage: &Stage) -> Result<Vec<Value>> {
    match stage {
        Stage::Match(filter) => Ok(documents
            .into_iter()
            .filter(|doc| matches_filter(doc, filter))
            .collect()),
        Stage::Unwind(path) => Ok(documents
            .into_iter()
            .flat_map(|doc| unwind(doc, path))
            .collect()),
        Stage::ReplaceRoot(path) => documents
            .into_iter()
            .map(|doc| replace_root(doc, path))
            .collect(),
    }
}

fn unwind(document: Value, path: &str) -> Vec<Value> {
    let items = match lookup(&document, path).cloned() {
        Some(Value::Array(items)) => items,
        Some(Value::Null) | None => return Vec::new(),
        Some(_) => return vec![document],
    };

    items
        .into_iter()
        .map(|item| {
            let mut copy = document.clone();
            if let Some(slot) = lookup_mut(&mut copy, path) {
                *slot = item;
            }
            copy
        })
        .collect()
}

fn replace_root(document: Value, path: &str) -> Result<Value> {
    match lookup(&document, path) {
        Some(value @ Value::Object(_)) => Ok(value.clone()),
        Some(other) => Err(ReviewError::Query(format!(
            "'newRoot' must evaluate to an object, got {other} at '{path}'"
        ))),
        None => Err(ReviewError::Query(format!(
            "'newRoot' must evaluate to an object, '{path}' is missing"
        ))),
    }
}

/// Plain object-path lookup without array fan-out
fn lookup<'a>(document: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(document, |value, segment| value.as_object()?.get(segment))
}

fn lookup_mut<'a>(document: &'a mut Value, path: &str) -> Option<&'a mut Value> {
    path.split('.')
        .try_fold(document, |value, segment| value.as_object_mut()?.get_mut(segment))
}
