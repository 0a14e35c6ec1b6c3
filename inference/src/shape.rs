//! Post-processing of raw server payloads.
//!
//! Some pipelines answer with a one-element list where a single object is
//! expected, others answer with a bare object where a list is expected. The
//! adapters here only fix the outer shape and never inspect the content.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::task::TaskKind;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shape {
    /// Return the payload unchanged.
    Passthrough,
    /// Return the first element of a list payload.
    FirstElement,
    /// Wrap a non-list payload in a one-element list.
    Array,
}

/// Apply the shape rule of `kind` to `value`.
///
/// An empty or non-list payload for a [`Shape::FirstElement`] task is a
/// broken contract and fails with [`Error::EmptyResponse`].
pub fn reshape(kind: TaskKind, value: Value) -> Result<Value> {
    match kind.shape() {
        Shape::Passthrough => Ok(value),
        Shape::FirstElement => match value {
            Value::Array(items) => items.into_iter().next().ok_or(Error::EmptyResponse(kind)),
            _ => Err(Error::EmptyResponse(kind)),
        },
        Shape::Array => match value {
            Value::Array(_) => Ok(value),
            other => Ok(Value::Array(vec![other])),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_first_element() {
        let raw = json!([{"summary_text": "X"}]);
        assert_eq!(
            reshape(TaskKind::Summarization, raw).unwrap(),
            json!({"summary_text": "X"})
        );
    }

    #[test]
    fn empty_list_is_an_error() {
        let err = reshape(TaskKind::TextGeneration, json!([])).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(TaskKind::TextGeneration)));
        let err = reshape(TaskKind::Translation, json!({"translation_text": "hi"})).unwrap_err();
        assert!(matches!(err, Error::EmptyResponse(TaskKind::Translation)));
    }

    #[test]
    fn wraps_bare_object() {
        let raw = json!({"sequence": "s", "labels": ["a"], "scores": [1.0]});
        assert_eq!(
            reshape(TaskKind::ZeroShotClassification, raw.clone()).unwrap(),
            json!([raw])
        );
    }

    #[test]
    fn keeps_existing_list() {
        let raw = json!([{"entity_group": "PER", "score": 0.9, "word": "Sarah", "start": 0, "end": 5}]);
        assert_eq!(reshape(TaskKind::TokenClassification, raw.clone()).unwrap(), raw);
    }

    #[test]
    fn passthrough_is_untouched() {
        let raw = json!([[0.1, 0.2], [0.3, 0.4]]);
        assert_eq!(reshape(TaskKind::FeatureExtraction, raw.clone()).unwrap(), raw);
    }
}
