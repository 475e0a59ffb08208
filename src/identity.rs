//! Identity Reconciler
//!
//! The todo endpoints key identity as either `id` or `ID`. Both spellings are
//! folded into the canonical `id` when a todo is decoded, so the stores only
//! ever compare one field.

use serde::Deserialize;

use crate::models::{Id, Todo};

/// `id ?? ID`
pub fn resolve(id: Option<Id>, legacy_id: Option<Id>) -> Option<Id> {
    id.or(legacy_id)
}

/// Todo as it arrives on the wire
#[derive(Debug, Deserialize)]
pub struct WireTodo {
    #[serde(default)]
    id: Option<Id>,
    #[serde(default, rename = "ID")]
    legacy_id: Option<Id>,
    title: String,
    #[serde(default)]
    completed: bool,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("todo has neither `id` nor `ID`")]
pub struct MissingIdentity;

impl TryFrom<WireTodo> for Todo {
    type Error = MissingIdentity;

    fn try_from(wire: WireTodo) -> Result<Self, Self::Error> {
        let id = resolve(wire.id, wire.legacy_id).ok_or(MissingIdentity)?;
        Ok(Todo {
            id,
            title: wire.title,
            completed: wire.completed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_both_spellings_decode_to_same_id() {
        let lower: Todo = serde_json::from_value(json!({"id": 7, "title": "a", "completed": false})).unwrap();
        let upper: Todo = serde_json::from_value(json!({"ID": 7, "title": "a", "completed": false})).unwrap();
        assert_eq!(lower, upper);
        assert_eq!(upper.id, 7);
    }

    #[test]
    fn test_lowercase_wins_when_both_present() {
        let todo: Todo = serde_json::from_value(json!({"id": 1, "ID": 2, "title": "a"})).unwrap();
        assert_eq!(todo.id, 1);
        assert!(!todo.completed);
    }

    #[test]
    fn test_missing_identity_is_rejected() {
        let result = serde_json::from_value::<Todo>(json!({"title": "orphan"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_serializes_canonical_key() {
        let todo: Todo = serde_json::from_value(json!({"ID": 5, "title": "t", "completed": true})).unwrap();
        assert_eq!(serde_json::to_value(&todo).unwrap(), json!({"id": 5, "title": "t", "completed": true}));
    }
}
