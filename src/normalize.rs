//! Error Normalizer
//!
//! Turns a classified failure into the single shape UI code consumes.
//! Priority: field errors, then the payload's `error` string, then the
//! caller's fallback. Exactly one of them is reported.

use serde_json::{Map, Value};

use crate::api::RequestFailure;

pub type FieldErrors = Map<String, Value>;

/// Outcome of a user-triggered operation
#[derive(Debug, Clone, PartialEq)]
pub enum OperationResult {
    Success,
    /// Validation rejected specific fields
    Invalid { errors: FieldErrors },
    Failed { message: String },
}

impl OperationResult {
    pub fn is_success(&self) -> bool {
        matches!(self, OperationResult::Success)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            OperationResult::Failed { message } => Some(message),
            _ => None,
        }
    }

    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            OperationResult::Invalid { errors } => Some(errors),
            _ => None,
        }
    }
}

pub fn normalize(failure: &RequestFailure, fallback: &str) -> OperationResult {
    if let Some(errors) = field_errors(failure) {
        return OperationResult::Invalid { errors: errors.clone() };
    }
    OperationResult::Failed {
        message: error_message(failure, fallback),
    }
}

/// One-line message for a store's `error` field
pub fn error_message(failure: &RequestFailure, fallback: &str) -> String {
    failure
        .payload()
        .and_then(|payload| payload.get("error"))
        .and_then(Value::as_str)
        .filter(|message| !message.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| fallback.to_string())
}

fn field_errors(failure: &RequestFailure) -> Option<&FieldErrors> {
    failure
        .payload()
        .and_then(|payload| payload.get("errors"))
        .and_then(Value::as_object)
}
