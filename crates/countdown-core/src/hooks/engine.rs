//! Error objects as the release engine reports them
//!
//! The engine marks aggregates only by name. Conversion into
//! [`ReleaseFailure`] turns that name into an explicit discriminant.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::filter::{AggregateFailure, ErrorRecord, ReleaseFailure, SingularError};

/// Name the engine gives to errors wrapping several sub-errors
pub const AGGREGATE_ERROR_NAME: &str = "AggregateError";

/// An error object in the engine's JSON shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineError {
    /// Error name, e.g. "AggregateError" or "SemanticReleaseError"
    pub name: String,

    /// Error message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Engine error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Sub-errors of an aggregate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorRecord>>,

    /// Any other fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EngineError {
    /// Whether the engine considers this an aggregate
    pub fn is_aggregate(&self) -> bool {
        self.name == AGGREGATE_ERROR_NAME
    }
}

impl From<EngineError> for ReleaseFailure {
    fn from(error: EngineError) -> Self {
        if error.is_aggregate() {
            let mut details = error.extra;
            if let Some(code) = error.code {
                details.insert("code".to_string(), Value::String(code));
            }
            return ReleaseFailure::Aggregate(AggregateFailure {
                message: error.message,
                errors: error.errors.unwrap_or_default(),
                details,
            });
        }

        // A non-aggregate may still carry an `errors` field; keep it verbatim.
        let mut details = error.extra;
        if let Some(errors) = error.errors {
            if let Ok(value) = serde_json::to_value(errors) {
                details.insert("errors".to_string(), value);
            }
        }
        ReleaseFailure::Singular(SingularError {
            name: error.name,
            message: error.message,
            code: error.code,
            details,
        })
    }
}

impl From<ReleaseFailure> for EngineError {
    fn from(failure: ReleaseFailure) -> Self {
        match failure {
            ReleaseFailure::Aggregate(aggregate) => {
                let mut extra = aggregate.details;
                let code = match extra.remove("code") {
                    Some(Value::String(code)) => Some(code),
                    Some(other) => {
                        extra.insert("code".to_string(), other);
                        None
                    }
                    None => None,
                };
                EngineError {
                    name: AGGREGATE_ERROR_NAME.to_string(),
                    message: aggregate.message,
                    code,
                    errors: Some(aggregate.errors),
                    extra,
                }
            }
            ReleaseFailure::Singular(error) => {
                let mut extra = error.details;
                let errors = extra
                    .remove("errors")
                    .and_then(|v| serde_json::from_value(v).ok());
                EngineError {
                    name: error.name,
                    message: error.message,
                    code: error.code,
                    errors,
                    extra,
                }
            }
        }
    }
}
