//! Error taxonomy for plan generation.
//!
//! Every failure of the generation boundary is reported as exactly one
//! [`GenerationError`] variant. Nothing in this module retries; callers
//! decide whether to resubmit.

use thiserror::Error;

/// Errors produced while turning a [`crate::PlanRequest`] into a validated
/// [`crate::ComebackPlan`].
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The completion provider answered with a non-success HTTP status.
    #[error("completion provider returned HTTP {status}")]
    Provider { status: u16, body: String },

    /// The completion provider could not be reached (connect failure,
    /// deadline exceeded, unreadable body).
    #[error("completion provider unreachable: {0}")]
    Transport(String),

    /// The provider stopped generating because the token budget ran out.
    #[error("response too long for the given timeframe; try reducing the number of days")]
    Truncated,

    /// The model output is not valid JSON, even after trailing-comma repair.
    #[error("invalid response format from model: {message}")]
    MalformedJson { raw: String, message: String },

    /// The output parsed but does not have the required shape.
    #[error("model response failed validation at `{field}`: {reason}")]
    SchemaValidation { field: String, reason: String },

    /// The provider credential (or other required setting) is missing.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request itself is unusable (e.g. day count out of range).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A remote plan service rejected the request. The wire format only
    /// carries a message, so the original kind is not recoverable.
    #[error("plan service returned HTTP {status}: {message}")]
    Remote { status: u16, message: String },
}

impl GenerationError {
    /// Stable label used in structured log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Provider { .. } | Self::Transport(_) => "provider_error",
            Self::Truncated => "truncated_output",
            Self::MalformedJson { .. } => "malformed_json",
            Self::SchemaValidation { .. } => "schema_validation",
            Self::Configuration(_) => "configuration",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Remote { .. } => "remote",
        }
    }

    pub(crate) fn schema(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::SchemaValidation {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct_per_failure_class() {
        let errors = [
            GenerationError::Provider {
                status: 429,
                body: String::new(),
            },
            GenerationError::Truncated,
            GenerationError::MalformedJson {
                raw: "{".to_string(),
                message: "eof".to_string(),
            },
            GenerationError::schema("dailyPlan", "wrong length"),
            GenerationError::Configuration("missing key".to_string()),
            GenerationError::InvalidRequest("days".to_string()),
            GenerationError::Remote {
                status: 500,
                message: "boom".to_string(),
            },
        ];
        let kinds: std::collections::HashSet<_> = errors.iter().map(|e| e.kind()).collect();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn transport_counts_as_provider_error() {
        let err = GenerationError::Transport("timed out".to_string());
        assert_eq!(err.kind(), "provider_error");
    }

    #[test]
    fn truncated_message_suggests_fewer_days() {
        let msg = GenerationError::Truncated.to_string();
        assert!(msg.contains("reducing the number of days"), "got: {msg}");
    }

    #[test]
    fn schema_error_names_the_field() {
        let msg = GenerationError::schema("finalQuote", "missing").to_string();
        assert!(msg.contains("finalQuote"), "got: {msg}");
    }
}
