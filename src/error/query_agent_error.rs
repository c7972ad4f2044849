//! The crate-wide error type.

use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use super::ErrorCategory;
use crate::traits::{ConnectionError, HttpError};

/// Everything that can go wrong while talking to the query agent.
///
/// No variant is ever retried internally.
#[derive(Debug, Error)]
pub enum QueryAgentError {
    /// Structured error reported by the agents service.
    #[error("{message}")]
    Agent {
        message: String,
        code: String,
        details: Option<Map<String, Value>>,
    },

    /// Failing response whose body is not a structured error payload.
    #[error("Query agent failed. {0}")]
    Failed(String),

    /// The streaming request failed before any event was produced, or the
    /// body broke off mid-stream.
    #[error("Query agent streaming failed. {0}")]
    StreamTransport(String),

    /// An SSE event of a kind the dispatcher does not know.
    #[error("Unexpected event type: {event}: {data}")]
    UnexpectedEvent { event: String, data: String },

    /// An event whose `output_type` discriminator disagrees with its kind.
    #[error("Expected output_type \"{expected}\", got {actual}")]
    OutputTypeMismatch { expected: &'static str, actual: String },

    /// A payload that should be JSON could not be decoded.
    #[error("Invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error("No collections provided to the query agent.")]
    NoCollections,
}

impl QueryAgentError {
    pub(crate) fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        QueryAgentError::Json {
            context: context.into(),
            source,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            QueryAgentError::Agent { .. } => ErrorCategory::Agent,
            QueryAgentError::Failed(_)
            | QueryAgentError::StreamTransport(_)
            | QueryAgentError::Http(_)
            | QueryAgentError::Connection(_) => ErrorCategory::Transport,
            QueryAgentError::UnexpectedEvent { .. }
            | QueryAgentError::OutputTypeMismatch { .. }
            | QueryAgentError::Json { .. } => ErrorCategory::Protocol,
            QueryAgentError::NoCollections => ErrorCategory::Configuration,
        }
    }

    /// The service-assigned error code of an [`QueryAgentError::Agent`] error.
    pub fn code(&self) -> Option<&str> {
        match self {
            QueryAgentError::Agent { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Optional structured details of an [`QueryAgentError::Agent`] error.
    pub fn details(&self) -> Option<&Map<String, Value>> {
        match self {
            QueryAgentError::Agent { details, .. } => details.as_ref(),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    code: String,
    #[serde(default)]
    details: Option<Map<String, Value>>,
}

/// Turn the text of a failing response (or of an `error` event) into an error.
///
/// `{"error": {"message", "code", "details"?}}` becomes
/// [`QueryAgentError::Agent`]; any other text is surfaced verbatim in
/// [`QueryAgentError::Failed`].
pub fn handle_error(response_text: &str) -> QueryAgentError {
    match serde_json::from_str::<ErrorEnvelope>(response_text) {
        Ok(ErrorEnvelope { error }) => QueryAgentError::Agent {
            message: error.message,
            code: error.code,
            details: error.details,
        },
        Err(_) => QueryAgentError::Failed(response_text.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_error_structured_payload() {
        let err = handle_error(r#"{"error":{"message":"X","code":"Y","details":{"k":1}}}"#);

        assert_eq!(err.to_string(), "X");
        assert_eq!(err.code(), Some("Y"));
        assert_eq!(err.details().unwrap()["k"], 1);
        assert_eq!(err.category(), ErrorCategory::Agent);
    }

    #[test]
    fn test_handle_error_without_details() {
        let err = handle_error(r#"{"error":{"message":"Rate limited","code":"rate_limit"}}"#);
        match err {
            QueryAgentError::Agent {
                message,
                code,
                details,
            } => {
                assert_eq!(message, "Rate limited");
                assert_eq!(code, "rate_limit");
                assert!(details.is_none());
            }
            other => panic!("Expected Agent error, got {:?}", other),
        }
    }

    #[test]
    fn test_handle_error_plain_text() {
        let err = handle_error("Internal Server Error");
        assert!(matches!(err, QueryAgentError::Failed(ref raw) if raw == "Internal Server Error"));
        assert_eq!(err.to_string(), "Query agent failed. Internal Server Error");
        assert_eq!(err.category(), ErrorCategory::Transport);
        assert_eq!(err.code(), None);
    }

    #[test]
    fn test_handle_error_json_without_error_field() {
        let err = handle_error(r#"{"detail":"Not Found"}"#);
        assert!(matches!(err, QueryAgentError::Failed(_)));
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            QueryAgentError::StreamTransport("boom".to_string()).to_string(),
            "Query agent streaming failed. boom"
        );
        assert_eq!(
            QueryAgentError::UnexpectedEvent {
                event: "unknown_kind".to_string(),
                data: "{}".to_string()
            }
            .to_string(),
            "Unexpected event type: unknown_kind: {}"
        );
        assert_eq!(
            QueryAgentError::OutputTypeMismatch {
                expected: "streamed_tokens",
                actual: "progress_message".to_string()
            }
            .to_string(),
            "Expected output_type \"streamed_tokens\", got progress_message"
        );
        assert_eq!(
            QueryAgentError::NoCollections.to_string(),
            "No collections provided to the query agent."
        );
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            QueryAgentError::Http(HttpError::Timeout("t".to_string())).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            QueryAgentError::Connection(ConnectionError::Missing("host".to_string())).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            QueryAgentError::UnexpectedEvent {
                event: "x".to_string(),
                data: String::new()
            }
            .category(),
            ErrorCategory::Protocol
        );
        assert_eq!(QueryAgentError::NoCollections.category(), ErrorCategory::Configuration);
    }
}
