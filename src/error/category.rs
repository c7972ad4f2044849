//! Error category classification.
//!
//! Maps every [`QueryAgentError`](super::QueryAgentError) onto one of the
//! failure classes callers are expected to branch on.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Non-success HTTP status, unreadable body, or a collaborator failure
    /// below the protocol (connection details, socket errors).
    Transport,

    /// The agents service answered with a well-formed `{ "error": ... }`
    /// payload. Callers can branch on its `code`.
    Agent,

    /// A well-framed event whose kind or content breaks the stream contract.
    Protocol,

    /// The call could not be built from the caller's input.
    Configuration,
}

impl ErrorCategory {
    /// Returns a short label for the category suitable for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "transport",
            ErrorCategory::Agent => "agent",
            ErrorCategory::Protocol => "protocol",
            ErrorCategory::Configuration => "configuration",
        }
    }

    /// Returns a user-friendly description of the category.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Transport => "The request to the agents service failed",
            ErrorCategory::Agent => "The query agent reported an error",
            ErrorCategory::Protocol => "The agents service sent an unexpected response",
            ErrorCategory::Configuration => "The query could not be built",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
