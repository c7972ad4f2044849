//! Error handling for the query agent client.
//!
//! | Category | Raised for |
//! |----------|------------|
//! | Transport | non-success status, broken body, connection provider failure |
//! | Agent | `{ "error": { message, code, details? } }` payloads |
//! | Protocol | unknown event kinds, discriminator mismatches, undecodable payloads |
//! | Configuration | no collections to query |
//!
//! Failures propagate straight to the caller. Nothing is retried.

mod category;
mod query_agent_error;

pub use category::ErrorCategory;
pub use query_agent_error::{handle_error, QueryAgentError};

/// Result alias used throughout the crate.
pub type QueryAgentResult<T> = Result<T, QueryAgentError>;
