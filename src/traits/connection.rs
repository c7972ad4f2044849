//! Connection details provider trait abstraction.
//!
//! The query agent does not own a database connection. It asks a provider for
//! the cluster host, the bearer token and any extra headers (typically model
//! provider API keys) and forwards them to the agents service.

use async_trait::async_trait;

use super::http::Headers;

/// Connection details of the Weaviate cluster the agent queries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionDetails {
    /// Cluster host, forwarded as `X-Weaviate-Cluster-Url`.
    pub host: String,
    /// Full `Authorization` header value, e.g. `Bearer abc`.
    pub bearer_token: Option<String>,
    /// Headers passed through to the cluster in the request body.
    pub headers: Headers,
}

impl ConnectionDetails {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Default::default()
        }
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Connection details lookup errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionError {
    /// A required setting is not available
    Missing(String),
    /// The details could not be produced
    Unavailable(String),
}

impl std::fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionError::Missing(what) => write!(f, "Missing connection setting: {}", what),
            ConnectionError::Unavailable(msg) => {
                write!(f, "Connection details unavailable: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConnectionError {}

/// Source of [`ConnectionDetails`].
///
/// Called once per outbound request so that rotating tokens are picked up.
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    async fn connection_details(&self) -> Result<ConnectionDetails, ConnectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_details_builder() {
        let details = ConnectionDetails::new("cluster.example.com")
            .with_bearer_token("Bearer secret")
            .with_header("X-OpenAI-Api-Key", "sk-test");

        assert_eq!(details.host, "cluster.example.com");
        assert_eq!(details.bearer_token.as_deref(), Some("Bearer secret"));
        assert_eq!(
            details.headers.get("X-OpenAI-Api-Key"),
            Some(&"sk-test".to_string())
        );
    }

    #[test]
    fn test_connection_error_display() {
        assert_eq!(
            ConnectionError::Missing("WEAVIATE_URL".to_string()).to_string(),
            "Missing connection setting: WEAVIATE_URL"
        );
        assert_eq!(
            ConnectionError::Unavailable("token refresh failed".to_string()).to_string(),
            "Connection details unavailable: token refresh failed"
        );
    }
}
