//! Connection provider serving fixed details.

use async_trait::async_trait;

use crate::config::non_empty_var;
use crate::traits::{ConnectionDetails, ConnectionError, ConnectionProvider};

/// Environment variable holding the cluster URL.
pub const CLUSTER_URL_ENV: &str = "WEAVIATE_URL";
/// Environment variable holding the cluster API key.
pub const API_KEY_ENV: &str = "WEAVIATE_API_KEY";

/// Serves the same [`ConnectionDetails`] for every request.
#[derive(Debug, Clone)]
pub struct StaticConnection {
    details: ConnectionDetails,
}

impl StaticConnection {
    pub fn new(details: ConnectionDetails) -> Self {
        Self { details }
    }

    /// Build from `WEAVIATE_URL` (required) and `WEAVIATE_API_KEY`
    /// (optional, sent as `Bearer <key>`).
    pub fn from_env() -> Result<Self, ConnectionError> {
        let host = non_empty_var(CLUSTER_URL_ENV)
            .ok_or_else(|| ConnectionError::Missing(CLUSTER_URL_ENV.to_string()))?;

        let mut details = ConnectionDetails::new(host);
        if let Some(key) = non_empty_var(API_KEY_ENV) {
            details = details.with_bearer_token(format!("Bearer {}", key));
        }
        Ok(Self::new(details))
    }

    /// Add a header passed through to the cluster, e.g. a vectorizer API key.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.details = self.details.with_header(name, value);
        self
    }

    pub fn details(&self) -> &ConnectionDetails {
        &self.details
    }
}

#[async_trait]
impl ConnectionProvider for StaticConnection {
    async fn connection_details(&self) -> Result<ConnectionDetails, ConnectionError> {
        Ok(self.details.clone())
    }
}
