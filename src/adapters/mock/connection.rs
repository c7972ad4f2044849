//! In-memory connection provider for testing.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::traits::{ConnectionDetails, ConnectionError, ConnectionProvider};

/// Connection provider whose details and failures are set by the test.
///
/// # Example
///
/// ```ignore
/// use query_agent::adapters::mock::MockConnection;
///
/// let connection = MockConnection::new("cluster.example.com").with_bearer_token("Bearer t");
/// connection.set_should_fail(true);
/// assert!(connection.connection_details().await.is_err());
/// ```
#[derive(Debug, Clone)]
pub struct MockConnection {
    details: Arc<Mutex<ConnectionDetails>>,
    should_fail: Arc<Mutex<bool>>,
    calls: Arc<Mutex<usize>>,
}

impl MockConnection {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_details(ConnectionDetails::new(host))
    }

    pub fn with_details(details: ConnectionDetails) -> Self {
        Self {
            details: Arc::new(Mutex::new(details)),
            should_fail: Arc::new(Mutex::new(false)),
            calls: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_bearer_token(self, token: impl Into<String>) -> Self {
        {
            let mut details = self.details.lock().unwrap();
            details.bearer_token = Some(token.into());
        }
        self
    }

    pub fn with_header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        {
            let mut details = self.details.lock().unwrap();
            details.headers.insert(name.into(), value.into());
        }
        self
    }

    /// Configure whether lookups should fail.
    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    /// Number of lookups made so far.
    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl ConnectionProvider for MockConnection {
    async fn connection_details(&self) -> Result<ConnectionDetails, ConnectionError> {
        *self.calls.lock().unwrap() += 1;
        if *self.should_fail.lock().unwrap() {
            return Err(ConnectionError::Unavailable(
                "mock configured to fail".to_string(),
            ));
        }
        Ok(self.details.lock().unwrap().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_connection_counts_lookups() {
        let connection = MockConnection::new("cluster").with_bearer_token("Bearer t");

        let details = connection.connection_details().await.unwrap();
        assert_eq!(details.bearer_token.as_deref(), Some("Bearer t"));
        connection.connection_details().await.unwrap();
        assert_eq!(connection.call_count(), 2);
    }

    #[tokio::test]
    async fn test_mock_connection_failure() {
        let connection = MockConnection::new("cluster");
        connection.set_should_fail(true);

        let err = connection.connection_details().await.unwrap_err();
        assert!(matches!(err, ConnectionError::Unavailable(_)));
    }
}
