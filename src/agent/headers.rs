//! Outbound headers of agent requests.

use crate::error::QueryAgentResult;
use crate::traits::{ConnectionProvider, Headers};

/// Value of `X-Agent-Request-Origin` sent by this client.
pub const REQUEST_ORIGIN: &str = "rust-client";

pub const CLUSTER_URL_HEADER: &str = "X-Weaviate-Cluster-Url";
pub const REQUEST_ORIGIN_HEADER: &str = "X-Agent-Request-Origin";

/// Headers for one request, resolved from the connection provider.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AgentHeaders {
    /// HTTP headers of the request to the agents service
    pub request: Headers,
    /// Cluster headers forwarded inside the request body
    pub connection: Headers,
}

/// Look up connection details and build the headers of one request.
///
/// `Authorization` is only sent when the provider has a bearer token.
pub(crate) async fn resolve_headers(
    provider: &dyn ConnectionProvider,
) -> QueryAgentResult<AgentHeaders> {
    let details = provider.connection_details().await?;

    let mut request = Headers::new();
    request.insert("Content-Type".to_string(), "application/json".to_string());
    if let Some(token) = details.bearer_token {
        request.insert("Authorization".to_string(), token);
    }
    request.insert(CLUSTER_URL_HEADER.to_string(), details.host);
    request.insert(REQUEST_ORIGIN_HEADER.to_string(), REQUEST_ORIGIN.to_string());

    Ok(AgentHeaders {
        request,
        connection: details.headers,
    })
}
