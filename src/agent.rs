//! Query agent client.
//!
//! [`QueryAgent`] answers natural-language questions over Weaviate
//! collections, either in one shot, as a stream of progress and tokens, or
//! as paginated search-only results.

pub mod headers;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::adapters::ReqwestHttpClient;
use crate::config::AgentConfig;
use crate::dispatch::{dispatch_stream, QueryAgentStream};
use crate::error::{handle_error, QueryAgentError, QueryAgentResult};
use crate::models::api::{ApiAskModeResponse, ApiQueryAgentResponse};
use crate::models::{AskModeResponse, QueryAgentCollection, QueryAgentQuery, QueryAgentResponse};
use crate::search::{PaginationRequest, QueryAgentSearcher, SearchModeResponse};
use crate::sse::{fetch_server_sent_events, SseRequest};
use crate::traits::{ConnectionProvider, Headers, HttpClient};
use headers::resolve_headers;

pub const RUN_PATH: &str = "/agent/query";
pub const ASK_PATH: &str = "/query/ask";
pub const STREAM_PATH: &str = "/agent/stream_query";

/// Options of [`QueryAgent::run`].
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the agent's default collections
    pub collections: Option<Vec<QueryAgentCollection>>,
    /// Previous answer to build on
    pub context: Option<QueryAgentResponse>,
}

/// Options of [`QueryAgent::ask`].
#[derive(Debug, Clone, Default)]
pub struct AskOptions {
    pub collections: Option<Vec<QueryAgentCollection>>,
}

/// Options of [`QueryAgent::stream`].
///
/// Progress messages and the final state are included unless turned off.
#[derive(Debug, Clone, Default)]
pub struct StreamOptions {
    pub collections: Option<Vec<QueryAgentCollection>>,
    pub context: Option<QueryAgentResponse>,
    pub include_progress: Option<bool>,
    pub include_final_state: Option<bool>,
}

/// Options of [`QueryAgent::ask_stream`].
#[derive(Debug, Clone, Default)]
pub struct AskStreamOptions {
    pub collections: Option<Vec<QueryAgentCollection>>,
    pub include_progress: Option<bool>,
    pub include_final_state: Option<bool>,
}

/// Options of [`QueryAgent::search`].
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Page size of the first page, 20 when unset
    pub limit: Option<u32>,
    pub collections: Option<Vec<QueryAgentCollection>>,
}

#[derive(Serialize)]
struct AgentRequestBody<'a> {
    headers: &'a Headers,
    query: &'a QueryAgentQuery,
    collections: &'a [QueryAgentCollection],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    previous_response: Option<ApiQueryAgentResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_progress: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    include_final_state: Option<bool>,
}

/// Client for the Weaviate query agent.
///
/// Cheap to clone; clones share the HTTP client and connection provider.
#[derive(Clone)]
pub struct QueryAgent {
    http: Arc<dyn HttpClient>,
    connection: Arc<dyn ConnectionProvider>,
    config: AgentConfig,
}

impl std::fmt::Debug for QueryAgent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryAgent")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl QueryAgent {
    /// Create an agent talking to the service over reqwest.
    pub fn new(connection: impl ConnectionProvider + 'static, config: AgentConfig) -> Self {
        Self::with_http_client(
            Arc::new(ReqwestHttpClient::new()),
            Arc::new(connection),
            config,
        )
    }

    /// Create an agent with an injected HTTP client.
    pub fn with_http_client(
        http: Arc<dyn HttpClient>,
        connection: Arc<dyn ConnectionProvider>,
        config: AgentConfig,
    ) -> Self {
        Self {
            http,
            connection,
            config,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// Run the agent once and return its full answer.
    #[deprecated(note = "use `ask` instead")]
    pub async fn run(&self, query: &str, options: RunOptions) -> QueryAgentResult<QueryAgentResponse> {
        let collections = self.target_collections(options.collections)?;
        let query = QueryAgentQuery::from(query);
        let previous_response = options.context.as_ref().map(ApiQueryAgentResponse::from);

        let headers = resolve_headers(self.connection.as_ref()).await?;
        let body = AgentRequestBody {
            headers: &headers.connection,
            query: &query,
            collections: &collections,
            system_prompt: self.config.system_prompt.as_deref(),
            previous_response,
            include_progress: None,
            include_final_state: None,
        };

        tracing::info!(collections = collections.len(), "Running query agent");
        let wire: ApiQueryAgentResponse = self.post_json(RUN_PATH, &headers.request, &body).await?;
        Ok(wire.into())
    }

    /// Ask a question, or continue a conversation, and return the answer.
    pub async fn ask(
        &self,
        query: impl Into<QueryAgentQuery>,
        options: AskOptions,
    ) -> QueryAgentResult<AskModeResponse> {
        let collections = self.target_collections(options.collections)?;
        let query = query.into();

        let headers = resolve_headers(self.connection.as_ref()).await?;
        let body = AgentRequestBody {
            headers: &headers.connection,
            query: &query,
            collections: &collections,
            system_prompt: self.config.system_prompt.as_deref(),
            previous_response: None,
            include_progress: None,
            include_final_state: None,
        };

        tracing::info!(collections = collections.len(), "Asking query agent");
        let wire: ApiAskModeResponse = self.post_json(ASK_PATH, &headers.request, &body).await?;
        Ok(wire.into())
    }

    /// Stream progress, tokens and the final state of one agent run.
    ///
    /// The request is only sent once the returned stream is first polled.
    #[deprecated(note = "use `ask_stream` instead")]
    pub async fn stream(&self, query: &str, options: StreamOptions) -> QueryAgentResult<QueryAgentStream> {
        let collections = self.target_collections(options.collections)?;
        let query = QueryAgentQuery::from(query);
        let previous_response = options.context.as_ref().map(ApiQueryAgentResponse::from);

        let headers = resolve_headers(self.connection.as_ref()).await?;
        let body = AgentRequestBody {
            headers: &headers.connection,
            query: &query,
            collections: &collections,
            system_prompt: self.config.system_prompt.as_deref(),
            previous_response,
            include_progress: Some(options.include_progress.unwrap_or(true)),
            include_final_state: Some(options.include_final_state.unwrap_or(true)),
        };
        self.open_stream(headers.request, &body)
    }

    /// Ask a question and stream progress, tokens and the final state.
    ///
    /// The request is only sent once the returned stream is first polled.
    /// Dropping the stream closes the connection.
    pub async fn ask_stream(
        &self,
        query: impl Into<QueryAgentQuery>,
        options: AskStreamOptions,
    ) -> QueryAgentResult<QueryAgentStream> {
        let collections = self.target_collections(options.collections)?;
        let query = query.into();

        let headers = resolve_headers(self.connection.as_ref()).await?;
        let body = AgentRequestBody {
            headers: &headers.connection,
            query: &query,
            collections: &collections,
            system_prompt: self.config.system_prompt.as_deref(),
            previous_response: None,
            include_progress: Some(options.include_progress.unwrap_or(true)),
            include_final_state: Some(options.include_final_state.unwrap_or(true)),
        };
        self.open_stream(headers.request, &body)
    }

    /// Run a search-only query and return its first page.
    ///
    /// Use [`SearchModeResponse::next`] for further pages.
    pub async fn search(
        &self,
        query: impl Into<QueryAgentQuery>,
        options: SearchOptions,
    ) -> QueryAgentResult<SearchModeResponse> {
        let searcher = self.configure_search(query, options.collections)?;
        let limit = options.limit.unwrap_or(crate::search::DEFAULT_SEARCH_LIMIT);
        tracing::info!(limit, "Starting search-only session");
        searcher.run(PaginationRequest::new(limit, 0)).await
    }

    /// Create a search-only session without sending anything.
    pub fn configure_search(
        &self,
        query: impl Into<QueryAgentQuery>,
        collections: Option<Vec<QueryAgentCollection>>,
    ) -> QueryAgentResult<QueryAgentSearcher> {
        let collections = self.target_collections(collections)?;
        Ok(QueryAgentSearcher::new(
            self.http.clone(),
            self.connection.clone(),
            &self.config,
            query.into(),
            collections,
        ))
    }

    /// Per-call collections win over the configured defaults.
    fn target_collections(
        &self,
        collections: Option<Vec<QueryAgentCollection>>,
    ) -> QueryAgentResult<Vec<QueryAgentCollection>> {
        collections
            .or_else(|| self.config.collections.clone())
            .ok_or(QueryAgentError::NoCollections)
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        headers: &Headers,
        body: &AgentRequestBody<'_>,
    ) -> QueryAgentResult<T> {
        let body = serde_json::to_string(body)
            .map_err(|err| QueryAgentError::json("agent request", err))?;
        let url = self.config.endpoint(path);

        tracing::debug!(url = %url, "Sending agent request");
        let response = self.http.post(&url, &body, headers).await?;
        if !response.is_success() {
            let err = handle_error(&response.text());
            tracing::warn!(status = response.status, error = %err, "Agent request failed");
            return Err(err);
        }

        response
            .json()
            .map_err(|err| QueryAgentError::json("agent response", err))
    }

    fn open_stream(
        &self,
        headers: Headers,
        body: &AgentRequestBody<'_>,
    ) -> QueryAgentResult<QueryAgentStream> {
        let body = serde_json::to_string(body)
            .map_err(|err| QueryAgentError::json("agent request", err))?;
        let url = self.config.endpoint(STREAM_PATH);

        tracing::info!(url = %url, "Opening agent stream");
        let events = fetch_server_sent_events(self.http.clone(), SseRequest::new(url, headers, body));
        Ok(dispatch_stream(events))
    }
}
