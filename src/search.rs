//! Paginated search-only sessions.
//!
//! The first page request of a session asks the service to plan the
//! searches; every later page re-executes that exact plan with a new
//! limit and offset, so pages never shift under the caller.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::agent::headers::resolve_headers;
use crate::config::AgentConfig;
use crate::error::{handle_error, QueryAgentError, QueryAgentResult};
use crate::models::api::ApiSearchModeResponse;
use crate::models::{
    map_searches, QueryAgentCollection, QueryAgentQuery, SearchResult, SearchResults, Usage,
};
use crate::traits::{ConnectionProvider, Headers, HttpClient};

pub const SEARCH_ONLY_PATH: &str = "/query/search_only";
pub const DEFAULT_SEARCH_LIMIT: u32 = 20;

/// Which page of results to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationRequest {
    pub limit: u32,
    pub offset: u32,
}

impl PaginationRequest {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for PaginationRequest {
    fn default() -> Self {
        Self {
            limit: DEFAULT_SEARCH_LIMIT,
            offset: 0,
        }
    }
}

/// Plan state of a search session.
///
/// A planned session never returns to `Unplanned` and its plan never
/// changes. The plan is kept exactly as the service sent it.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SearchPlan {
    #[default]
    Unplanned,
    Planned(Vec<Value>),
}

impl SearchPlan {
    pub fn is_planned(&self) -> bool {
        matches!(self, SearchPlan::Planned(_))
    }

    /// The cached wire-form searches, if planned.
    pub fn searches(&self) -> Option<&[Value]> {
        match self {
            SearchPlan::Unplanned => None,
            SearchPlan::Planned(searches) => Some(searches),
        }
    }

    /// Apply the raw `searches` field of a successful response.
    ///
    /// Returns whether the state changed.
    pub fn record(&mut self, raw_searches: Option<&Value>) -> bool {
        if self.is_planned() {
            return false;
        }
        match raw_searches {
            Some(Value::Array(searches)) => {
                *self = SearchPlan::Planned(searches.clone());
                true
            }
            _ => false,
        }
    }
}

#[derive(Serialize)]
struct SearchRequestBody<'a> {
    headers: &'a Headers,
    original_query: &'a QueryAgentQuery,
    collections: &'a [QueryAgentCollection],
    limit: u32,
    offset: u32,
    /// `null` asks the service to plan
    searches: Option<&'a [Value]>,
    /// Present (possibly `null`) only on planning requests
    #[serde(skip_serializing_if = "Option::is_none")]
    system_prompt: Option<Option<&'a str>>,
}

struct SearcherInner {
    http: Arc<dyn HttpClient>,
    connection: Arc<dyn ConnectionProvider>,
    url: String,
    system_prompt: Option<String>,
    query: QueryAgentQuery,
    collections: Vec<QueryAgentCollection>,
    plan: Mutex<SearchPlan>,
}

/// A configured search-only session.
///
/// Cloning yields another handle on the same session. Page requests on one
/// session run one at a time: the plan lock is held for the whole request.
#[derive(Clone)]
pub struct QueryAgentSearcher {
    inner: Arc<SearcherInner>,
}

impl fmt::Debug for QueryAgentSearcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryAgentSearcher")
            .field("url", &self.inner.url)
            .field("query", &self.inner.query)
            .field("collections", &self.inner.collections.len())
            .finish_non_exhaustive()
    }
}

impl QueryAgentSearcher {
    pub(crate) fn new(
        http: Arc<dyn HttpClient>,
        connection: Arc<dyn ConnectionProvider>,
        config: &AgentConfig,
        query: QueryAgentQuery,
        collections: Vec<QueryAgentCollection>,
    ) -> Self {
        Self {
            inner: Arc::new(SearcherInner {
                http,
                connection,
                url: config.endpoint(SEARCH_ONLY_PATH),
                system_prompt: config.system_prompt.clone(),
                query,
                collections,
                plan: Mutex::new(SearchPlan::Unplanned),
            }),
        }
    }

    /// Snapshot of the session's plan state.
    pub async fn plan(&self) -> SearchPlan {
        self.inner.plan.lock().await.clone()
    }

    /// Fetch one page of results.
    ///
    /// On failure the plan state is left as it was, so the same page can be
    /// retried.
    pub async fn run(&self, page: PaginationRequest) -> QueryAgentResult<SearchModeResponse> {
        let inner = &self.inner;
        if inner.collections.is_empty() {
            return Err(QueryAgentError::NoCollections);
        }

        let mut plan = inner.plan.lock().await;
        let headers = resolve_headers(inner.connection.as_ref()).await?;

        let body = SearchRequestBody {
            headers: &headers.connection,
            original_query: &inner.query,
            collections: &inner.collections,
            limit: page.limit,
            offset: page.offset,
            searches: plan.searches(),
            system_prompt: match *plan {
                SearchPlan::Unplanned => Some(
                    inner
                        .system_prompt
                        .as_deref()
                        .filter(|prompt| !prompt.is_empty()),
                ),
                SearchPlan::Planned(_) => None,
            },
        };
        let body = serde_json::to_string(&body)
            .map_err(|err| QueryAgentError::json("search request", err))?;

        tracing::debug!(
            planned = plan.is_planned(),
            limit = page.limit,
            offset = page.offset,
            "Sending search-only request"
        );
        let response = inner.http.post(&inner.url, &body, &headers.request).await?;
        if !response.is_success() {
            let err = handle_error(&response.text());
            tracing::warn!(status = response.status, error = %err, "Search-only request failed");
            return Err(err);
        }

        let raw: Value = response
            .json()
            .map_err(|err| QueryAgentError::json("search-only response", err))?;
        let raw_searches = raw.get("searches").cloned();
        let parsed: ApiSearchModeResponse = serde_json::from_value(raw)
            .map_err(|err| QueryAgentError::json("search-only response", err))?;

        if plan.record(raw_searches.as_ref()) {
            tracing::info!(
                searches = plan.searches().map_or(0, <[serde_json::Value]>::len),
                "Search plan cached"
            );
        } else if !plan.is_planned() {
            tracing::warn!("Search-only response carried no plan; session stays unplanned");
        }
        drop(plan);

        Ok(SearchModeResponse {
            original_query: parsed.original_query,
            searches: parsed.searches.map(map_searches),
            usage: parsed.usage,
            total_time: parsed.total_time,
            search_results: parsed.search_results,
            session: self.clone(),
        })
    }
}

/// One page of search-only results.
#[derive(Debug, Clone)]
pub struct SearchModeResponse {
    pub original_query: String,
    /// The searches that produced this page
    pub searches: Option<Vec<SearchResult>>,
    pub usage: Usage,
    pub total_time: f64,
    pub search_results: SearchResults,
    session: QueryAgentSearcher,
}

impl SearchModeResponse {
    /// Fetch another page from the same session.
    pub async fn next(&self, page: PaginationRequest) -> QueryAgentResult<SearchModeResponse> {
        self.session.run(page).await
    }

    /// The session this page belongs to.
    pub fn session(&self) -> &QueryAgentSearcher {
        &self.session
    }
}
