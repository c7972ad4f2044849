//! Common test utilities for integration tests.
//!
//! Builds a [`QueryAgent`] pointed at a `wiremock` server over the real
//! reqwest adapter.

#![allow(dead_code)]

use query_agent::adapters::StaticConnection;
use query_agent::traits::ConnectionDetails;
use query_agent::{AgentConfig, QueryAgent};
use serde_json::{json, Value};
use wiremock::{MockServer, Request};

pub const CLUSTER_HOST: &str = "https://cluster.example.com";
pub const API_KEY: &str = "Bearer test-api-key";

/// Agent whose agents host is the mock server, querying `Products` by default.
pub fn test_agent(server: &MockServer) -> QueryAgent {
    test_agent_with(server, AgentConfig::default().with_collections(["Products"]))
}

pub fn test_agent_with(server: &MockServer, config: AgentConfig) -> QueryAgent {
    let connection = StaticConnection::new(
        ConnectionDetails::new(CLUSTER_HOST).with_bearer_token(API_KEY),
    )
    .with_header("X-OpenAI-Api-Key", "sk-test");
    QueryAgent::new(connection, config.with_agents_host(server.uri()))
}

/// JSON bodies of every request the server received, in order.
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(request_json)
        .collect()
}

pub fn request_json(request: &Request) -> Value {
    serde_json::from_slice(&request.body).unwrap_or(Value::Null)
}

/// A complete agent answer in wire form.
pub fn agent_answer(final_answer: &str) -> Value {
    json!({
        "original_query": "Which shoes are waterproof?",
        "collection_names": ["Products"],
        "searches": [[{
            "collection": "Products",
            "queries": ["waterproof shoes"],
            "filters": [[{"filter_type": "boolean", "property_name": "waterproof", "operator": "=", "value": true}]],
            "filter_operators": "AND"
        }]],
        "aggregations": [],
        "usage": {"requests": 2, "request_tokens": 300, "response_tokens": 50, "total_tokens": 350},
        "total_time": 1.8,
        "is_partial_answer": false,
        "missing_information": [],
        "final_answer": final_answer,
        "sources": [{"object_id": "7a3c", "collection": "Products"}]
    })
}

/// Wire form of an SSE stream made of `(kind, data)` pairs.
pub fn sse_body(events: &[(&str, Value)]) -> String {
    events
        .iter()
        .map(|(kind, data)| format!("event: {}\ndata: {}\n\n", kind, data))
        .collect()
}
