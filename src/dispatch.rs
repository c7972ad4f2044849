//! Typed messages from raw server-sent events.
//!
//! Each event is classified by its kind and decoded on its own; the first
//! failure ends the stream and nothing after it is read.

use std::pin::Pin;

use futures::Stream;
use futures_util::stream;
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{handle_error, QueryAgentError, QueryAgentResult};
use crate::models::api::ApiQueryAgentResponse;
use crate::models::{ProgressMessage, QueryAgentResponse, StreamedTokens};
use crate::sse::{EventStream, ServerSentEvent};

pub const ERROR_EVENT: &str = "error";
pub const PROGRESS_MESSAGE_EVENT: &str = "progress_message";
pub const STREAMED_TOKENS_EVENT: &str = "streamed_tokens";
pub const FINAL_STATE_EVENT: &str = "final_state";

/// One message of a streamed agent answer.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutput {
    ProgressMessage(ProgressMessage),
    StreamedTokens(StreamedTokens),
    FinalState(QueryAgentResponse),
}

/// Stream of typed messages; ends after the first error.
pub type QueryAgentStream = Pin<Box<dyn Stream<Item = QueryAgentResult<StreamOutput>> + Send>>;

fn parse_json<T: DeserializeOwned>(data: &str, context: &'static str) -> QueryAgentResult<T> {
    serde_json::from_str(data).map_err(|err| QueryAgentError::json(context, err))
}

/// Parse `data` and check that its `output_type` names `expected`.
fn parse_discriminated<T: DeserializeOwned>(
    data: &str,
    expected: &'static str,
) -> QueryAgentResult<T> {
    let value: Value = parse_json(data, expected)?;
    match value.get("output_type") {
        Some(Value::String(actual)) if actual == expected => {}
        other => {
            return Err(QueryAgentError::OutputTypeMismatch {
                expected,
                actual: other.map_or_else(|| "nothing".to_string(), Value::to_string),
            })
        }
    }
    serde_json::from_value(value).map_err(|err| QueryAgentError::json(expected, err))
}

/// Classify and decode a single event.
pub fn dispatch_event(event: &ServerSentEvent) -> QueryAgentResult<StreamOutput> {
    match event.event.as_str() {
        ERROR_EVENT => Err(handle_error(&event.data)),
        PROGRESS_MESSAGE_EVENT => {
            parse_discriminated(&event.data, PROGRESS_MESSAGE_EVENT).map(StreamOutput::ProgressMessage)
        }
        STREAMED_TOKENS_EVENT => {
            parse_discriminated(&event.data, STREAMED_TOKENS_EVENT).map(StreamOutput::StreamedTokens)
        }
        FINAL_STATE_EVENT => parse_json::<ApiQueryAgentResponse>(&event.data, FINAL_STATE_EVENT)
            .map(|wire| StreamOutput::FinalState(wire.into())),
        other => Err(QueryAgentError::UnexpectedEvent {
            event: other.to_string(),
            data: event.data.clone(),
        }),
    }
}

/// Turn raw events into typed messages, in arrival order.
///
/// The event stream is dropped as soon as an error is yielded, which
/// releases the underlying connection. Once finished, the stream keeps
/// yielding `None`.
pub fn dispatch_stream(events: EventStream) -> QueryAgentStream {
    Box::pin(stream::unfold(Some(events), |state| async move {
        let mut events = state?;
        let result = match events.next().await? {
            Ok(event) => dispatch_event(&event),
            Err(err) => Err(err),
        };
        match result {
            Ok(output) => Some((Ok(output), Some(events))),
            Err(err) => {
                tracing::warn!(category = %err.category(), error = %err, "Agent stream aborted");
                Some((Err(err), None))
            }
        }
    })
    .fuse())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;
    use crate::models::AggregationMetric;
    use crate::sse::read_server_sent_events;
    use crate::traits::{ByteStream, HttpError};
    use bytes::Bytes;
    use serde_json::json;

    fn body(chunks: &[&str]) -> ByteStream {
        let chunks: Vec<Result<Bytes, HttpError>> = chunks
            .iter()
            .map(|chunk| Ok(Bytes::from(chunk.to_string())))
            .collect();
        Box::pin(futures::stream::iter(chunks))
    }

    fn final_state_payload() -> String {
        json!({
            "original_query": "Capital of France?",
            "collection_names": ["Cities"],
            "searches": [],
            "aggregations": [],
            "usage": {"requests": 1},
            "total_time": 0.75,
            "is_partial_answer": false,
            "missing_information": [],
            "final_answer": "Paris",
            "sources": []
        })
        .to_string()
    }

    #[test]
    fn test_progress_message_decoded() {
        let event = ServerSentEvent::new(
            "progress_message",
            r#"{"output_type":"progress_message","stage":"searching","message":"Searching Products","details":{"queries":["shoes"]}}"#,
        );

        let output = dispatch_event(&event).unwrap();
        assert_eq!(
            output,
            StreamOutput::ProgressMessage(ProgressMessage {
                stage: "searching".to_string(),
                message: "Searching Products".to_string(),
                details: Some(json!({"queries": ["shoes"]})),
            })
        );
    }

    #[test]
    fn test_streamed_tokens_decoded() {
        let event = ServerSentEvent::new(
            "streamed_tokens",
            r#"{"output_type":"streamed_tokens","delta":"Par"}"#,
        );

        let output = dispatch_event(&event).unwrap();
        assert_eq!(
            output,
            StreamOutput::StreamedTokens(StreamedTokens {
                delta: "Par".to_string()
            })
        );
    }

    #[test]
    fn test_discriminator_mismatch_is_protocol_error() {
        let event = ServerSentEvent::new(
            "streamed_tokens",
            r#"{"output_type":"progress_message","stage":"x","message":"y"}"#,
        );

        let err = dispatch_event(&event).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Protocol);
        assert!(err.to_string().contains("streamed_tokens"));
    }

    #[test]
    fn test_missing_discriminator_is_protocol_error() {
        let event = ServerSentEvent::new("streamed_tokens", r#"{"delta":"x"}"#);

        let err = dispatch_event(&event).unwrap_err();
        assert!(matches!(err, QueryAgentError::OutputTypeMismatch { .. }));
    }

    #[test]
    fn test_error_event_becomes_agent_error() {
        let event = ServerSentEvent::new(
            "error",
            r#"{"error":{"message":"Rate limited","code":"rate_limit"}}"#,
        );

        let err = dispatch_event(&event).unwrap_err();
        assert_eq!(err.code(), Some("rate_limit"));
        assert_eq!(err.to_string(), "Rate limited");
    }

    #[test]
    fn test_unparseable_error_event_keeps_raw_text() {
        let event = ServerSentEvent::new("error", "upstream exploded");

        let err = dispatch_event(&event).unwrap_err();
        assert!(matches!(err, QueryAgentError::Failed(ref raw) if raw == "upstream exploded"));
    }

    #[test]
    fn test_final_state_decoded() {
        let event = ServerSentEvent::new("final_state", final_state_payload());

        match dispatch_event(&event).unwrap() {
            StreamOutput::FinalState(response) => {
                assert_eq!(response.original_query, "Capital of France?");
                assert_eq!(response.final_answer, "Paris");
                assert_eq!(response.collection_names, vec!["Cities"]);
            }
            other => panic!("Expected final state, got {:?}", other),
        }
    }

    #[test]
    fn test_final_state_with_unrecognised_metric_decoded() {
        let payload = json!({
            "original_query": "Average price?",
            "collection_names": ["Products"],
            "aggregations": [[{
                "collection": "Products",
                "aggregations": [{"property_name": "price", "metrics": "STDDEV"}]
            }]],
            "final_answer": "About 12"
        })
        .to_string();
        let event = ServerSentEvent::new("final_state", payload);

        match dispatch_event(&event).unwrap() {
            StreamOutput::FinalState(response) => {
                let aggregation = &response.aggregations[0][0].aggregations[0];
                assert_eq!(aggregation.metrics, AggregationMetric::Other("STDDEV".to_string()));
                assert_eq!(response.final_answer, "About 12");
            }
            other => panic!("Expected final state, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_final_state_is_protocol_error() {
        let event = ServerSentEvent::new("final_state", "{\"final_answer\": ");

        let err = dispatch_event(&event).unwrap_err();
        assert!(matches!(err, QueryAgentError::Json { .. }));
        assert_eq!(err.category(), ErrorCategory::Protocol);
    }

    #[tokio::test]
    async fn test_messages_follow_arrival_order() {
        let final_state = final_state_payload();
        let raw = format!(
            "event: progress_message\ndata: {{\"output_type\":\"progress_message\",\"stage\":\"s\",\"message\":\"m\"}}\n\n\
             event: streamed_tokens\ndata: {{\"output_type\":\"streamed_tokens\",\"delta\":\"Pa\"}}\n\n\
             event: streamed_tokens\ndata: {{\"output_type\":\"streamed_tokens\",\"delta\":\"ris\"}}\n\n\
             event: final_state\ndata: {}\n\n",
            final_state
        );

        let outputs: Vec<_> =
            dispatch_stream(read_server_sent_events(body(&[&raw])))
                .collect()
                .await;

        assert_eq!(outputs.len(), 4);
        assert!(matches!(outputs[0], Ok(StreamOutput::ProgressMessage(_))));
        let deltas: Vec<String> = outputs[1..3]
            .iter()
            .filter_map(|output| match output {
                Ok(StreamOutput::StreamedTokens(tokens)) => Some(tokens.delta.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(deltas, vec!["Pa", "ris"]);
        assert!(matches!(outputs[3], Ok(StreamOutput::FinalState(_))));
    }

    #[tokio::test]
    async fn test_unknown_kind_aborts_stream() {
        let raw = "event: unknown_kind\ndata: {}\n\n\
                   event: streamed_tokens\ndata: {\"output_type\":\"streamed_tokens\",\"delta\":\"late\"}\n\n";

        let outputs: Vec<_> = dispatch_stream(read_server_sent_events(body(&[raw])))
            .collect()
            .await;

        assert_eq!(outputs.len(), 1);
        match &outputs[0] {
            Err(QueryAgentError::UnexpectedEvent { event, data }) => {
                assert_eq!(event, "unknown_kind");
                assert_eq!(data, "{}");
            }
            other => panic!("Expected unexpected event error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_error_event_ends_stream() {
        let raw = "event: streamed_tokens\ndata: {\"output_type\":\"streamed_tokens\",\"delta\":\"a\"}\n\n\
                   event: error\ndata: {\"error\":{\"message\":\"X\",\"code\":\"Y\"}}\n\n\
                   event: streamed_tokens\ndata: {\"output_type\":\"streamed_tokens\",\"delta\":\"b\"}\n\n";

        let outputs: Vec<_> = dispatch_stream(read_server_sent_events(body(&[raw])))
            .collect()
            .await;

        assert_eq!(outputs.len(), 2);
        assert!(outputs[0].is_ok());
        assert!(matches!(outputs[1], Err(QueryAgentError::Agent { .. })));
    }

    #[tokio::test]
    async fn test_default_message_kind_is_unexpected() {
        let raw = "data: hello\n\n";

        let mut stream = dispatch_stream(read_server_sent_events(body(&[raw])));
        let first = stream.next().await.unwrap();
        assert!(matches!(first, Err(QueryAgentError::UnexpectedEvent { ref event, .. }) if event == "message"));
        assert!(stream.next().await.is_none());
    }

    #[tokio::test]
    async fn test_polling_after_end_yields_none() {
        let raw = "event: streamed_tokens\ndata: {\"output_type\":\"streamed_tokens\",\"delta\":\"a\"}\n\n";

        let mut stream = dispatch_stream(read_server_sent_events(body(&[raw])));
        assert!(matches!(stream.next().await, Some(Ok(StreamOutput::StreamedTokens(_)))));
        for _ in 0..3 {
            assert!(stream.next().await.is_none());
        }
    }

    #[tokio::test]
    async fn test_polling_after_error_yields_none() {
        let raw = "event: error\ndata: {\"error\":{\"message\":\"X\",\"code\":\"Y\"}}\n\n\
                   event: streamed_tokens\ndata: {\"output_type\":\"streamed_tokens\",\"delta\":\"b\"}\n\n";

        let mut stream = dispatch_stream(read_server_sent_events(body(&[raw])));
        assert!(matches!(stream.next().await, Some(Err(QueryAgentError::Agent { .. }))));
        for _ in 0..3 {
            assert!(stream.next().await.is_none());
        }
    }
}
