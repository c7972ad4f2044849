//! Byte stream to event stream.
//!
//! The reader is lazy: nothing goes over the network until the first event is
//! pulled. It reads one chunk at a time and only after every event extracted
//! from the previous chunk has been handed out, so the consumer sets the
//! pace. Dropping the stream drops the response body and with it the
//! connection.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use futures_util::stream;
use futures_util::StreamExt;

use super::decoder::Utf8StreamDecoder;
use super::events::ServerSentEvent;
use super::splitter::split_events;
use crate::error::{QueryAgentError, QueryAgentResult};
use crate::traits::{ByteStream, Headers, HttpClient, HttpError};

pub const EVENT_STREAM_MIME: &str = "text/event-stream";

/// Lazily produced, single-pass sequence of events.
pub type EventStream = Pin<Box<dyn Stream<Item = QueryAgentResult<ServerSentEvent>> + Send>>;

/// A POST whose response is consumed as an event stream.
#[derive(Debug, Clone)]
pub struct SseRequest {
    pub url: String,
    pub headers: Headers,
    pub body: String,
}

impl SseRequest {
    /// Build the request. Any caller-supplied `Accept` header, whatever its
    /// casing, is replaced by `Accept: text/event-stream`.
    pub fn new(url: impl Into<String>, mut headers: Headers, body: impl Into<String>) -> Self {
        headers.retain(|name, _| !name.eq_ignore_ascii_case("accept"));
        headers.insert("Accept".to_string(), EVENT_STREAM_MIME.to_string());
        Self {
            url: url.into(),
            headers,
            body: body.into(),
        }
    }
}

enum ReaderState {
    Connecting {
        client: Arc<dyn HttpClient>,
        request: SseRequest,
    },
    Reading(BodyReader),
    Finished,
}

/// Owns the body and the text accumulated from it.
///
/// `buffer` never holds more than one incomplete trailing event.
struct BodyReader {
    body: ByteStream,
    decoder: Utf8StreamDecoder,
    buffer: String,
    ready: VecDeque<ServerSentEvent>,
    exhausted: bool,
}

impl BodyReader {
    fn new(body: ByteStream) -> Self {
        Self {
            body,
            decoder: Utf8StreamDecoder::new(),
            buffer: String::new(),
            ready: VecDeque::new(),
            exhausted: false,
        }
    }

    fn extract(&mut self, text: &str, flush: bool) {
        self.buffer.push_str(text);
        let outcome = split_events(&self.buffer, flush);
        for event in &outcome.events {
            tracing::debug!(kind = %event.event, bytes = event.data.len(), "SSE event received");
        }
        self.ready.extend(outcome.events);
        self.buffer = outcome.remainder;
    }
}

/// Issue `request` on first poll and stream its events.
///
/// A failing status surfaces as a single [`QueryAgentError::StreamTransport`]
/// carrying the response text, with no events before it.
pub fn fetch_server_sent_events(client: Arc<dyn HttpClient>, request: SseRequest) -> EventStream {
    into_event_stream(ReaderState::Connecting { client, request })
}

/// Stream the events of an already opened response body.
pub fn read_server_sent_events(body: ByteStream) -> EventStream {
    into_event_stream(ReaderState::Reading(BodyReader::new(body)))
}

fn into_event_stream(state: ReaderState) -> EventStream {
    Box::pin(stream::unfold(state, next_event).fuse())
}

async fn next_event(
    state: ReaderState,
) -> Option<(QueryAgentResult<ServerSentEvent>, ReaderState)> {
    let mut reader = match state {
        ReaderState::Connecting { client, request } => {
            tracing::debug!(url = %request.url, "Opening event stream");
            match client
                .post_stream(&request.url, &request.body, &request.headers)
                .await
            {
                Ok(body) => BodyReader::new(body),
                Err(err) => return Some((Err(transport_error(err)), ReaderState::Finished)),
            }
        }
        ReaderState::Reading(reader) => reader,
        ReaderState::Finished => return None,
    };

    loop {
        if let Some(event) = reader.ready.pop_front() {
            return Some((Ok(event), ReaderState::Reading(reader)));
        }
        if reader.exhausted {
            return None;
        }

        match reader.body.next().await {
            Some(Ok(chunk)) => {
                let text = reader.decoder.decode(&chunk);
                reader.extract(&text, false);
            }
            Some(Err(err)) => {
                tracing::warn!(error = %err, "Event stream broke off");
                return Some((Err(transport_error(err)), ReaderState::Finished));
            }
            None => {
                let tail = reader.decoder.finish();
                reader.extract(&tail, true);
                reader.exhausted = true;
            }
        }
    }
}

fn transport_error(err: HttpError) -> QueryAgentError {
    match err {
        HttpError::ServerError { message, .. } => QueryAgentError::StreamTransport(message),
        other => QueryAgentError::StreamTransport(other.to_string()),
    }
}
