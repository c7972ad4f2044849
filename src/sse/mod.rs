//! Server-Sent Events transport for the query agent.
//!
//! # Module structure
//! - `events` - the framed [`ServerSentEvent`]
//! - `splitter` - blank-line framing of an accumulated text buffer
//! - `decoder` - incremental UTF-8 decoding of network chunks
//! - `reader` - turns a streamed response body into an [`EventStream`]

mod decoder;
mod events;
mod reader;
mod splitter;

pub use decoder::Utf8StreamDecoder;
pub use events::{ServerSentEvent, DEFAULT_EVENT_KIND};
pub use reader::{
    fetch_server_sent_events, read_server_sent_events, EventStream, SseRequest, EVENT_STREAM_MIME,
};
pub use splitter::{split_events, SplitOutcome};
