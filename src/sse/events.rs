//! SSE event type.

/// Kind assigned to a block that carries no `event:` line.
pub const DEFAULT_EVENT_KIND: &str = "message";

/// One framed Server-Sent Event.
///
/// Only the `event` and `data` fields of the SSE format are kept; `id:` and
/// `retry:` lines are dropped during splitting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSentEvent {
    /// Event kind label, `"message"` when the block had no `event:` line
    pub event: String,
    /// Payload; multiple `data:` lines are joined with `\n`
    pub data: String,
}

impl ServerSentEvent {
    pub fn new(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            data: data.into(),
        }
    }
}
