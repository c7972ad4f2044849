//! Blank-line event framing.
//!
//! Turns an append-only text buffer into complete [`ServerSentEvent`]s plus
//! whatever trailing text still belongs to an event in flight. Pure and
//! infallible: malformed framing simply yields fewer events.

use once_cell::sync::Lazy;
use regex::Regex;

use super::events::{ServerSentEvent, DEFAULT_EVENT_KIND};

/// Events are delimited by a blank line, with `\n` or `\r\n` line endings.
static EVENT_DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n\r?\n").expect("Invalid event delimiter regex"));

/// Result of one [`split_events`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitOutcome {
    /// Complete events, in the order their blocks appeared
    pub events: Vec<ServerSentEvent>,
    /// Unconsumed text to keep accumulating
    pub remainder: String,
}

/// Split `buffer` into complete events.
///
/// Unless `flush` is set, the last delimited segment is returned untouched as
/// the remainder because its terminating blank line may not have arrived yet.
/// With `flush` (end of stream) every segment is parsed and the remainder is
/// empty.
pub fn split_events(buffer: &str, flush: bool) -> SplitOutcome {
    let mut blocks: Vec<&str> = EVENT_DELIMITER.split(buffer).collect();

    let remainder = if flush {
        String::new()
    } else {
        blocks.pop().unwrap_or_default().to_string()
    };

    let events = blocks.into_iter().filter_map(parse_block).collect();

    SplitOutcome { events, remainder }
}

/// Parse a single event block. Blocks without data produce no event.
fn parse_block(block: &str) -> Option<ServerSentEvent> {
    let mut event = DEFAULT_EVENT_KIND.to_string();
    let mut data = String::new();

    for line in block.lines() {
        if let Some(kind) = line.strip_prefix("event:") {
            event = kind.trim().to_string();
        } else if let Some(payload) = line.strip_prefix("data:") {
            if !data.is_empty() {
                data.push('\n');
            }
            data.push_str(payload.trim());
        }
    }

    if data.is_empty() {
        None
    } else {
        Some(ServerSentEvent { event, data })
    }
}
