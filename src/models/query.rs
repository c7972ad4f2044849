use serde::{Deserialize, Serialize, Serializer};

/// Speaker of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of a conversation sent as query context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// What the agent is asked: a single question or a whole conversation.
///
/// On the wire a question is a bare string and a conversation is
/// `{"messages": [...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryAgentQuery {
    Text(String),
    Conversation(Vec<ChatMessage>),
}

#[derive(Serialize)]
#[serde(untagged)]
enum WireQuery<'a> {
    Text(&'a str),
    Conversation { messages: &'a [ChatMessage] },
}

impl Serialize for QueryAgentQuery {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            QueryAgentQuery::Text(text) => WireQuery::Text(text),
            QueryAgentQuery::Conversation(messages) => WireQuery::Conversation { messages },
        };
        wire.serialize(serializer)
    }
}

impl From<&str> for QueryAgentQuery {
    fn from(text: &str) -> Self {
        QueryAgentQuery::Text(text.to_string())
    }
}

impl From<String> for QueryAgentQuery {
    fn from(text: String) -> Self {
        QueryAgentQuery::Text(text)
    }
}

impl From<Vec<ChatMessage>> for QueryAgentQuery {
    fn from(messages: Vec<ChatMessage>) -> Self {
        QueryAgentQuery::Conversation(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_query_is_bare_string() {
        let query = QueryAgentQuery::from("What is the capital of France?");
        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!("What is the capital of France?")
        );
    }

    #[test]
    fn test_conversation_query_wraps_messages() {
        let query = QueryAgentQuery::from(vec![
            ChatMessage::user("Find red shoes"),
            ChatMessage::assistant("Here are three pairs."),
            ChatMessage::user("Only size 42"),
        ]);

        assert_eq!(
            serde_json::to_value(&query).unwrap(),
            json!({
                "messages": [
                    {"role": "user", "content": "Find red shoes"},
                    {"role": "assistant", "content": "Here are three pairs."},
                    {"role": "user", "content": "Only size 42"}
                ]
            })
        );
    }
}
