//! Chat message types, normalized at the HTTP boundary
//!
//! Clients send messages in one of three shapes:
//!
//! - `{"role": "user", "content": "text"}`
//! - `{"role": "user", "content": {"text": "text"}}`
//! - `{"role": "user", "parts": [{"type": "text", "text": "te"}, {"type": "text", "text": "xt"}]}`
//!
//! All of them deserialize into a single [`ChatMessage`]; anything else is
//! rejected during deserialization.

use serde::{Deserialize, Serialize};

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by the chat APIs
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A normalized chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireMessage")]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Wrapped { text: String },
}

#[derive(Deserialize)]
struct WirePart {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct WireMessage {
    role: Role,
    #[serde(default)]
    content: Option<WireContent>,
    #[serde(default)]
    parts: Option<Vec<WirePart>>,
}

impl TryFrom<WireMessage> for ChatMessage {
    type Error = String;

    fn try_from(wire: WireMessage) -> std::result::Result<Self, Self::Error> {
        // parts win over content when both are present
        let content = match (wire.parts, wire.content) {
            (Some(parts), _) => parts
                .into_iter()
                .filter(|part| part.kind == "text")
                .filter_map(|part| part.text)
                .collect::<String>(),
            (None, Some(WireContent::Text(text))) => text,
            (None, Some(WireContent::Wrapped { text })) => text,
            (None, None) => {
                return Err(format!(
                    "{} message has neither `content` nor `parts`",
                    wire.role.as_str()
                ))
            }
        };

        Ok(ChatMessage {
            role: wire.role,
            content,
        })
    }
}

/// Body of `POST /api/chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

impl ChatRequest {
    /// Check that there is something to answer
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.messages.is_empty() {
            return Err(crate::error::Error::invalid_request(
                "`messages` must contain at least one message",
            ));
        }
        Ok(())
    }

    /// The question to retrieve context for: the last message, when it is a
    /// non-blank user message. `None` means the conversation bypasses retrieval.
    pub fn question(&self) -> Option<&str> {
        self.messages
            .last()
            .filter(|m| m.role == Role::User)
            .map(|m| m.content.trim())
            .filter(|content| !content.is_empty())
    }
}
