//! Conversation messages

use crate::model::ToolCall;
use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A message in the conversation.
///
/// The conversation is an ordered, append-only list of these and is replayed
/// verbatim to the transport on every step.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// Instructions for the model
    System {
        /// The system prompt
        content: String,
    },

    /// Input from the user
    User {
        /// Plain text or a list of content parts
        content: UserContent,
    },

    /// A turn produced by the model
    Assistant(AssistantMessage),

    /// The result of a tool call, fed back to the model
    Tool {
        /// The tool output
        content: String,

        /// The id of the tool call this result answers
        tool_call_id: CompactString,
    },
}

impl Message {
    /// Create a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: UserContent::Text(content.into()),
        }
    }

    /// Create a new user message from content parts
    pub fn user_parts(parts: impl IntoIterator<Item = ContentPart>) -> Self {
        Self::User {
            content: UserContent::Parts(parts.into_iter().collect()),
        }
    }

    /// Create a new tool message
    pub fn tool(content: impl Into<String>, call: impl Into<CompactString>) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: call.into(),
        }
    }

    /// The role of the message
    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant(_) => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    /// Get the assistant turn if this is one
    pub fn as_assistant(&self) -> Option<&AssistantMessage> {
        match self {
            Self::Assistant(message) => Some(message),
            _ => None,
        }
    }
}

impl From<AssistantMessage> for Message {
    fn from(message: AssistantMessage) -> Self {
        Self::Assistant(message)
    }
}

/// A turn produced by the model.
///
/// Carries either final text or tool-call requests. Providers are not
/// expected to return both, but if they do the text takes priority when
/// the generation loop decides whether to stop.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AssistantMessage {
    /// The text of the turn, `None` when the model asked for tools instead
    pub content: Option<String>,

    /// The tool calls requested by the model
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub tool_calls: SmallVec<[ToolCall; 4]>,
}

impl AssistantMessage {
    /// Create a text-only assistant turn
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            tool_calls: SmallVec::new(),
        }
    }

    /// Create an assistant turn requesting tool calls
    pub fn tool_calls(calls: impl IntoIterator<Item = ToolCall>) -> Self {
        Self {
            content: None,
            tool_calls: calls.into_iter().collect(),
        }
    }

    /// Whether the turn requests any tool calls
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// The content of a user message
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UserContent {
    /// Plain text
    Text(String),

    /// A list of text and image parts
    Parts(Vec<ContentPart>),
}

/// A part of a multi-part user message
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// A text segment
    Text {
        /// The text
        text: String,
    },

    /// An image, referenced by URL or data URI
    Image {
        /// The image URL
        url: String,

        /// The MIME type of the image, if known
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
    },
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Create an image part
    pub fn image(url: impl Into<String>) -> Self {
        Self::Image {
            url: url.into(),
            mime_type: None,
        }
    }
}

/// The role of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The system role
    System,
    /// The user role
    User,
    /// The assistant role
    Assistant,
    /// The tool role
    Tool,
}

impl Role {
    /// The wire name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        }
    }
}
