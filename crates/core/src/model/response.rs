//! Normalized transport responses

use crate::model::AssistantMessage;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

/// Request headers never kept in an [`Exchange`].
pub const SENSITIVE_HEADERS: [&str; 2] = ["authorization", "api-key"];

/// One normalized turn returned by a transport.
///
/// The generation loop keeps one of these per step.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Response {
    /// The assistant turn
    pub message: AssistantMessage,

    /// Token usage of this call
    pub usage: Usage,

    /// Why the model stopped
    pub finish_reason: FinishReason,

    /// The raw request and response, if the transport recorded them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange: Option<Exchange>,
}

impl Response {
    /// Create a new response
    pub fn new(message: AssistantMessage, usage: Usage, finish_reason: FinishReason) -> Self {
        Self {
            message,
            usage,
            finish_reason,
            exchange: None,
        }
    }

    /// Attach the raw exchange
    pub fn with_exchange(mut self, exchange: Exchange) -> Self {
        self.exchange = Some(exchange);
        self
    }
}

/// The reason the model stopped generating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    /// The model finished naturally
    Stop,

    /// The model hit the max token limit
    Length,

    /// Content was filtered
    ContentFilter,

    /// The model is waiting on tool calls
    ToolCalls,

    /// The provider reported an error
    Error,

    /// A reason this crate does not know about
    Other,

    /// The provider did not report a reason
    Unknown,
}

impl FinishReason {
    /// The normalized name of the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Length => "length",
            Self::ContentFilter => "content-filter",
            Self::ToolCalls => "tool-calls",
            Self::Error => "error",
            Self::Other => "other",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Usage {
    /// Number of tokens in the prompt
    pub prompt_tokens: u32,

    /// Number of tokens in the completion
    pub completion_tokens: u32,

    /// Total number of tokens used
    pub total_tokens: u32,
}

impl Usage {
    /// Create new usage counters
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// Counters saturate at `u32::MAX` instead of overflowing.
impl Add for Usage {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            prompt_tokens: self.prompt_tokens.saturating_add(rhs.prompt_tokens),
            completion_tokens: self.completion_tokens.saturating_add(rhs.completion_tokens),
            total_tokens: self.total_tokens.saturating_add(rhs.total_tokens),
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Usage {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// The raw HTTP request and response behind a turn
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Exchange {
    /// What was sent, with credentials removed
    pub request: Envelope,

    /// What came back
    pub response: Envelope,
}

/// A JSON body with its headers
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Envelope {
    /// The JSON body
    pub body: Value,

    /// The headers, keyed by lowercase name
    pub headers: BTreeMap<String, String>,
}

impl Envelope {
    /// Create an envelope, dropping [`SENSITIVE_HEADERS`]
    pub fn redacted<K, V>(body: Value, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let headers = headers
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_ascii_lowercase(), v.into()))
            .filter(|(k, _)| !SENSITIVE_HEADERS.contains(&k.as_str()))
            .collect();
        Self { body, headers }
    }
}
