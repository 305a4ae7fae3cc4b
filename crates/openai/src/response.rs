//! Chat completions response body.

use anyhow::{Result, bail};
use compact_str::CompactString;
use serde::Deserialize;
use tcore::model::{AssistantMessage, FinishReason, Response, ToolCall, Usage};

/// OpenAI-compatible chat completions response body.
#[derive(Debug, Clone, Deserialize)]
pub struct Completion {
    /// The generated choices, only the first one is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
    /// Token usage, absent on some compatible servers.
    #[serde(default)]
    pub usage: Option<WireUsage>,
}

/// A single completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    /// The generated message.
    pub message: ChoiceMessage,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// The assistant message of a choice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChoiceMessage {
    /// The text content.
    #[serde(default)]
    pub content: Option<String>,
    /// Requested tool calls, `null` or absent when none.
    #[serde(default)]
    pub tool_calls: Option<Vec<WireToolCall>>,
}

/// A tool call as sent by the endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WireToolCall {
    /// The call id.
    pub id: CompactString,
    /// The function being called.
    pub function: WireFunction,
}

/// The function part of a tool call.
#[derive(Debug, Clone, Deserialize)]
pub struct WireFunction {
    /// The tool name.
    pub name: CompactString,
    /// The JSON-encoded arguments.
    #[serde(default)]
    pub arguments: String,
}

/// Token usage as sent by the endpoint.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(default)]
pub struct WireUsage {
    /// Tokens in the prompt.
    pub prompt_tokens: u32,
    /// Tokens in the completion.
    pub completion_tokens: u32,
    /// Total tokens used.
    pub total_tokens: u32,
}

impl Completion {
    /// Convert into a turn response.
    pub fn into_response(self) -> Result<Response> {
        let Some(choice) = self.choices.into_iter().next() else {
            bail!("chat completion returned no choices");
        };

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|call| ToolCall::new(call.id, call.function.name, call.function.arguments))
            .collect::<Vec<_>>();
        let content = choice
            .message
            .content
            .filter(|text| tool_calls.is_empty() || !text.is_empty());

        let message = AssistantMessage {
            content,
            tool_calls: tool_calls.into_iter().collect(),
        };
        let usage = self.usage.unwrap_or_default();
        Ok(Response::new(
            message,
            Usage::new(usage.prompt_tokens, usage.completion_tokens, usage.total_tokens),
            finish_reason(choice.finish_reason.as_deref()),
        ))
    }
}

/// Map a wire finish reason.
pub fn finish_reason(reason: Option<&str>) -> FinishReason {
    match reason {
        Some("stop") => FinishReason::Stop,
        Some("length") => FinishReason::Length,
        Some("content_filter") => FinishReason::ContentFilter,
        Some("tool_calls" | "function_call") => FinishReason::ToolCalls,
        Some(_) => FinishReason::Other,
        None => FinishReason::Unknown,
    }
}
