//! tern: LLM completion with a bounded tool-calling loop.
//!
//! This is the umbrella crate that re-exports the core types and the
//! OpenAI-compatible transport.

pub use openai::{self, OpenAI, ProviderConfig, ProviderKind};
pub use tcore::{
    self, AssistantMessage, ContentPart, DEFAULT_MAX_STEPS, Error, FinishReason, Generation,
    Message, Options, Params, Response, Result, Role, Tool, ToolCall, ToolResult, Transport,
    Usage, execute_tool_calls, generate_text,
};
