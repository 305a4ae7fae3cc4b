//! Unified LLM interface types and the transport trait.
//!
//! Provides the shared types used across all providers: `Message`,
//! `Response`, `Tool`, `Options`, and the `Transport` trait.

use anyhow::Result;
pub use message::{AssistantMessage, ContentPart, Message, Role, UserContent};
pub use options::Options;
pub use response::{Envelope, Exchange, FinishReason, Response, SENSITIVE_HEADERS, Usage};
use std::future::Future;
pub use tool::{Handler, Tool, ToolCall, ToolFuture, ToolResult};

mod message;
mod options;
mod response;
mod tool;

/// A transport producing the next assistant turn.
///
/// Implementations own the wire format and the network call. A non-success
/// reply is an error.
pub trait Transport: Send + Sync {
    /// Create the next assistant message for the conversation
    fn create_assistant_message(
        &self,
        messages: &[Message],
        tools: &[Tool],
        options: &Options,
    ) -> impl Future<Output = Result<Response>> + Send;
}

/// `()` as a no-op transport for testing (panics when called).
impl Transport for () {
    async fn create_assistant_message(
        &self,
        _messages: &[Message],
        _tools: &[Tool],
        _options: &Options,
    ) -> Result<Response> {
        panic!("no-op transport called, not intended for real LLM calls");
    }
}
