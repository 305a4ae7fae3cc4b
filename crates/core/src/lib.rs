//! Core types and the tool-calling generation loop for tern.
//!
//! - [`model`]: messages, tools, responses and the [`Transport`] trait.
//! - [`generate_text`]: the bounded loop driving a transport and executing
//!   the tools the model asks for.
//! - [`execute_tool_calls`]: the tool executor used by the loop.

pub use {
    error::{Error, Result},
    executor::execute_tool_calls,
    generate::{DEFAULT_MAX_STEPS, Generation, Params, generate_text},
    model::{
        AssistantMessage, ContentPart, FinishReason, Message, Options, Response, Role, Tool,
        ToolCall, ToolResult, Transport, Usage,
    },
};

mod error;
mod executor;
mod generate;
pub mod model;
#[cfg(feature = "testing")]
pub mod testing;
