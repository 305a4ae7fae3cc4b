//! The tool-calling generation loop.
//!
//! [`generate_text`] asks the transport for assistant turns until one carries
//! text or the step budget runs out. Tool calls requested along the way are
//! executed and their results appended to the conversation before the next
//! step.

use crate::{
    Error, Result,
    executor::execute_tool_calls,
    model::{FinishReason, Message, Options, Response, Tool, ToolCall, ToolResult, Transport, Usage},
};

/// The step budget used when none is given.
pub const DEFAULT_MAX_STEPS: usize = 1;

/// Inputs of a generation call
#[derive(Debug, Clone)]
pub struct Params {
    /// The initial conversation, must not be empty
    pub messages: Vec<Message>,

    /// The tools the model may call
    pub tools: Vec<Tool>,

    /// The maximum number of transport round-trips
    pub max_steps: usize,

    /// Options passed through to the transport
    pub options: Options,
}

impl Params {
    /// Create new params for the given conversation
    pub fn new(messages: impl IntoIterator<Item = Message>) -> Self {
        Self {
            messages: messages.into_iter().collect(),
            tools: Vec::new(),
            max_steps: DEFAULT_MAX_STEPS,
            options: Options::default(),
        }
    }

    /// Set the tools the model may call
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Set the step budget
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the transport options
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }
}

/// The aggregated outcome of a generation call
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// The final text, `None` if the budget ran out on tool calls
    pub text: Option<String>,

    /// Usage summed over every step
    pub usage: Usage,

    /// The finish reason of the last step
    pub finish_reason: FinishReason,

    /// Every tool call requested, in step then request order
    pub tool_calls: Vec<ToolCall>,

    /// Every tool result produced, in step then request order
    pub tool_results: Vec<ToolResult>,

    /// One record per transport round-trip
    pub steps: Vec<Response>,

    /// The messages produced by this call, excluding the initial ones
    pub messages: Vec<Message>,
}

/// Run the generation loop against a transport.
///
/// A `max_steps` of zero makes no transport call and reports an empty
/// [`FinishReason::Stop`] generation. The loop stops at the first
/// turn carrying text, even if that turn also requested tools. Running out
/// of steps is not an error: the last turn is reported as is and callers
/// tell the two apart by [`Generation::finish_reason`].
pub async fn generate_text<T: Transport>(transport: &T, params: Params) -> Result<Generation> {
    let Params {
        messages,
        tools,
        max_steps,
        options,
    } = params;
    if messages.is_empty() {
        return Err(Error::EmptyMessages);
    }

    let initial = messages.len();
    let mut conversation = messages;
    let mut steps: Vec<Response> = Vec::new();
    let mut tool_results: Vec<ToolResult> = Vec::new();

    for step in 0..max_steps {
        let response = transport
            .create_assistant_message(&conversation, &tools, &options)
            .await
            .map_err(Error::Transport)?;
        tracing::debug!(
            step,
            finish_reason = %response.finish_reason,
            tool_calls = response.message.tool_calls.len(),
            "received assistant turn"
        );

        conversation.push(Message::Assistant(response.message.clone()));
        if response.message.has_tool_calls() {
            let results = execute_tool_calls(&response.message, &tools).await?;
            conversation.extend(results.iter().map(ToolResult::message));
            tool_results.extend(results);
        }

        let done = response.message.content.is_some();
        steps.push(response);
        if done {
            break;
        }
    }

    // The loop stops on the first turn with text, so the last step holds
    // the result either way. No steps at all means a zero budget.
    let (text, finish_reason) = steps
        .last()
        .map(|last| (last.message.content.clone(), last.finish_reason))
        .unwrap_or((None, FinishReason::Stop));
    if text.is_none() {
        tracing::warn!(max_steps, %finish_reason, "step budget exhausted without text");
    }

    let usage = steps.iter().map(|step| step.usage).sum();
    let tool_calls = steps
        .iter()
        .flat_map(|step| step.message.tool_calls.iter().cloned())
        .collect();

    Ok(Generation {
        text,
        usage,
        finish_reason,
        tool_calls,
        tool_results,
        messages: conversation.split_off(initial),
        steps,
    })
}
