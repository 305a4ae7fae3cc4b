//! Scripted transport for tests.
//!
//! [`Scripted`] replays queued turns in order and records every request it
//! receives, so tests can assert on what the generation loop sent.

use crate::model::{
    AssistantMessage, FinishReason, Message, Options, Response, Tool, ToolCall, Transport, Usage,
};
use anyhow::{Result, anyhow};
use compact_str::CompactString;
use std::{
    collections::VecDeque,
    sync::{Mutex, MutexGuard},
};

/// A request received by the scripted transport
#[derive(Debug, Clone)]
pub struct Recorded {
    /// The conversation sent
    pub messages: Vec<Message>,

    /// The names of the tools sent
    pub tools: Vec<CompactString>,

    /// The options sent
    pub options: Options,
}

/// A transport replaying scripted turns.
#[derive(Debug, Default)]
pub struct Scripted {
    turns: Mutex<VecDeque<Result<Response, String>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl Scripted {
    /// Create an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a turn
    pub fn then(self, response: Response) -> Self {
        lock(&self.turns).push_back(Ok(response));
        self
    }

    /// Queue a final text turn
    pub fn then_text(self, content: &str, usage: Usage) -> Self {
        self.then(Response::new(
            AssistantMessage::text(content),
            usage,
            FinishReason::Stop,
        ))
    }

    /// Queue a turn requesting tool calls
    pub fn then_tools(self, calls: impl IntoIterator<Item = ToolCall>, usage: Usage) -> Self {
        self.then(Response::new(
            AssistantMessage::tool_calls(calls),
            usage,
            FinishReason::ToolCalls,
        ))
    }

    /// Queue a transport failure
    pub fn then_fail(self, message: &str) -> Self {
        lock(&self.turns).push_back(Err(message.to_owned()));
        self
    }

    /// The requests received so far
    pub fn requests(&self) -> Vec<Recorded> {
        lock(&self.requests).clone()
    }

    /// The number of requests received so far
    pub fn calls(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl Transport for Scripted {
    async fn create_assistant_message(
        &self,
        messages: &[Message],
        tools: &[Tool],
        options: &Options,
    ) -> Result<Response> {
        lock(&self.requests).push(Recorded {
            messages: messages.to_vec(),
            tools: tools.iter().map(|tool| tool.name.clone()).collect(),
            options: options.clone(),
        });

        match lock(&self.turns).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("scripted transport has no turns left")),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
