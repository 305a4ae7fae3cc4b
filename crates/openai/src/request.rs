//! Chat completions request body.
//!
//! Fields use `Option` + `skip_serializing_if` so anything the caller did not
//! set is simply absent on the wire.

use compact_str::CompactString;
use serde::Serialize;
use serde_json::{Value, json};
use tcore::model::{ContentPart, Message, Options, Tool, UserContent};

/// OpenAI-compatible chat completions request body.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    /// The messages to send.
    pub messages: Vec<Value>,
    /// The model identifier, omitted for Azure deployments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<CompactString>,
    /// Tools the model may call.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<Value>>,
    /// Maximum tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Top-p sampling.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    /// Stop sequences.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<Vec<String>>,
    /// Sampling seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Request {
    /// Build the body for one turn.
    pub fn new(
        model: Option<&str>,
        messages: &[Message],
        tools: &[Tool],
        options: &Options,
    ) -> Self {
        Self {
            messages: messages.iter().map(message).collect(),
            model: model.map(Into::into),
            tools: (!tools.is_empty()).then(|| tools.iter().map(tool).collect()),
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            top_p: options.top_p,
            frequency_penalty: options.frequency_penalty,
            presence_penalty: options.presence_penalty,
            stop: (!options.stop.is_empty()).then(|| options.stop.clone()),
            seed: options.seed,
        }
    }
}

/// Map a message to its wire shape.
pub fn message(message: &Message) -> Value {
    match message {
        Message::System { content } => json!({ "role": "system", "content": content }),
        Message::User {
            content: UserContent::Text(text),
        } => json!({ "role": "user", "content": text }),
        Message::User {
            content: UserContent::Parts(parts),
        } => json!({
            "role": "user",
            "content": parts.iter().map(part).collect::<Vec<_>>(),
        }),
        Message::Assistant(assistant) => {
            let mut wire = json!({ "role": "assistant", "content": assistant.content });
            if assistant.has_tool_calls() {
                wire["tool_calls"] = assistant
                    .tool_calls
                    .iter()
                    .map(|call| {
                        json!({
                            "id": call.id,
                            "type": "function",
                            "function": { "name": call.name, "arguments": call.arguments },
                        })
                    })
                    .collect();
            }
            wire
        }
        Message::Tool {
            content,
            tool_call_id,
        } => json!({ "role": "tool", "content": content, "tool_call_id": tool_call_id }),
    }
}

/// Map a tool definition to its wire shape.
pub fn tool(tool: &Tool) -> Value {
    let mut function = json!({
        "name": tool.name,
        "description": tool.description,
        "parameters": tool.parameters,
    });
    if tool.strict {
        function["strict"] = Value::Bool(true);
    }
    json!({ "type": "function", "function": function })
}

fn part(part: &ContentPart) -> Value {
    match part {
        ContentPart::Text { text } => json!({ "type": "text", "text": text }),
        ContentPart::Image { url, .. } => json!({ "type": "image_url", "image_url": { "url": url } }),
    }
}
