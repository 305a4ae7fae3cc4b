//! Tools the model may call

use crate::model::Message;
use anyhow::Result;
use compact_str::CompactString;
use schemars::{JsonSchema, Schema};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{fmt, future::Future, pin::Pin, sync::Arc};

/// A boxed tool output future.
pub type ToolFuture = Pin<Box<dyn Future<Output = Result<String>> + Send>>;

/// A type-erased async tool handler.
pub type Handler = Arc<dyn Fn(Value) -> ToolFuture + Send + Sync>;

/// A tool the model may call.
///
/// Tools are looked up by exact name. The parameter schema is only used to
/// describe the tool to the provider, arguments are never validated against
/// it here.
#[derive(Clone)]
pub struct Tool {
    /// The name of the tool
    pub name: CompactString,

    /// The description of the tool
    pub description: String,

    /// The parameters of the tool
    pub parameters: Schema,

    /// Whether the provider should strictly validate the parameters
    pub strict: bool,

    /// The handler executing the tool
    handler: Handler,
}

impl Tool {
    /// Create a new tool from a schema and a handler over raw JSON arguments
    pub fn new<F, Fut>(
        name: impl Into<CompactString>,
        description: impl Into<String>,
        parameters: Schema,
        handler: F,
    ) -> Self
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            strict: false,
            handler: Arc::new(move |args| -> ToolFuture { Box::pin(handler(args)) }),
        }
    }

    /// Create a strict tool whose schema is derived from `P`.
    ///
    /// The parsed arguments are deserialized into `P` before the handler
    /// runs. Arguments that parse as JSON but do not fit `P` fail the tool.
    ///
    /// Strict providers expect every property to be required and unknown
    /// fields to be denied, so `P` should use `#[serde(deny_unknown_fields)]`
    /// and avoid `#[serde(default)]` fields.
    pub fn typed<P, F, Fut>(
        name: impl Into<CompactString>,
        description: impl Into<String>,
        handler: F,
    ) -> Self
    where
        P: JsonSchema + DeserializeOwned + Send + 'static,
        F: Fn(P) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<String>> + Send + 'static,
    {
        let mut parameters = schemars::schema_for!(P);
        parameters.remove("$schema");
        parameters.remove("title");

        let handler = Arc::new(handler);
        let tool = Self::new(name, description, parameters, move |args| {
            let handler = handler.clone();
            async move {
                let params: P = serde_json::from_value(args)?;
                handler(params).await
            }
        });
        tool.strict(true)
    }

    /// Set whether the provider should strictly validate the parameters
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Run the tool with parsed arguments
    pub fn execute(&self, args: Value) -> ToolFuture {
        (self.handler)(args)
    }
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("strict", &self.strict)
            .finish_non_exhaustive()
    }
}

/// A tool call requested by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolCall {
    /// The id correlating the call with its result
    pub id: CompactString,

    /// The name of the tool to call
    pub name: CompactString,

    /// The arguments to pass to the tool (JSON string)
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<CompactString>,
        name: impl Into<CompactString>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// The outcome of a tool call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ToolResult {
    /// The id of the originating tool call
    pub id: CompactString,

    /// The name of the tool
    pub name: CompactString,

    /// The arguments of the originating tool call
    pub arguments: String,

    /// The output of the tool
    pub result: String,
}

impl ToolResult {
    /// Answer a tool call with the given output
    pub fn new(call: &ToolCall, result: impl Into<String>) -> Self {
        Self {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
            result: result.into(),
        }
    }

    /// The tool message feeding this result back to the model
    pub fn message(&self) -> Message {
        Message::tool(self.result.clone(), self.id.clone())
    }
}
