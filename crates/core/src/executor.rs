//! Tool call execution.
//!
//! Runs the tool calls of an assistant turn one at a time, in request order.
//! Calls naming an unknown tool, or carrying arguments that are not valid
//! JSON, are skipped without a result so a single bad call never aborts the
//! turn. Errors raised by a tool itself are propagated.

use crate::{
    Error, Result,
    model::{AssistantMessage, Tool, ToolResult},
};
use serde_json::Value;

/// Execute the tool calls requested by an assistant turn.
pub async fn execute_tool_calls(
    message: &AssistantMessage,
    tools: &[Tool],
) -> Result<Vec<ToolResult>> {
    let mut results = Vec::with_capacity(message.tool_calls.len());
    for call in &message.tool_calls {
        let Some(tool) = tools.iter().find(|tool| tool.name == call.name) else {
            tracing::warn!(id = %call.id, name = %call.name, "skipping call to unknown tool");
            continue;
        };

        let args = match serde_json::from_str::<Value>(&call.arguments) {
            Ok(args) => args,
            Err(e) => {
                tracing::warn!(id = %call.id, name = %call.name, "skipping malformed arguments: {e}");
                continue;
            }
        };

        tracing::debug!(id = %call.id, name = %call.name, "executing tool");
        let output = tool.execute(args).await.map_err(|source| Error::Tool {
            name: call.name.clone(),
            source,
        })?;
        results.push(ToolResult::new(call, output));
    }

    Ok(results)
}
