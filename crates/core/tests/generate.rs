//! Tests for the generation loop.

use anyhow::bail;
use serde_json::Value;
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tern_core::{
    AssistantMessage, Error, FinishReason, Message, Options, Params, Response, Role, Tool,
    ToolCall, ToolResult, Usage, generate_text, testing::Scripted,
};

const USAGE: Usage = Usage {
    prompt_tokens: 15,
    completion_tokens: 38,
    total_tokens: 53,
};

fn weather_call() -> ToolCall {
    ToolCall::new("1", "get_current_weather", r#"{"location":"SF"}"#)
}

fn weather_tool() -> Tool {
    Tool::new(
        "get_current_weather",
        "Get the current weather in a given location",
        schemars::json_schema!({
            "type": "object",
            "properties": {
                "location": { "type": "string" },
                "unit": { "type": "string", "enum": ["celsius", "fahrenheit"] }
            },
            "required": ["location"],
        }),
        |_: Value| async move { Ok("42".to_owned()) },
    )
}

fn ask() -> Params {
    Params::new([Message::user("weather in SF?")])
}

#[tokio::test]
async fn single_step_returns_text() {
    let transport = Scripted::new().then_text("hello there", USAGE);
    let result = generate_text(&transport, ask()).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.text.as_deref(), Some("hello there"));
    assert_eq!(result.usage, USAGE);
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.steps.len(), 1);
    assert_eq!(result.messages.len(), 1);
    assert!(result.tool_calls.is_empty());
    assert!(result.tool_results.is_empty());
}

#[tokio::test]
async fn larger_budget_still_stops_on_text() {
    let transport = Scripted::new().then_text("done", USAGE);
    let result = generate_text(&transport, ask().with_max_steps(4))
        .await
        .unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.text.as_deref(), Some("done"));
    assert_eq!(result.steps.len(), 1);
}

#[tokio::test]
async fn weather_scenario() {
    let transport = Scripted::new()
        .then_tools([weather_call()], USAGE)
        .then_text("It is 42 degrees.", USAGE);
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(2);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(result.text.as_deref(), Some("It is 42 degrees."));
    assert_eq!(result.usage, Usage::new(30, 76, 106));
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.tool_calls, vec![weather_call()]);
    assert_eq!(
        result.tool_results,
        vec![ToolResult {
            id: "1".into(),
            name: "get_current_weather".into(),
            arguments: r#"{"location":"SF"}"#.into(),
            result: "42".into(),
        }]
    );
    assert_eq!(result.steps.len(), 2);

    let roles: Vec<_> = result.messages.iter().map(Message::role).collect();
    assert_eq!(roles, [Role::Assistant, Role::Tool, Role::Assistant]);
    assert_eq!(result.messages[1], Message::tool("42", "1"));
}

#[tokio::test]
async fn conversation_grows_between_steps() {
    let transport = Scripted::new()
        .then_tools([weather_call()], USAGE)
        .then_text("It is 42 degrees.", USAGE);
    let params = ask()
        .with_tools(vec![weather_tool()])
        .with_max_steps(3)
        .with_options(Options::default().temperature(0.2));
    generate_text(&transport, params).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].messages, vec![Message::user("weather in SF?")]);
    assert_eq!(
        requests[1].messages,
        vec![
            Message::user("weather in SF?"),
            Message::Assistant(AssistantMessage::tool_calls([weather_call()])),
            Message::tool("42", "1"),
        ]
    );
    assert!(requests.iter().all(|r| r.tools == ["get_current_weather"]));
    assert!(requests.iter().all(|r| r.options.temperature == Some(0.2)));
}

#[tokio::test]
async fn usage_sums_every_step() {
    let transport = Scripted::new()
        .then_tools([weather_call()], Usage::new(80, 22, 102))
        .then_text("done", Usage::new(15, 38, 53));
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(4);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(result.usage, Usage::new(95, 60, 155));
}

#[tokio::test]
async fn budget_exhaustion_returns_last_step() {
    let transport = Scripted::new()
        .then_tools([ToolCall::new("1", "get_current_weather", "{}")], USAGE)
        .then_tools([ToolCall::new("2", "get_current_weather", "{}")], USAGE)
        .then_tools([ToolCall::new("3", "get_current_weather", "{}")], USAGE)
        .then_text("never reached", USAGE);
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(3);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(transport.calls(), 3);
    assert_eq!(result.text, None);
    assert_eq!(result.finish_reason, FinishReason::ToolCalls);
    assert_eq!(result.steps.len(), 3);
    assert_eq!(result.tool_calls.len(), 3);
    assert_eq!(result.tool_results.len(), 3);
    assert_eq!(result.usage, Usage::new(45, 114, 159));
}

#[tokio::test]
async fn default_budget_stops_after_tool_calls() {
    let transport = Scripted::new().then_tools([weather_call()], USAGE);
    let params = ask().with_tools(vec![weather_tool()]);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.text, None);
    assert_eq!(result.finish_reason, FinishReason::ToolCalls);
    assert_eq!(result.tool_results.len(), 1);
    assert_eq!(result.messages.len(), 2);
}

#[tokio::test]
async fn zero_budget_makes_no_calls() {
    let transport = Scripted::new().then_text("hi", USAGE);
    let result = generate_text(&transport, ask().with_max_steps(0))
        .await
        .unwrap();

    assert_eq!(transport.calls(), 0);
    assert_eq!(result.text, None);
    assert_eq!(result.finish_reason, FinishReason::Stop);
    assert_eq!(result.usage, Usage::default());
    assert!(result.steps.is_empty());
    assert!(result.messages.is_empty());
    assert!(result.tool_calls.is_empty());
    assert!(result.tool_results.is_empty());
}

#[tokio::test]
async fn huge_usage_saturates() {
    let huge = Usage::new(u32::MAX, 1, u32::MAX);
    let transport = Scripted::new()
        .then_tools([weather_call()], huge)
        .then_text("done", huge);
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(2);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(result.usage, Usage::new(u32::MAX, 2, u32::MAX));
}

#[tokio::test]
async fn text_wins_over_tool_calls() {
    let both = AssistantMessage {
        content: Some("partial answer".into()),
        tool_calls: [weather_call()].into_iter().collect(),
    };
    let transport = Scripted::new()
        .then(Response::new(both, USAGE, FinishReason::Stop))
        .then_text("unused", USAGE);
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(4);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(transport.calls(), 1);
    assert_eq!(result.text.as_deref(), Some("partial answer"));
    // Tools of the final turn still run.
    assert_eq!(result.tool_results.len(), 1);
    assert_eq!(result.messages.len(), 2);
}

// Unknown tools do not abort the loop; the turn simply has no result.
#[tokio::test]
async fn unknown_tool_keeps_looping() {
    let transport = Scripted::new()
        .then_tools([ToolCall::new("1", "teleport", "{}")], USAGE)
        .then_text("cannot teleport", USAGE);
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(2);
    let result = generate_text(&transport, params).await.unwrap();

    assert_eq!(result.text.as_deref(), Some("cannot teleport"));
    assert_eq!(result.tool_calls.len(), 1);
    assert!(result.tool_results.is_empty());
    assert_eq!(result.messages.len(), 2);
}

#[tokio::test]
async fn empty_messages_fail_before_transport() {
    let err = generate_text(&(), Params::new([])).await.unwrap_err();
    assert!(matches!(err, Error::EmptyMessages));
    assert_eq!(err.to_string(), "messages cannot be empty");
}

#[tokio::test]
async fn transport_failure_aborts() {
    let transport = Scripted::new()
        .then_tools([weather_call()], USAGE)
        .then_fail("503 Service Unavailable");
    let params = ask().with_tools(vec![weather_tool()]).with_max_steps(4);
    let err = generate_text(&transport, params).await.unwrap_err();

    assert_eq!(transport.calls(), 2);
    match err {
        Error::Transport(source) => assert_eq!(source.to_string(), "503 Service Unavailable"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn tool_failure_aborts() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let flaky = Tool::new(
        "flaky",
        "Fails every time",
        schemars::json_schema!({ "type": "object" }),
        move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { bail!("disk full") }
        },
    );
    let transport = Scripted::new()
        .then_tools(
            [
                ToolCall::new("1", "flaky", "{}"),
                ToolCall::new("2", "flaky", "{}"),
            ],
            USAGE,
        )
        .then_text("unused", USAGE);
    let params = ask().with_tools(vec![flaky]).with_max_steps(4);
    let err = generate_text(&transport, params).await.unwrap_err();

    assert!(matches!(err, Error::Tool { ref name, .. } if name == "flaky"));
    assert_eq!(runs.load(Ordering::SeqCst), 1);
    assert_eq!(transport.calls(), 1);
}
