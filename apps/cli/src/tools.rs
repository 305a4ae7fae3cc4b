//! Built-in tools offered to the model by `tern ask`.

use anyhow::{Context, Result, bail};
use chrono::{FixedOffset, Utc};
use schemars::JsonSchema;
use serde::Deserialize;
use tern::Tool;

/// Arguments of `current_time`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CurrentTime {
    /// Offset from UTC in minutes, e.g. `-420` for UTC-7 or `0` for UTC.
    pub utc_offset_minutes: i32,
}

/// An arithmetic operator.
#[derive(Debug, Clone, Copy, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`, failing when `b` is zero
    Divide,
}

/// Arguments of `calculate`.
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Calculate {
    /// The left operand.
    pub a: f64,
    /// The operator.
    pub op: Operator,
    /// The right operand.
    pub b: f64,
}

/// All built-in tools.
pub fn builtin() -> Vec<Tool> {
    vec![current_time(), calculate()]
}

/// Report the current date and time at a fixed UTC offset.
pub fn current_time() -> Tool {
    Tool::typed(
        "current_time",
        "Get the current date and time as RFC 3339 at the given UTC offset",
        |args: CurrentTime| async move { now(args.utc_offset_minutes) },
    )
}

/// Evaluate a single arithmetic operation.
pub fn calculate() -> Tool {
    Tool::typed(
        "calculate",
        "Apply an arithmetic operator to two numbers",
        |args: Calculate| async move { Ok(evaluate(args.a, args.op, args.b)?.to_string()) },
    )
}

fn now(utc_offset_minutes: i32) -> Result<String> {
    let offset = utc_offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .with_context(|| format!("utc offset out of range: {utc_offset_minutes} minutes"))?;
    Ok(Utc::now().with_timezone(&offset).to_rfc3339())
}

fn evaluate(a: f64, op: Operator, b: f64) -> Result<f64> {
    let value = match op {
        Operator::Add => a + b,
        Operator::Subtract => a - b,
        Operator::Multiply => a * b,
        Operator::Divide if b == 0.0 => bail!("division by zero"),
        Operator::Divide => a / b,
    };
    if !value.is_finite() {
        bail!("result is not a finite number");
    }
    Ok(value)
}
