//! One-shot question command.

use crate::{config::Config, tools};
use anyhow::Result;
use clap::Args;
use tern::{Message, Params, generate_text, openai::Client};

/// Ask a one-shot question.
#[derive(Args, Debug)]
pub struct Ask {
    /// The question.
    pub prompt: String,

    /// Maximum number of model round trips.
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// System prompt override.
    #[arg(long)]
    pub system: Option<String>,

    /// Do not offer the built-in tools.
    #[arg(long)]
    pub no_tools: bool,

    /// Print token usage and the finish reason after the answer.
    #[arg(long)]
    pub usage: bool,
}

impl Ask {
    /// Build the generation inputs.
    pub fn params(&self, config: &Config) -> Params {
        let system = self.system.as_ref().or(config.system.as_ref());
        let messages = system
            .map(Message::system)
            .into_iter()
            .chain([Message::user(&self.prompt)]);
        let tools = if self.no_tools {
            Vec::new()
        } else {
            tools::builtin()
        };

        Params::new(messages)
            .with_tools(tools)
            .with_max_steps(self.max_steps.unwrap_or(config.max_steps))
            .with_options(config.options.clone())
    }

    /// Ask the question and print the answer.
    pub async fn run(self, config: &Config) -> Result<()> {
        let transport = config.provider.build(Client::new())?;
        let generation = generate_text(&transport, self.params(config)).await?;

        for result in &generation.tool_results {
            tracing::info!("{}({}) -> {}", result.name, result.arguments, result.result);
        }
        match &generation.text {
            Some(text) => println!("{text}"),
            None => eprintln!(
                "no answer after {} steps, raise --max-steps",
                generation.steps.len()
            ),
        }
        if self.usage {
            let usage = generation.usage;
            println!(
                "finish: {}, tokens: {} prompt + {} completion = {}",
                generation.finish_reason,
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            );
        }
        Ok(())
    }
}
