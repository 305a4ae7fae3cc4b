//! CLI argument parsing and subcommand dispatch.

use crate::{config::resolve_config, tools};
use anyhow::Result;
use clap::{Parser, Subcommand};
use compact_str::CompactString;
use std::path::PathBuf;

pub mod ask;
pub mod config;

/// Ask an LLM, letting it call local tools.
#[derive(Parser, Debug)]
#[command(name = "tern", about = "Ask an LLM, letting it call local tools")]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Path to the config file.
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Model name override.
    #[arg(long, global = true)]
    pub model: Option<CompactString>,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ask a one-shot question.
    Ask(ask::Ask),
    /// List the built-in tools.
    Tools,
    /// Manage configuration.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

/// Config management subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the resolved configuration file.
    Show,
    /// Print the resolved configuration path.
    Path,
    /// Write the default configuration.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Run the selected subcommand.
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Ask(ask) => {
                let mut config = resolve_config(self.config.as_deref())?;
                if let Some(model) = self.model {
                    config.provider.model = Some(model);
                }
                ask.run(&config).await
            }
            Command::Tools => {
                for tool in tools::builtin() {
                    println!("{}\t{}", tool.name, tool.description);
                }
                Ok(())
            }
            Command::Config { action } => config::run(&action, self.config.as_deref()),
        }
    }
}
