//! tern CLI: ask an LLM one-shot questions, letting it call a few local
//! tools along the way.

pub use cmd::{Cli, Command};

pub mod cmd;
pub mod config;
pub mod tools;
