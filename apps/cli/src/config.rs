//! Configuration resolution for the CLI.
//!
//! Resolves `config.toml` in priority order:
//! 1. `--config <path>` flag (explicit override)
//! 2. `{cwd}/.tern/config.toml` (workspace config)
//! 3. `~/.config/tern/config.toml` (global default)

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tern::{Options, ProviderConfig, openai::expand_env_vars};

/// Config directory name under the platform config dir.
pub const CONFIG_DIR: &str = "tern";

/// Config file name.
pub const CONFIG_FILE: &str = "config.toml";

/// Step budget used by `tern ask` when the config sets none.
pub const MAX_STEPS: usize = 4;

/// Config template written by `tern config init`.
pub const DEFAULT_CONFIG: &str = r#"max_steps = 4
system = "You are a helpful assistant. Be concise."

[provider]
kind = "openai"
model = "gpt-4o-mini"
api_key = "${OPENAI_API_KEY}"

[options]
temperature = 0.2
"#;

/// CLI configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The provider to talk to.
    pub provider: ProviderConfig,
    /// Generation options sent with every request.
    #[serde(default)]
    pub options: Options,
    /// Maximum number of model round trips per question.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
    /// System prompt prepended to every question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
}

fn default_max_steps() -> usize {
    MAX_STEPS
}

impl Config {
    /// Parse a configuration, expanding `${ENV_VAR}` first.
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(&expand_env_vars(input)).context("invalid config")
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("failed to load {}", path.display()))
    }
}

/// Resolve the config file path following the priority chain.
///
/// Falls back to the global path even when it does not exist.
pub fn resolve_config_path(flag: Option<&Path>) -> PathBuf {
    if let Some(path) = flag {
        return path.to_owned();
    }

    let workspace = Path::new(".tern").join(CONFIG_FILE);
    if workspace.exists() {
        return workspace;
    }

    global_config_path()
}

/// Resolve and load the configuration.
pub fn resolve_config(flag: Option<&Path>) -> Result<Config> {
    let path = resolve_config_path(flag);
    if !path.exists() {
        bail!(
            "no config file at {}, run `tern config init` to create one",
            path.display()
        );
    }
    tracing::debug!("loading config from {}", path.display());
    Config::load(&path)
}

/// Path to the global default config.
pub fn global_config_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join(CONFIG_DIR)
        .join(CONFIG_FILE)
}
