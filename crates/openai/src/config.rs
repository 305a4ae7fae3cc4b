//! Provider configuration loaded from TOML.

use crate::{HttpProvider, OpenAI, endpoint};
use anyhow::{Context, Result, bail};
use compact_str::CompactString;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Supported provider kinds.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI API (default).
    #[default]
    #[serde(rename = "openai")]
    OpenAI,
    /// Azure OpenAI, addressed by resource endpoint and deployment, or by an
    /// explicit base URL.
    Azure,
    /// Ollama local API, no key required.
    Ollama,
    /// Any other OpenAI-compatible endpoint, `base_url` required.
    Custom,
}

/// Provider configuration.
///
/// String values support `${ENV_VAR}` expansion when loaded through
/// [`ProviderConfig::from_toml`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Which provider to use.
    #[serde(default)]
    pub kind: ProviderKind,
    /// Model identifier, sent as `model` in every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<CompactString>,
    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Full chat completions URL (openai, ollama, custom), or the Azure base
    /// URL that `/chat/completions` is appended to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Azure resource endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Azure deployment name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment: Option<String>,
    /// Azure API version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    /// Extra request headers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl ProviderConfig {
    /// Parse a provider configuration, expanding `${ENV_VAR}` first.
    pub fn from_toml(input: &str) -> Result<Self> {
        toml::from_str(&expand_env_vars(input)).context("invalid provider config")
    }

    /// Construct the transport described by this configuration.
    pub fn build(&self, client: Client) -> Result<OpenAI> {
        let api_key = self.api_key.as_deref();
        let base_url = self.base_url.as_deref();
        let api_version = self.api_version.as_deref();

        let transport = match self.kind {
            ProviderKind::OpenAI => {
                let key = api_key.context("api_key is required for openai")?;
                OpenAI::custom(client, key, base_url.unwrap_or(endpoint::OPENAI))?
            }
            ProviderKind::Ollama => match base_url {
                Some(url) => OpenAI::from(HttpProvider::no_auth(client, url)),
                None => OpenAI::ollama(client),
            },
            ProviderKind::Custom => {
                let url = base_url.context("base_url is required for custom providers")?;
                match api_key {
                    Some(key) => OpenAI::custom(client, key, url)?,
                    None => OpenAI::from(HttpProvider::no_auth(client, url)),
                }
            }
            ProviderKind::Azure => match (base_url, &self.endpoint, &self.deployment) {
                (Some(url), _, _) => {
                    let key = api_key.map(|key| ("api-key", key));
                    OpenAI::azure_url(client, url, key, api_version)?
                }
                (None, Some(resource), Some(deployment)) => {
                    let key = api_key.context("api_key is required for azure")?;
                    OpenAI::azure(client, key, resource, deployment, api_version)?
                }
                _ => bail!("azure requires either base_url, or endpoint and deployment"),
            },
        };

        let transport = self
            .headers
            .iter()
            .try_fold(transport, |transport, (name, value)| {
                transport.with_header(name, value)
            })?;
        Ok(match &self.model {
            Some(model) => transport.with_model(model.clone()),
            None => transport,
        })
    }
}

/// Expand `${VAR}` patterns in a string with environment variable values.
///
/// Unknown variables are replaced with an empty string.
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            chars.next();
            let name: String = chars.by_ref().take_while(|c| *c != '}').collect();
            if let Ok(value) = std::env::var(&name) {
                result.push_str(&value);
            }
        } else {
            result.push(ch);
        }
    }

    result
}
