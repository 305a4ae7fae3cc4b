//! OpenAI-compatible transport for tern.
//!
//! Covers OpenAI, Azure OpenAI, Ollama and any other service exposing the
//! chat completions API. [`ProviderConfig`] builds an [`OpenAI`] transport
//! from TOML.

use anyhow::Result;
use compact_str::CompactString;
pub use config::{ProviderConfig, ProviderKind, expand_env_vars};
pub use http::{HttpError, HttpProvider};
pub use request::Request;
pub use reqwest::{self, Client};
pub use response::{Completion, finish_reason};
use tcore::model::{Message, Options, Response, Tool, Transport};

pub mod config;
mod http;
pub mod request;
pub mod response;

/// Chat completions endpoint URLs.
pub mod endpoint {
    /// OpenAI chat completions.
    pub const OPENAI: &str = "https://api.openai.com/v1/chat/completions";
    /// Ollama local chat completions.
    pub const OLLAMA: &str = "http://localhost:11434/v1/chat/completions";
    /// Default Azure OpenAI API version.
    pub const AZURE_API_VERSION: &str = "2025-01-01-preview";
}

/// An OpenAI-compatible transport.
#[derive(Clone, Debug)]
pub struct OpenAI {
    http: HttpProvider,
    model: Option<CompactString>,
}

impl OpenAI {
    /// Create a transport targeting the OpenAI API.
    pub fn api(client: Client, key: &str) -> Result<Self> {
        Self::custom(client, key, endpoint::OPENAI)
    }

    /// Create a transport targeting a local Ollama instance (no API key).
    pub fn ollama(client: Client) -> Self {
        Self::from(HttpProvider::no_auth(client, endpoint::OLLAMA))
    }

    /// Create a transport targeting a custom OpenAI-compatible endpoint.
    pub fn custom(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        HttpProvider::bearer(client, key, endpoint).map(Self::from)
    }

    /// Create a transport targeting an Azure OpenAI deployment.
    ///
    /// `endpoint` is the resource URL, e.g. `https://my-resource.openai.azure.com`.
    pub fn azure(
        client: Client,
        key: &str,
        endpoint: &str,
        deployment: &str,
        api_version: Option<&str>,
    ) -> Result<Self> {
        let url = format!(
            "{}/openai/deployments/{deployment}/chat/completions?api-version={}",
            endpoint.trim_end_matches('/'),
            api_version.unwrap_or(endpoint::AZURE_API_VERSION),
        );
        HttpProvider::custom_header(client, "api-key", key, &url).map(Self::from)
    }

    /// Create a transport targeting an Azure-style base URL with caller
    /// supplied headers, e.g. behind a gateway.
    pub fn azure_url<'h>(
        client: Client,
        url: &str,
        headers: impl IntoIterator<Item = (&'h str, &'h str)>,
        api_version: Option<&str>,
    ) -> Result<Self> {
        let url = format!(
            "{}/chat/completions?api-version={}",
            url.trim_end_matches('/'),
            api_version.unwrap_or(endpoint::AZURE_API_VERSION),
        );
        HttpProvider::no_auth(client, &url)
            .with_headers(headers)
            .map(Self::from)
    }

    /// Set the model sent with every request.
    pub fn with_model(mut self, model: impl Into<CompactString>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Add or replace a request header.
    pub fn with_header(self, name: &str, value: &str) -> Result<Self> {
        Ok(Self {
            http: self.http.with_header(name, value)?,
            ..self
        })
    }

    /// The configured model, if any.
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// The HTTP transport.
    pub fn http(&self) -> &HttpProvider {
        &self.http
    }

    /// The chat completions URL.
    pub fn endpoint(&self) -> &str {
        self.http.endpoint()
    }
}

impl From<HttpProvider> for OpenAI {
    fn from(http: HttpProvider) -> Self {
        Self { http, model: None }
    }
}

impl Transport for OpenAI {
    async fn create_assistant_message(
        &self,
        messages: &[Message],
        tools: &[Tool],
        options: &Options,
    ) -> Result<Response> {
        let body = Request::new(self.model(), messages, tools, options);
        let (data, exchange) = self.http.send(&body).await?;
        let completion: Completion = serde_json::from_value(data)?;
        Ok(completion.into_response()?.with_exchange(exchange))
    }
}
