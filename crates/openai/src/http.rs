//! HTTP plumbing shared by every OpenAI-compatible endpoint.
//!
//! [`HttpProvider`] wraps a `reqwest::Client` with pre-built headers and the
//! target URL. [`HttpProvider::send`] posts a JSON body and returns the parsed
//! response together with a redacted [`Exchange`] record.

use anyhow::Result;
use reqwest::{
    Client, Method,
    header::{self, HeaderMap, HeaderName, HeaderValue},
};
use serde::Serialize;
use serde_json::Value;
use tcore::model::{Envelope, Exchange};

/// A non-success HTTP status returned by the endpoint.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The endpoint answered with a non-2xx status.
    #[error("{status} {reason}: {body}")]
    Status {
        /// The numeric status code.
        status: u16,
        /// The canonical reason phrase, empty when unknown.
        reason: String,
        /// The response body, parsed as JSON when possible.
        body: Value,
    },
}

/// Shared HTTP transport for OpenAI-compatible endpoints.
///
/// Holds a `reqwest::Client`, the request headers (content negotiation plus
/// whatever authentication the endpoint needs) and the full endpoint URL.
#[derive(Clone, Debug)]
pub struct HttpProvider {
    client: Client,
    headers: HeaderMap,
    endpoint: String,
}

impl HttpProvider {
    /// Create a provider with Bearer token authentication.
    pub fn bearer(client: Client, key: &str, endpoint: &str) -> Result<Self> {
        Self::no_auth(client, endpoint)
            .with_header(header::AUTHORIZATION.as_str(), &format!("Bearer {key}"))
    }

    /// Create a provider without authentication (e.g. Ollama).
    pub fn no_auth(client: Client, endpoint: &str) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        Self {
            client,
            headers,
            endpoint: endpoint.to_owned(),
        }
    }

    /// Create a provider authenticating through a custom header.
    ///
    /// Azure OpenAI uses `api-key` instead of a Bearer token.
    pub fn custom_header(
        client: Client,
        header_name: &str,
        header_value: &str,
        endpoint: &str,
    ) -> Result<Self> {
        Self::no_auth(client, endpoint).with_header(header_name, header_value)
    }

    /// Add or replace a request header.
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        self.headers
            .insert(name.parse::<HeaderName>()?, value.parse::<HeaderValue>()?);
        Ok(self)
    }

    /// Add or replace several request headers.
    pub fn with_headers<'h>(
        self,
        headers: impl IntoIterator<Item = (&'h str, &'h str)>,
    ) -> Result<Self> {
        headers
            .into_iter()
            .try_fold(self, |provider, (name, value)| {
                provider.with_header(name, value)
            })
    }

    /// Post a JSON body and parse the JSON response.
    ///
    /// Returns the response body with the exchange record. Credentials are
    /// removed from the recorded request headers.
    pub async fn send(&self, body: &impl Serialize) -> Result<(Value, Exchange)> {
        let body = serde_json::to_value(body)?;
        tracing::trace!("request: {body}");
        let response = self
            .client
            .request(Method::POST, &self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();
        let text = response.text().await?;
        tracing::trace!("response: {text}");

        if !status.is_success() {
            tracing::error!("{} returned {status}: {text}", self.endpoint);
            return Err(HttpError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_owned(),
                body: serde_json::from_str(&text).unwrap_or(Value::String(text)),
            }
            .into());
        }

        let data: Value = serde_json::from_str(&text)?;
        let exchange = Exchange {
            request: Envelope::redacted(body, self.header_pairs()),
            response: Envelope {
                body: data.clone(),
                headers,
            },
        };
        Ok((data, exchange))
    }

    /// Get the endpoint URL.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    fn header_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers
            .iter()
            .filter_map(|(name, value)| Some((name.as_str(), value.to_str().ok()?)))
    }
}
