//! Client construction for OpenAI-compatible APIs.

use crate::error::{OutpostError, Result};
use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoffBuilder;
use std::time::Duration;

/// Connection details for one OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct ClientOptions<'a> {
    /// Base URL of the API, e.g. `https://api.openai.com/v1`.
    pub api_base: &'a str,
    /// Name of the environment variable holding the API key.
    pub api_key_env: &'a str,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Create a client for an OpenAI-compatible endpoint with a request timeout.
///
/// Failed requests are never retried, including rate-limit responses. A
/// missing API key is not an error here; the service will reject the request
/// and the failure surfaces as [`OutpostError::UpstreamUnavailable`].
pub fn create_client(options: &ClientOptions<'_>) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(|e| OutpostError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let api_key = std::env::var(options.api_key_env).unwrap_or_default();
    let config = OpenAIConfig::new()
        .with_api_base(options.api_base)
        .with_api_key(api_key);

    let no_retry = ExponentialBackoffBuilder::new()
        .with_max_elapsed_time(Some(Duration::ZERO))
        .build();

    Ok(Client::with_config(config)
        .with_http_client(http_client)
        .with_backoff(no_retry))
}
