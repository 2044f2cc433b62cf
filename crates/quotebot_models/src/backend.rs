//! Backend trait shared by every provider client.

use crate::GenerateRequest;
use async_trait::async_trait;
use derive_getters::Getters;
use quotebot_error::{ModelsError, ModelsErrorKind, ModelsResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Core trait that all generative-text backends implement.
///
/// Implementations return the raw completion text. Cleaning (whitespace and
/// outer quote stripping) is the caller's concern.
#[async_trait]
pub trait TextBackend: Send + Sync {
    /// Generate one completion for the request.
    async fn generate(&self, request: &GenerateRequest) -> ModelsResult<String>;

    /// Provider name (e.g., "openai", "anthropic").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Getters, Serialize, Deserialize)]
pub struct SamplingConfig {
    /// Maximum tokens to generate.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    temperature: f32,
}

fn default_max_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.9
}

impl SamplingConfig {
    /// Create sampling parameters.
    pub fn new(max_tokens: u32, temperature: f32) -> Self {
        Self {
            max_tokens,
            temperature,
        }
    }
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self::new(default_max_tokens(), default_temperature())
    }
}

/// Build the reqwest client every provider uses.
pub(crate) fn http_client(timeout: Duration) -> ModelsResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ModelsError::new(ModelsErrorKind::Client(e.to_string())))
}

/// Turn a non-success response into an API error, otherwise return the body.
pub(crate) async fn read_body(response: reqwest::Response) -> ModelsResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ModelsError::new(ModelsErrorKind::Http(e.to_string())))?;

    if !status.is_success() {
        return Err(ModelsError::new(ModelsErrorKind::Api {
            status: status.as_u16(),
            message: body,
        }));
    }

    Ok(body)
}
