//! Anthropic messages client.

use crate::backend::{http_client, read_body};
use crate::{DEFAULT_TIMEOUT, GenerateRequest, SamplingConfig, TextBackend};
use quotebot_error::{ModelsError, ModelsErrorKind, ModelsResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Default Anthropic API base URL.
pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic API client.
#[derive(Debug)]
pub struct AnthropicClient {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    sampling: SamplingConfig,
}

impl AnthropicClient {
    /// Creates a new Anthropic client.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model identifier (e.g., "claude-3-5-haiku-latest")
    pub fn new(api_key: SecretString, model: impl Into<String>) -> ModelsResult<Self> {
        Self::with_timeout(api_key, model, DEFAULT_TIMEOUT)
    }

    /// Creates a new Anthropic client with an explicit request timeout.
    pub fn with_timeout(
        api_key: SecretString,
        model: impl Into<String>,
        timeout: Duration,
    ) -> ModelsResult<Self> {
        let model = model.into();
        debug!(model = %model, "Creating new Anthropic client");
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            model,
            base_url: ANTHROPIC_API_URL.to_string(),
            sampling: SamplingConfig::default(),
        })
    }

    /// Point the client at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override sampling parameters.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl TextBackend for AnthropicClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> ModelsResult<String> {
        debug!("Sending request to Anthropic API");

        let body = MessagesRequest {
            model: &self.model,
            system: request.system(),
            messages: vec![MessagesTurn {
                role: "user",
                content: request.prompt(),
            }],
            max_tokens: *self.sampling.max_tokens(),
            temperature: *self.sampling.temperature(),
        };

        let response = self
            .client
            .post(self.messages_url())
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to Anthropic API");
                ModelsError::new(ModelsErrorKind::Http(e.to_string()))
            })?;

        let text = read_body(response).await.inspect_err(|e| {
            error!(error = %e, "Anthropic API returned error");
        })?;

        let parsed: MessagesResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, "Failed to parse Anthropic response");
            ModelsError::new(ModelsErrorKind::Parse(e.to_string()))
        })?;

        let content: String = parsed
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if content.trim().is_empty() {
            return Err(ModelsError::new(ModelsErrorKind::EmptyCompletion));
        }

        debug!(chars = content.chars().count(), "Received completion from Anthropic");
        Ok(content)
    }

    fn provider_name(&self) -> &'static str {
        "anthropic"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    system: &'a str,
    messages: Vec<MessagesTurn<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct MessagesTurn<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}
