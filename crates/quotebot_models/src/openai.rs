//! OpenAI chat completions client.

use crate::backend::{http_client, read_body};
use crate::{DEFAULT_TIMEOUT, GenerateRequest, SamplingConfig, TextBackend};
use quotebot_error::{ModelsError, ModelsErrorKind, ModelsResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Default OpenAI API base URL.
pub const OPENAI_API_URL: &str = "https://api.openai.com";

/// OpenAI API client.
#[derive(Debug)]
pub struct OpenAiClient {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    sampling: SamplingConfig,
}

impl OpenAiClient {
    /// Creates a new OpenAI client with the default base URL and timeout.
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model identifier (e.g., "gpt-4o-mini")
    pub fn new(api_key: SecretString, model: impl Into<String>) -> ModelsResult<Self> {
        Self::with_timeout(api_key, model, DEFAULT_TIMEOUT)
    }

    /// Creates a new OpenAI client with an explicit request timeout.
    pub fn with_timeout(
        api_key: SecretString,
        model: impl Into<String>,
        timeout: Duration,
    ) -> ModelsResult<Self> {
        let model = model.into();
        debug!(model = %model, "Creating new OpenAI client");
        Ok(Self {
            client: http_client(timeout)?,
            api_key,
            model,
            base_url: OPENAI_API_URL.to_string(),
            sampling: SamplingConfig::default(),
        })
    }

    /// Point the client at a different API host (proxies, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override sampling parameters.
    pub fn with_sampling(mut self, sampling: SamplingConfig) -> Self {
        self.sampling = sampling;
        self
    }

    fn completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl TextBackend for OpenAiClient {
    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn generate(&self, request: &GenerateRequest) -> ModelsResult<String> {
        debug!("Sending request to OpenAI API");

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system(),
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt(),
                },
            ],
            max_tokens: *self.sampling.max_tokens(),
            temperature: *self.sampling.temperature(),
        };

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to send request to OpenAI API");
                ModelsError::new(ModelsErrorKind::Http(e.to_string()))
            })?;

        let text = read_body(response).await.inspect_err(|e| {
            error!(error = %e, "OpenAI API returned error");
        })?;

        let parsed: ChatCompletionResponse = serde_json::from_str(&text).map_err(|e| {
            error!(error = ?e, "Failed to parse OpenAI response");
            ModelsError::new(ModelsErrorKind::Parse(e.to_string()))
        })?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ModelsError::new(ModelsErrorKind::EmptyCompletion))?;

        debug!(chars = content.chars().count(), "Received completion from OpenAI");
        Ok(content)
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
