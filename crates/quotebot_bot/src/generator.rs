//! Quote generation over an ordered list of text backends.

use crate::Persona;
use async_trait::async_trait;
use quotebot_error::{ModelsError, ModelsErrorKind, ModelsResult};
use quotebot_models::TextBackend;
use rand::seq::SliceRandom;
use tracing::{debug, error, instrument, warn};

/// Anything that can hand the selection loop a candidate quote.
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Produce one cleaned candidate. Never fails; falls back to the pool.
    async fn generate(&self) -> String;

    /// Uniformly random entry from the fallback pool.
    fn fallback(&self) -> String;
}

/// Persona-driven generator trying each backend in order.
pub struct QuoteGenerator {
    backends: Vec<Box<dyn TextBackend>>,
    persona: Persona,
}

impl std::fmt::Debug for QuoteGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteGenerator")
            .field("backends", &self.backend_names())
            .field("persona", self.persona.name())
            .finish()
    }
}

impl QuoteGenerator {
    /// Create a generator. An empty backend list always uses the pool.
    pub fn new(backends: Vec<Box<dyn TextBackend>>, persona: Persona) -> Self {
        Self { backends, persona }
    }

    /// The persona prompts and pool in use.
    pub fn persona(&self) -> &Persona {
        &self.persona
    }

    /// `provider/model` for each backend, in try order.
    pub fn backend_names(&self) -> Vec<String> {
        self.backends
            .iter()
            .map(|b| format!("{}/{}", b.provider_name(), b.model_name()))
            .collect()
    }

    /// Generate without falling back, returning the last backend error.
    ///
    /// # Errors
    ///
    /// Returns error if no backend is configured or every backend failed or
    /// returned only whitespace.
    #[instrument(skip(self), fields(backends = self.backends.len()))]
    pub async fn generate_strict(&self) -> ModelsResult<String> {
        let request = self.persona.request();
        let mut last_error = ModelsError::new(ModelsErrorKind::Client(
            "no generative backend configured".to_string(),
        ));

        for backend in &self.backends {
            let provider = backend.provider_name();
            match backend.generate(&request).await {
                Ok(raw) => {
                    let quote = clean_quote(&raw);
                    if quote.is_empty() {
                        warn!(provider, "Backend returned an empty quote");
                        last_error = ModelsError::new(ModelsErrorKind::EmptyCompletion);
                        continue;
                    }
                    debug!(provider, chars = quote.chars().count(), "Generated quote");
                    return Ok(quote);
                }
                Err(e) => {
                    if e.kind.is_auth() {
                        error!(provider, error = %e, "Backend rejected the API key");
                    } else {
                        warn!(provider, error = %e, "Error generating quote");
                    }
                    last_error = e;
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl QuoteSource for QuoteGenerator {
    async fn generate(&self) -> String {
        match self.generate_strict().await {
            Ok(quote) => quote,
            Err(_) => {
                warn!("All backends failed, using fallback quote");
                self.fallback()
            }
        }
    }

    fn fallback(&self) -> String {
        self.persona
            .fallback_quotes()
            .choose(&mut rand::thread_rng())
            .cloned()
            .unwrap_or_default()
    }
}

/// Trim whitespace and strip one pair of surrounding double quotes.
///
/// # Examples
///
/// ```
/// use quotebot_bot::clean_quote;
///
/// assert_eq!(clean_quote("  \"Giddy up!\"\n"), "Giddy up!");
/// assert_eq!(clean_quote("\"\"nested\"\""), "\"nested\"");
/// assert_eq!(clean_quote("\"unbalanced"), "\"unbalanced");
/// ```
pub fn clean_quote(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };
    unquoted.to_string()
}
