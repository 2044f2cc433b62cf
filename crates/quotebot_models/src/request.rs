//! Provider-neutral generation request.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A single-turn generation request: one system instruction, one user prompt.
///
/// # Examples
///
/// ```
/// use quotebot_models::GenerateRequest;
///
/// let request = GenerateRequest::builder()
///     .system("Speak like a pirate.")
///     .prompt("Say hello.")
///     .build()
///     .unwrap();
///
/// assert_eq!(request.prompt(), "Say hello.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct GenerateRequest {
    /// System instruction establishing the persona.
    system: String,
    /// User request.
    prompt: String,
}

impl GenerateRequest {
    /// Create a request from its two parts.
    pub fn new(system: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            prompt: prompt.into(),
        }
    }

    /// Start building a request.
    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::default()
    }
}
