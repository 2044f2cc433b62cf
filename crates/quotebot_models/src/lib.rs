//! Generative-text backends for quotebot.
//!
//! Each provider client implements [`TextBackend`], the single capability the
//! quote generator needs: turn a system instruction and a user prompt into one
//! text completion.
//!
//! # Available Providers
//!
//! - **OpenAI** chat completions ([`OpenAiClient`])
//! - **Anthropic** messages ([`AnthropicClient`])
//!
//! # Example
//!
//! ```no_run
//! use quotebot_models::{GenerateRequest, OpenAiClient, TextBackend};
//! use secrecy::SecretString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = OpenAiClient::new(SecretString::from("sk-..."), "gpt-4o-mini")?;
//! let request = GenerateRequest::builder()
//!     .system("You are a quote writer.")
//!     .prompt("Write one quote.")
//!     .build()?;
//! let text = client.generate(&request).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod anthropic;
mod backend;
mod openai;
mod request;

pub use anthropic::{ANTHROPIC_API_URL, AnthropicClient};
pub use backend::{DEFAULT_TIMEOUT, SamplingConfig, TextBackend};
pub use openai::{OPENAI_API_URL, OpenAiClient};
pub use request::{GenerateRequest, GenerateRequestBuilder};
