//! Bot settings (TOML) and credentials (environment).

use crate::history::DEFAULT_HISTORY_CAP;
use crate::selection::DEFAULT_MAX_ATTEMPTS;
use derive_getters::Getters;
use quotebot_error::ConfigError;
use quotebot_models::{ANTHROPIC_API_URL, OPENAI_API_URL, SamplingConfig};
use quotebot_social::{BLUESKY_API_URL, BlueskyCredentials, TWITTER_API_URL, TwitterCredentials};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "quotebot.toml";

/// Generative text provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI chat completions.
    #[serde(rename = "openai")]
    #[display("openai")]
    OpenAi,
    /// Anthropic messages.
    #[display("anthropic")]
    Anthropic,
}

impl Provider {
    /// Model used when the config names none.
    pub fn default_model(self) -> &'static str {
        match self {
            Self::OpenAi => "gpt-4o-mini",
            Self::Anthropic => "claude-3-5-haiku-latest",
        }
    }

    /// API host used when the config names none.
    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAi => OPENAI_API_URL,
            Self::Anthropic => ANTHROPIC_API_URL,
        }
    }

    /// Environment variable holding the API key.
    pub fn key_var(self) -> &'static str {
        match self {
            Self::OpenAi => "OPENAI_API_KEY",
            Self::Anthropic => "ANTHROPIC_API_KEY",
        }
    }
}

/// Per-provider model settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct BackendConfig {
    /// Model identifier; provider default when absent.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    model: Option<String>,

    /// API host; provider default when absent.
    #[builder(default, setter(strip_option, into))]
    #[serde(default)]
    base_url: Option<String>,

    /// Sampling parameters.
    #[builder(default)]
    #[serde(flatten)]
    sampling: SamplingConfig,
}

/// Settings for one publishing platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct PlatformConfig {
    /// API host.
    #[builder(setter(into))]
    base_url: String,
}

fn default_bluesky() -> PlatformConfig {
    PlatformConfig {
        base_url: BLUESKY_API_URL.to_string(),
    }
}

fn default_twitter() -> PlatformConfig {
    PlatformConfig {
        base_url: TWITTER_API_URL.to_string(),
    }
}

/// Everything tunable about the bot except secrets.
///
/// # Examples
///
/// ```
/// use quotebot_bot::BotConfig;
///
/// let config = BotConfig::from_toml_str("interval_minutes = 180\n").unwrap();
/// assert_eq!(*config.interval_minutes(), 180);
/// assert_eq!(*config.history_cap(), 100);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct BotConfig {
    /// JSON history file.
    #[builder(default = default_history_path(), setter(into))]
    #[serde(default = "default_history_path")]
    history_path: PathBuf,

    /// Remembered posts used for duplicate detection.
    #[builder(default = DEFAULT_HISTORY_CAP)]
    #[serde(default = "default_history_cap")]
    history_cap: usize,

    /// Generation attempts before using a fallback quote.
    #[builder(default = DEFAULT_MAX_ATTEMPTS)]
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Minutes between publish cycles.
    #[builder(default = 30)]
    #[serde(default = "default_interval_minutes")]
    interval_minutes: u64,

    /// Seconds between checks of whether a cycle is due.
    #[builder(default = 60)]
    #[serde(default = "default_check_interval_seconds")]
    check_interval_seconds: u64,

    /// Timeout applied to every HTTP request.
    #[builder(default = 30)]
    #[serde(default = "default_request_timeout_seconds")]
    request_timeout_seconds: u64,

    /// Log file; empty disables file logging.
    #[builder(default = default_log_file(), setter(into))]
    #[serde(default = "default_log_file")]
    log_file: PathBuf,

    /// Providers tried in order.
    #[builder(default = default_providers())]
    #[serde(default = "default_providers")]
    providers: Vec<Provider>,

    /// OpenAI settings.
    #[builder(default)]
    #[serde(default)]
    openai: BackendConfig,

    /// Anthropic settings.
    #[builder(default)]
    #[serde(default)]
    anthropic: BackendConfig,

    /// Bluesky settings.
    #[builder(default = default_bluesky())]
    #[serde(default = "default_bluesky")]
    bluesky: PlatformConfig,

    /// X settings.
    #[builder(default = default_twitter())]
    #[serde(default = "default_twitter")]
    twitter: PlatformConfig,
}

fn default_history_path() -> PathBuf {
    PathBuf::from("recent_posts.json")
}

fn default_history_cap() -> usize {
    DEFAULT_HISTORY_CAP
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_interval_minutes() -> u64 {
    30
}

fn default_check_interval_seconds() -> u64 {
    60
}

fn default_request_timeout_seconds() -> u64 {
    30
}

fn default_log_file() -> PathBuf {
    PathBuf::from("quotebot.log")
}

fn default_providers() -> Vec<Provider> {
    vec![Provider::OpenAi]
}

impl Default for BotConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl BotConfig {
    /// Load from a TOML file and validate.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read, does not parse or fails
    /// validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Parse TOML text and validate.
    ///
    /// # Errors
    ///
    /// Returns error if the text does not parse or fails validation.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `quotebot.toml` if present, else defaults.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit or discovered file is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            None => Ok(Self::default()),
        }
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns error naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.history_cap < 1 {
            return Err(ConfigError::new("history_cap must be at least 1"));
        }
        if self.max_attempts < 1 {
            return Err(ConfigError::new("max_attempts must be at least 1"));
        }
        if self.interval_minutes < 1 {
            return Err(ConfigError::new("interval_minutes must be at least 1"));
        }
        if self.check_interval_seconds < 1 {
            return Err(ConfigError::new("check_interval_seconds must be at least 1"));
        }
        if self.request_timeout_seconds < 1 {
            return Err(ConfigError::new("request_timeout_seconds must be at least 1"));
        }
        if self.providers.is_empty() {
            return Err(ConfigError::new("providers must name at least one provider"));
        }
        let mut seen = HashSet::new();
        if let Some(repeated) = self.providers.iter().find(|p| !seen.insert(**p)) {
            return Err(ConfigError::new(format!(
                "providers lists \"{}\" more than once",
                repeated
            )));
        }
        tracing::debug!("Configuration validated");
        Ok(())
    }

    /// Replace the publish interval (CLI override).
    ///
    /// # Errors
    ///
    /// Returns error if `minutes` is zero.
    pub fn with_interval_minutes(mut self, minutes: u64) -> Result<Self, ConfigError> {
        if minutes < 1 {
            return Err(ConfigError::new("interval_minutes must be at least 1"));
        }
        self.interval_minutes = minutes;
        Ok(self)
    }

    /// Settings for a provider.
    pub fn backend(&self, provider: Provider) -> &BackendConfig {
        match provider {
            Provider::OpenAi => &self.openai,
            Provider::Anthropic => &self.anthropic,
        }
    }

    /// Model for a provider, applying its default.
    pub fn model_for(&self, provider: Provider) -> String {
        self.backend(provider)
            .model
            .clone()
            .unwrap_or_else(|| provider.default_model().to_string())
    }

    /// API host for a provider, applying its default.
    pub fn base_url_for(&self, provider: Provider) -> String {
        self.backend(provider)
            .base_url
            .clone()
            .unwrap_or_else(|| provider.default_base_url().to_string())
    }

    /// Time between publish cycles.
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_minutes.saturating_mul(60))
    }

    /// Time between due checks.
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_seconds)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Log file path, or `None` when file logging is disabled.
    pub fn log_path(&self) -> Option<&Path> {
        (!self.log_file.as_os_str().is_empty()).then_some(self.log_file.as_path())
    }
}

/// Secrets read once from the environment.
///
/// Empty values count as unset.
#[derive(Debug, Default)]
pub struct Credentials {
    bluesky_handle: Option<String>,
    bluesky_app_password: Option<SecretString>,
    openai_api_key: Option<SecretString>,
    anthropic_api_key: Option<SecretString>,
    twitter: TwitterCredentials,
}

/// Variables the bot cannot start without (besides provider keys).
pub const REQUIRED_VARS: [&str; 2] = ["BLUESKY_HANDLE", "BLUESKY_APP_PASSWORD"];

/// Optional X variables.
pub const TWITTER_VARS: [&str; 5] = [
    "TWITTER_BEARER_TOKEN",
    "TWITTER_API_KEY",
    "TWITTER_API_SECRET",
    "TWITTER_ACCESS_TOKEN",
    "TWITTER_ACCESS_SECRET",
];

impl Credentials {
    /// Read from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read through any key lookup.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotebot_bot::Credentials;
    ///
    /// let creds = Credentials::from_lookup(|key| match key {
    ///     "BLUESKY_HANDLE" => Some("kramer.bsky.social".to_string()),
    ///     "BLUESKY_APP_PASSWORD" => Some(String::new()),
    ///     _ => None,
    /// });
    /// assert!(creds.has_bluesky_handle());
    /// assert!(!creds.has_bluesky_password());
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let secret = |key: &str| value(key).map(SecretString::from);

        Self {
            bluesky_handle: value("BLUESKY_HANDLE"),
            bluesky_app_password: secret("BLUESKY_APP_PASSWORD"),
            openai_api_key: secret(Provider::OpenAi.key_var()),
            anthropic_api_key: secret(Provider::Anthropic.key_var()),
            twitter: TwitterCredentials {
                bearer_token: secret("TWITTER_BEARER_TOKEN"),
                api_key: secret("TWITTER_API_KEY"),
                api_secret: secret("TWITTER_API_SECRET"),
                access_token: secret("TWITTER_ACCESS_TOKEN"),
                access_secret: secret("TWITTER_ACCESS_SECRET"),
            },
        }
    }

    /// Whether `BLUESKY_HANDLE` is set.
    pub fn has_bluesky_handle(&self) -> bool {
        self.bluesky_handle.is_some()
    }

    /// Whether `BLUESKY_APP_PASSWORD` is set.
    pub fn has_bluesky_password(&self) -> bool {
        self.bluesky_app_password.is_some()
    }

    /// Whether the API key for `provider` is set.
    pub fn has_provider_key(&self, provider: Provider) -> bool {
        match provider {
            Provider::OpenAi => self.openai_api_key.is_some(),
            Provider::Anthropic => self.anthropic_api_key.is_some(),
        }
    }

    /// Whether a named variable is set.
    pub fn is_set(&self, var: &str) -> bool {
        match var {
            "BLUESKY_HANDLE" => self.has_bluesky_handle(),
            "BLUESKY_APP_PASSWORD" => self.has_bluesky_password(),
            "OPENAI_API_KEY" => self.has_provider_key(Provider::OpenAi),
            "ANTHROPIC_API_KEY" => self.has_provider_key(Provider::Anthropic),
            "TWITTER_BEARER_TOKEN" => self.twitter.bearer_token.is_some(),
            "TWITTER_API_KEY" => self.twitter.api_key.is_some(),
            "TWITTER_API_SECRET" => self.twitter.api_secret.is_some(),
            "TWITTER_ACCESS_TOKEN" => self.twitter.access_token.is_some(),
            "TWITTER_ACCESS_SECRET" => self.twitter.access_secret.is_some(),
            _ => false,
        }
    }

    /// X credentials as read.
    pub fn twitter(&self) -> &TwitterCredentials {
        &self.twitter
    }

    /// Take the Bluesky login.
    ///
    /// # Errors
    ///
    /// Returns error naming the missing variable.
    pub fn take_bluesky(&mut self) -> Result<BlueskyCredentials, ConfigError> {
        let handle = self
            .bluesky_handle
            .take()
            .ok_or_else(|| ConfigError::missing_var("BLUESKY_HANDLE"))?;
        let app_password = self
            .bluesky_app_password
            .take()
            .ok_or_else(|| ConfigError::missing_var("BLUESKY_APP_PASSWORD"))?;
        Ok(BlueskyCredentials {
            handle,
            app_password,
        })
    }

    /// Take the API key for `provider`.
    ///
    /// # Errors
    ///
    /// Returns error naming the missing variable.
    pub fn take_provider_key(&mut self, provider: Provider) -> Result<SecretString, ConfigError> {
        let slot = match provider {
            Provider::OpenAi => &mut self.openai_api_key,
            Provider::Anthropic => &mut self.anthropic_api_key,
        };
        slot.take()
            .ok_or_else(|| ConfigError::missing_var(provider.key_var()))
    }

    /// Take the X credentials, leaving none behind.
    pub fn take_twitter(&mut self) -> TwitterCredentials {
        std::mem::take(&mut self.twitter)
    }
}
