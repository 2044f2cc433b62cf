//! Startup configuration errors.

/// A setting or credential the bot cannot start with.
///
/// Produced while loading `quotebot.toml`, validating its ranges or taking
/// secrets out of the environment. Never produced once the scheduler runs.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What is wrong, naming the offending setting or variable.
    pub message: String,
    /// Line number where the error was raised
    pub line: u32,
    /// File where the error was raised
    pub file: &'static str,
}

impl ConfigError {
    /// Error for an invalid setting, recorded at the caller's location.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotebot_error::ConfigError;
    ///
    /// let err = ConfigError::new("history_cap must be at least 1");
    /// assert!(err.message.contains("history_cap"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// Error for an unset or blank environment variable.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotebot_error::ConfigError;
    ///
    /// let err = ConfigError::missing_var("BLUESKY_APP_PASSWORD");
    /// assert_eq!(err.message, "BLUESKY_APP_PASSWORD is not set");
    /// ```
    #[track_caller]
    pub fn missing_var(name: &str) -> Self {
        Self::new(format!("{} is not set", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_var_records_caller_location() {
        let err = ConfigError::missing_var("OPENAI_API_KEY");
        assert!(err.file.ends_with("config.rs"));
        assert!(err.to_string().contains("OPENAI_API_KEY is not set"));
    }
}
