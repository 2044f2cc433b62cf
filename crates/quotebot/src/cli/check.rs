//! `check` command: environment and backend diagnostics without posting.

use quotebot_bot::{BotConfig, Credentials, Persona, REQUIRED_VARS, TWITTER_VARS, build_generator};
use quotebot_social::TWITTER_MAX_CHARS;
use std::fmt;
use tracing::{debug, instrument};

/// Whether one environment variable is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarStatus {
    /// Variable name.
    pub name: &'static str,
    /// Present and non-blank.
    pub set: bool,
}

/// How much of the X configuration is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TwitterStatus {
    /// No X variable is set.
    NotConfigured,
    /// Some but not all X variables are set.
    Partial {
        /// Unset variables.
        missing: Vec<&'static str>,
        /// Whether the set variables still allow posting.
        usable: bool,
    },
    /// Every X variable is set.
    FullyConfigured,
}

impl TwitterStatus {
    /// Classify the X variables in `credentials`.
    pub fn from_credentials(credentials: &Credentials) -> Self {
        let missing: Vec<&'static str> = TWITTER_VARS
            .iter()
            .copied()
            .filter(|var| !credentials.is_set(var))
            .collect();

        if missing.len() == TWITTER_VARS.len() {
            Self::NotConfigured
        } else if missing.is_empty() {
            Self::FullyConfigured
        } else {
            Self::Partial {
                missing,
                usable: credentials.twitter().is_complete(),
            }
        }
    }
}

/// Outcome of a live generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationCheck {
    /// The backends produced a quote.
    Generated(String),
    /// Every backend failed.
    Failed(String),
}

/// Everything `check` found.
#[derive(Debug, Clone)]
pub struct CheckReport {
    vars: Vec<VarStatus>,
    twitter: TwitterStatus,
    generation: Option<GenerationCheck>,
    fallbacks: Vec<String>,
}

impl CheckReport {
    /// Required variables and provider keys.
    pub fn vars(&self) -> &[VarStatus] {
        &self.vars
    }

    /// X configuration state.
    pub fn twitter(&self) -> &TwitterStatus {
        &self.twitter
    }

    /// Live generation result, when requested.
    pub fn generation(&self) -> Option<&GenerationCheck> {
        self.generation.as_ref()
    }

    /// Required variables are set and live generation (if run) succeeded.
    pub fn passed(&self) -> bool {
        self.vars.iter().all(|v| v.set)
            && !matches!(self.generation, Some(GenerationCheck::Failed(_)))
    }
}

/// Inspect credentials and optionally request one live quote.
///
/// Never posts. Generation bypasses the fallback pool so failures show.
#[instrument(skip(config, credentials))]
pub async fn run_check(config: &BotConfig, mut credentials: Credentials, generate: bool) -> CheckReport {
    let mut vars: Vec<VarStatus> = REQUIRED_VARS
        .iter()
        .map(|&name| VarStatus {
            name,
            set: credentials.is_set(name),
        })
        .collect();
    for provider in config.providers() {
        let name = provider.key_var();
        if vars.iter().all(|v| v.name != name) {
            vars.push(VarStatus {
                name,
                set: credentials.has_provider_key(*provider),
            });
        }
    }

    let twitter = TwitterStatus::from_credentials(&credentials);
    let persona = Persona::kramer();
    let fallbacks = persona.fallback_quotes().clone();

    let generation = if generate {
        let outcome = match build_generator(config, &mut credentials, persona) {
            Ok(generator) => match generator.generate_strict().await {
                Ok(quote) => GenerationCheck::Generated(quote),
                Err(e) => GenerationCheck::Failed(e.to_string()),
            },
            Err(e) => GenerationCheck::Failed(e.to_string()),
        };
        debug!(?outcome, "Live generation checked");
        Some(outcome)
    } else {
        None
    };

    CheckReport {
        vars,
        twitter,
        generation,
        fallbacks,
    }
}

fn write_length(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    let chars = text.chars().count();
    if chars > TWITTER_MAX_CHARS {
        writeln!(f, "    {} characters [warn] exceeds the {} character X limit", chars, TWITTER_MAX_CHARS)
    } else {
        writeln!(f, "    {} characters", chars)
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Environment variables:")?;
        for var in &self.vars {
            let mark = if var.set { "[ok]     " } else { "[missing]" };
            writeln!(f, "  {} {}", mark, var.name)?;
        }

        writeln!(f, "\nX configuration:")?;
        match &self.twitter {
            TwitterStatus::NotConfigured => writeln!(f, "  not configured (optional)")?,
            TwitterStatus::FullyConfigured => writeln!(f, "  fully configured")?,
            TwitterStatus::Partial { missing, usable } => {
                writeln!(f, "  partially configured, missing: {}", missing.join(", "))?;
                if missing.contains(&"TWITTER_BEARER_TOKEN") {
                    writeln!(f, "  [warn] TWITTER_BEARER_TOKEN is not set")?;
                }
                if !usable {
                    writeln!(f, "  [warn] no complete X login; posting to X is disabled")?;
                }
            }
        }

        match &self.generation {
            None => {}
            Some(GenerationCheck::Generated(quote)) => {
                writeln!(f, "\nLive generation: [ok]")?;
                writeln!(f, "  {}", quote)?;
                write_length(f, quote)?;
            }
            Some(GenerationCheck::Failed(reason)) => {
                writeln!(f, "\nLive generation: [failed]")?;
                writeln!(f, "  {}", reason)?;
            }
        }

        writeln!(f, "\nFallback quotes:")?;
        for (i, quote) in self.fallbacks.iter().enumerate() {
            writeln!(f, "  {:>2}. {}", i + 1, quote)?;
            write_length(f, quote)?;
        }

        write!(
            f,
            "\nResult: {}",
            if self.passed() { "all checks passed" } else { "some checks failed" }
        )
    }
}
