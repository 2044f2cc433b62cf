//! Bot assembly and the publish cycle.

use crate::{
    BotConfig, Credentials, CycleReport, HistoryStore, Persona, Provider, QuoteGenerator,
    QuoteHistory, QuoteSource, select_quote,
};
use async_trait::async_trait;
use quotebot_error::QuotebotResult;
use quotebot_models::{AnthropicClient, OpenAiClient, TextBackend};
use quotebot_social::{
    BLUESKY_MAX_CHARS, BlueskyPublisher, DryRunPublisher, Publisher, TWITTER_MAX_CHARS,
    TwitterPublisher,
};
use tracing::{info, instrument, warn};
use typed_builder::TypedBuilder;

/// One unit of scheduled work.
#[async_trait]
pub trait PublishCycle: Send {
    /// Select, publish, record and persist one quote.
    async fn run_cycle(&mut self) -> CycleReport;
}

/// The deduplicating quote bot.
#[derive(TypedBuilder)]
pub struct QuoteBot {
    source: Box<dyn QuoteSource>,
    publishers: Vec<Box<dyn Publisher>>,
    history: QuoteHistory,
    store: HistoryStore,
    #[builder(default = crate::DEFAULT_MAX_ATTEMPTS)]
    max_attempts: u32,
}

impl std::fmt::Debug for QuoteBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let platforms: Vec<&str> = self.publishers.iter().map(|p| p.platform_name()).collect();
        f.debug_struct("QuoteBot")
            .field("publishers", &platforms)
            .field("history_len", &self.history.len())
            .field("store", &self.store)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

impl QuoteBot {
    /// Build the bot from configuration: backends, publishers and history.
    ///
    /// With `dry_run`, every publisher is replaced by a [`DryRunPublisher`]
    /// and no platform login happens.
    ///
    /// # Errors
    ///
    /// Returns error if a provider key or the Bluesky login is missing, or
    /// the Bluesky handshake fails.
    #[instrument(skip(config, credentials))]
    pub async fn connect(
        config: &BotConfig,
        mut credentials: Credentials,
        dry_run: bool,
    ) -> QuotebotResult<Self> {
        let generator = build_generator(config, &mut credentials, Persona::kramer())?;
        let publishers = if dry_run {
            dry_run_publishers(&credentials)
        } else {
            live_publishers(config, &mut credentials).await?
        };

        let store = HistoryStore::new(config.history_path().clone(), *config.history_cap());
        let history = store.load().await;

        Ok(Self::builder()
            .source(Box::new(generator) as Box<dyn QuoteSource>)
            .publishers(publishers)
            .history(history)
            .store(store)
            .max_attempts(*config.max_attempts())
            .build())
    }

    /// Posts remembered for duplicate detection.
    pub fn history(&self) -> &QuoteHistory {
        &self.history
    }

    /// Names of the platforms a cycle publishes to.
    pub fn platforms(&self) -> Vec<&str> {
        self.publishers.iter().map(|p| p.platform_name()).collect()
    }
}

#[async_trait]
impl PublishCycle for QuoteBot {
    #[instrument(skip(self), fields(history_len = self.history.len()))]
    async fn run_cycle(&mut self) -> CycleReport {
        let selection = select_quote(self.source.as_ref(), &self.history, self.max_attempts).await;
        let text = selection.text().to_string();

        let mut results = Vec::with_capacity(self.publishers.len());
        for publisher in &self.publishers {
            results.push(publisher.post(&text).await);
        }

        self.history.record(text);
        let persisted = self.store.persist(&self.history).await.is_ok();

        let report = CycleReport::new(selection, results, persisted);
        report.log();
        report
    }
}

/// Build the generator from every configured provider, in order.
///
/// # Errors
///
/// Returns error if a configured provider has no API key or its client
/// cannot be built.
pub fn build_generator(
    config: &BotConfig,
    credentials: &mut Credentials,
    persona: Persona,
) -> QuotebotResult<QuoteGenerator> {
    let timeout = config.request_timeout();
    let mut backends: Vec<Box<dyn TextBackend>> = Vec::with_capacity(config.providers().len());

    for &provider in config.providers() {
        let key = credentials.take_provider_key(provider)?;
        let model = config.model_for(provider);
        let base_url = config.base_url_for(provider);
        let sampling = *config.backend(provider).sampling();

        let backend: Box<dyn TextBackend> = match provider {
            Provider::OpenAi => Box::new(
                OpenAiClient::with_timeout(key, model, timeout)?
                    .with_base_url(base_url)
                    .with_sampling(sampling),
            ),
            Provider::Anthropic => Box::new(
                AnthropicClient::with_timeout(key, model, timeout)?
                    .with_base_url(base_url)
                    .with_sampling(sampling),
            ),
        };
        info!(provider = %provider, model = backend.model_name(), "Configured generative backend");
        backends.push(backend);
    }

    Ok(QuoteGenerator::new(backends, persona))
}

async fn live_publishers(
    config: &BotConfig,
    credentials: &mut Credentials,
) -> QuotebotResult<Vec<Box<dyn Publisher>>> {
    let timeout = config.request_timeout();
    let mut publishers: Vec<Box<dyn Publisher>> = Vec::with_capacity(2);

    let bluesky = BlueskyPublisher::login(
        credentials.take_bluesky()?,
        config.bluesky().base_url(),
        timeout,
    )
    .await?;
    publishers.push(Box::new(bluesky));

    let twitter = credentials.take_twitter();
    if twitter.is_empty() {
        info!("X credentials not configured, posting to Bluesky only");
    } else {
        match TwitterPublisher::from_credentials(twitter, config.twitter().base_url(), timeout) {
            Ok(publisher) => {
                info!(scheme = publisher.auth().scheme(), "X publisher enabled");
                publishers.push(Box::new(publisher));
            }
            Err(e) => warn!(error = %e, "X publisher disabled"),
        }
    }

    Ok(publishers)
}

fn dry_run_publishers(credentials: &Credentials) -> Vec<Box<dyn Publisher>> {
    let mut publishers: Vec<Box<dyn Publisher>> =
        vec![Box::new(DryRunPublisher::new("bluesky", Some(BLUESKY_MAX_CHARS)))];
    if credentials.twitter().is_complete() {
        publishers.push(Box::new(DryRunPublisher::new("twitter", Some(TWITTER_MAX_CHARS))));
    }
    info!(publishers = publishers.len(), "Dry run: nothing will be posted");
    publishers
}
