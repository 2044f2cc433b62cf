//! X (Twitter) API v2 publisher.

use crate::publisher::retry_after_secs;
use crate::{OAuth1Credentials, PostId, Publisher};
use async_trait::async_trait;
use quotebot_error::{SocialError, SocialErrorKind, SocialResult};
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Default X API host.
pub const TWITTER_API_URL: &str = "https://api.twitter.com";

/// X post length limit.
pub const TWITTER_MAX_CHARS: usize = 280;

/// Raw X credentials as read from the environment; any may be absent.
#[derive(Debug, Default)]
pub struct TwitterCredentials {
    /// App-only bearer token.
    pub bearer_token: Option<SecretString>,
    /// Consumer key.
    pub api_key: Option<SecretString>,
    /// Consumer secret.
    pub api_secret: Option<SecretString>,
    /// User access token.
    pub access_token: Option<SecretString>,
    /// User access token secret.
    pub access_secret: Option<SecretString>,
}

impl TwitterCredentials {
    /// No credential of any kind is present.
    pub fn is_empty(&self) -> bool {
        self.bearer_token.is_none()
            && self.api_key.is_none()
            && self.api_secret.is_none()
            && self.access_token.is_none()
            && self.access_secret.is_none()
    }

    /// Some usable authentication scheme is complete.
    pub fn is_complete(&self) -> bool {
        self.has_oauth1() || self.bearer_token.is_some()
    }

    fn has_oauth1(&self) -> bool {
        self.api_key.is_some()
            && self.api_secret.is_some()
            && self.access_token.is_some()
            && self.access_secret.is_some()
    }

    /// Pick the scheme to post with, preferring user-context OAuth 1.0a.
    pub fn into_auth(self) -> Option<TwitterAuth> {
        match self {
            Self {
                api_key: Some(consumer_key),
                api_secret: Some(consumer_secret),
                access_token: Some(access_token),
                access_secret: Some(access_secret),
                ..
            } => Some(TwitterAuth::OAuth1(OAuth1Credentials {
                consumer_key,
                consumer_secret,
                access_token,
                access_secret,
            })),
            Self {
                bearer_token: Some(token),
                ..
            } => Some(TwitterAuth::Bearer(token)),
            _ => None,
        }
    }
}

/// How requests to the X API are authenticated.
#[derive(Debug)]
pub enum TwitterAuth {
    /// OAuth 2.0 bearer token.
    Bearer(SecretString),
    /// OAuth 1.0a user context.
    OAuth1(OAuth1Credentials),
}

impl TwitterAuth {
    /// Scheme name for logs.
    pub fn scheme(&self) -> &'static str {
        match self {
            Self::Bearer(_) => "bearer",
            Self::OAuth1(_) => "oauth1",
        }
    }

    fn header(&self, method: &str, url: &str) -> String {
        match self {
            Self::Bearer(token) => format!("Bearer {}", token.expose_secret()),
            Self::OAuth1(creds) => creds.authorization_header(method, url),
        }
    }
}

/// X publisher.
#[derive(Debug)]
pub struct TwitterPublisher {
    client: Client,
    base_url: String,
    auth: TwitterAuth,
}

impl TwitterPublisher {
    /// Create a publisher with an explicit authentication scheme.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(auth: TwitterAuth, base_url: impl Into<String>, timeout: Duration) -> SocialResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SocialError::new(SocialErrorKind::Client(e.to_string())))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
        })
    }

    /// Create a publisher from raw environment credentials.
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` when neither a bearer token nor all four
    /// OAuth 1.0a values are present.
    pub fn from_credentials(
        credentials: TwitterCredentials,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> SocialResult<Self> {
        let auth = credentials.into_auth().ok_or_else(|| {
            SocialError::new(SocialErrorKind::MissingCredentials(
                "X needs TWITTER_BEARER_TOKEN or all of TWITTER_API_KEY, TWITTER_API_SECRET, \
                 TWITTER_ACCESS_TOKEN and TWITTER_ACCESS_SECRET"
                    .to_string(),
            ))
        })?;
        Self::new(auth, base_url, timeout)
    }

    /// Authentication scheme in use.
    pub fn auth(&self) -> &TwitterAuth {
        &self.auth
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    fn platform_name(&self) -> &str {
        "twitter"
    }

    fn max_text_length(&self) -> Option<usize> {
        Some(TWITTER_MAX_CHARS)
    }

    #[instrument(skip(self, text), fields(scheme = self.auth.scheme()))]
    async fn try_post(&self, text: &str) -> SocialResult<PostId> {
        let url = format!("{}/2/tweets", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.auth.header("POST", &url))
            .json(&CreateTweetRequest { text })
            .send()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Network(e.to_string())))?;

        let status = response.status();
        let retry_after = retry_after_secs(response.headers());
        let body = response
            .text()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Network(e.to_string())))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiProblem>(&body)
                .ok()
                .and_then(ApiProblem::into_message)
                .unwrap_or(body);
            return Err(SocialError::new(SocialErrorKind::from_status(
                status.as_u16(),
                message,
                retry_after,
            )));
        }

        let created: CreateTweetResponse = serde_json::from_str(&body)
            .map_err(|e| SocialError::new(SocialErrorKind::Parse(e.to_string())))?;
        debug!(id = %created.data.id, "Tweet created");
        Ok(PostId(created.data.id))
    }
}

#[derive(Serialize)]
struct CreateTweetRequest<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct CreateTweetResponse {
    data: TweetData,
}

#[derive(Deserialize)]
struct TweetData {
    id: String,
}

/// Error body shapes returned by the v2 API.
#[derive(Deserialize)]
struct ApiProblem {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Deserialize)]
struct ApiErrorEntry {
    message: String,
}

impl ApiProblem {
    fn into_message(self) -> Option<String> {
        self.detail
            .or(self.title)
            .or_else(|| self.errors.into_iter().next().map(|e| e.message))
    }
}
