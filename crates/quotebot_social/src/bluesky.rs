//! Bluesky (AT Protocol) publisher.

use crate::facets::{Facet, detect_facets};
use crate::publisher::retry_after_secs;
use crate::{PostId, Publisher};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use quotebot_error::{SocialError, SocialErrorKind, SocialResult};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

/// Default PDS host.
pub const BLUESKY_API_URL: &str = "https://bsky.social";

/// Bluesky post length limit.
pub const BLUESKY_MAX_CHARS: usize = 300;

const POST_COLLECTION: &str = "app.bsky.feed.post";

/// Handle and app password for the primary account.
#[derive(Debug)]
pub struct BlueskyCredentials {
    /// Account handle (e.g. `kramer.bsky.social`).
    pub handle: String,
    /// App-scoped password.
    pub app_password: SecretString,
}

#[derive(Debug)]
struct Session {
    access_jwt: SecretString,
    did: String,
}

/// Bluesky publisher holding an authenticated session.
#[derive(Debug)]
pub struct BlueskyPublisher {
    client: Client,
    base_url: String,
    credentials: BlueskyCredentials,
    session: RwLock<Session>,
}

impl BlueskyPublisher {
    /// Log in and return a publisher ready to post.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials are empty, the handshake is rejected
    /// or the PDS is unreachable.
    #[instrument(skip(credentials, base_url), fields(handle = %credentials.handle))]
    pub async fn login(
        credentials: BlueskyCredentials,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> SocialResult<Self> {
        if credentials.handle.trim().is_empty() {
            return Err(SocialError::new(SocialErrorKind::MissingCredentials(
                "Bluesky handle cannot be empty".to_string(),
            )));
        }
        if credentials.app_password.expose_secret().is_empty() {
            return Err(SocialError::new(SocialErrorKind::MissingCredentials(
                "Bluesky app password cannot be empty".to_string(),
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SocialError::new(SocialErrorKind::Client(e.to_string())))?;
        let base_url = base_url.into();

        let session = create_session(&client, &base_url, &credentials).await?;
        info!(did = %session.did, "Logged in to Bluesky");

        Ok(Self {
            client,
            base_url,
            credentials,
            session: RwLock::new(session),
        })
    }

    /// Account handle this publisher posts as.
    pub fn handle(&self) -> &str {
        &self.credentials.handle
    }

    fn xrpc_url(&self, method: &str) -> String {
        xrpc_url(&self.base_url, method)
    }

    async fn create_record(&self, text: &str) -> SocialResult<PostId> {
        let facets = detect_facets(text);
        let session = self.session.read().await;

        let body = CreateRecordRequest {
            repo: &session.did,
            collection: POST_COLLECTION,
            record: PostRecord {
                kind: POST_COLLECTION,
                text,
                created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
                facets,
            },
        };

        let response = self
            .client
            .post(self.xrpc_url("com.atproto.repo.createRecord"))
            .bearer_auth(session.access_jwt.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| SocialError::new(SocialErrorKind::Network(e.to_string())))?;

        let created: CreateRecordResponse = read_xrpc(response).await?;
        debug!(uri = %created.uri, cid = %created.cid, "Record created");
        Ok(PostId(created.uri))
    }

    async fn refresh_session(&self) -> SocialResult<()> {
        let fresh = create_session(&self.client, &self.base_url, &self.credentials).await?;
        *self.session.write().await = fresh;
        info!("Bluesky session re-established");
        Ok(())
    }
}

#[async_trait]
impl Publisher for BlueskyPublisher {
    fn platform_name(&self) -> &str {
        "bluesky"
    }

    fn max_text_length(&self) -> Option<usize> {
        Some(BLUESKY_MAX_CHARS)
    }

    #[instrument(skip(self, text), fields(handle = %self.credentials.handle))]
    async fn try_post(&self, text: &str) -> SocialResult<PostId> {
        match self.create_record(text).await {
            Err(e) if matches!(e.kind, SocialErrorKind::SessionExpired(_)) => {
                warn!("Bluesky session expired, logging in again");
                self.refresh_session().await?;
                self.create_record(text).await
            }
            other => other,
        }
    }
}

fn xrpc_url(base_url: &str, method: &str) -> String {
    format!("{}/xrpc/{}", base_url.trim_end_matches('/'), method)
}

async fn create_session(
    client: &Client,
    base_url: &str,
    credentials: &BlueskyCredentials,
) -> SocialResult<Session> {
    let response = client
        .post(xrpc_url(base_url, "com.atproto.server.createSession"))
        .json(&CreateSessionRequest {
            identifier: &credentials.handle,
            password: credentials.app_password.expose_secret(),
        })
        .send()
        .await
        .map_err(|e| SocialError::new(SocialErrorKind::Network(e.to_string())))?;

    // Some PDS versions report a bad password as 400 AuthenticationRequired.
    let session: CreateSessionResponse = read_xrpc(response).await.map_err(|e| {
        if let SocialErrorKind::Api { status: 400, message } = &e.kind
            && message.contains("AuthenticationRequired")
        {
            return SocialError::new(SocialErrorKind::InvalidCredentials(message.clone()));
        }
        e
    })?;

    Ok(Session {
        access_jwt: SecretString::from(session.access_jwt),
        did: session.did,
    })
}

/// Decode a successful XRPC response or classify the failure.
async fn read_xrpc<T: for<'de> Deserialize<'de>>(response: reqwest::Response) -> SocialResult<T> {
    let status = response.status();
    let retry_after = retry_after_secs(response.headers());
    let body = response
        .text()
        .await
        .map_err(|e| SocialError::new(SocialErrorKind::Network(e.to_string())))?;

    if !status.is_success() {
        let xrpc: Option<XrpcError> = serde_json::from_str(&body).ok();
        let message = xrpc
            .as_ref()
            .map(|x| format!("{}: {}", x.error, x.message.as_deref().unwrap_or_default()))
            .unwrap_or(body);

        if xrpc.as_ref().is_some_and(|x| x.error == "ExpiredToken") {
            return Err(SocialError::new(SocialErrorKind::SessionExpired(message)));
        }
        return Err(SocialError::new(SocialErrorKind::from_status(
            status.as_u16(),
            message,
            retry_after,
        )));
    }

    serde_json::from_str(&body).map_err(|e| SocialError::new(SocialErrorKind::Parse(e.to_string())))
}

#[derive(Serialize)]
struct CreateSessionRequest<'a> {
    identifier: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    access_jwt: String,
    did: String,
}

#[derive(Serialize)]
struct CreateRecordRequest<'a> {
    repo: &'a str,
    collection: &'static str,
    record: PostRecord<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostRecord<'a> {
    #[serde(rename = "$type")]
    kind: &'static str,
    text: &'a str,
    created_at: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<Facet>,
}

#[derive(Deserialize)]
struct CreateRecordResponse {
    uri: String,
    cid: String,
}

#[derive(Deserialize)]
struct XrpcError {
    error: String,
    #[serde(default)]
    message: Option<String>,
}
