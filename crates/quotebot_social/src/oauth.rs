//! OAuth 1.0a request signing (HMAC-SHA1) for the X API.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::Rng;
use rand::distributions::Alphanumeric;
use secrecy::{ExposeSecret, SecretString};
use sha1::Sha1;

/// RFC 3986 unreserved characters stay literal; everything else is encoded.
const OAUTH_ENCODE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// User-context OAuth 1.0a credentials.
#[derive(Debug)]
pub struct OAuth1Credentials {
    /// Consumer (API) key.
    pub consumer_key: SecretString,
    /// Consumer (API) secret.
    pub consumer_secret: SecretString,
    /// Access token.
    pub access_token: SecretString,
    /// Access token secret.
    pub access_secret: SecretString,
}

impl OAuth1Credentials {
    /// Build the `Authorization` header for a request with a fresh nonce and timestamp.
    pub fn authorization_header(&self, method: &str, url: &str) -> String {
        let nonce: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        let timestamp = chrono::Utc::now().timestamp().to_string();
        self.authorization_header_with(method, url, &nonce, &timestamp)
    }

    /// Build the `Authorization` header with an explicit nonce and timestamp.
    pub fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut params = vec![
            ("oauth_consumer_key", self.consumer_key.expose_secret().to_string()),
            ("oauth_nonce", nonce.to_string()),
            ("oauth_signature_method", "HMAC-SHA1".to_string()),
            ("oauth_timestamp", timestamp.to_string()),
            ("oauth_token", self.access_token.expose_secret().to_string()),
            ("oauth_version", "1.0".to_string()),
        ];

        let base = signature_base_string(method, url, &params);
        let key = format!(
            "{}&{}",
            encode(self.consumer_secret.expose_secret()),
            encode(self.access_secret.expose_secret())
        );
        params.push(("oauth_signature", sign(&key, &base)));
        params.sort_by_key(|(k, _)| *k);

        let fields: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        format!("OAuth {}", fields.join(", "))
    }
}

fn encode(value: &str) -> String {
    utf8_percent_encode(value, OAUTH_ENCODE).to_string()
}

/// `METHOD&encoded-url&encoded-sorted-params`.
pub(crate) fn signature_base_string(method: &str, url: &str, params: &[(&str, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (encode(k), encode(v)))
        .collect();
    encoded.sort();

    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        encode(url),
        encode(&joined)
    )
}

pub(crate) fn sign(key: &str, base: &str) -> String {
    let mut mac = Hmac::<Sha1>::new_from_slice(key.as_bytes()).expect("HMAC accepts any key size");
    mac.update(base.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
