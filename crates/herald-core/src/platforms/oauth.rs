//! OAuth 1.0a request signing (HMAC-SHA1).
//!
//! 1. percent-encode every key and value (RFC 3986, `!'()*` included)
//! 2. sort the encoded pairs and join them as `k=v&k=v`
//! 3. base string: `METHOD&enc(url)&enc(params)`
//! 4. signing key: `enc(consumer_secret)&enc(token_secret)`
//! 5. signature: base64(HMAC-SHA1(key, base string))
//! 6. header: `OAuth k="v", ...` in protocol-parameter order, signature last

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha1::Sha1;
use thiserror::Error;

use crate::config::TwitterCredentials;

type HmacSha1 = Hmac<Sha1>;

const NONCE_LEN: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OAuthError {
    #[error("missing OAuth credential: {0}")]
    MissingCredential(&'static str),

    #[error("invalid HMAC signing key")]
    SigningKey,
}

/// RFC 3986 percent-encoding: only `A-Z a-z 0-9 - . _ ~` stay literal.
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

#[derive(Debug, Clone)]
pub struct OAuthSigner {
    consumer_key: String,
    consumer_secret: String,
    token: String,
    token_secret: String,
}

impl OAuthSigner {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Result<Self, OAuthError> {
        let signer = Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            token: token.into(),
            token_secret: token_secret.into(),
        };
        for (name, value) in [
            ("consumer key", &signer.consumer_key),
            ("consumer secret", &signer.consumer_secret),
            ("access token", &signer.token),
            ("access token secret", &signer.token_secret),
        ] {
            if value.is_empty() {
                return Err(OAuthError::MissingCredential(name));
            }
        }
        Ok(signer)
    }

    pub fn from_credentials(creds: &TwitterCredentials) -> Result<Self, OAuthError> {
        Self::new(
            creds.api_key.as_str(),
            creds.api_secret.as_str(),
            creds.access_token.as_str(),
            creds.access_token_secret.as_str(),
        )
    }

    /// Protocol parameters in header order (without the signature).
    fn protocol_params<'a>(&'a self, nonce: &'a str, timestamp: &'a str) -> [(&'static str, &'a str); 6] {
        [
            ("oauth_consumer_key", self.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp),
            ("oauth_token", self.token.as_str()),
            ("oauth_version", "1.0"),
        ]
    }

    /// Steps 1-3.
    pub fn base_string(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> String {
        let mut pairs: Vec<(String, String)> = self
            .protocol_params(nonce, timestamp)
            .iter()
            .map(|(k, v)| (*k, *v))
            .chain(params.iter().copied())
            .map(|(k, v)| (percent_encode(k), percent_encode(v)))
            .collect();
        pairs.sort();

        let joined = pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");

        format!(
            "{}&{}&{}",
            method.to_uppercase(),
            percent_encode(url),
            percent_encode(&joined)
        )
    }

    /// Steps 4-5: the base64 signature (not yet percent-encoded).
    pub fn signature(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, OAuthError> {
        let key = format!(
            "{}&{}",
            percent_encode(&self.consumer_secret),
            percent_encode(&self.token_secret)
        );
        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|_| OAuthError::SigningKey)?;
        mac.update(self.base_string(method, url, params, nonce, timestamp).as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }

    /// Full `Authorization` header value for the given nonce and timestamp.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        nonce: &str,
        timestamp: &str,
    ) -> Result<String, OAuthError> {
        let signature = self.signature(method, url, params, nonce, timestamp)?;
        let fields = self
            .protocol_params(nonce, timestamp)
            .iter()
            .map(|(k, v)| (*k, *v))
            .chain(std::iter::once(("oauth_signature", signature.as_str())))
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");
        Ok(format!("OAuth {fields}"))
    }

    /// Header with a fresh nonce, timestamped at `now`.
    pub fn sign_request(
        &self,
        method: &str,
        url: &str,
        params: &[(&str, &str)],
        now: DateTime<Utc>,
    ) -> Result<String, OAuthError> {
        let nonce = generate_nonce();
        self.authorization_header(method, url, params, &nonce, &now.timestamp().to_string())
    }
}

pub fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}
