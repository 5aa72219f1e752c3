//! Twitter (X) adapter over the v2 API, signed with OAuth 1.0a.
//!
//! Bodies longer than one tweet are posted as a reply chain. The chain stops
//! at the first failed tweet.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use super::oauth::OAuthSigner;
use super::thread::{TWEET_LIMIT, content_to_thread};
use crate::config::{PublishingConfig, TwitterCredentials};
use crate::domain::{ContentItem, Platform};
use crate::error::PlatformError;
use crate::ports::{Clock, PlatformAdapter, PublishReceipt};

pub const TWITTER_API_BASE: &str = "https://api.twitter.com/2";

#[derive(Debug, Serialize)]
struct TweetBody<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply: Option<ReplyTo<'a>>,
}

#[derive(Debug, Serialize)]
struct ReplyTo<'a> {
    in_reply_to_tweet_id: &'a str,
}

pub fn tweet_url(id: &str) -> String {
    format!("https://twitter.com/i/status/{id}")
}

/// Maps a `POST /tweets` response body to a receipt.
pub fn parse_tweet_response(status: u16, ok: bool, body: &Value) -> Result<PublishReceipt, PlatformError> {
    if !ok {
        let message = body
            .get("detail")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("Failed to post tweet");
        return Err(PlatformError::api(Some(i64::from(status)), message));
    }
    let id = body
        .pointer("/data/id")
        .and_then(Value::as_str)
        .ok_or_else(|| PlatformError::Decode("tweet response without data.id".into()))?;
    Ok(PublishReceipt::new(id).with_url(tweet_url(id)))
}

/// Posts `tweets` as a reply chain through `post`.
///
/// Returns the first tweet's receipt when every tweet went out. A failure
/// after the first tweet yields [`PlatformError::Partial`].
pub async fn post_chain<F, Fut>(
    tweets: &[String],
    pacing: Duration,
    mut post: F,
) -> Result<PublishReceipt, PlatformError>
where
    F: FnMut(String, Option<String>) -> Fut,
    Fut: Future<Output = Result<PublishReceipt, PlatformError>>,
{
    let mut first: Option<PublishReceipt> = None;
    let mut previous: Option<String> = None;

    for (i, tweet) in tweets.iter().enumerate() {
        if i > 0 && !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
        match post(tweet.clone(), previous.clone()).await {
            Ok(receipt) => {
                debug!(index = i, post_id = ?receipt.post_id, "tweet posted");
                previous = receipt.post_id.clone();
                first.get_or_insert(receipt);
            }
            Err(error) => {
                return Err(match first {
                    Some(posted) => PlatformError::Partial {
                        posted,
                        error: Box::new(error),
                    },
                    None => error,
                });
            }
        }
    }

    first.ok_or_else(|| PlatformError::Rejected("Tweet text is empty".into()))
}

pub struct TwitterAdapter {
    client: Client,
    signer: OAuthSigner,
    clock: Arc<dyn Clock>,
    base_url: String,
    pacing: Duration,
}

impl TwitterAdapter {
    pub fn new(
        creds: &TwitterCredentials,
        clock: Arc<dyn Clock>,
        config: &PublishingConfig,
    ) -> Result<Self, PlatformError> {
        let client = Client::builder().timeout(config.http_timeout()).build()?;
        Ok(Self {
            client,
            signer: OAuthSigner::from_credentials(creds)?,
            clock,
            base_url: TWITTER_API_BASE.to_string(),
            pacing: config.thread_pacing(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub async fn post_tweet(
        &self,
        text: &str,
        reply_to: Option<&str>,
    ) -> Result<PublishReceipt, PlatformError> {
        let url = format!("{}/tweets", self.base_url);
        // JSON bodies are not part of the signature base string
        let auth = self.signer.sign_request("POST", &url, &[], self.clock.now())?;
        let body = TweetBody {
            text,
            reply: reply_to.map(|id| ReplyTo {
                in_reply_to_tweet_id: id,
            }),
        };

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, auth)
            .header(CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let json = if status.is_success() {
            response.json::<Value>().await?
        } else {
            response.json::<Value>().await.unwrap_or(Value::Null)
        };
        parse_tweet_response(status.as_u16(), status.is_success(), &json)
    }

    pub async fn post_thread(&self, tweets: &[String]) -> Result<PublishReceipt, PlatformError> {
        info!(tweets = tweets.len(), "posting thread");
        post_chain(tweets, self.pacing, |text, reply_to| async move {
            self.post_tweet(&text, reply_to.as_deref()).await
        })
        .await
    }
}

#[async_trait]
impl PlatformAdapter for TwitterAdapter {
    fn platform(&self) -> Platform {
        Platform::Twitter
    }

    async fn publish(&self, item: &ContentItem) -> Result<PublishReceipt, PlatformError> {
        if item.content.chars().count() > TWEET_LIMIT {
            let tweets = content_to_thread(&item.content, TWEET_LIMIT);
            return self.post_thread(&tweets).await;
        }
        self.post_tweet(&item.content, None).await
    }
}
