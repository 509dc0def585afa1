use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::app::AppError;

pub const FLAGGED_MESSAGE: &str = "Content contains profanity or inappropriate language.";
pub const CLEAN_MESSAGE: &str = "Content is clean.";

/// Outcome of a single moderation check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub flagged: bool,
    pub message: String,
}

impl Verdict {
    pub fn flagged() -> Self {
        Self {
            flagged: true,
            message: String::from(FLAGGED_MESSAGE),
        }
    }

    pub fn clean() -> Self {
        Self {
            flagged: false,
            message: String::from(CLEAN_MESSAGE),
        }
    }
}

/// Decides whether a piece of user text may be published.
///
/// Implementations must report transport trouble as
/// [AppError::ServiceUnavailable] instead of guessing a verdict.
#[async_trait]
pub trait Moderator: Send + Sync {
    async fn check(&self, text: &str) -> Result<Verdict, AppError>;
}

/** Client for a PurgoMalum style `containsprofanity` endpoint.
 * Sends `GET {endpoint}?text=...` once per check and expects `true` or `false` back. */
pub struct ProfanityClient {
    client: Client,
    endpoint: String,
}

impl ProfanityClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| AppError::Internal(err.to_string()))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait]
impl Moderator for ProfanityClient {
    async fn check(&self, text: &str) -> Result<Verdict, AppError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("text", text)])
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(|err| {
                log::warn!("moderation request to {} failed: {}", self.endpoint, err);
                AppError::from(err)
            })?;

        let body = response.text().await?;
        let verdict = parse_verdict(&body)?;
        log::debug!("moderation verdict: flagged={}", verdict.flagged);

        Ok(verdict)
    }
}

/// Reads the service's plain text answer. Anything but `true`/`false` is treated
/// as a broken service rather than a verdict.
pub fn parse_verdict(body: &str) -> Result<Verdict, AppError> {
    match body.trim().to_lowercase().as_str() {
        "true" => Ok(Verdict::flagged()),
        "false" => Ok(Verdict::clean()),
        other => {
            log::warn!("moderation service answered with '{}'", other);
            Err(AppError::ServiceUnavailable(format!(
                "unexpected moderation response '{}'",
                other
            )))
        }
    }
}

/// Checks `texts` in order and returns the first flagged verdict, if any
pub async fn first_flagged(
    moderator: &dyn Moderator,
    texts: &[&str],
) -> Result<Option<Verdict>, AppError> {
    for text in texts {
        let verdict = moderator.check(text).await?;
        if verdict.flagged {
            return Ok(Some(verdict));
        }
    }
    Ok(None)
}
