//! Bonusly HTTP implementation of the rewards gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::RewardsGateway;
use super::error::RewardsError;

const DEFAULT_BASE_URL: &str = "https://bonus.ly/api/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 20;
const ERROR_BODY_LIMIT: usize = 160;

/// Configuration for [`BonuslyGateway`].
#[derive(Clone, PartialEq, Eq)]
pub struct BonuslyConfig {
    /// Base API URL (e.g., `https://bonus.ly/api/v1`).
    pub base_url: String,
    /// API token used for bearer authentication.
    pub api_token: Option<String>,
    /// HTTP timeout applied to every request.
    pub timeout: Duration,
}

impl Default for BonuslyConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl BonuslyConfig {
    /// Constructs configuration with explicit settings.
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_token: Option<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            api_token,
            timeout,
        }
    }
}

impl std::fmt::Debug for BonuslyConfig {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("BonuslyConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Bonusly-backed rewards gateway.
#[derive(Clone)]
pub struct BonuslyGateway {
    client: Client,
    base_url: String,
    api_token: String,
}

impl BonuslyGateway {
    /// Builds a gateway and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`RewardsError::MissingToken`] when no non-blank token is
    /// configured and [`RewardsError::Configuration`] when the HTTP client
    /// cannot be built.
    pub fn new(config: BonuslyConfig) -> Result<Self, RewardsError> {
        let api_token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(RewardsError::MissingToken)?
            .to_owned();
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|error| RewardsError::Configuration {
                message: format!("failed to configure rewards HTTP client: {error}"),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_token,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorised(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .bearer_auth(&self.api_token)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    async fn first_username(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<Option<String>, RewardsError> {
        let response = send(operation, self.authorised(request)).await?;
        let users: Vec<ApiUser> = decode(operation, response).await?;
        Ok(users.into_iter().next().and_then(|user| user.username))
    }
}

#[async_trait]
impl RewardsGateway for BonuslyGateway {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<String>, RewardsError> {
        let request = self.client.get(self.endpoint("/users")).query(&[
            ("limit", "1"),
            ("email", email),
            ("include_archived", "false"),
        ]);
        self.first_username("user lookup", request).await
    }

    async fn autocomplete_user(&self, name: &str) -> Result<Option<String>, RewardsError> {
        let request = self
            .client
            .get(self.endpoint("/users/autocomplete"))
            .query(&[("search", name)]);
        self.first_username("user autocomplete", request).await
    }

    async fn grant_bonus(&self, reason: &str) -> Result<(), RewardsError> {
        let request = self
            .client
            .post(self.endpoint("/bonuses"))
            .json(&BonusRequest { reason });
        let response = send("grant bonus", self.authorised(request)).await?;
        let status = response.status();
        decode::<serde_json::Value>("grant bonus", response).await?;
        tracing::info!("bonus accepted with status {status}");
        Ok(())
    }
}

async fn send(operation: &str, request: RequestBuilder) -> Result<Response, RewardsError> {
    let response = request.send().await.map_err(|error| {
        let reason = if error.is_timeout() {
            "timed out"
        } else {
            "transport failed"
        };
        RewardsError::Network {
            message: format!("{operation} {reason}: {error}"),
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.map_or_else(
        |_| "(failed to read error response body)".to_owned(),
        |content| truncate_for_message(content.as_str(), ERROR_BODY_LIMIT),
    );
    let message = format!("{operation} failed with status {}: {body}", status.as_u16());
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        Err(RewardsError::Authentication { message })
    } else {
        Err(RewardsError::Api { message })
    }
}

/// Reads a Bonusly envelope, failing when it reports `success: false`.
async fn decode<T>(operation: &str, response: Response) -> Result<T, RewardsError>
where
    T: DeserializeOwned + Default,
{
    let payload: Envelope<T> = response.json().await.map_err(|error| RewardsError::Decode {
        message: format!("{operation}: {error}"),
    })?;

    if payload.success == Some(false) {
        return Err(RewardsError::Api {
            message: format!(
                "{operation} reported failure: {}",
                payload.message.as_deref().unwrap_or("no message")
            ),
        });
    }

    Ok(payload.result)
}

#[derive(Debug, Serialize)]
struct BonusRequest<'a> {
    reason: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
struct Envelope<T> {
    success: Option<bool>,
    message: Option<String>,
    #[serde(default)]
    result: T,
}

#[derive(Debug, Deserialize)]
struct ApiUser {
    username: Option<String>,
}

fn truncate_for_message(message: &str, max_chars: usize) -> String {
    let mut output = String::new();
    let mut chars = message.chars();

    for _ in 0..max_chars {
        let Some(character) = chars.next() else {
            return output;
        };
        output.push(character);
    }

    if chars.next().is_some() {
        output.push_str("...");
    }

    output
}

#[cfg(test)]
#[path = "bonusly_tests.rs"]
mod tests;
