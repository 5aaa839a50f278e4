//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.kudos.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `KUDOS_*`, plus `GITHUB_ACCESS_TOKEN` and
//!    `BONUSLY_ACCESS_TOKEN` as token fallbacks
//! 4. **Command-line arguments** – `--github-token`, `--once`, and so on
//!
//! # Configuration File
//!
//! ```toml
//! github_token = "ghp_example"
//! rewards_token = "bonusly_example"
//! poll_interval_seconds = 900
//! bonus_points = 5
//! bonus_tag = "focus-on-continuous-improvement"
//! empty_mentions = "suppress"
//! ledger = "memory"
//! ```

use std::env;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::error::KudosError;
use crate::github::PersonalAccessToken;
use crate::pipeline::{EmptyMentionPolicy, PipelineOptions};
use crate::reviewers::{DEFAULT_POINTS, DEFAULT_TAG, DEFAULT_THANK_YOU, MessageTemplate};
use crate::rewards::{BonuslyConfig, RewardsError};

/// Environment variable read when no GitHub token is configured.
pub const GITHUB_TOKEN_FALLBACK: &str = "GITHUB_ACCESS_TOKEN";
/// Environment variable read when no Bonusly token is configured.
pub const REWARDS_TOKEN_FALLBACK: &str = "BONUSLY_ACCESS_TOKEN";

const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_REWARDS_API_URL: &str = "https://bonus.ly/api/v1";
const DEFAULT_POLL_INTERVAL_SECONDS: u64 = 900;
const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 20;

/// Which ledger remembers credited reviewers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerKind {
    /// Remember for the lifetime of the process.
    Memory,
    /// Remember nothing; every cycle rewards every open pull request.
    None,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use kudos::KudosConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = KudosConfig::load().expect("failed to load configuration");
/// let token = config.resolve_github_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "KUDOS",
    discovery(
        dotfile_name = ".kudos.toml",
        config_file_name = "kudos.toml",
        app_name = "kudos"
    )
)]
pub struct KudosConfig {
    /// GitHub personal access token.
    ///
    /// Can be provided via:
    /// - CLI: `--github-token <TOKEN>` or `-g <TOKEN>`
    /// - Environment: `KUDOS_GITHUB_TOKEN` or `GITHUB_ACCESS_TOKEN`
    /// - Config file: `github_token = "..."`
    #[ortho_config(cli_short = 'g')]
    pub github_token: Option<String>,

    /// Bonusly API token.
    ///
    /// Can be provided via:
    /// - CLI: `--rewards-token <TOKEN>` or `-b <TOKEN>`
    /// - Environment: `KUDOS_REWARDS_TOKEN` or `BONUSLY_ACCESS_TOKEN`
    /// - Config file: `rewards_token = "..."`
    #[ortho_config(cli_short = 'b')]
    pub rewards_token: Option<String>,

    /// GitHub REST API base URL. Defaults to `https://api.github.com`.
    #[ortho_config()]
    pub github_api_url: Option<String>,

    /// Bonusly API base URL. Defaults to `https://bonus.ly/api/v1`.
    #[ortho_config()]
    pub rewards_api_url: Option<String>,

    /// Seconds between cycles. Defaults to 15 minutes.
    #[ortho_config()]
    pub poll_interval_seconds: u64,

    /// Upper bound, in seconds, for each external call.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Points granted per bonus.
    #[ortho_config()]
    pub bonus_points: u64,

    /// Hashtag appended to the bonus, without the leading `#`.
    #[ortho_config()]
    pub bonus_tag: Option<String>,

    /// Thank-you text placed between mentions and points.
    #[ortho_config()]
    pub thank_you_text: Option<String>,

    /// `dispatch` or `suppress`: whether to send a bonus mentioning nobody.
    #[ortho_config()]
    pub empty_mentions: Option<String>,

    /// `memory` or `none`: how credited reviewers are remembered.
    #[ortho_config()]
    pub ledger: Option<String>,

    /// Runs one cycle and exits.
    ///
    /// Can be provided via:
    /// - CLI: `--once` / `-O`
    /// - Config file: `once = true`
    ///
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config(cli_short = 'O')]
    pub once: bool,
}

impl Default for KudosConfig {
    fn default() -> Self {
        Self {
            github_token: None,
            rewards_token: None,
            github_api_url: None,
            rewards_api_url: None,
            poll_interval_seconds: DEFAULT_POLL_INTERVAL_SECONDS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            bonus_points: u64::from(DEFAULT_POINTS),
            bonus_tag: None,
            thank_you_text: None,
            empty_mentions: None,
            ledger: None,
            once: false,
        }
    }
}

impl KudosConfig {
    /// Resolves the GitHub token, falling back to `GITHUB_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::GitHub`] wrapping
    /// [`GitHubError::MissingToken`](crate::github::GitHubError::MissingToken)
    /// when no source provides a non-blank token.
    pub fn resolve_github_token(&self) -> Result<PersonalAccessToken, KudosError> {
        let token = self
            .github_token
            .clone()
            .or_else(|| env::var(GITHUB_TOKEN_FALLBACK).ok())
            .unwrap_or_default();
        Ok(PersonalAccessToken::new(token)?)
    }

    /// Resolves the Bonusly token, falling back to `BONUSLY_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Rewards`] wrapping [`RewardsError::MissingToken`]
    /// when no source provides a non-blank token.
    pub fn resolve_rewards_token(&self) -> Result<String, KudosError> {
        self.rewards_token
            .clone()
            .or_else(|| env::var(REWARDS_TOKEN_FALLBACK).ok())
            .map(|token| token.trim().to_owned())
            .filter(|token| !token.is_empty())
            .ok_or(KudosError::Rewards(RewardsError::MissingToken))
    }

    /// GitHub API base URL.
    #[must_use]
    pub fn github_api_url(&self) -> &str {
        self.github_api_url
            .as_deref()
            .unwrap_or(DEFAULT_GITHUB_API_URL)
    }

    /// Bonusly API base URL.
    #[must_use]
    pub fn rewards_api_url(&self) -> &str {
        self.rewards_api_url
            .as_deref()
            .unwrap_or(DEFAULT_REWARDS_API_URL)
    }

    /// Time between scheduled cycles.
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Configuration`] when the interval is zero.
    pub fn poll_interval(&self) -> Result<Duration, KudosError> {
        non_zero_seconds("poll_interval_seconds", self.poll_interval_seconds)
    }

    /// Upper bound for each external call.
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Configuration`] when the timeout is zero.
    pub fn request_timeout(&self) -> Result<Duration, KudosError> {
        non_zero_seconds("request_timeout_seconds", self.request_timeout_seconds)
    }

    /// Parses `empty_mentions`; unset means [`EmptyMentionPolicy::Dispatch`].
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Configuration`] for an unknown policy name.
    pub fn empty_mention_policy(&self) -> Result<EmptyMentionPolicy, KudosError> {
        match normalised(self.empty_mentions.as_deref()).as_deref() {
            None | Some("dispatch") => Ok(EmptyMentionPolicy::Dispatch),
            Some("suppress") => Ok(EmptyMentionPolicy::Suppress),
            Some(other) => Err(KudosError::configuration(format!(
                "empty_mentions must be \"dispatch\" or \"suppress\", got \"{other}\""
            ))),
        }
    }

    /// Parses `ledger`; unset means [`LedgerKind::Memory`].
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Configuration`] for an unknown ledger name.
    pub fn ledger_kind(&self) -> Result<LedgerKind, KudosError> {
        match normalised(self.ledger.as_deref()).as_deref() {
            None | Some("memory") => Ok(LedgerKind::Memory),
            Some("none") => Ok(LedgerKind::None),
            Some(other) => Err(KudosError::configuration(format!(
                "ledger must be \"memory\" or \"none\", got \"{other}\""
            ))),
        }
    }

    /// Builds the reward message template.
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Configuration`] when the points do not fit in a
    /// `u32` or the tag is blank.
    pub fn message_template(&self) -> Result<MessageTemplate, KudosError> {
        let points = u32::try_from(self.bonus_points).map_err(|_| {
            KudosError::configuration(format!("bonus_points {} is too large", self.bonus_points))
        })?;
        let tag = self.bonus_tag.as_deref().unwrap_or(DEFAULT_TAG);
        if tag.trim().trim_start_matches('#').is_empty() {
            return Err(KudosError::configuration("bonus_tag must not be blank"));
        }
        let thank_you = self.thank_you_text.as_deref().unwrap_or(DEFAULT_THANK_YOU);
        Ok(MessageTemplate::new(thank_you, points, tag))
    }

    /// Settings for [`RewardPipeline`](crate::pipeline::RewardPipeline).
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::message_template`],
    /// [`Self::request_timeout`] and [`Self::empty_mention_policy`].
    pub fn pipeline_options(&self) -> Result<PipelineOptions, KudosError> {
        Ok(PipelineOptions {
            template: self.message_template()?,
            call_timeout: self.request_timeout()?,
            empty_mentions: self.empty_mention_policy()?,
        })
    }

    /// Settings for the Bonusly gateway.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::resolve_rewards_token`] and
    /// [`Self::request_timeout`].
    pub fn rewards_config(&self) -> Result<BonuslyConfig, KudosError> {
        Ok(BonuslyConfig::new(
            self.rewards_api_url(),
            Some(self.resolve_rewards_token()?),
            self.request_timeout()?,
        ))
    }

    /// Checks every derived setting without touching the environment.
    ///
    /// # Errors
    ///
    /// Returns [`KudosError::Configuration`] describing the first invalid
    /// setting, including a configured token that is blank.
    pub fn validate(&self) -> Result<(), KudosError> {
        for (field, token) in [
            ("github_token", &self.github_token),
            ("rewards_token", &self.rewards_token),
        ] {
            if token.as_deref().is_some_and(|value| value.trim().is_empty()) {
                return Err(KudosError::configuration(format!(
                    "{field} must not be blank"
                )));
            }
        }
        self.poll_interval()?;
        self.ledger_kind()?;
        self.pipeline_options()?;
        Ok(())
    }
}

fn non_zero_seconds(field: &str, seconds: u64) -> Result<Duration, KudosError> {
    if seconds == 0 {
        return Err(KudosError::configuration(format!(
            "{field} must be greater than zero"
        )));
    }
    Ok(Duration::from_secs(seconds))
}

fn normalised(value: Option<&str>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_ascii_lowercase())
        .filter(|raw| !raw.is_empty())
}

#[cfg(test)]
mod tests;
