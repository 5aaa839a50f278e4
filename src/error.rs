//! Top-level error type for the kudos binary.

use thiserror::Error;

use crate::github::GitHubError;
use crate::pipeline::CycleError;
use crate::rewards::RewardsError;

/// Errors that stop the process before or outside a reward cycle.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KudosError {
    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Description of the problem.
        message: String,
    },

    /// The code-hosting side could not be set up.
    #[error(transparent)]
    GitHub(#[from] GitHubError),

    /// The rewards side could not be set up.
    #[error(transparent)]
    Rewards(#[from] RewardsError),

    /// A single cycle requested with `--once` failed.
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

impl KudosError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}
