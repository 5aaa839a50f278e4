//! Errors that end a reward cycle early.

use std::time::Duration;

use thiserror::Error;

use crate::github::GitHubError;
use crate::rewards::RewardsError;

/// Unrecoverable conditions for one cycle. The next scheduled cycle starts
/// from scratch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CycleError {
    /// The authenticated user could not be determined.
    #[error("could not determine the acting user: {0}")]
    ActingUser(GitHubError),

    /// Open pull requests could not be listed.
    #[error("could not list open pull requests: {0}")]
    Listing(GitHubError),

    /// The rewards platform refused or failed the bonus.
    #[error("could not dispatch reward \"{message}\": {source}")]
    Dispatch {
        /// Text that was being dispatched.
        message: String,
        /// Failure reported by the rewards gateway.
        source: RewardsError,
    },

    /// The bonus request did not complete in time.
    #[error("dispatching reward \"{message}\" timed out after {after:?}")]
    DispatchTimedOut {
        /// Text that was being dispatched.
        message: String,
        /// Timeout that elapsed.
        after: Duration,
    },
}
