//! Gateways for reading pull requests and reviews through Octocrab.
//!
//! The trait-based design enables mocking in tests while the Octocrab
//! implementation handles real HTTP requests.

mod code_host;
mod error_mapping;

pub use code_host::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::locator::PullRequestRef;
use crate::reviewers::Reviewer;

/// Gateway onto the code-hosting platform.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeHostGateway: Send + Sync {
    /// Login of the user the token authenticates as.
    async fn authenticated_user(&self) -> Result<String, GitHubError>;

    /// All open pull requests authored by `author`.
    async fn open_pull_requests(&self, author: &str) -> Result<Vec<PullRequestRef>, GitHubError>;

    /// Reviewers of the pull request, in review order.
    async fn reviewers(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<Reviewer>, GitHubError>;
}
