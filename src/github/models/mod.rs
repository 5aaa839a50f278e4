//! Deserialisation targets for the GitHub REST endpoints used by the gateway.
//!
//! Types prefixed with `Api` mirror the JSON returned by GitHub and convert
//! into the crate's domain types.

use serde::Deserialize;

use crate::github::error::GitHubError;
use crate::github::locator::PullRequestRef;
use crate::reviewers::Reviewer;

/// User object as returned by `/user`, `/users/{login}` and embedded in
/// reviews and search results. Only `/users/{login}` carries name and email.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiUser {
    pub(super) login: Option<String>,
    #[serde(default)]
    pub(super) name: Option<String>,
    #[serde(default)]
    pub(super) email: Option<String>,
}

/// Issue search hit; pull requests are issues with a `pull_request` member.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiSearchIssue {
    pub(super) number: u64,
    pub(super) repository_url: String,
    pub(super) user: Option<ApiUser>,
}

/// Pull request review; only the reviewer is of interest.
#[derive(Debug, Clone, Deserialize)]
pub(super) struct ApiReview {
    pub(super) user: Option<ApiUser>,
}

impl ApiSearchIssue {
    pub(super) fn into_pull_request_ref(self) -> Result<PullRequestRef, GitHubError> {
        let reference = PullRequestRef::from_repository_url(&self.repository_url, self.number)?;
        Ok(match self.user.and_then(|user| user.login) {
            Some(author) => reference.with_author(author),
            None => reference,
        })
    }
}

impl From<ApiUser> for Reviewer {
    fn from(value: ApiUser) -> Self {
        Self::new(
            value.login.unwrap_or_default(),
            value.name.unwrap_or_default(),
            value.email.unwrap_or_default(),
        )
    }
}
