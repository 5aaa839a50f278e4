//! Identity wrappers for pull requests discovered through search.

use std::fmt;

use url::Url;

use super::error::GitHubError;
use crate::reviewers::Fingerprint;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    pub(crate) fn new(value: &str) -> Result<Self, GitHubError> {
        if value.is_empty() {
            return Err(GitHubError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryName(String);

impl RepositoryName {
    pub(crate) fn new(value: &str) -> Result<Self, GitHubError> {
        if value.is_empty() {
            return Err(GitHubError::MissingPathSegments);
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Pull request number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PullRequestNumber(u64);

impl PullRequestNumber {
    pub(crate) const fn new(value: u64) -> Result<Self, GitHubError> {
        if value == 0 {
            return Err(GitHubError::InvalidPullRequestNumber);
        }
        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, GitHubError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(GitHubError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

/// An open pull request authored by the acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    owner: RepositoryOwner,
    repository: RepositoryName,
    number: PullRequestNumber,
    author: Option<String>,
}

impl PullRequestRef {
    /// Builds a reference from its owner, repository and number.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::MissingPathSegments`] when the owner or
    /// repository is empty and [`GitHubError::InvalidPullRequestNumber`] when
    /// the number is zero.
    pub fn new(owner: &str, repository: &str, number: u64) -> Result<Self, GitHubError> {
        Ok(Self {
            owner: RepositoryOwner::new(owner)?,
            repository: RepositoryName::new(repository)?,
            number: PullRequestNumber::new(number)?,
            author: None,
        })
    }

    /// Builds a reference from a search result's repository API URL, e.g.
    /// `https://api.github.com/repos/octo/widgets`.
    ///
    /// The last two path segments are taken as owner and repository.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidUrl`] when the URL cannot be parsed and
    /// [`GitHubError::MissingPathSegments`] when it has fewer than two path
    /// segments.
    pub fn from_repository_url(repository_url: &str, number: u64) -> Result<Self, GitHubError> {
        let parsed =
            Url::parse(repository_url).map_err(|error| GitHubError::InvalidUrl(error.to_string()))?;
        let mut segments = parsed
            .path_segments()
            .ok_or(GitHubError::MissingPathSegments)?
            .filter(|segment| !segment.is_empty())
            .rev();
        let repository = segments.next().ok_or(GitHubError::MissingPathSegments)?;
        let owner = segments.next().ok_or(GitHubError::MissingPathSegments)?;
        Self::new(owner, repository, number)
    }

    /// Records the pull request author's login.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Pull request number.
    #[must_use]
    pub const fn number(&self) -> PullRequestNumber {
        self.number
    }

    /// Author login, when the search result carried one.
    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Stable fingerprint for this owner/repository/number triple.
    #[must_use]
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::compute(
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get(),
        )
    }

    pub(crate) fn reviews_path(&self) -> String {
        format!(
            "/repos/{}/{}/pulls/{}/reviews",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}/{}#{}",
            self.owner.as_str(),
            self.repository.as_str(),
            self.number.get()
        )
    }
}
