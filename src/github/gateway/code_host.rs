//! Octocrab implementation of the code-hosting gateway.

use std::collections::HashSet;

use async_trait::async_trait;
use http::Uri;
use octocrab::{Octocrab, Page};

use crate::github::error::GitHubError;
use crate::github::locator::{PersonalAccessToken, PullRequestRef};
use crate::github::models::{ApiReview, ApiSearchIssue, ApiUser};
use crate::reviewers::Reviewer;

use super::CodeHostGateway;
use super::error_mapping::map_octocrab_error;

const PAGE_SIZE: &str = "50";

/// Octocrab-backed gateway.
pub struct OctocrabGateway {
    client: Octocrab,
}

impl OctocrabGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds a gateway authenticated with `token` against `api_base`
    /// (`https://api.github.com` or an Enterprise `/api/v3` root).
    ///
    /// # Errors
    ///
    /// Returns `GitHubError::InvalidUrl` when the base URI cannot be parsed or
    /// `GitHubError::Api` when Octocrab fails to construct a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &str) -> Result<Self, GitHubError> {
        let base_uri = api_base
            .trim_end_matches('/')
            .parse::<Uri>()
            .map_err(|error| GitHubError::InvalidUrl(format!("{api_base}: {error}")))?;
        let client = Octocrab::builder()
            .personal_token(token.value())
            .base_uri(base_uri)
            .map_err(|error| GitHubError::InvalidUrl(format!("{api_base}: {error}")))?
            .build()
            .map_err(|error| map_octocrab_error("build client", &error))?;
        Ok(Self::new(client))
    }

    /// Loads name and email for a reviewer login.
    ///
    /// Profile lookups are best effort: a failure leaves only the login.
    async fn reviewer_profile(&self, login: &str) -> Reviewer {
        match self
            .client
            .get::<ApiUser, _, _>(format!("/users/{login}"), None::<&()>)
            .await
        {
            Ok(user) => Reviewer::from(user),
            Err(error) => {
                let mapped = map_octocrab_error("user profile", &error);
                tracing::debug!("profile lookup for {login} failed, using login only: {mapped}");
                Reviewer::new(login, "", "")
            }
        }
    }
}

#[async_trait]
impl CodeHostGateway for OctocrabGateway {
    async fn authenticated_user(&self) -> Result<String, GitHubError> {
        let user: ApiUser = self
            .client
            .get("/user", None::<&()>)
            .await
            .map_err(|error| map_octocrab_error("authenticated user", &error))?;

        user.login
            .filter(|login| !login.is_empty())
            .ok_or_else(|| GitHubError::Api {
                message: "authenticated user has no login".to_owned(),
            })
    }

    async fn open_pull_requests(&self, author: &str) -> Result<Vec<PullRequestRef>, GitHubError> {
        let query = format!("is:pr is:open author:{author}");
        let params = [("q", query.as_str()), ("per_page", PAGE_SIZE)];

        let page: Page<ApiSearchIssue> = self
            .client
            .get("/search/issues", Some(&params))
            .await
            .map_err(|error| map_octocrab_error("search pull requests", &error))?;
        let issues = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("search pull requests", &error))?;

        tracing::info!("found {} open pull requests by {author}", issues.len());

        Ok(issues
            .into_iter()
            .filter_map(|issue| {
                let repository_url = issue.repository_url.clone();
                match issue.into_pull_request_ref() {
                    Ok(reference) => Some(reference),
                    Err(error) => {
                        tracing::warn!("ignoring search hit in {repository_url}: {error}");
                        None
                    }
                }
            })
            .collect())
    }

    async fn reviewers(
        &self,
        pull_request: &PullRequestRef,
    ) -> Result<Vec<Reviewer>, GitHubError> {
        let params = [("per_page", PAGE_SIZE)];
        let page: Page<ApiReview> = self
            .client
            .get(pull_request.reviews_path(), Some(&params))
            .await
            .map_err(|error| map_octocrab_error("list reviews", &error))?;
        let reviews = self
            .client
            .all_pages(page)
            .await
            .map_err(|error| map_octocrab_error("list reviews", &error))?;

        let mut seen = HashSet::new();
        let mut reviewers = Vec::new();
        for login in reviews
            .into_iter()
            .filter_map(|review| review.user.and_then(|user| user.login))
        {
            if pull_request.author() == Some(login.as_str()) || !seen.insert(login.clone()) {
                continue;
            }
            reviewers.push(self.reviewer_profile(&login).await);
        }
        Ok(reviewers)
    }
}
