//! GitHub side of the reward pipeline.
//!
//! This module wraps Octocrab to discover the authenticated user, search for
//! their open pull requests and list who reviewed each one. Errors are mapped
//! into [`GitHubError`] so callers can decide which failures are fatal for a
//! cycle without depending on Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
mod models;

pub use error::GitHubError;
pub use gateway::{CodeHostGateway, OctocrabGateway};
pub use locator::{
    PersonalAccessToken, PullRequestNumber, PullRequestRef, RepositoryName, RepositoryOwner,
};

#[cfg(test)]
pub use gateway::MockCodeHostGateway;

#[cfg(test)]
mod tests;
