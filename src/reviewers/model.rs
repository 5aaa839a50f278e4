//! Reviewer, review set and resolution result types.

use crate::github::PullRequestRef;

use super::fingerprint::Fingerprint;

/// A person who reviewed a pull request.
///
/// Any field may be empty: GitHub only exposes name and email when the user
/// has made them public.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reviewer {
    username: String,
    display_name: String,
    email: String,
}

impl Reviewer {
    /// Creates a reviewer, trimming surrounding whitespace from each field.
    #[must_use]
    pub fn new(
        username: impl Into<String>,
        display_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            username: trimmed(username.into()),
            display_name: trimmed(display_name.into()),
            email: trimmed(email.into()),
        }
    }

    /// Source-control login; empty when unknown.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Public display name; empty when unknown.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Public email address; empty when unknown.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// A reviewer with neither login nor display name cannot be mentioned.
    #[must_use]
    pub fn is_identifiable(&self) -> bool {
        !self.username.is_empty() || !self.display_name.is_empty()
    }

    /// Whether this reviewer is the given source-control login.
    #[must_use]
    pub fn is_user(&self, login: &str) -> bool {
        !self.username.is_empty() && self.username.eq_ignore_ascii_case(login)
    }

    /// Dedup rule: equal non-empty logins, or, when either login is missing,
    /// equal non-empty display names.
    #[must_use]
    pub fn is_same_person(&self, other: &Self) -> bool {
        if !self.username.is_empty() && other.is_user(&self.username) {
            return true;
        }
        let either_anonymous = self.username.is_empty() || other.username.is_empty();
        either_anonymous && !self.display_name.is_empty() && self.display_name == other.display_name
    }

    /// Key the ledger credits this reviewer under: the lowercased login, or
    /// the display name when the login is unknown.
    #[must_use]
    pub fn credit_key(&self) -> String {
        if self.username.is_empty() {
            self.display_name.clone()
        } else {
            self.username.to_ascii_lowercase()
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.username.is_empty() {
            &self.display_name
        } else {
            &self.username
        }
    }
}

fn trimmed(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_owned()
    }
}

/// Reviewers of one open pull request still owed a reward, collected during
/// a single cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSet {
    pull_request: PullRequestRef,
    reviewers: Vec<Reviewer>,
    fingerprint: Fingerprint,
    processed: bool,
}

impl ReviewSet {
    /// Creates an unprocessed review set for a pull request.
    #[must_use]
    pub fn new(pull_request: PullRequestRef, reviewers: Vec<Reviewer>) -> Self {
        let fingerprint = pull_request.fingerprint();
        Self {
            pull_request,
            reviewers,
            fingerprint,
            processed: false,
        }
    }

    /// The pull request these reviews belong to.
    #[must_use]
    pub const fn pull_request(&self) -> &PullRequestRef {
        &self.pull_request
    }

    /// Reviewers in source-control order.
    #[must_use]
    pub fn reviewers(&self) -> &[Reviewer] {
        &self.reviewers
    }

    /// Fingerprint of the pull request.
    #[must_use]
    pub const fn fingerprint(&self) -> Fingerprint {
        self.fingerprint
    }

    /// True once a reward naming these reviewers has been dispatched.
    #[must_use]
    pub const fn is_processed(&self) -> bool {
        self.processed
    }

    pub(crate) const fn mark_processed(&mut self) {
        self.processed = true;
    }
}

/// Outcome of resolving one reviewer onto the rewards platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIdentity {
    /// Rewards-platform username, without the leading `@`.
    Handle(String),
    /// No lookup produced a handle.
    Unresolved,
}

impl ResolvedIdentity {
    /// Borrow the handle, if resolved.
    #[must_use]
    pub fn handle(&self) -> Option<&str> {
        match self {
            Self::Handle(handle) => Some(handle),
            Self::Unresolved => None,
        }
    }
}
