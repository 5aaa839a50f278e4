//! Maps reviewers onto rewards-platform handles.

use std::future::Future;
use std::time::Duration;

use crate::rewards::{RewardsError, RewardsGateway};

use super::model::{ResolvedIdentity, Reviewer};

/// Resolves reviewers through the rewards platform's user directory.
///
/// Lookups are tried in a fixed order: email lookup when the reviewer has an
/// email, then name autocomplete when they have a display name. Each lookup
/// that errors, times out or finds nothing falls through to the next one, so
/// resolving never fails; the worst outcome is
/// [`ResolvedIdentity::Unresolved`].
pub struct IdentityResolver<'client, Gateway>
where
    Gateway: RewardsGateway + ?Sized,
{
    gateway: &'client Gateway,
    lookup_timeout: Duration,
}

impl<'client, Gateway> IdentityResolver<'client, Gateway>
where
    Gateway: RewardsGateway + ?Sized,
{
    /// Creates a resolver bounding each lookup by `lookup_timeout`.
    #[must_use]
    pub const fn new(gateway: &'client Gateway, lookup_timeout: Duration) -> Self {
        Self {
            gateway,
            lookup_timeout,
        }
    }

    /// Resolves one reviewer. Results are never cached.
    pub async fn resolve(&self, reviewer: &Reviewer) -> ResolvedIdentity {
        let email = reviewer.email();
        if !email.is_empty()
            && let Some(handle) = self
                .attempt("email", reviewer, self.gateway.find_user_by_email(email))
                .await
        {
            return ResolvedIdentity::Handle(handle);
        }

        let name = reviewer.display_name();
        if !name.is_empty()
            && let Some(handle) = self
                .attempt("autocomplete", reviewer, self.gateway.autocomplete_user(name))
                .await
        {
            return ResolvedIdentity::Handle(handle);
        }

        tracing::debug!("no rewards handle for reviewer {}", reviewer.label());
        ResolvedIdentity::Unresolved
    }

    async fn attempt<Lookup>(&self, step: &str, reviewer: &Reviewer, lookup: Lookup) -> Option<String>
    where
        Lookup: Future<Output = Result<Option<String>, RewardsError>>,
    {
        let label = reviewer.label();
        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(found)) => {
                let handle = found.as_deref().and_then(normalise_handle);
                if handle.is_none() {
                    tracing::debug!("{step} lookup found no match for {label}");
                }
                handle
            }
            Ok(Err(error)) => {
                tracing::debug!("{step} lookup for {label} failed: {error}");
                None
            }
            Err(_) => {
                tracing::debug!(
                    "{step} lookup for {label} timed out after {:?}",
                    self.lookup_timeout
                );
                None
            }
        }
    }
}

fn normalise_handle(raw: &str) -> Option<String> {
    let handle = raw.trim().trim_start_matches('@');
    if handle.is_empty() {
        None
    } else {
        Some(handle.to_owned())
    }
}
