//! The reward cycle: fetch, aggregate, resolve, compose, dispatch.
//!
//! [`RewardPipeline`] owns its collaborators for its whole lifetime and
//! creates a fresh [`CycleSession`](state::CycleSession) for each call to
//! [`RewardPipeline::run_cycle`]. Nothing but the injected
//! [`ProcessedLedger`] survives between cycles.
//!
//! Failure policy:
//!
//! - acting user or listing failures end the cycle with a [`CycleError`];
//! - a pull request whose reviews cannot be loaded is skipped;
//! - a pull request with no reviewer left to credit is left out;
//! - a reviewer that cannot be resolved is left out of the mentions;
//! - a dispatch failure ends the cycle without marking anything processed.

mod error;
mod state;

pub use error::CycleError;
pub use state::{CycleReport, CycleState, ReviewerIdentity, SkippedPullRequest};

use std::future::Future;
use std::time::Duration;

use crate::github::{CodeHostGateway, GitHubError, PullRequestRef};
use crate::ledger::ProcessedLedger;
use crate::reviewers::{
    Fingerprint, IdentityResolver, MessageTemplate, ReviewSet, Reviewer, RewardMessage, aggregate,
};
use crate::rewards::RewardsGateway;

use state::CycleSession;

const DEFAULT_CALL_TIMEOUT_SECS: u64 = 20;

/// What to do when no reviewer resolved to a rewards handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EmptyMentionPolicy {
    /// Send the reward text without mentions so the cycle stays visible.
    #[default]
    Dispatch,
    /// Skip dispatch and leave the review sets unprocessed.
    Suppress,
}

/// Static settings for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Fixed parts of the reward message.
    pub template: MessageTemplate,
    /// Upper bound for each call to an external collaborator.
    pub call_timeout: Duration,
    /// Behaviour when the message would mention nobody.
    pub empty_mentions: EmptyMentionPolicy,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            template: MessageTemplate::default(),
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
            empty_mentions: EmptyMentionPolicy::default(),
        }
    }
}

/// Orchestrates one reward cycle per call.
pub struct RewardPipeline<Host, Rewards, Ledger>
where
    Host: CodeHostGateway,
    Rewards: RewardsGateway,
    Ledger: ProcessedLedger,
{
    code_host: Host,
    rewards: Rewards,
    ledger: Ledger,
    options: PipelineOptions,
}

impl<Host, Rewards, Ledger> RewardPipeline<Host, Rewards, Ledger>
where
    Host: CodeHostGateway,
    Rewards: RewardsGateway,
    Ledger: ProcessedLedger,
{
    /// Creates a pipeline from its collaborators.
    #[must_use]
    pub const fn new(
        code_host: Host,
        rewards: Rewards,
        ledger: Ledger,
        options: PipelineOptions,
    ) -> Self {
        Self {
            code_host,
            rewards,
            ledger,
            options,
        }
    }

    /// The ledger consulted and updated by each cycle.
    #[must_use]
    pub const fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Runs one complete cycle.
    ///
    /// # Errors
    ///
    /// Returns [`CycleError`] when the acting user or their pull requests
    /// cannot be loaded, or when the reward cannot be dispatched. In every
    /// error case no reviewer is recorded as credited.
    pub async fn run_cycle(&self) -> Result<CycleReport, CycleError> {
        let mut session = CycleSession::new();
        match self.drive(&mut session).await {
            Ok(()) => {
                let report = session.report;
                tracing::info!(
                    "reward cycle done: {} pull requests, {} reviewers, {} mentioned, dispatched: {}",
                    report.review_sets.len(),
                    report.reviewers.len(),
                    report.handles().len(),
                    report.dispatched
                );
                Ok(report)
            }
            Err(error) => {
                let failed_in = session.report.state;
                session.enter(CycleState::Failed);
                tracing::error!("reward cycle failed while {failed_in}: {error}");
                Err(error)
            }
        }
    }

    async fn drive(&self, session: &mut CycleSession) -> Result<(), CycleError> {
        self.fetch(session).await?;
        if session.report.review_sets.is_empty() {
            tracing::info!("no pull requests with reviewers left to reward");
            session.enter(CycleState::Done);
            return Ok(());
        }

        session.enter(CycleState::Aggregating);
        let reviewers = aggregate(&session.report.review_sets, &session.report.acting_user);
        tracing::info!("found {} unique reviewers", reviewers.len());

        session.enter(CycleState::Resolving);
        let resolver = IdentityResolver::new(&self.rewards, self.options.call_timeout);
        for reviewer in reviewers {
            let identity = resolver.resolve(&reviewer).await;
            session
                .report
                .reviewers
                .push(ReviewerIdentity { reviewer, identity });
        }

        session.enter(CycleState::Composing);
        let message = self.options.template.compose(&session.report.handles());
        tracing::info!("generated message: {message}");
        session.report.message = Some(message.clone());
        if message.is_empty() {
            if self.options.empty_mentions == EmptyMentionPolicy::Suppress {
                tracing::warn!("no reviewer resolved to a rewards handle; dispatch suppressed");
                session.enter(CycleState::Done);
                return Ok(());
            }
            tracing::warn!("no reviewer resolved to a rewards handle; sending without mentions");
        }

        session.enter(CycleState::Dispatching);
        self.dispatch(&message).await?;
        session.report.dispatched = true;

        session.enter(CycleState::Done);
        for set in &mut session.report.review_sets {
            set.mark_processed();
            let credited: Vec<String> = set.reviewers().iter().map(Reviewer::credit_key).collect();
            self.ledger.record(set.fingerprint(), &credited);
        }
        Ok(())
    }

    async fn fetch(&self, session: &mut CycleSession) -> Result<(), CycleError> {
        let timeout = self.options.call_timeout;
        let acting_user = bounded(
            timeout,
            "authenticated user",
            self.code_host.authenticated_user(),
        )
        .await
        .map_err(CycleError::ActingUser)?;
        let pulls = bounded(
            timeout,
            "search pull requests",
            self.code_host.open_pull_requests(&acting_user),
        )
        .await
        .map_err(CycleError::Listing)?;
        session.report.acting_user = acting_user;

        let open: Vec<Fingerprint> = pulls.iter().map(PullRequestRef::fingerprint).collect();
        self.ledger.retain_open(&open);

        for pull in pulls {
            match bounded(timeout, "list reviews", self.code_host.reviewers(&pull)).await {
                Ok(reviewers) => self.include(session, pull, reviewers),
                Err(error) => skip(session, pull, &error),
            }
        }
        Ok(())
    }

    /// Keeps the reviewers of `pull` that are identifiable, not the acting
    /// user and not yet credited for it.
    fn include(&self, session: &mut CycleSession, pull: PullRequestRef, reviewers: Vec<Reviewer>) {
        let fingerprint = pull.fingerprint();
        let acting_user = session.report.acting_user.as_str();
        let (credited, pending): (Vec<Reviewer>, Vec<Reviewer>) = reviewers
            .into_iter()
            .filter(|reviewer| reviewer.is_identifiable() && !reviewer.is_user(acting_user))
            .partition(|reviewer| self.ledger.is_credited(fingerprint, &reviewer.credit_key()));

        if !pending.is_empty() {
            tracing::debug!(
                "{pull} ({fingerprint}) has {} reviewers to reward, {} already credited",
                pending.len(),
                credited.len()
            );
            session.report.review_sets.push(ReviewSet::new(pull, pending));
        } else if credited.is_empty() {
            tracing::debug!("{pull} ({fingerprint}) has no reviewers yet");
            session.report.unreviewed.push(pull);
        } else {
            tracing::debug!("{pull} ({fingerprint}) already rewarded");
            session.report.already_processed.push(pull);
        }
    }

    async fn dispatch(&self, message: &RewardMessage) -> Result<(), CycleError> {
        let after = self.options.call_timeout;
        match tokio::time::timeout(after, self.rewards.grant_bonus(message.text())).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(source)) => Err(CycleError::Dispatch {
                message: message.text().to_owned(),
                source,
            }),
            Err(_) => Err(CycleError::DispatchTimedOut {
                message: message.text().to_owned(),
                after,
            }),
        }
    }
}

fn skip(session: &mut CycleSession, pull_request: PullRequestRef, error: &GitHubError) {
    tracing::warn!("skipping {pull_request}: {error}");
    session.report.skipped.push(SkippedPullRequest {
        pull_request,
        reason: error.to_string(),
    });
}

async fn bounded<T, Call>(after: Duration, operation: &str, call: Call) -> Result<T, GitHubError>
where
    Call: Future<Output = Result<T, GitHubError>>,
{
    tokio::time::timeout(after, call)
        .await
        .unwrap_or_else(|_| {
            Err(GitHubError::Network {
                message: format!("{operation} timed out after {after:?}"),
            })
        })
}
