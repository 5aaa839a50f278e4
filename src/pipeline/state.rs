//! Cycle states, the per-cycle session and the report it produces.

use std::fmt;

use crate::github::PullRequestRef;
use crate::reviewers::{ResolvedIdentity, ReviewSet, RewardMessage, Reviewer};

/// Stages a reward cycle moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    /// Loading the acting user, their open pull requests and reviews.
    Fetching,
    /// Merging reviewers across review sets.
    Aggregating,
    /// Looking up rewards handles.
    Resolving,
    /// Building the reward text.
    Composing,
    /// Sending the reward.
    Dispatching,
    /// Finished; included review sets are processed if a reward was sent.
    Done,
    /// Ended early on an unrecoverable error.
    Failed,
}

impl fmt::Display for CycleState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Fetching => "fetching",
            Self::Aggregating => "aggregating",
            Self::Resolving => "resolving",
            Self::Composing => "composing",
            Self::Dispatching => "dispatching",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        formatter.write_str(name)
    }
}

/// A pull request left out of the cycle because its reviews could not be
/// loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPullRequest {
    /// The pull request that was skipped.
    pub pull_request: PullRequestRef,
    /// Why its reviews could not be loaded.
    pub reason: String,
}

/// A reviewer paired with the outcome of resolving them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerIdentity {
    /// The aggregated reviewer.
    pub reviewer: Reviewer,
    /// Their rewards handle, if any.
    pub identity: ResolvedIdentity,
}

/// Summary of a completed cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// State the cycle ended in.
    pub state: CycleState,
    /// Login the cycle ran as.
    pub acting_user: String,
    /// Review sets included in the cycle.
    pub review_sets: Vec<ReviewSet>,
    /// Pull requests excluded because every reviewer was already credited.
    pub already_processed: Vec<PullRequestRef>,
    /// Pull requests excluded because nobody identifiable has reviewed them.
    pub unreviewed: Vec<PullRequestRef>,
    /// Pull requests excluded because their reviews failed to load.
    pub skipped: Vec<SkippedPullRequest>,
    /// Unique reviewers with their resolution outcome, in aggregate order.
    pub reviewers: Vec<ReviewerIdentity>,
    /// Composed message, if the cycle got that far.
    pub message: Option<RewardMessage>,
    /// Whether the message was sent.
    pub dispatched: bool,
}

impl CycleReport {
    /// Handles mentioned in the message, in order.
    #[must_use]
    pub fn handles(&self) -> Vec<&str> {
        self.reviewers
            .iter()
            .filter_map(|entry| entry.identity.handle())
            .collect()
    }
}

/// Working state owned by the pipeline for the duration of one cycle.
#[derive(Debug)]
pub(super) struct CycleSession {
    pub(super) report: CycleReport,
}

impl CycleSession {
    pub(super) const fn new() -> Self {
        Self {
            report: CycleReport {
                state: CycleState::Fetching,
                acting_user: String::new(),
                review_sets: Vec::new(),
                already_processed: Vec::new(),
                unreviewed: Vec::new(),
                skipped: Vec::new(),
                reviewers: Vec::new(),
                message: None,
                dispatched: false,
            },
        }
    }

    pub(super) fn enter(&mut self, next: CycleState) {
        tracing::debug!("reward cycle {} -> {next}", self.report.state);
        self.report.state = next;
    }
}
