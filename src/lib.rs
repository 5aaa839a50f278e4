//! Kudos library crate: rewards the people who review your pull requests.
//!
//! Each reward cycle asks GitHub who the token belongs to, lists that user's
//! open pull requests, gathers everyone who reviewed them, maps each reviewer
//! onto a Bonusly handle and posts a single bonus mentioning them all. The
//! [`Scheduler`] repeats the cycle on a fixed interval and a
//! [`ProcessedLedger`] stops a reviewer from being rewarded twice for the
//! same pull request.

pub mod config;
pub mod error;
pub mod github;
pub mod ledger;
pub mod pipeline;
pub mod reviewers;
pub mod rewards;
pub mod scheduler;

pub use config::{KudosConfig, LedgerKind};
pub use error::KudosError;
pub use github::{
    CodeHostGateway, GitHubError, OctocrabGateway, PersonalAccessToken, PullRequestRef,
};
pub use ledger::{InMemoryLedger, NullLedger, ProcessedLedger};
pub use pipeline::{
    CycleError, CycleReport, CycleState, EmptyMentionPolicy, PipelineOptions, RewardPipeline,
};
pub use reviewers::{Fingerprint, MessageTemplate, ResolvedIdentity, ReviewSet, Reviewer};
pub use rewards::{BonuslyConfig, BonuslyGateway, RewardsError, RewardsGateway};
pub use scheduler::{RewardCycle, RunSummary, Scheduler, TickOutcome};
