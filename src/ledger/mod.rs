//! Record of which reviewers have already been rewarded for which pull
//! request.
//!
//! The pipeline consults the ledger after fetching reviews and writes to it
//! only after a reward has been dispatched. Dispatch can fail after the
//! platform accepted the bonus, so delivery is at-least-once: a failed cycle
//! records nothing and the next cycle sends again.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, PoisonError};

use crate::reviewers::Fingerprint;

/// Storage for reviewers credited per pull request fingerprint.
///
/// Reviewers are keyed by [`Reviewer::credit_key`](crate::Reviewer::credit_key).
/// Fingerprints are 32-bit FNV-1a hashes and can collide. An implementation
/// that remembers fingerprints will treat a reviewer of a colliding pull
/// request as already credited when the same reviewer was credited for the
/// other one.
pub trait ProcessedLedger: Send + Sync {
    /// Whether a dispatched reward already credited `reviewer` for this pull
    /// request.
    fn is_credited(&self, fingerprint: Fingerprint, reviewer: &str) -> bool;

    /// Records the reviewers credited for one pull request after a
    /// successful dispatch.
    fn record(&self, fingerprint: Fingerprint, reviewers: &[String]);

    /// Forgets every pull request not in `open`.
    fn retain_open(&self, open: &[Fingerprint]);
}

/// Remembers credited reviewers for the lifetime of the process.
///
/// Entries for pull requests that leave the open listing are dropped on the
/// next cycle, so the ledger grows only with the number of open pull
/// requests.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    credited: Mutex<HashMap<Fingerprint, HashSet<String>>>,
}

impl InMemoryLedger {
    /// Creates an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pull requests with at least one credited reviewer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True when nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProcessedLedger for InMemoryLedger {
    fn is_credited(&self, fingerprint: Fingerprint, reviewer: &str) -> bool {
        self.credited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&fingerprint)
            .is_some_and(|reviewers| reviewers.contains(reviewer))
    }

    fn record(&self, fingerprint: Fingerprint, reviewers: &[String]) {
        if reviewers.is_empty() {
            return;
        }
        self.credited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(fingerprint)
            .or_default()
            .extend(reviewers.iter().cloned());
    }

    fn retain_open(&self, open: &[Fingerprint]) {
        let mut credited = self.credited.lock().unwrap_or_else(PoisonError::into_inner);
        let before = credited.len();
        credited.retain(|fingerprint, _| open.contains(fingerprint));
        let forgotten = before - credited.len();
        if forgotten > 0 {
            tracing::debug!("forgot {forgotten} pull requests that are no longer open");
        }
    }
}

/// Remembers nothing: every cycle recomputes rewards for every open pull
/// request.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLedger;

impl ProcessedLedger for NullLedger {
    fn is_credited(&self, _fingerprint: Fingerprint, _reviewer: &str) -> bool {
        false
    }

    fn record(&self, _fingerprint: Fingerprint, _reviewers: &[String]) {}

    fn retain_open(&self, _open: &[Fingerprint]) {}
}
