//! Fixed-interval driver for reward cycles.
//!
//! The first tick fires immediately, then one tick per period. Each tick runs
//! on its own task behind a single in-flight guard: a tick that fires while a
//! cycle is still running is skipped and logged. Ticks missed because the
//! runtime was busy are skipped rather than replayed in a burst.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;

use crate::github::CodeHostGateway;
use crate::ledger::ProcessedLedger;
use crate::pipeline::{CycleError, CycleReport, RewardPipeline};
use crate::rewards::RewardsGateway;

/// Something the scheduler can run once per tick.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardCycle: Send + Sync {
    /// Runs one cycle to completion.
    async fn run(&self) -> Result<CycleReport, CycleError>;
}

#[async_trait]
impl<Host, Rewards, Ledger> RewardCycle for RewardPipeline<Host, Rewards, Ledger>
where
    Host: CodeHostGateway,
    Rewards: RewardsGateway,
    Ledger: ProcessedLedger,
{
    async fn run(&self) -> Result<CycleReport, CycleError> {
        self.run_cycle().await
    }
}

/// Result of a single tick.
#[derive(Debug)]
pub enum TickOutcome {
    /// The cycle ran to completion.
    Completed(Box<CycleReport>),
    /// The cycle ended early; the next tick starts afresh.
    Failed(CycleError),
    /// Another cycle was still running.
    Skipped,
}

/// Tick counts from [`Scheduler::run_until`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Cycles that completed.
    pub completed: usize,
    /// Cycles that ended with an error.
    pub failed: usize,
    /// Ticks skipped by the in-flight guard.
    pub skipped: usize,
}

impl RunSummary {
    fn count(&mut self, outcome: &TickOutcome) {
        match outcome {
            TickOutcome::Completed(_) => self.completed += 1,
            TickOutcome::Failed(_) => self.failed += 1,
            TickOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Runs a [`RewardCycle`] on a fixed period.
pub struct Scheduler<Cycle>
where
    Cycle: RewardCycle + 'static,
{
    cycle: Arc<Cycle>,
    period: Duration,
    in_flight: Arc<Mutex<()>>,
}

impl<Cycle> Clone for Scheduler<Cycle>
where
    Cycle: RewardCycle + 'static,
{
    fn clone(&self) -> Self {
        Self {
            cycle: Arc::clone(&self.cycle),
            period: self.period,
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<Cycle> Scheduler<Cycle>
where
    Cycle: RewardCycle + 'static,
{
    /// Creates a scheduler running `cycle` every `period`.
    #[must_use]
    pub fn new(cycle: Cycle, period: Duration) -> Self {
        Self {
            cycle: Arc::new(cycle),
            period,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// The driven cycle.
    #[must_use]
    pub fn cycle(&self) -> &Cycle {
        &self.cycle
    }

    /// Runs one cycle unless another is in flight.
    pub async fn tick(&self) -> TickOutcome {
        let Ok(_guard) = self.in_flight.try_lock() else {
            tracing::warn!("previous reward cycle still running; skipping tick");
            return TickOutcome::Skipped;
        };
        match self.cycle.run().await {
            Ok(report) => TickOutcome::Completed(Box::new(report)),
            Err(error) => TickOutcome::Failed(error),
        }
    }

    /// Ticks until `shutdown` resolves, then waits for the running cycle.
    pub async fn run_until<Shutdown>(&self, shutdown: Shutdown) -> RunSummary
    where
        Shutdown: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut running = JoinSet::new();
        let mut summary = RunSummary::default();
        tokio::pin!(shutdown);

        tracing::info!("polling every {:?}", self.period);
        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("shutdown requested, stopping scheduler");
                    break;
                }
                _ = interval.tick() => {
                    let scheduler = self.clone();
                    running.spawn(async move { scheduler.tick().await });
                }
                Some(joined) = running.join_next() => record(&mut summary, joined),
            }
        }

        while let Some(joined) = running.join_next().await {
            record(&mut summary, joined);
        }
        summary
    }
}

fn record(summary: &mut RunSummary, joined: Result<TickOutcome, tokio::task::JoinError>) {
    match joined {
        Ok(outcome) => summary.count(&outcome),
        Err(error) => {
            tracing::error!("reward cycle task aborted: {error}");
            summary.failed += 1;
        }
    }
}
