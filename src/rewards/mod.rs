//! Rewards-platform side of the pipeline.
//!
//! [`RewardsGateway`] is the seam the pipeline depends on; [`BonuslyGateway`]
//! implements it against the Bonusly REST API.

mod bonusly;
pub mod error;

pub use bonusly::{BonuslyConfig, BonuslyGateway};
pub use error::RewardsError;

use async_trait::async_trait;

/// Gateway onto the rewards platform's user directory and bonus endpoint.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RewardsGateway: Send + Sync {
    /// Username of the first user whose email matches exactly.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<String>, RewardsError>;

    /// Username of the top autocomplete suggestion for a display name.
    async fn autocomplete_user(&self, name: &str) -> Result<Option<String>, RewardsError>;

    /// Posts one bonus whose reason is `reason`.
    async fn grant_bonus(&self, reason: &str) -> Result<(), RewardsError>;
}
