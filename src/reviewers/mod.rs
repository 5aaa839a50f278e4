//! Reviewer identity handling: the heart of the reward pipeline.
//!
//! - [`Fingerprint`] labels a pull request across polling cycles.
//! - [`aggregate`] merges the reviewers of every review set into one
//!   deduplicated, first-seen-ordered list.
//! - [`IdentityResolver`] maps a reviewer onto a rewards-platform handle.
//! - [`RewardMessage`] composes the text sent to the rewards platform.

mod aggregate;
mod fingerprint;
mod message;
mod model;
mod resolver;

pub use aggregate::aggregate;
pub use fingerprint::Fingerprint;
pub use message::{DEFAULT_POINTS, DEFAULT_TAG, DEFAULT_THANK_YOU, MessageTemplate, RewardMessage};
pub use model::{ResolvedIdentity, ReviewSet, Reviewer};
pub use resolver::IdentityResolver;
