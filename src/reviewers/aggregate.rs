//! Merges reviewers from every review set of a cycle.

use super::model::{ReviewSet, Reviewer};

/// Collects the unique reviewers across `sets`, in first-seen order.
///
/// Reviewers that cannot be identified (no login and no display name) and
/// the acting user are left out. A later reviewer that
/// [`is_same_person`](Reviewer::is_same_person) as an earlier one is dropped.
#[must_use]
pub fn aggregate<'sets, I>(sets: I, acting_user: &str) -> Vec<Reviewer>
where
    I: IntoIterator<Item = &'sets ReviewSet>,
{
    let mut unique: Vec<Reviewer> = Vec::new();
    for reviewer in sets.into_iter().flat_map(ReviewSet::reviewers) {
        if !reviewer.is_identifiable() || reviewer.is_user(acting_user) {
            continue;
        }
        if unique.iter().any(|kept| kept.is_same_person(reviewer)) {
            continue;
        }
        unique.push(reviewer.clone());
    }
    unique
}
