//! Stable labels for pull requests.

use std::fmt;

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// 32-bit FNV-1a hash of `"owner-repo-number"`, rendered in decimal.
///
/// Fingerprints are not collision resistant. Anything keyed on them (see
/// [`crate::ledger::ProcessedLedger`]) must tolerate two pull requests
/// sharing a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(u32);

impl Fingerprint {
    /// Computes the fingerprint of an owner/repository/number triple.
    #[must_use]
    pub fn compute(owner: &str, repository: &str, number: u64) -> Self {
        Self(fnv1a(format!("{owner}-{repository}-{number}").as_bytes()))
    }

    /// Raw hash value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}
