//! Strongly-typed identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Globally unique particle identifier.
///
/// Uniqueness across a distributed population is the caller's obligation;
/// nothing in this workspace checks it. Encoded as a little-endian `u64`
/// in particle records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ParticleId(pub u64);

impl fmt::Display for ParticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ParticleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Counter for unique [`PoolId`] allocation.
static POOL_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a property pool.
///
/// Allocated from a monotonic atomic counter via [`PoolId::next`]. Every
/// handle a pool issues carries its pool's ID, so a pool can reject
/// handles that another pool issued, including a pool that was dropped
/// and replaced by a new one at the same address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(u64);

impl PoolId {
    /// ID carried by the invalid handle. Never returned by [`PoolId::next`].
    pub const NONE: PoolId = PoolId(0);

    /// Allocate a fresh, unique pool ID.
    ///
    /// Each call returns a new ID that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(POOL_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_ids_are_unique_and_never_none() {
        let a = PoolId::next();
        let b = PoolId::next();
        assert_ne!(a, b);
        assert_ne!(a, PoolId::NONE);
        assert_ne!(b, PoolId::NONE);
    }

    #[test]
    fn particle_id_display_and_from() {
        let id: ParticleId = 42u64.into();
        assert_eq!(id, ParticleId(42));
        assert_eq!(id.to_string(), "42");
        assert_eq!(ParticleId::default(), ParticleId(0));
    }
}
