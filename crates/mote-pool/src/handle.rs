//! Opaque property slot handles.
//!
//! A [`PropertyHandle`] names one slot in one pool. It is generation-scoped:
//! releasing a slot bumps the slot's generation, so any handle that outlived
//! the release is detected in O(1) without a lookup table.

use std::fmt;

use mote_core::PoolId;

/// Identity of an allocated property slot.
///
/// Deliberately neither `Clone` nor `Copy`: a live slot has exactly one
/// owning handle. Handles compare equal only if they name the same slot
/// of the same pool in the same generation.
#[derive(Debug, PartialEq, Eq, Hash)]
#[must_use]
pub struct PropertyHandle {
    /// Pool that issued this handle.
    pub(crate) pool: PoolId,
    /// Slot index within the pool.
    pub(crate) index: u32,
    /// Slot generation when this handle was issued.
    pub(crate) generation: u32,
}

impl PropertyHandle {
    /// Sentinel meaning "no properties". Never returned by an allocation.
    pub const INVALID: PropertyHandle = PropertyHandle {
        pool: PoolId::NONE,
        index: u32::MAX,
        generation: 0,
    };

    pub(crate) fn new(pool: PoolId, index: u32, generation: u32) -> Self {
        Self {
            pool,
            index,
            generation,
        }
    }

    /// Whether this is anything other than [`PropertyHandle::INVALID`].
    ///
    /// A valid-looking handle may still be stale; only the issuing pool
    /// can tell (see [`PropertyPool::is_valid`](crate::PropertyPool::is_valid)).
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }

    /// The pool that issued this handle.
    pub fn pool(&self) -> PoolId {
        self.pool
    }

    /// Move the handle out, leaving [`PropertyHandle::INVALID`] behind.
    pub fn take(&mut self) -> PropertyHandle {
        std::mem::replace(self, Self::INVALID)
    }
}

impl Default for PropertyHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for PropertyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(
                f,
                "PropertyHandle(pool={}, idx={}, gen={})",
                self.pool, self.index, self.generation
            )
        } else {
            write!(f, "PropertyHandle(invalid)")
        }
    }
}
