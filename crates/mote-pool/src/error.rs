//! Pool-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during property pool operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// The handle is not currently allocated in this pool: it is the
    /// invalid sentinel, was issued by another pool, or its slot has
    /// already been released.
    InvalidHandle {
        /// Which check rejected the handle.
        reason: InvalidHandleReason,
    },
    /// The pool cannot grow to satisfy an allocation.
    OutOfResources {
        /// Number of live slots that would be needed.
        requested: usize,
        /// Maximum number of live slots this pool supports.
        capacity: usize,
    },
    /// Pool storage is held by an outstanding property view that conflicts
    /// with this operation. Drop the view and retry.
    StorageBorrowed,
}

/// Why a handle was rejected with [`PoolError::InvalidHandle`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidHandleReason {
    /// The handle is [`PropertyHandle::INVALID`](crate::PropertyHandle::INVALID).
    Sentinel,
    /// The handle was issued by a different pool.
    ForeignPool,
    /// The slot was released since the handle was issued.
    Stale,
    /// The index is outside this pool's slot table.
    OutOfRange,
}

impl fmt::Display for InvalidHandleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentinel => write!(f, "invalid sentinel"),
            Self::ForeignPool => write!(f, "issued by another pool"),
            Self::Stale => write!(f, "slot already released"),
            Self::OutOfRange => write!(f, "index out of range"),
        }
    }
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle { reason } => write!(f, "invalid property handle: {reason}"),
            Self::OutOfResources {
                requested,
                capacity,
            } => {
                write!(
                    f,
                    "property pool exhausted: requested {requested} slots, capacity {capacity} slots"
                )
            }
            Self::StorageBorrowed => {
                write!(f, "property storage is held by an outstanding view")
            }
        }
    }
}

impl Error for PoolError {}
