//! Handle-based slab allocation for Mote particle properties.
//!
//! A [`PropertyPool`] owns the scalar storage for every particle in a
//! population. Each allocation is a slot of exactly
//! [`n_properties_per_slot`](PropertyPool::n_properties_per_slot) scalars,
//! addressed by an opaque [`PropertyHandle`].
//!
//! # Architecture
//!
//! ```text
//! PropertyPool (one per population / subdomain)
//! ├── PoolId (process-unique, stamped into every handle)
//! ├── RefCell<SlotTable>
//! │   ├── slots: Vec<SlotState>   (generation + live flag per slot)
//! │   └── free_list: Vec<u32>     (dead slots, reused LIFO)
//! └── RefCell<Vec<f64>>           (slot i occupies [i*stride, (i+1)*stride))
//! ```
//!
//! Handles are `(pool, index, generation)` triples, never addresses, so the
//! backing vector can reallocate on growth without invalidating them. A
//! handle is neither `Clone` nor `Copy`: exactly one owner exists for each
//! live slot, and deallocation resets the owner's handle to
//! [`PropertyHandle::INVALID`].
//!
//! # Threading
//!
//! A pool is single-writer. Interior mutability lets many particles hold
//! `&PropertyPool` at once, and makes the pool `!Sync`. Property views
//! borrow the scalar storage dynamically: read views share it, a mutable
//! view excludes all others, and a conflicting operation returns
//! [`PoolError::StorageBorrowed`] instead of panicking.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod handle;
pub mod pool;

pub use config::PoolConfig;
pub use error::{InvalidHandleReason, PoolError};
pub use handle::PropertyHandle;
pub use pool::PropertyPool;
