//! Slab allocator for fixed-stride property arrays.
//!
//! [`PropertyPool`] hands out slots of `properties_per_slot` scalars. Slot
//! `i` always occupies `data[i * stride..(i + 1) * stride]`; released slots
//! go on a free list and are reused before the table grows. Because reuse
//! is always exact-size, the table never fragments.
//!
//! Slot bookkeeping and scalar storage sit in separate cells. Views
//! returned by [`PropertyPool::get_properties`] borrow only the storage, so
//! releasing slots and querying counts never conflict with them. An
//! operation that must write storage while a conflicting view is alive
//! fails with [`PoolError::StorageBorrowed`].

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::ops::Range;

use mote_core::{PoolId, Scalar};

use crate::config::PoolConfig;
use crate::error::{InvalidHandleReason, PoolError};
use crate::handle::PropertyHandle;

/// Bookkeeping for one slot (live or dead).
#[derive(Clone, Copy, Debug)]
struct SlotState {
    /// Bumped every time the slot is released.
    generation: u32,
    /// Whether a handle currently owns this slot.
    live: bool,
}

/// Slot bookkeeping. Borrows of this table never outlive a pool method.
struct SlotTable {
    /// Per-slot state, indexed by slot index.
    slots: Vec<SlotState>,
    /// Indices of dead slots available for reuse.
    free_list: Vec<u32>,
    /// Number of live slots.
    live: usize,
}

/// Pooled storage for the properties of a particle population.
///
/// Many particles borrow one pool; the pool never knows about them. The
/// pool must outlive every particle that references it, which the borrow
/// checker enforces through the particle's lifetime parameter.
///
/// All operations take `&self`. Any number of read views may be held at
/// once; a mutable view excludes every other view. Allocation writes
/// storage, so it fails with [`PoolError::StorageBorrowed`] while any view
/// is held. Release and the diagnostics never touch storage.
pub struct PropertyPool {
    id: PoolId,
    config: PoolConfig,
    table: RefCell<SlotTable>,
    data: RefCell<Vec<Scalar>>,
}

impl PropertyPool {
    /// Create a growable pool whose slots hold `properties_per_slot` scalars.
    pub fn new(properties_per_slot: usize) -> Self {
        Self::with_config(PoolConfig::new(properties_per_slot))
    }

    /// Create a pool from an explicit configuration.
    pub fn with_config(config: PoolConfig) -> Self {
        let id = PoolId::next();
        tracing::debug!(
            pool = %id,
            stride = config.properties_per_slot,
            reserve = config.initial_reservation(),
            "creating property pool"
        );
        let pool = Self {
            id,
            table: RefCell::new(SlotTable {
                slots: Vec::new(),
                free_list: Vec::new(),
                live: 0,
            }),
            data: RefCell::new(Vec::new()),
            config,
        };
        pool.reserve(pool.config.initial_reservation());
        pool
    }

    /// This pool's unique identity.
    pub fn id(&self) -> PoolId {
        self.id
    }

    /// The configuration this pool was built from.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of scalars in every slot, fixed at construction.
    pub fn n_properties_per_slot(&self) -> usize {
        self.config.properties_per_slot
    }

    /// Pre-allocate storage for at least `n` slots in total.
    ///
    /// Has no observable effect beyond avoiding reallocation: live slot
    /// contents and outstanding handles are untouched. If the memory cannot
    /// be reserved, or a view is holding the storage, this does nothing.
    pub fn reserve(&self, n: usize) {
        let n = n.min(self.config.slot_limit());
        let mut table = self.table.borrow_mut();
        let additional = n.saturating_sub(table.slots.len());
        if additional == 0 {
            return;
        }
        let Some(scalars) = additional.checked_mul(self.config.properties_per_slot) else {
            return;
        };
        let Ok(mut data) = self.data.try_borrow_mut() else {
            return;
        };
        let reserved = data
            .try_reserve(scalars)
            .and_then(|()| table.slots.try_reserve(additional));
        match reserved {
            Ok(()) => tracing::debug!(pool = %self.id, slots = n, "reserved property slots"),
            Err(e) => tracing::debug!(pool = %self.id, slots = n, error = %e, "reservation skipped"),
        }
    }

    /// Allocate a zero-initialised slot and return its handle.
    ///
    /// Dead slots are reused before the table grows. Amortised O(1).
    /// Fails with [`PoolError::OutOfResources`] when the configured slot
    /// limit is reached, and with [`PoolError::StorageBorrowed`] while a
    /// view into this pool is held.
    pub fn allocate_properties_array(&self) -> Result<PropertyHandle, PoolError> {
        let mut data = self.storage_mut()?;
        self.allocate_in(&mut self.table.borrow_mut(), &mut data)
    }

    /// Allocate a new slot holding a copy of `handle`'s values.
    ///
    /// Either both the allocation and the copy happen, or neither does.
    pub fn duplicate(&self, handle: &PropertyHandle) -> Result<PropertyHandle, PoolError> {
        let mut data = self.storage_mut()?;
        let mut table = self.table.borrow_mut();
        let src = self.slot_range(&table, handle)?;
        let copy = self.allocate_in(&mut table, &mut data)?;
        let dst = copy.index as usize * self.config.properties_per_slot;
        data.copy_within(src, dst);
        Ok(copy)
    }

    /// Release `handle`'s slot for reuse and reset `handle` to
    /// [`PropertyHandle::INVALID`].
    ///
    /// Fails with [`PoolError::InvalidHandle`] (leaving `handle` untouched)
    /// if the handle is the sentinel, was issued by another pool, or its
    /// slot was already released. Releasing through the same handle twice
    /// therefore reports the sentinel on the second call. Storage is not
    /// touched, so outstanding views never block a release.
    pub fn deallocate_properties_array(
        &self,
        handle: &mut PropertyHandle,
    ) -> Result<(), PoolError> {
        let mut table = self.table.borrow_mut();
        self.slot_range(&table, handle)?;

        let index = handle.index;
        let slot = &mut table.slots[index as usize];
        slot.live = false;
        slot.generation = slot.generation.wrapping_add(1);
        table.free_list.push(index);
        table.live -= 1;

        *handle = PropertyHandle::INVALID;
        Ok(())
    }

    /// Read-only view of `handle`'s slot.
    ///
    /// O(1); returns a view into pool storage, not a copy. Fails with
    /// [`PoolError::StorageBorrowed`] while a mutable view is held.
    pub fn get_properties(&self, handle: &PropertyHandle) -> Result<Ref<'_, [Scalar]>, PoolError> {
        let range = self.slot_range(&self.table.borrow(), handle)?;
        let data = self
            .data
            .try_borrow()
            .map_err(|_| PoolError::StorageBorrowed)?;
        Ok(Ref::map(data, |d| &d[range]))
    }

    /// Mutable view of `handle`'s slot.
    ///
    /// Writes through the view are visible to subsequent reads. Fails with
    /// [`PoolError::StorageBorrowed`] while any other view is held.
    pub fn get_properties_mut(
        &self,
        handle: &PropertyHandle,
    ) -> Result<RefMut<'_, [Scalar]>, PoolError> {
        let range = self.slot_range(&self.table.borrow(), handle)?;
        let data = self.storage_mut()?;
        Ok(RefMut::map(data, |d| &mut d[range]))
    }

    /// Whether `handle` currently names a live slot of this pool.
    pub fn is_valid(&self, handle: &PropertyHandle) -> bool {
        self.slot_range(&self.table.borrow(), handle).is_ok()
    }

    /// Number of live slots.
    pub fn n_slots_allocated(&self) -> usize {
        self.table.borrow().live
    }

    /// Number of dead slots available for reuse.
    pub fn n_free_slots(&self) -> usize {
        self.table.borrow().free_list.len()
    }

    /// Total slots (live + dead).
    pub fn total_slots(&self) -> usize {
        self.table.borrow().slots.len()
    }

    /// Number of slots the table can hold without reallocating.
    pub fn capacity(&self) -> usize {
        self.table.borrow().slots.capacity()
    }

    fn storage_mut(&self) -> Result<RefMut<'_, Vec<Scalar>>, PoolError> {
        self.data
            .try_borrow_mut()
            .map_err(|_| PoolError::StorageBorrowed)
    }

    fn allocate_in(
        &self,
        table: &mut SlotTable,
        data: &mut Vec<Scalar>,
    ) -> Result<PropertyHandle, PoolError> {
        let stride = self.config.properties_per_slot;
        let limit = self.config.slot_limit();

        if table.live >= limit {
            return Err(PoolError::OutOfResources {
                requested: table.live + 1,
                capacity: limit,
            });
        }

        let index = if let Some(index) = table.free_list.pop() {
            let start = index as usize * stride;
            data[start..start + stride].fill(0.0);
            index
        } else {
            if table.slots.len() == table.slots.capacity() {
                tracing::debug!(
                    pool = %self.id,
                    slots = table.slots.len(),
                    "growing property slot table"
                );
            }
            // live < limit and the free list is empty, so len < limit <= MAX_INDEX + 1.
            let index = table.slots.len() as u32;
            table.slots.push(SlotState {
                generation: 0,
                live: false,
            });
            data.resize(data.len() + stride, 0.0);
            index
        };

        let slot = &mut table.slots[index as usize];
        debug_assert!(!slot.live, "free list held a live slot");
        slot.live = true;
        let generation = slot.generation;
        table.live += 1;

        Ok(PropertyHandle::new(self.id, index, generation))
    }

    /// Validate `handle` against this pool and return its scalar range.
    fn slot_range(
        &self,
        table: &SlotTable,
        handle: &PropertyHandle,
    ) -> Result<Range<usize>, PoolError> {
        let reason = if !handle.is_valid() {
            InvalidHandleReason::Sentinel
        } else if handle.pool != self.id {
            InvalidHandleReason::ForeignPool
        } else {
            match table.slots.get(handle.index as usize) {
                None => InvalidHandleReason::OutOfRange,
                Some(slot) if !slot.live || slot.generation != handle.generation => {
                    InvalidHandleReason::Stale
                }
                Some(_) => {
                    let stride = self.config.properties_per_slot;
                    let start = handle.index as usize * stride;
                    return Ok(start..start + stride);
                }
            }
        };
        Err(PoolError::InvalidHandle { reason })
    }
}

impl fmt::Debug for PropertyPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.borrow();
        f.debug_struct("PropertyPool")
            .field("id", &self.id)
            .field("properties_per_slot", &self.config.properties_per_slot)
            .field("live", &table.live)
            .field("total_slots", &table.slots.len())
            .finish()
    }
}
