//! The particle type.
//!
//! A [`Particle`] owns its coordinates and id directly and borrows its
//! property storage from a [`PropertyPool`] through a [`PropertyHandle`].
//! The pool reference is a plain borrow: the pool must outlive the
//! particle, and the pool never learns which particles reference it.
//!
//! Slot ownership rules:
//!
//! - A particle owns at most one slot, and no two particles share one.
//! - [`try_clone`](Particle::try_clone) allocates a fresh slot and copies
//!   the values; [`take`](Particle::take) transfers the slot and leaves the
//!   source property-less.
//! - Dropping a particle releases its slot.

use std::cell::{Ref, RefMut};
use std::fmt;
use std::io::{Read, Write};

use smallvec::SmallVec;

use mote_core::{ParticleId, Point, Scalar, SCALAR_BYTES};
use mote_pool::{PropertyHandle, PropertyPool};

use crate::codec::{self, RecordHeader};
use crate::error::ParticleError;

/// Inline capacity for property values staged outside the pool.
type PropertyBuf = SmallVec<[Scalar; 8]>;

/// A particle in a `SPACEDIM`-dimensional world whose reference frame
/// has `DIM` dimensions (`DIM <= SPACEDIM`, checked at compile time).
pub struct Particle<'p, const DIM: usize, const SPACEDIM: usize> {
    location: Point<SPACEDIM>,
    reference_location: Point<DIM>,
    id: ParticleId,
    property_pool: Option<&'p PropertyPool>,
    properties: PropertyHandle,
}

impl<'p, const DIM: usize, const SPACEDIM: usize> Particle<'p, DIM, SPACEDIM> {
    const DIMENSION_CHECK: () = assert!(
        DIM <= SPACEDIM,
        "reference dimension must not exceed space dimension"
    );

    /// Size of a record for a particle without properties.
    pub const HEADER_BYTES: usize = codec::header_bytes(DIM, SPACEDIM);

    /// A particle at the origin with id 0, no pool and no properties.
    pub fn new() -> Self {
        let () = Self::DIMENSION_CHECK;
        Self {
            location: Point::origin(),
            reference_location: Point::origin(),
            id: ParticleId(0),
            property_pool: None,
            properties: PropertyHandle::INVALID,
        }
    }

    /// A particle with the given coordinates and id, no pool and no properties.
    pub fn with_location(
        location: Point<SPACEDIM>,
        reference_location: Point<DIM>,
        id: ParticleId,
    ) -> Self {
        let () = Self::DIMENSION_CHECK;
        Self {
            location,
            reference_location,
            id,
            property_pool: None,
            properties: PropertyHandle::INVALID,
        }
    }

    /// Decode a particle from the front of `data` and advance the cursor
    /// past the consumed record.
    ///
    /// If the record carries properties, a slot is allocated from `pool`
    /// and filled from the buffer. `pool` becomes the particle's pool even
    /// when the record carries none. On error nothing is allocated and
    /// `data` is not advanced.
    pub fn from_data(
        data: &mut &[u8],
        pool: Option<&'p PropertyPool>,
    ) -> Result<Self, ParticleError> {
        let mut cursor = *data;
        let header = codec::decode_header::<DIM, SPACEDIM>(&mut cursor)?;

        let mut particle = Self::with_location(header.location, header.reference_location, header.id);
        particle.property_pool = pool;

        if header.property_count > 0 {
            let pool = check_stride(pool, header.property_count)?;
            // Owned by the particle straight away so an error below releases it.
            particle.properties = pool.allocate_properties_array()?;
            codec::decode_properties(
                &mut cursor,
                &mut pool.get_properties_mut(&particle.properties)?,
            )?;
        }

        *data = cursor;
        Ok(particle)
    }

    /// Copy this particle, allocating a fresh slot for its properties.
    ///
    /// The copy shares the pool but not the slot: mutating one particle's
    /// properties never changes the other's. Fails with the pool's
    /// `OutOfResources` if no slot is available.
    pub fn try_clone(&self) -> Result<Self, ParticleError> {
        let properties = match self.slot() {
            Some((pool, handle)) => pool.duplicate(handle)?,
            None => PropertyHandle::INVALID,
        };
        Ok(Self {
            location: self.location,
            reference_location: self.reference_location,
            id: self.id,
            property_pool: self.property_pool,
            properties,
        })
    }

    /// Overwrite this particle with a copy of `other`.
    ///
    /// Reuses this particle's slot when both particles use the same pool;
    /// otherwise a slot is allocated in `other`'s pool before this
    /// particle's old slot is released. On error `self` is unchanged.
    pub fn try_clone_from(&mut self, other: &Particle<'p, DIM, SPACEDIM>) -> Result<(), ParticleError> {
        if let Some((src_pool, src)) = other.slot() {
            let same_pool = self
                .slot()
                .is_some_and(|(dst_pool, _)| dst_pool.id() == src_pool.id());
            if same_pool {
                let values: PropertyBuf = SmallVec::from_slice(&src_pool.get_properties(src)?);
                self.get_properties_mut()?.copy_from_slice(&values);
            } else {
                let copy = src_pool.duplicate(src)?;
                self.free_properties();
                self.properties = copy;
            }
        } else {
            self.free_properties();
        }
        self.location = other.location;
        self.reference_location = other.reference_location;
        self.id = other.id;
        self.property_pool = other.property_pool;
        Ok(())
    }

    /// Move this particle out, leaving a property-less particle behind.
    ///
    /// The slot and pool reference are transferred without copying any
    /// values. The source keeps its coordinates, id and pool reference but
    /// reports [`has_properties`](Self::has_properties) `== false`.
    pub fn take(&mut self) -> Self {
        Self {
            location: self.location,
            reference_location: self.reference_location,
            id: self.id,
            property_pool: self.property_pool,
            properties: self.properties.take(),
        }
    }

    // ── Serialization ───────────────────────────────────────────

    /// Append this particle's record to `out`.
    ///
    /// Writes location, reference location, id, property count and property
    /// values in that order: exactly [`serialized_size_in_bytes`](Self::serialized_size_in_bytes)
    /// bytes. Fails, appending nothing, if the properties cannot be read
    /// because a mutable view into the pool is held.
    pub fn write_data(&self, out: &mut Vec<u8>) -> Result<(), ParticleError> {
        let properties = self
            .slot()
            .map(|(pool, handle)| pool.get_properties(handle))
            .transpose()?;
        let header = RecordHeader {
            location: self.location,
            reference_location: self.reference_location,
            id: self.id,
            property_count: properties.as_ref().map_or(0, |p| p.len()),
        };
        out.reserve(self.serialized_size_in_bytes());
        codec::encode_header(out, &header)?;
        if let Some(properties) = properties {
            codec::encode_properties(out, &properties);
        }
        Ok(())
    }

    /// Overwrite coordinates, id and property values from the record at
    /// the front of `data`, advancing the cursor.
    ///
    /// The record's property count must equal this particle's current
    /// property count (its pool's stride if it holds a slot, zero
    /// otherwise). No slot is allocated or released. On error the particle
    /// is unchanged and `data` is not advanced.
    pub fn update_particle_data(&mut self, data: &mut &[u8]) -> Result<(), ParticleError> {
        let mut cursor = *data;
        let header = codec::decode_header::<DIM, SPACEDIM>(&mut cursor)?;

        let expected = self.n_properties();
        if header.property_count != expected {
            return Err(ParticleError::PropertyCountMismatch {
                recorded: header.property_count,
                expected,
            });
        }
        if let Some((pool, handle)) = self.slot() {
            codec::decode_properties(&mut cursor, &mut pool.get_properties_mut(handle)?)?;
        }

        self.location = header.location;
        self.reference_location = header.reference_location;
        self.id = header.id;
        *data = cursor;
        Ok(())
    }

    /// Write this particle's record to a stream.
    pub fn save(&self, w: &mut dyn Write) -> Result<(), ParticleError> {
        let mut buf = Vec::with_capacity(self.serialized_size_in_bytes());
        self.write_data(&mut buf)?;
        w.write_all(&buf)?;
        Ok(())
    }

    /// Read one record from a stream into this particle.
    ///
    /// Unlike [`update_particle_data`](Self::update_particle_data), a
    /// particle without a slot takes one from its pool when the record
    /// carries properties, so the pool must be set before loading.
    pub fn load(&mut self, r: &mut dyn Read) -> Result<(), ParticleError> {
        let mut head = vec![0u8; Self::HEADER_BYTES];
        r.read_exact(&mut head)?;

        // Decode the fixed part only: property bytes have not been read yet.
        let mut count_bytes = &head[Self::HEADER_BYTES - codec::COUNT_BYTES..];
        let property_count = codec::read_u32_le(&mut count_bytes)? as usize;
        if property_count > 0 {
            check_stride(self.property_pool, property_count)?;
        }
        head.resize(Self::HEADER_BYTES + property_count * SCALAR_BYTES, 0);
        r.read_exact(&mut head[Self::HEADER_BYTES..])?;

        let mut cursor = head.as_slice();
        let header = codec::decode_header::<DIM, SPACEDIM>(&mut cursor)?;

        if header.property_count > 0 {
            let pool = check_stride(self.property_pool, header.property_count)?;
            let mut values: PropertyBuf = SmallVec::from_elem(0.0, header.property_count);
            codec::decode_properties(&mut cursor, &mut values)?;
            if self.properties.is_valid() {
                pool.get_properties_mut(&self.properties)?
                    .copy_from_slice(&values);
            } else {
                self.properties = allocate_filled(pool, &values)?;
            }
        }

        self.location = header.location;
        self.reference_location = header.reference_location;
        self.id = header.id;
        Ok(())
    }

    /// Exact number of bytes [`write_data`](Self::write_data) produces.
    pub fn serialized_size_in_bytes(&self) -> usize {
        codec::record_size(DIM, SPACEDIM, self.n_properties())
    }

    // ── Coordinates and id ──────────────────────────────────────

    /// Set the world-space location. Not checked against any domain.
    pub fn set_location(&mut self, new_location: Point<SPACEDIM>) {
        self.location = new_location;
    }

    /// The world-space location.
    pub fn get_location(&self) -> &Point<SPACEDIM> {
        &self.location
    }

    /// Set the location in the current reference frame.
    pub fn set_reference_location(&mut self, new_reference_location: Point<DIM>) {
        self.reference_location = new_reference_location;
    }

    /// The location in the current reference frame.
    pub fn get_reference_location(&self) -> &Point<DIM> {
        &self.reference_location
    }

    /// The particle id.
    pub fn get_id(&self) -> ParticleId {
        self.id
    }

    /// Set the particle id. Global uniqueness is the caller's obligation.
    pub fn set_id(&mut self, new_id: ParticleId) {
        self.id = new_id;
    }

    // ── Properties ──────────────────────────────────────────────

    /// Point this particle at `new_pool`.
    ///
    /// If the particle holds a slot, its values are copied into a new slot
    /// of `new_pool` and the old slot is released. Otherwise only the pool
    /// reference changes. Fails with `PropertyCountMismatch` if the pools'
    /// strides differ, or with `OutOfResources` from `new_pool`; either way
    /// the particle is unchanged.
    pub fn set_property_pool(&mut self, new_pool: &'p PropertyPool) -> Result<(), ParticleError> {
        if let Some((old_pool, handle)) = self.slot() {
            let stride = old_pool.n_properties_per_slot();
            if stride != new_pool.n_properties_per_slot() {
                return Err(ParticleError::PropertyCountMismatch {
                    recorded: stride,
                    expected: new_pool.n_properties_per_slot(),
                });
            }
            let values: PropertyBuf = SmallVec::from_slice(&old_pool.get_properties(handle)?);
            let mut new_handle = allocate_filled(new_pool, &values)?;

            if let Err(e) = old_pool.deallocate_properties_array(&mut self.properties) {
                let _ = new_pool.deallocate_properties_array(&mut new_handle);
                return Err(e.into());
            }
            tracing::trace!(
                particle = %self.id,
                from = %old_pool.id(),
                to = %new_pool.id(),
                "migrated particle properties"
            );
            self.properties = new_handle;
        }
        self.property_pool = Some(new_pool);
        Ok(())
    }

    /// The pool this particle allocates from, if any.
    pub fn property_pool(&self) -> Option<&'p PropertyPool> {
        self.property_pool
    }

    /// This particle's property handle ([`PropertyHandle::INVALID`] if none).
    pub fn handle(&self) -> &PropertyHandle {
        &self.properties
    }

    /// Whether this particle has a pool and a valid property slot.
    pub fn has_properties(&self) -> bool {
        self.slot().is_some()
    }

    /// Number of property values this particle carries.
    pub fn n_properties(&self) -> usize {
        self.slot()
            .map_or(0, |(pool, _)| pool.n_properties_per_slot())
    }

    /// Read-only view of this particle's properties.
    pub fn get_properties(&self) -> Result<Ref<'_, [Scalar]>, ParticleError> {
        let (pool, handle) = self.slot().ok_or(ParticleError::NoProperties)?;
        Ok(pool.get_properties(handle)?)
    }

    /// Mutable view of this particle's properties.
    pub fn get_properties_mut(&mut self) -> Result<RefMut<'_, [Scalar]>, ParticleError> {
        let (pool, handle) = self.slot().ok_or(ParticleError::NoProperties)?;
        Ok(pool.get_properties_mut(handle)?)
    }

    /// Copy `values` into this particle's properties, taking a slot from
    /// the assigned pool first if the particle has none.
    pub fn set_properties(&mut self, values: &[Scalar]) -> Result<(), ParticleError> {
        let pool = self.property_pool.ok_or(ParticleError::NoProperties)?;
        if values.len() != pool.n_properties_per_slot() {
            return Err(ParticleError::PropertyCountMismatch {
                recorded: values.len(),
                expected: pool.n_properties_per_slot(),
            });
        }
        if self.properties.is_valid() {
            pool.get_properties_mut(&self.properties)?
                .copy_from_slice(values);
        } else {
            self.properties = allocate_filled(pool, values)?;
        }
        Ok(())
    }

    /// Release this particle's slot, if any. The pool reference is kept.
    pub fn free_properties(&mut self) {
        let Some(pool) = self.property_pool else {
            return;
        };
        if !self.properties.is_valid() {
            return;
        }
        if let Err(e) = pool.deallocate_properties_array(&mut self.properties) {
            tracing::warn!(particle = %self.id, error = %e, "failed to release property slot");
            self.properties = PropertyHandle::INVALID;
        }
    }

    /// The pool and handle, if this particle holds a slot.
    fn slot(&self) -> Option<(&'p PropertyPool, &PropertyHandle)> {
        let pool = self.property_pool?;
        if !self.properties.is_valid() {
            return None;
        }
        debug_assert_eq!(
            self.properties.pool(),
            pool.id(),
            "particle {} holds a handle issued by another pool",
            self.id
        );
        Some((pool, &self.properties))
    }
}

/// Allocate a slot in `pool` holding `values`. The slot is released again
/// if the values cannot be written.
fn allocate_filled(pool: &PropertyPool, values: &[Scalar]) -> Result<PropertyHandle, ParticleError> {
    let mut handle = pool.allocate_properties_array()?;
    let written = pool
        .get_properties_mut(&handle)
        .map(|mut dst| dst.copy_from_slice(values));
    if let Err(e) = written {
        let _ = pool.deallocate_properties_array(&mut handle);
        return Err(e.into());
    }
    Ok(handle)
}

/// Return `pool` if it can hold records with `recorded` properties.
fn check_stride(
    pool: Option<&PropertyPool>,
    recorded: usize,
) -> Result<&PropertyPool, ParticleError> {
    let pool = pool.ok_or(ParticleError::MissingPool { recorded })?;
    if pool.n_properties_per_slot() != recorded {
        return Err(ParticleError::PropertyCountMismatch {
            recorded,
            expected: pool.n_properties_per_slot(),
        });
    }
    Ok(pool)
}

impl<const DIM: usize, const SPACEDIM: usize> Default for Particle<'_, DIM, SPACEDIM> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const DIM: usize, const SPACEDIM: usize> Drop for Particle<'_, DIM, SPACEDIM> {
    fn drop(&mut self) {
        self.free_properties();
    }
}

impl<const DIM: usize, const SPACEDIM: usize> fmt::Debug for Particle<'_, DIM, SPACEDIM> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Particle")
            .field("id", &self.id)
            .field("location", &self.location)
            .field("reference_location", &self.reference_location)
            .field("pool", &self.property_pool.map(PropertyPool::id))
            .field("properties", &self.properties)
            .finish()
    }
}
