//! Key extraction for external spatial indices.
//!
//! An index (R-tree, k-d tree, grid) stores particles or references to
//! them and orders them by the coordinates returned here. Keys are
//! returned by reference into the particle, so the index never has to
//! duplicate coordinate data, and they only change through an explicit
//! setter on the particle.

use mote_core::Point;

use crate::particle::Particle;

/// Stable coordinate key for spatial indexing.
pub trait SpatialKey {
    /// The coordinate tuple the index compares.
    type Key;

    /// Borrow this item's key.
    fn spatial_key(&self) -> &Self::Key;
}

/// Particles are keyed by their reference-frame location.
impl<const DIM: usize, const SPACEDIM: usize> SpatialKey for Particle<'_, DIM, SPACEDIM> {
    type Key = Point<DIM>;

    fn spatial_key(&self) -> &Point<DIM> {
        self.get_reference_location()
    }
}

impl<T: SpatialKey + ?Sized> SpatialKey for &T {
    type Key = T::Key;

    fn spatial_key(&self) -> &T::Key {
        (**self).spatial_key()
    }
}

/// Key a particle by its reference-frame location.
///
/// Changes only through [`Particle::set_reference_location`] (or a
/// decode that overwrites the particle).
pub fn reference_location_key<'a, const DIM: usize, const SPACEDIM: usize>(
    particle: &'a Particle<'_, DIM, SPACEDIM>,
) -> &'a Point<DIM> {
    particle.get_reference_location()
}

/// Key a particle by its world-space location, for indices built over
/// the whole domain rather than one reference frame.
pub fn location_key<'a, const DIM: usize, const SPACEDIM: usize>(
    particle: &'a Particle<'_, DIM, SPACEDIM>,
) -> &'a Point<SPACEDIM> {
    particle.get_location()
}
