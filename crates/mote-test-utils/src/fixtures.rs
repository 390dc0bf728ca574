//! Reusable pool and coordinate fixtures.
//!
//! - [`pool_with_stride`] / [`fixed_pool`]: growable and capped pools.
//! - [`property_values`]: distinct, reproducible property vectors.
//! - [`lattice_point`] / [`LatticeWalk`]: deterministic coordinates.

use mote_core::{Point, Scalar};
use mote_pool::{PoolConfig, PropertyPool};

/// A growable pool with the given stride.
pub fn pool_with_stride(stride: usize) -> PropertyPool {
    PropertyPool::new(stride)
}

/// A pool that refuses allocations beyond `max_slots` live slots.
pub fn fixed_pool(stride: usize, max_slots: u32) -> PropertyPool {
    PropertyPool::with_config(PoolConfig::new(stride).with_max_slots(max_slots))
}

/// `stride` values unique to `seed`: `seed * 100 + i` for `i in 0..stride`.
pub fn property_values(seed: u64, stride: usize) -> Vec<Scalar> {
    (0..stride).map(|i| (seed * 100) as Scalar + i as Scalar).collect()
}

/// Point `n` of a regular lattice with unit spacing along every axis.
///
/// Coordinates are the base-`side` digits of `n`, so consecutive `n`
/// sweep the first axis fastest.
pub fn lattice_point<const D: usize>(n: u64, side: u64) -> Point<D> {
    let mut p = Point::<D>::origin();
    let mut rest = n;
    for c in p.coords_mut() {
        *c = (rest % side) as Scalar;
        rest /= side;
    }
    p
}

/// Iterator over successive lattice points, paired with a reference
/// location scaled into the unit cube.
pub struct LatticeWalk<const DIM: usize, const SPACEDIM: usize> {
    next: u64,
    side: u64,
}

impl<const DIM: usize, const SPACEDIM: usize> LatticeWalk<DIM, SPACEDIM> {
    pub fn new(side: u64) -> Self {
        assert!(side > 0, "lattice side must be positive");
        Self { next: 0, side }
    }
}

impl<const DIM: usize, const SPACEDIM: usize> Iterator for LatticeWalk<DIM, SPACEDIM> {
    type Item = (u64, Point<SPACEDIM>, Point<DIM>);

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.next;
        self.next += 1;
        let location = lattice_point::<SPACEDIM>(n, self.side);
        let mut reference = lattice_point::<DIM>(n, self.side);
        for c in reference.coords_mut() {
            *c /= self.side as Scalar;
        }
        Some((n, location, reference))
    }
}
