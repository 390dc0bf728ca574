//! Benchmark profiles for the Mote particle subsystem.
//!
//! - [`population`]: a deterministic particle population on a lattice
//! - [`encoded_population`]: the same population as a migration buffer

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use mote_core::{ParticleId, Point, Scalar};
use mote_particle::{write_particles, Particle};
use mote_pool::PropertyPool;

/// Build `n` 3D particles on a lattice, each with `pool`-stride properties.
pub fn population(pool: &PropertyPool, n: usize) -> Vec<Particle<'_, 3, 3>> {
    let side = (n as f64).cbrt().ceil().max(1.0) as usize;
    let stride = pool.n_properties_per_slot();
    pool.reserve(n);
    (0..n)
        .map(|i| {
            let x = (i % side) as Scalar;
            let y = ((i / side) % side) as Scalar;
            let z = (i / (side * side)) as Scalar;
            let mut p = Particle::with_location(
                Point::new([x, y, z]),
                Point::new([x / side as Scalar, y / side as Scalar, z / side as Scalar]),
                ParticleId(i as u64),
            );
            p.set_property_pool(pool).unwrap();
            if stride > 0 {
                let values: Vec<Scalar> = (0..stride).map(|k| (i * stride + k) as Scalar).collect();
                p.set_properties(&values).unwrap();
            }
            p
        })
        .collect()
}

/// Encode `n` particles with `stride` properties into one buffer.
pub fn encoded_population(n: usize, stride: usize) -> Vec<u8> {
    let pool = PropertyPool::new(stride);
    let particles = population(&pool, n);
    let mut buf = Vec::new();
    write_particles(&particles, &mut buf).unwrap();
    buf
}
