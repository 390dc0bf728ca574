//! Mote: particle populations with pooled properties.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Mote sub-crates. For most users, adding `mote` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use mote::prelude::*;
//!
//! // One pool per population; every slot holds three properties.
//! let pool = PropertyPool::new(3);
//!
//! let mut a = Particle::<2, 2>::with_location(
//!     Point::new([1.0, 2.0]),
//!     Point::new([0.1, 0.2]),
//!     ParticleId(42),
//! );
//! a.set_property_pool(&pool).unwrap();
//! a.set_properties(&[1.0, 2.0, 3.0]).unwrap();
//!
//! // Serialize for migration and rebuild on the receiving side.
//! let mut buf = Vec::new();
//! a.write_data(&mut buf).unwrap();
//! let b = Particle::<2, 2>::from_data(&mut buf.as_slice(), Some(&pool)).unwrap();
//!
//! assert_eq!(b.get_id(), ParticleId(42));
//! assert_eq!(&*b.get_properties().unwrap(), &[1.0, 2.0, 3.0]);
//! assert_ne!(a.handle(), b.handle());
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `mote-core` | IDs, points, the scalar type |
//! | [`pool`] | `mote-pool` | Property pool, handles, pool configuration |
//! | [`particle`] | `mote-particle` | Particles, record codec, batches, spatial keys |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and IDs (`mote-core`).
pub use mote_core as types;

/// Property storage (`mote-pool`).
///
/// [`pool::PropertyPool`] owns every property value of a population;
/// particles reach it through [`pool::PropertyHandle`]s.
pub use mote_pool as pool;

/// Particles, serialization and spatial keys (`mote-particle`).
///
/// The record format is documented in [`particle::codec`].
pub use mote_particle as particle;

/// Common imports for typical Mote usage.
///
/// ```rust
/// use mote::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use mote_core::{ParticleId, Point, PoolId, Scalar};

    // Pool
    pub use mote_pool::{PoolConfig, PropertyHandle, PropertyPool};

    // Particles
    pub use mote_particle::{read_particles, write_particles, Particle, SpatialKey};

    // Errors
    pub use mote_particle::ParticleError;
    pub use mote_pool::PoolError;
}
