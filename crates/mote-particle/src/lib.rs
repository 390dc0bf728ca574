//! Particles with pooled properties for the Mote workspace.
//!
//! A [`Particle`] carries a world location, a reference-frame location and
//! a globally unique id. Its property values live in a shared
//! [`PropertyPool`](mote_pool::PropertyPool) and are reached through a
//! handle, so a large population shares one compact allocation.
//!
//! # Modules
//!
//! - [`particle`]: the particle type, copy/move semantics, pool migration
//! - [`codec`]: the binary record format used for migration and storage
//! - [`batch`]: buffers of concatenated records
//! - [`key`]: key extraction for external spatial indices
//!
//! # Record format
//!
//! ```text
//! [location: SPACEDIM × f64] [reference_location: DIM × f64]
//! [id: u64] [property_count: u32] [properties: property_count × f64]
//! ```
//!
//! All values are little-endian with no padding.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batch;
pub mod codec;
pub mod error;
pub mod key;
pub mod particle;

pub use batch::{read_particles, write_particles};
pub use error::ParticleError;
pub use key::{location_key, reference_location_key, SpatialKey};
pub use particle::Particle;
