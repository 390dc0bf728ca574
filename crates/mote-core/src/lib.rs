//! Core types for the Mote particle subsystem.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the identifiers and coordinate tuples shared by the property pool,
//! the particle type, and the record codec.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod point;

pub use id::{ParticleId, PoolId};
pub use point::Point;

/// Scalar type used for coordinates and property values.
///
/// Every scalar occupies [`SCALAR_BYTES`] bytes in the record format.
pub type Scalar = f64;

/// Encoded width of one [`Scalar`] in bytes.
pub const SCALAR_BYTES: usize = std::mem::size_of::<Scalar>();
