//! Test fixtures for Mote development.
//!
//! Deterministic pools, coordinates and property values shared by the
//! integration tests and benchmarks. Particles themselves are built by the
//! callers, which keeps this crate below `mote-particle` in the graph.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{
    fixed_pool, lattice_point, pool_with_stride, property_values, LatticeWalk,
};
