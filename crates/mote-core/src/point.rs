//! Fixed-dimension coordinate tuples.
//!
//! A [`Point`] is an opaque `D`-tuple of [`Scalar`]s. World locations use
//! `Point<SPACEDIM>` and reference-frame locations use `Point<DIM>`. No
//! geometry is implied beyond storage, comparison and indexing.

use std::fmt;
use std::ops::{Index, IndexMut};

use crate::Scalar;

/// A point with `D` scalar coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<const D: usize>([Scalar; D]);

impl<const D: usize> Point<D> {
    /// Number of coordinates.
    pub const DIM: usize = D;

    /// Create a point from its coordinates.
    pub const fn new(coords: [Scalar; D]) -> Self {
        Self(coords)
    }

    /// The point with every coordinate zero.
    pub const fn origin() -> Self {
        Self([0.0; D])
    }

    /// Coordinates as a slice.
    pub fn coords(&self) -> &[Scalar; D] {
        &self.0
    }

    /// Mutable coordinates.
    pub fn coords_mut(&mut self) -> &mut [Scalar; D] {
        &mut self.0
    }

    /// Build a point from a slice of exactly `D` scalars.
    ///
    /// Returns `None` if `s.len() != D`.
    pub fn from_slice(s: &[Scalar]) -> Option<Self> {
        let coords: [Scalar; D] = s.try_into().ok()?;
        Some(Self(coords))
    }
}

impl<const D: usize> Default for Point<D> {
    fn default() -> Self {
        Self::origin()
    }
}

impl<const D: usize> From<[Scalar; D]> for Point<D> {
    fn from(coords: [Scalar; D]) -> Self {
        Self(coords)
    }
}

impl<const D: usize> Index<usize> for Point<D> {
    type Output = Scalar;

    fn index(&self, i: usize) -> &Scalar {
        &self.0[i]
    }
}

impl<const D: usize> IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, i: usize) -> &mut Scalar {
        &mut self.0[i]
    }
}

impl<const D: usize> fmt::Display for Point<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, c) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, ")")
    }
}
