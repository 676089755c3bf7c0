// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Tensor shape descriptors, strides, and broadcast/reduction arithmetic.

use crate::TensorError;
use std::fmt;

/// Describes the dimensionality of a [`crate::Tensor`].
///
/// Shapes are immutable once created and provide the arithmetic every
/// kernel walker relies on: row-major strides, right-aligned broadcasting,
/// and reduction-shape computation. Every dimension is expected to be ≥ 1;
/// a scalar has rank 0 and one element.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a new shape from the given dimensions.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 3);
    /// assert_eq!(s.num_elements(), 24);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Creates a scalar shape (rank 0).
    pub fn scalar() -> Self {
        Self { dims: vec![] }
    }

    /// Creates a 1-D shape.
    pub fn vector(len: usize) -> Self {
        Self { dims: vec![len] }
    }

    /// Creates a 2-D shape (matrix).
    pub fn matrix(rows: usize, cols: usize) -> Self {
        Self {
            dims: vec![rows, cols],
        }
    }

    /// Returns the number of dimensions (rank).
    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Returns the total number of elements.
    ///
    /// For a scalar shape (rank 0), returns 1.
    pub fn num_elements(&self) -> usize {
        self.dims.iter().product()
    }

    /// Returns the dimensions as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns the size of a specific dimension, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Computes row-major (C-order) strides for this shape.
    ///
    /// The stride for dimension `i` is the number of elements to skip
    /// in the flat buffer to advance one step along that dimension.
    pub fn contiguous_strides(&self) -> Strides {
        let rank = self.dims.len();
        if rank == 0 {
            return Strides(vec![]);
        }
        let mut strides = vec![0usize; rank];
        strides[rank - 1] = 1;
        for i in (0..rank - 1).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        Strides(strides)
    }

    /// Broadcasts this shape against another under NumPy rules.
    ///
    /// Aligning from the right, each output dimension is the larger of the
    /// two; where the sizes differ, the smaller must be 1.
    ///
    /// # Errors
    /// Returns [`TensorError::BroadcastIncompatible`] if any aligned pair
    /// differs with neither side equal to 1.
    pub fn broadcast_with(&self, other: &Shape) -> Result<Shape, TensorError> {
        let rank = self.rank().max(other.rank());
        let a = self.left_pad_to(rank);
        let b = other.left_pad_to(rank);
        let mut out = vec![0usize; rank];
        for i in 0..rank {
            let (da, db) = (a.dims[i], b.dims[i]);
            if da == db || db == 1 {
                out[i] = da;
            } else if da == 1 {
                out[i] = db;
            } else {
                return Err(TensorError::BroadcastIncompatible {
                    lhs: self.clone(),
                    rhs: other.clone(),
                });
            }
        }
        Ok(Shape::new(out))
    }

    /// Left-pads this shape with 1s so its rank equals `rank`.
    ///
    /// Ranks already at or above `rank` are returned unchanged.
    pub fn left_pad_to(&self, rank: usize) -> Shape {
        if self.rank() >= rank {
            return self.clone();
        }
        let mut dims = vec![1usize; rank - self.rank()];
        dims.extend_from_slice(&self.dims);
        Shape::new(dims)
    }

    /// Resolves a possibly negative axis index against this shape's rank.
    ///
    /// Negative values index from the end: −1 is the last axis.
    ///
    /// # Errors
    /// Returns [`TensorError::AxisOutOfRange`] if the axis does not name a
    /// dimension.
    pub fn resolve_axis(&self, axis: isize) -> Result<usize, TensorError> {
        let rank = self.rank() as isize;
        let resolved = if axis < 0 { axis + rank } else { axis };
        if resolved < 0 || resolved >= rank {
            return Err(TensorError::AxisOutOfRange {
                axis,
                rank: self.rank(),
            });
        }
        Ok(resolved as usize)
    }

    /// Computes the boolean reduced-dimension mask for a reduction.
    ///
    /// `None` reduces every axis. Negative axes index from the end.
    ///
    /// # Errors
    /// Returns [`TensorError::AxisOutOfRange`] for any axis outside the rank.
    pub fn reduced_dims(&self, dims: Option<&[isize]>) -> Result<Vec<bool>, TensorError> {
        let mut mask = vec![false; self.rank()];
        match dims {
            None => mask.iter_mut().for_each(|m| *m = true),
            Some(axes) => {
                for &axis in axes {
                    mask[self.resolve_axis(axis)?] = true;
                }
            }
        }
        Ok(mask)
    }

    /// Computes the shape that results from reducing the masked dimensions.
    ///
    /// Reduced dimensions become 1 when `keep_dims` is set and are removed
    /// otherwise. Reducing every dimension without `keep_dims` collapses to
    /// a rank-0 scalar shape.
    pub fn reduce(&self, mask: &[bool], keep_dims: bool) -> Shape {
        debug_assert_eq!(mask.len(), self.rank());
        let dims = self
            .dims
            .iter()
            .zip(mask)
            .filter_map(|(&d, &reduced)| match (reduced, keep_dims) {
                (false, _) => Some(d),
                (true, true) => Some(1),
                (true, false) => None,
            })
            .collect();
        Shape::new(dims)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

/// Convenience: `Shape::from(vec![2, 3])`.
impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

/// Convenience: `Shape::from(&[2, 3][..])`.
impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}

/// Per-axis steps (in elements) through a flat buffer.
///
/// A stride of 0 on a size-1 axis makes repeated reads along that axis map
/// to the same element — this is how broadcasting is realised.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Strides(Vec<usize>);

impl Strides {
    /// Creates strides from explicit per-axis steps.
    pub fn new(strides: Vec<usize>) -> Self {
        Strides(strides)
    }

    /// Returns the per-axis steps as a slice.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Computes the linear buffer offset of a multi-index: Σ idxᵢ · strideᵢ.
    pub fn offset(&self, indices: &[usize]) -> usize {
        debug_assert_eq!(self.0.len(), indices.len());
        self.0.iter().zip(indices).map(|(s, i)| s * i).sum()
    }
}

/// Computes the effective strides for reading `shape` as if it were
/// `target`-shaped: every size-1 axis gets stride 0 so the single element
/// is re-read for each target index along that axis.
///
/// `shape` and `target` must already have equal rank (left-pad first) and
/// be broadcast-compatible; this is not re-checked here.
pub fn broadcast_strides(shape: &Shape, strides: &Strides, target: &Shape) -> Strides {
    debug_assert_eq!(shape.rank(), target.rank());
    let steps = shape
        .dims()
        .iter()
        .zip(strides.as_slice())
        .map(|(&d, &s)| if d == 1 { 0 } else { s })
        .collect();
    Strides(steps)
}
