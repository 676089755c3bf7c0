// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Core tensor type and view abstractions.

use crate::{Shape, Strides, TensorError};

/// An owned, n-dimensional tensor of `f32` stored in contiguous memory.
///
/// `Tensor` is the primary data carrier of the engine. It exclusively owns
/// its flat row-major buffer and exposes zero-copy views via
/// [`TensorView`]: [`reshape`](Tensor::reshape) recomputes shape and
/// strides over the same buffer, [`transpose`](Tensor::transpose) permutes
/// shape and strides in lockstep. The buffer is only mutated through
/// [`as_mut_slice`](Tensor::as_mut_slice) and [`fill`](Tensor::fill) — the
/// kernel writes destinations this way.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f32>,
    shape: Shape,
    strides: Strides,
}

impl Tensor {
    /// Creates a new tensor filled with zeros.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::{Shape, Tensor};
    /// let t = Tensor::zeros(Shape::matrix(2, 3));
    /// assert_eq!(t.num_elements(), 6);
    /// assert!(t.as_slice().iter().all(|&x| x == 0.0));
    /// ```
    pub fn zeros(shape: Shape) -> Self {
        Self::filled(shape, 0.0)
    }

    /// Creates a new tensor with every element set to `value`.
    pub fn filled(shape: Shape, value: f32) -> Self {
        let strides = shape.contiguous_strides();
        let data = vec![value; shape.num_elements()];
        Self {
            data,
            shape,
            strides,
        }
    }

    /// Creates a rank-0 tensor holding a single value.
    pub fn scalar(value: f32) -> Self {
        Self {
            data: vec![value],
            shape: Shape::scalar(),
            strides: Strides::new(vec![]),
        }
    }

    /// Creates a tensor from a slice of `f32` values in row-major order.
    ///
    /// # Errors
    /// Returns [`TensorError::LengthMismatch`] if the value count does not
    /// equal `shape.num_elements()`.
    pub fn from_f32(shape: Shape, values: &[f32]) -> Result<Self, TensorError> {
        if values.len() != shape.num_elements() {
            return Err(TensorError::LengthMismatch {
                op: "from_f32",
                expected: shape.num_elements(),
                actual: values.len(),
            });
        }
        let strides = shape.contiguous_strides();
        Ok(Self {
            data: values.to_vec(),
            shape,
            strides,
        })
    }

    /// Returns the tensor's shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the tensor's strides.
    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the total number of elements (1 for a scalar).
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns the contiguous buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the contiguous buffer mutably.
    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sets every element to `value` in place.
    pub fn fill(&mut self, value: f32) {
        self.data.iter_mut().for_each(|x| *x = value);
    }

    /// Returns a read-only view over the whole tensor.
    pub fn view(&self) -> TensorView<'_> {
        TensorView {
            data: &self.data,
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }

    /// Returns a zero-copy view with a new shape over the same buffer.
    ///
    /// # Errors
    /// Returns [`TensorError::LengthMismatch`] if the new shape's element
    /// count differs from this tensor's.
    pub fn reshape(&self, shape: Shape) -> Result<TensorView<'_>, TensorError> {
        check_reshape(self.num_elements(), &shape)?;
        let strides = shape.contiguous_strides();
        Ok(TensorView {
            data: &self.data,
            shape,
            strides,
        })
    }

    /// Returns a zero-copy view with permuted axes. The buffer is not moved.
    ///
    /// # Errors
    /// Returns [`TensorError::RankMismatch`] if `perm` has the wrong length
    /// and [`TensorError::InvalidPermutation`] if it is not a permutation
    /// of `0..rank`.
    pub fn transpose(&self, perm: &[usize]) -> Result<TensorView<'_>, TensorError> {
        let (shape, strides) = permute(&self.shape, &self.strides, perm)?;
        Ok(TensorView {
            data: &self.data,
            shape,
            strides,
        })
    }

    /// Reshapes in place by moving the buffer into a new tensor.
    ///
    /// # Errors
    /// Returns [`TensorError::LengthMismatch`] on an element-count change.
    pub fn into_reshaped(self, shape: Shape) -> Result<Tensor, TensorError> {
        check_reshape(self.num_elements(), &shape)?;
        let strides = shape.contiguous_strides();
        Ok(Tensor {
            data: self.data,
            shape,
            strides,
        })
    }
}

fn check_reshape(num_elements: usize, shape: &Shape) -> Result<(), TensorError> {
    if shape.num_elements() != num_elements {
        return Err(TensorError::LengthMismatch {
            op: "reshape",
            expected: num_elements,
            actual: shape.num_elements(),
        });
    }
    Ok(())
}

/// Permutes a shape and its strides in lockstep.
fn permute(
    shape: &Shape,
    strides: &Strides,
    perm: &[usize],
) -> Result<(Shape, Strides), TensorError> {
    let rank = shape.rank();
    if perm.len() != rank {
        return Err(TensorError::RankMismatch {
            op: "transpose",
            expected: rank,
            actual: perm.len(),
        });
    }
    let mut seen = vec![false; rank];
    for &axis in perm {
        if axis >= rank || seen[axis] {
            return Err(TensorError::InvalidPermutation {
                perm: perm.to_vec(),
                rank,
            });
        }
        seen[axis] = true;
    }
    let dims = perm.iter().map(|&a| shape.dims()[a]).collect();
    let steps = perm.iter().map(|&a| strides.as_slice()[a]).collect();
    Ok((Shape::new(dims), Strides::new(steps)))
}

/// A borrowed, read-only view over a [`Tensor`]'s buffer.
///
/// Views are zero-copy and tied to the lifetime of the source tensor,
/// enforced by the borrow checker. A view carries its own shape and
/// strides, which is how reshape, transpose, and broadcast reads are
/// expressed without touching the buffer.
#[derive(Debug, Clone)]
pub struct TensorView<'a> {
    data: &'a [f32],
    shape: Shape,
    strides: Strides,
}

impl<'a> TensorView<'a> {
    /// Creates a view from raw parts (used by the kernel crate).
    pub fn from_parts(data: &'a [f32], shape: Shape, strides: Strides) -> Self {
        Self {
            data,
            shape,
            strides,
        }
    }

    /// Returns the viewed shape.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// Returns the view's strides.
    pub fn strides(&self) -> &Strides {
        &self.strides
    }

    /// Returns the number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    /// Returns the number of elements in the viewed index space.
    pub fn num_elements(&self) -> usize {
        self.shape.num_elements()
    }

    /// Returns the underlying buffer. Indexing must go through
    /// [`strides`](TensorView::strides); the slice is not reordered.
    pub fn as_slice(&self) -> &[f32] {
        self.data
    }

    /// Returns a further view with permuted axes.
    ///
    /// # Errors
    /// Same contract as [`Tensor::transpose`].
    pub fn transpose(&self, perm: &[usize]) -> Result<TensorView<'a>, TensorError> {
        let (shape, strides) = permute(&self.shape, &self.strides, perm)?;
        Ok(TensorView {
            data: self.data,
            shape,
            strides,
        })
    }

    /// Returns a view left-padded with size-1 axes (stride 0) to `rank`.
    ///
    /// This is the first step of broadcasting an operand up to a
    /// destination rank; scalars become all-ones shapes this way.
    pub fn left_pad_to(&self, rank: usize) -> TensorView<'a> {
        if self.rank() >= rank {
            return self.clone();
        }
        let pad = rank - self.rank();
        let mut steps = vec![0usize; pad];
        steps.extend_from_slice(self.strides.as_slice());
        TensorView {
            data: self.data,
            shape: self.shape.left_pad_to(rank),
            strides: Strides::new(steps),
        }
    }

    /// Materialises the view into an owned, contiguous row-major tensor.
    pub fn to_tensor(&self) -> Tensor {
        let mut out = Vec::with_capacity(self.num_elements());
        let rank = self.rank();
        if rank == 0 {
            out.push(self.data[0]);
        } else {
            let dims = self.shape.dims();
            let steps = self.strides.as_slice();
            let mut counters = vec![0usize; rank];
            let mut offset = 0usize;
            for _ in 0..self.num_elements() {
                out.push(self.data[offset]);
                for axis in (0..rank).rev() {
                    counters[axis] += 1;
                    offset += steps[axis];
                    if counters[axis] < dims[axis] {
                        break;
                    }
                    counters[axis] = 0;
                    offset -= steps[axis] * dims[axis];
                }
            }
        }
        let shape = self.shape.clone();
        let strides = shape.contiguous_strides();
        Tensor {
            data: out,
            shape,
            strides,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros_and_filled() {
        let t = Tensor::zeros(Shape::matrix(2, 3));
        assert_eq!(t.shape(), &Shape::matrix(2, 3));
        assert_eq!(t.strides().as_slice(), &[3, 1]);
        assert!(t.as_slice().iter().all(|&x| x == 0.0));

        let f = Tensor::filled(Shape::vector(4), 2.5);
        assert_eq!(f.as_slice(), &[2.5; 4]);
    }

    #[test]
    fn test_scalar() {
        let s = Tensor::scalar(7.0);
        assert_eq!(s.rank(), 0);
        assert_eq!(s.num_elements(), 1);
        assert_eq!(s.as_slice(), &[7.0]);
    }

    #[test]
    fn test_from_f32_length_check() {
        let ok = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0, 3.0, 4.0]);
        assert!(ok.is_ok());

        let err = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0]);
        assert!(matches!(err, Err(TensorError::LengthMismatch { .. })));
    }

    #[test]
    fn test_reshape_is_zero_copy() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = t.reshape(Shape::new(vec![3, 2])).unwrap();
        assert_eq!(v.shape(), &Shape::new(vec![3, 2]));
        assert_eq!(v.strides().as_slice(), &[2, 1]);
        // Same backing buffer, element for element.
        assert_eq!(v.as_slice().as_ptr(), t.as_slice().as_ptr());
    }

    #[test]
    fn test_reshape_length_mismatch() {
        let t = Tensor::zeros(Shape::matrix(2, 3));
        assert!(t.reshape(Shape::new(vec![4, 2])).is_err());
    }

    #[test]
    fn test_transpose_is_a_view() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let v = t.transpose(&[1, 0]).unwrap();
        assert_eq!(v.shape(), &Shape::matrix(3, 2));
        assert_eq!(v.strides().as_slice(), &[1, 3]);
        assert_eq!(v.as_slice().as_ptr(), t.as_slice().as_ptr());

        // Double transpose restores shape and strides.
        let back = v.transpose(&[1, 0]).unwrap();
        assert_eq!(back.shape(), t.shape());
        assert_eq!(back.strides(), t.strides());
    }

    #[test]
    fn test_transpose_bad_perm() {
        let t = Tensor::zeros(Shape::matrix(2, 3));
        assert!(matches!(
            t.transpose(&[0]),
            Err(TensorError::RankMismatch { .. })
        ));
        assert!(matches!(
            t.transpose(&[0, 0]),
            Err(TensorError::InvalidPermutation { .. })
        ));
        assert!(matches!(
            t.transpose(&[0, 2]),
            Err(TensorError::InvalidPermutation { .. })
        ));
    }

    #[test]
    fn test_view_to_tensor_materialises_transpose() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        let m = t.transpose(&[1, 0]).unwrap().to_tensor();
        assert_eq!(m.shape(), &Shape::matrix(3, 2));
        assert_eq!(m.as_slice(), &[1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }

    #[test]
    fn test_left_pad_view_broadcast_reads() {
        let t = Tensor::from_f32(Shape::vector(3), &[1.0, 2.0, 3.0]).unwrap();
        let v = t.view().left_pad_to(3);
        assert_eq!(v.shape(), &Shape::new(vec![1, 1, 3]));
        assert_eq!(v.strides().as_slice(), &[0, 0, 1]);
    }

    #[test]
    fn test_fill_in_place() {
        let mut t = Tensor::zeros(Shape::vector(5));
        t.fill(3.5);
        assert_eq!(t.as_slice(), &[3.5; 5]);
    }

    #[test]
    fn test_into_reshaped_moves_buffer() {
        let t = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let r = t.into_reshaped(Shape::vector(4)).unwrap();
        assert_eq!(r.shape(), &Shape::vector(4));
        assert_eq!(r.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    }
}
