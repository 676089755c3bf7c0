// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Index-family walkers: index reduction (argmax-style) and scatter.

use crate::{op::IndexUpdateFn, KernelError};
use tensor_core::{Tensor, TensorView};

/// Index-reduction walker.
///
/// Recurses over every axis except the target one; at the leaves it scans
/// the target axis, threading `(acc, acc_index)` through `update`, and
/// writes the winning index into the destination cell (target coordinate
/// fixed at 0). Shapes are validated by the dispatcher.
pub(crate) fn index_reduce(
    src: &TensorView,
    dst: &mut Tensor,
    dim: usize,
    update: IndexUpdateFn,
    initial: f32,
) {
    let dims = src.shape().dims().to_vec();
    let sstr = src.strides().as_slice().to_vec();
    let dstr = dst.strides().as_slice().to_vec();
    let walker = IndexWalker {
        dims: &dims,
        sstr: &sstr,
        dstr: &dstr,
        dim,
        update,
        initial,
    };
    walker.walk(0, 0, 0, src.as_slice(), dst.as_mut_slice());
}

struct IndexWalker<'a> {
    dims: &'a [usize],
    sstr: &'a [usize],
    dstr: &'a [usize],
    dim: usize,
    update: IndexUpdateFn,
    initial: f32,
}

impl IndexWalker<'_> {
    fn walk(&self, axis: usize, src_off: usize, dst_off: usize, a: &[f32], out: &mut [f32]) {
        if axis == self.dims.len() {
            let step = self.sstr[self.dim];
            let (mut acc, mut acc_idx) = (self.initial, 0usize);
            for i in 0..self.dims[self.dim] {
                let value = a[src_off + i * step];
                (acc, acc_idx) = (self.update)(acc, acc_idx, value, i);
            }
            out[dst_off] = acc_idx as f32;
            return;
        }
        if axis == self.dim {
            self.walk(axis + 1, src_off, dst_off, a, out);
            return;
        }
        for i in 0..self.dims[axis] {
            self.walk(
                axis + 1,
                src_off + i * self.sstr[axis],
                dst_off + i * self.dstr[axis],
                a,
                out,
            );
        }
    }
}

/// Scatter walker for a rank-2 destination.
///
/// For every lane `i` along the non-target axis, writes `values[i]` at the
/// position `indices[i]` along `dim`:
/// `dst[indices[i], i]` for `dim == 0`, `dst[i, indices[i]]` for `dim == 1`.
///
/// # Errors
/// Returns [`KernelError::IndexOutOfRange`] for any index outside the
/// target extent.
pub(crate) fn index_set(
    values: &TensorView,
    indices: &TensorView,
    dst: &mut Tensor,
    dim: usize,
) -> Result<(), KernelError> {
    let extent = dst.shape().dims()[dim];
    let dstr = dst.strides().as_slice().to_vec();
    let vals = values.as_slice();
    let vstr = values.strides().as_slice()[0];
    let idxs = indices.as_slice();
    let istr = indices.strides().as_slice()[0];
    let lanes = indices.shape().dims()[0];
    let out = dst.as_mut_slice();

    for i in 0..lanes {
        let raw = idxs[i * istr];
        let target = raw as usize;
        if raw < 0.0 || target >= extent {
            return Err(KernelError::IndexOutOfRange {
                op: "index-set",
                index: raw as isize,
                extent,
            });
        }
        let offset = if dim == 0 {
            target * dstr[0] + i * dstr[1]
        } else {
            i * dstr[0] + target * dstr[1]
        };
        out[offset] = vals[i * vstr];
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Shape;

    fn argmax_update(acc: f32, acc_idx: usize, value: f32, i: usize) -> (f32, usize) {
        if value > acc {
            (value, i)
        } else {
            (acc, acc_idx)
        }
    }

    #[test]
    fn test_index_reduce_rows() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 3.0, 2.0, 4.0, 0.0, 5.0]).unwrap();
        let mut out = Tensor::zeros(Shape::matrix(2, 1));
        index_reduce(&t.view(), &mut out, 1, argmax_update, f32::NEG_INFINITY);
        assert_eq!(out.as_slice(), &[1.0, 2.0]);
    }

    #[test]
    fn test_index_reduce_columns() {
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 9.0, 2.0, 4.0, 0.0, 5.0]).unwrap();
        let mut out = Tensor::zeros(Shape::matrix(1, 3));
        index_reduce(&t.view(), &mut out, 0, argmax_update, f32::NEG_INFINITY);
        assert_eq!(out.as_slice(), &[1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_index_reduce_tie_takes_earliest() {
        let t = Tensor::from_f32(Shape::vector(4), &[2.0, 7.0, 7.0, 1.0]).unwrap();
        let mut out = Tensor::zeros(Shape::vector(1));
        index_reduce(&t.view(), &mut out, 0, argmax_update, f32::NEG_INFINITY);
        assert_eq!(out.as_slice(), &[1.0]);
    }

    #[test]
    fn test_index_set_axis0() {
        let values = Tensor::from_f32(Shape::vector(3), &[10.0, 20.0, 30.0]).unwrap();
        let indices = Tensor::from_f32(Shape::vector(3), &[1.0, 0.0, 1.0]).unwrap();
        let mut dst = Tensor::zeros(Shape::matrix(2, 3));
        index_set(&values.view(), &indices.view(), &mut dst, 0).unwrap();
        assert_eq!(dst.as_slice(), &[0.0, 20.0, 0.0, 10.0, 0.0, 30.0]);
    }

    #[test]
    fn test_index_set_axis1() {
        let values = Tensor::from_f32(Shape::vector(2), &[10.0, 20.0]).unwrap();
        let indices = Tensor::from_f32(Shape::vector(2), &[2.0, 0.0]).unwrap();
        let mut dst = Tensor::zeros(Shape::matrix(2, 3));
        index_set(&values.view(), &indices.view(), &mut dst, 1).unwrap();
        assert_eq!(dst.as_slice(), &[0.0, 0.0, 10.0, 20.0, 0.0, 0.0]);
    }

    #[test]
    fn test_index_set_out_of_range() {
        let values = Tensor::from_f32(Shape::vector(1), &[1.0]).unwrap();
        let indices = Tensor::from_f32(Shape::vector(1), &[5.0]).unwrap();
        let mut dst = Tensor::zeros(Shape::matrix(2, 1));
        let err = index_set(&values.view(), &indices.view(), &mut dst, 0);
        assert!(matches!(err, Err(KernelError::IndexOutOfRange { .. })));
    }
}
