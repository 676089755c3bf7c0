// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bespoke executors for the special ops: matmul and softmax-along-dim.
//! Neither reduces to the generic walkers.

use crate::KernelError;
use tensor_core::{Shape, Tensor, TensorError, TensorView};

/// Performs matrix multiplication: `dst = lhs @ rhs`, with either operand
/// optionally transposed in place via its flag (no data movement).
///
/// Both operands must be rank 2; with the transpose flags applied, `lhs`
/// is `[M, K]`, `rhs` is `[K, N]`, and `dst` must be `[M, N]`. Reads go
/// through the view strides, so transposed views multiply correctly
/// without materialisation.
///
/// # Errors
/// Returns [`TensorError::RankMismatch`] for non-rank-2 operands and
/// [`TensorError::ShapeMismatch`] for inner-dimension or destination
/// disagreements.
pub(crate) fn matmul(
    lhs: &TensorView,
    rhs: &TensorView,
    dst: &mut Tensor,
    transpose_lhs: bool,
    transpose_rhs: bool,
) -> Result<(), KernelError> {
    for operand in [lhs, rhs] {
        if operand.rank() != 2 {
            return Err(TensorError::RankMismatch {
                op: "matmul",
                expected: 2,
                actual: operand.rank(),
            }
            .into());
        }
    }

    let ldims = lhs.shape().dims();
    let rdims = rhs.shape().dims();
    let (m, k) = if transpose_lhs {
        (ldims[1], ldims[0])
    } else {
        (ldims[0], ldims[1])
    };
    let (k2, n) = if transpose_rhs {
        (rdims[1], rdims[0])
    } else {
        (rdims[0], rdims[1])
    };
    if k != k2 {
        return Err(TensorError::ShapeMismatch {
            op: "matmul",
            lhs: lhs.shape().clone(),
            rhs: rhs.shape().clone(),
        }
        .into());
    }

    let expected = Shape::matrix(m, n);
    if dst.shape() != &expected {
        return Err(TensorError::ShapeMismatch {
            op: "matmul (output)",
            lhs: expected,
            rhs: dst.shape().clone(),
        }
        .into());
    }

    let a = lhs.as_slice();
    let b = rhs.as_slice();
    let ls = lhs.strides().as_slice();
    let rs = rhs.strides().as_slice();
    let c = dst.as_mut_slice();

    // Zero the output.
    c.iter_mut().for_each(|x| *x = 0.0);

    // Row/column steps with the transpose flags folded in: a_at(i, p) and
    // b_at(p, j) become plain stride arithmetic.
    let (la_i, la_p) = if transpose_lhs {
        (ls[1], ls[0])
    } else {
        (ls[0], ls[1])
    };
    let (rb_p, rb_j) = if transpose_rhs {
        (rs[1], rs[0])
    } else {
        (rs[0], rs[1])
    };

    // ikj loop order: the inner loop is a saxpy on a row of C, which is
    // sequential in memory, and walks a row of B.
    for i in 0..m {
        for p in 0..k {
            let a_ip = a[i * la_i + p * la_p];
            let c_row = &mut c[i * n..(i + 1) * n];
            for (j, c_ij) in c_row.iter_mut().enumerate() {
                *c_ij += a_ip * b[p * rb_p + j * rb_j];
            }
        }
    }

    Ok(())
}

/// Computes softmax along `dim`: for every lane along that axis,
/// `dst[i] = exp(x[i] - max) / Σ exp(x - max)`.
///
/// Uses the numerically stable variant that subtracts the lane maximum
/// before exponentiation. Shape and axis validity are checked by the
/// dispatcher.
pub(crate) fn softmax(src: &TensorView, dst: &mut Tensor, dim: usize) {
    let dims = src.shape().dims().to_vec();
    let sstr = src.strides().as_slice().to_vec();
    let dstr = dst.strides().as_slice().to_vec();
    let lane = SoftmaxLanes {
        dims: &dims,
        sstr: &sstr,
        dstr: &dstr,
        dim,
    };
    lane.walk(0, 0, 0, src.as_slice(), dst.as_mut_slice());
}

struct SoftmaxLanes<'a> {
    dims: &'a [usize],
    sstr: &'a [usize],
    dstr: &'a [usize],
    dim: usize,
}

impl SoftmaxLanes<'_> {
    fn walk(&self, axis: usize, src_off: usize, dst_off: usize, a: &[f32], out: &mut [f32]) {
        if axis == self.dims.len() {
            let len = self.dims[self.dim];
            let sstep = self.sstr[self.dim];
            let dstep = self.dstr[self.dim];

            let mut max = f32::NEG_INFINITY;
            for i in 0..len {
                max = max.max(a[src_off + i * sstep]);
            }

            let mut sum = 0.0f32;
            for i in 0..len {
                let e = (a[src_off + i * sstep] - max).exp();
                out[dst_off + i * dstep] = e;
                sum += e;
            }

            if sum > 0.0 {
                let inv = 1.0 / sum;
                for i in 0..len {
                    out[dst_off + i * dstep] *= inv;
                }
            }
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
