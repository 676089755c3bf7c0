// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Strided walkers for the pairwise, transform, and reduction families.
//!
//! Every walker visits the relevant index space exactly once in row-major
//! order, carrying one linear cursor per operand plus one for the
//! destination. Cursors advance by the axis stride per step; when an axis
//! wraps, the full extent (`stride · size`) is subtracted and the carry
//! cascades to the next axis out. This keeps per-element bookkeeping O(1)
//! with no division.
//!
//! Broadcasting is entirely a stride phenomenon here: operands arrive
//! left-padded to the destination rank and every size-1 axis reads with
//! stride 0, so the same element is re-read for each destination index
//! along that axis.
//!
//! Ranks 0–2 get dedicated tight loops; higher ranks fall through to the
//! general odometer.

use crate::op::{BinaryFn, FinalizeFn, UnaryFn};
use tensor_core::{broadcast_strides, Tensor, TensorView};

/// Pairwise walker: `dst[i] = body(lhs[i], rhs[i])` over the broadcast
/// index space. Shapes are validated by the dispatcher.
pub(crate) fn pairwise(lhs: &TensorView, rhs: &TensorView, dst: &mut Tensor, body: BinaryFn) {
    let out_shape = dst.shape().clone();
    let rank = out_shape.rank();
    let l = lhs.left_pad_to(rank);
    let r = rhs.left_pad_to(rank);
    let ls = broadcast_strides(l.shape(), l.strides(), &out_shape);
    let rs = broadcast_strides(r.shape(), r.strides(), &out_shape);
    let a = l.as_slice();
    let b = r.as_slice();
    let la = ls.as_slice();
    let rb = rs.as_slice();
    let dims = out_shape.dims().to_vec();
    let out = dst.as_mut_slice();

    match rank {
        0 => out[0] = body(a[0], b[0]),
        1 => {
            let (sa, sb) = (la[0], rb[0]);
            let (mut ia, mut ib) = (0usize, 0usize);
            for o in out.iter_mut() {
                *o = body(a[ia], b[ib]);
                ia += sa;
                ib += sb;
            }
        }
        2 => {
            let (rows, cols) = (dims[0], dims[1]);
            let (mut ia, mut ib, mut io) = (0usize, 0usize, 0usize);
            for _ in 0..rows {
                for _ in 0..cols {
                    out[io] = body(a[ia], b[ib]);
                    io += 1;
                    ia += la[1];
                    ib += rb[1];
                }
                // Row carry: resume the next row at its first column.
                ia = ia + la[0] - la[1] * cols;
                ib = ib + rb[0] - rb[1] * cols;
            }
        }
        _ => {
            let dstr = out_shape.contiguous_strides();
            let mut counters = vec![0usize; rank];
            let (mut ia, mut ib, mut io) = (0usize, 0usize, 0usize);
            let ds = dstr.as_slice();
            for _ in 0..out.len() {
                out[io] = body(a[ia], b[ib]);
                for axis in (0..rank).rev() {
                    counters[axis] += 1;
                    ia += la[axis];
                    ib += rb[axis];
                    io += ds[axis];
                    if counters[axis] < dims[axis] {
                        break;
                    }
                    counters[axis] = 0;
                    ia -= la[axis] * dims[axis];
                    ib -= rb[axis] * dims[axis];
                    io -= ds[axis] * dims[axis];
                }
            }
        }
    }
}

/// Transform walker: `dst[i] = body(src[i])`, same shape on both sides.
/// Source strides are used verbatim — no broadcast substitution.
pub(crate) fn transform(src: &TensorView, dst: &mut Tensor, body: UnaryFn) {
    let rank = src.rank();
    let a = src.as_slice();
    let sa = src.strides().as_slice().to_vec();
    let dims = src.shape().dims().to_vec();
    let out = dst.as_mut_slice();

    match rank {
        0 => out[0] = body(a[0]),
        1 => {
            let s = sa[0];
            let mut ia = 0usize;
            for o in out.iter_mut() {
                *o = body(a[ia]);
                ia += s;
            }
        }
        2 => {
            let (rows, cols) = (dims[0], dims[1]);
            let (mut ia, mut io) = (0usize, 0usize);
            for _ in 0..rows {
                for _ in 0..cols {
                    out[io] = body(a[ia]);
                    io += 1;
                    ia += sa[1];
                }
                ia = ia + sa[0] - sa[1] * cols;
            }
        }
        _ => {
            let dstr = src.shape().contiguous_strides();
            let ds = dstr.as_slice();
            let mut counters = vec![0usize; rank];
            let (mut ia, mut io) = (0usize, 0usize);
            for _ in 0..out.len() {
                out[io] = body(a[ia]);
                for axis in (0..rank).rev() {
                    counters[axis] += 1;
                    ia += sa[axis];
                    io += ds[axis];
                    if counters[axis] < dims[axis] {
                        break;
                    }
                    counters[axis] = 0;
                    ia -= sa[axis] * dims[axis];
                    io -= ds[axis] * dims[axis];
                }
            }
        }
    }
}

/// Reduction walker: sweeps the full input index space; destination
/// strides carry 0 at every reduced axis, so all inputs sharing the
/// non-reduced coordinates accumulate into one cell.
///
/// The destination (keep-dims shape) is pre-filled with `initial`. After
/// the sweep, `finalize` (if any) is applied with the reduced-element
/// count — mean divides by it.
#[allow(clippy::too_many_arguments)]
pub(crate) fn reduce(
    src: &TensorView,
    dst: &mut Tensor,
    reduced: &[bool],
    body: UnaryFn,
    update: BinaryFn,
    initial: f32,
    finalize: Option<FinalizeFn>,
) {
    dst.fill(initial);

    let rank = src.rank();
    let a = src.as_slice();
    let sa = src.strides().as_slice().to_vec();
    let dims = src.shape().dims().to_vec();
    // Destination steps masked to 0 on reduced axes.
    let ds: Vec<usize> = dst
        .strides()
        .as_slice()
        .iter()
        .zip(reduced)
        .map(|(&s, &m)| if m { 0 } else { s })
        .collect();
    let out = dst.as_mut_slice();

    match rank {
        0 => out[0] = update(out[0], body(a[0])),
        1 => {
            let (mut ia, mut io) = (0usize, 0usize);
            for _ in 0..dims[0] {
                out[io] = update(out[io], body(a[ia]));
                ia += sa[0];
                io += ds[0];
            }
        }
        2 => {
            let (rows, cols) = (dims[0], dims[1]);
            let (mut ia, mut io) = (0usize, 0usize);
            for _ in 0..rows {
                for _ in 0..cols {
                    out[io] = update(out[io], body(a[ia]));
                    ia += sa[1];
                    io += ds[1];
                }
                ia = ia + sa[0] - sa[1] * cols;
                io = io + ds[0] - ds[1] * cols;
            }
        }
        _ => {
            let total: usize = dims.iter().product();
            let mut counters = vec![0usize; rank];
            let (mut ia, mut io) = (0usize, 0usize);
            for _ in 0..total {
                out[io] = update(out[io], body(a[ia]));
                for axis in (0..rank).rev() {
                    counters[axis] += 1;
                    ia += sa[axis];
                    io += ds[axis];
                    if counters[axis] < dims[axis] {
                        break;
                    }
                    counters[axis] = 0;
                    ia -= sa[axis] * dims[axis];
                    io -= ds[axis] * dims[axis];
                }
            }
        }
    }

    if let Some(fin) = finalize {
        let n: f32 = dims
            .iter()
            .zip(reduced)
            .filter(|(_, &m)| m)
            .map(|(&d, _)| d as f32)
            .product();
        for v in out.iter_mut() {
            *v = fin(*v, n);
        }
    }
}
