// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Index operations: argmax/argmin along an axis and scatter.

use crate::{prepare_dst, MathError};
use compute_kernel::{DimOp, Executor, IndexUpdateFn};
use tensor_core::Tensor;

fn index_reduce(
    ex: &Executor,
    op: &'static str,
    src: &Tensor,
    dim: isize,
    dst: Option<Tensor>,
    update: IndexUpdateFn,
    initial: f32,
) -> Result<Tensor, MathError> {
    let axis = src.shape().resolve_axis(dim)?;
    let mut mask = vec![false; src.rank()];
    mask[axis] = true;
    let keep_shape = src.shape().reduce(&mask, true);
    let final_shape = src.shape().reduce(&mask, false);

    let out = prepare_dst(op, &final_shape, dst)?;
    let mut out = out.into_reshaped(keep_shape)?;
    ex.exec_at_dim(
        DimOp::IndexReduce {
            src: src.view(),
            dst: &mut out,
            update,
            initial,
        },
        axis,
    )?;
    Ok(out.into_reshaped(final_shape)?)
}

/// Index of the maximum along `dim` (negative indexes from the end).
///
/// The target axis is removed from the result shape; repeated maxima
/// resolve to the earliest index.
pub fn arg_max(
    ex: &Executor,
    src: &Tensor,
    dim: isize,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    index_reduce(
        ex,
        "arg_max",
        src,
        dim,
        dst,
        |acc, acc_idx, value, i| {
            if value > acc {
                (value, i)
            } else {
                (acc, acc_idx)
            }
        },
        f32::NEG_INFINITY,
    )
}

/// Index of the minimum along `dim`; ties resolve to the earliest index.
pub fn arg_min(
    ex: &Executor,
    src: &Tensor,
    dim: isize,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    index_reduce(
        ex,
        "arg_min",
        src,
        dim,
        dst,
        |acc, acc_idx, value, i| {
            if value < acc {
                (value, i)
            } else {
                (acc, acc_idx)
            }
        },
        f32::INFINITY,
    )
}

/// Scatters `values` into a rank-2 destination along `dim`.
///
/// Lane `i` of the non-target axis receives `values[i]` at position
/// `indices[i]` along the target axis — `dst[indices[i], i]` for axis 0.
/// This is the write half of max-pool gradient propagation: the indices
/// come from an earlier [`arg_max`] over the pooling columns.
///
/// # Errors
/// Rank-2 destination and in-range indices are enforced by the kernel.
pub fn scatter(
    ex: &Executor,
    values: &Tensor,
    indices: &Tensor,
    dim: isize,
    dst: &mut Tensor,
) -> Result<(), MathError> {
    let axis = dst.shape().resolve_axis(dim)?;
    ex.exec_at_dim(
        DimOp::IndexSet {
            values: values.view(),
            indices: indices.view(),
            dst,
        },
        axis,
    )?;
    Ok(())
}
