// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Softmax along an arbitrary axis.

use crate::{prepare_dst, MathError};
use compute_kernel::{Executor, Op};
use tensor_core::Tensor;

/// Computes softmax along `dim` (negative indexes from the end):
/// `out[i] = exp(x[i] − max) / Σ exp(x − max)` per lane.
///
/// Every lane of the output sums to 1 and lies in `[0, 1]`; the maximum
/// is subtracted before exponentiation for numerical stability.
pub fn softmax(
    ex: &Executor,
    src: &Tensor,
    dim: isize,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    let axis = src.shape().resolve_axis(dim)?;
    let mut out = prepare_dst("softmax", src.shape(), dst)?;
    ex.exec(Op::Softmax {
        src: src.view(),
        dst: &mut out,
        dim: axis,
    })?;
    Ok(out)
}
