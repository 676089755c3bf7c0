// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Matrix multiplication.

use crate::{prepare_dst, MathError};
use compute_kernel::{Executor, Op};
use tensor_core::{Shape, Tensor, TensorError};

/// Options for [`matmul`]. A set flag multiplies with that operand
/// transposed, without moving any data.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatmulOpts {
    pub transpose_lhs: bool,
    pub transpose_rhs: bool,
}

/// Matrix multiplication of two rank-2 tensors: `[M, K] @ [K, N] -> [M, N]`,
/// with the transpose flags applied to the operand layouts first.
///
/// # Errors
/// Returns [`TensorError::RankMismatch`] for non-rank-2 operands and
/// [`TensorError::ShapeMismatch`] for inner-dimension disagreement or a
/// wrongly shaped destination.
pub fn matmul(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    opts: MatmulOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
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
    let m = if opts.transpose_lhs { ldims[1] } else { ldims[0] };
    let n = if opts.transpose_rhs { rdims[0] } else { rdims[1] };

    let mut out = prepare_dst("matmul", &Shape::matrix(m, n), dst)?;
    ex.exec(Op::Matmul {
        lhs: lhs.view(),
        rhs: rhs.view(),
        dst: &mut out,
        transpose_lhs: opts.transpose_lhs,
        transpose_rhs: opts.transpose_rhs,
    })?;
    Ok(out)
}
