// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shape-manipulating operations that move data.

use crate::MathError;
use tensor_core::{Shape, Tensor, TensorError};

/// Repeats a tensor `reps[i]` times along axis `i`.
///
/// `reps` must name every axis once; the result dimension `i` is
/// `shape[i] · reps[i]`. Each output element reads its source by taking
/// every index modulo the source extent.
///
/// # Errors
/// Returns [`TensorError::RankMismatch`] if `reps` has the wrong length
/// and [`TensorError::ShapeMismatch`] if any repetition count is zero.
pub fn tile(src: &Tensor, reps: &[usize]) -> Result<Tensor, MathError> {
    if reps.len() != src.rank() {
        return Err(TensorError::RankMismatch {
            op: "tile",
            expected: src.rank(),
            actual: reps.len(),
        }
        .into());
    }
    if reps.contains(&0) {
        return Err(TensorError::ShapeMismatch {
            op: "tile",
            lhs: src.shape().clone(),
            rhs: Shape::new(reps.to_vec()),
        }
        .into());
    }

    let src_dims = src.shape().dims();
    let out_dims: Vec<usize> = src_dims.iter().zip(reps).map(|(&d, &r)| d * r).collect();
    let out_shape = Shape::new(out_dims);
    let rank = src.rank();

    if rank == 0 {
        return Ok(Tensor::scalar(src.as_slice()[0]));
    }

    let sstr = src.strides().as_slice();
    let a = src.as_slice();
    let mut out = Tensor::zeros(out_shape.clone());
    let buf = out.as_mut_slice();

    let dims = out_shape.dims().to_vec();
    let mut index = vec![0usize; rank];
    for slot in buf.iter_mut() {
        let offset: usize = index
            .iter()
            .zip(src_dims)
            .zip(sstr)
            .map(|((&i, &d), &s)| (i % d) * s)
            .sum();
        *slot = a[offset];

        for axis in (0..rank).rev() {
            index[axis] += 1;
            if index[axis] < dims[axis] {
                break;
            }
            index[axis] = 0;
        }
    }

    Ok(out)
}
