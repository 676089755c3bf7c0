// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-math
//!
//! The named operation catalogue over the execution kernel.
//!
//! Every operation here follows one contract:
//! 1. infer the result shape (unary: input shape; binary: broadcast;
//!    reductions: reduce-shape with `keep_dims` handling; matmul: from the
//!    operand layouts and transpose flags),
//! 2. validate an optional caller-provided destination against it — a
//!    mismatch is an error,
//! 3. build the op descriptor and submit it to the [`Executor`],
//! 4. return the destination tensor.
//!
//! Pass the executor explicitly: share one, or construct a fresh one per
//! test for isolation.
//!
//! ```
//! use tensor_core::{Shape, Tensor};
//! use tensor_math::{add, Executor};
//!
//! let ex = Executor::new();
//! let a = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0, 3.0, 4.0]).unwrap();
//! let row = Tensor::from_f32(Shape::vector(2), &[10.0, 20.0]).unwrap();
//! let sum = add(&ex, &a, &row, None).unwrap();
//! assert_eq!(sum.as_slice(), &[11.0, 22.0, 13.0, 24.0]);
//! ```

mod conv;
mod elementwise;
mod error;
mod index;
mod linalg;
mod reduce;
mod shape_ops;
mod softmax;

pub use compute_kernel::Executor;
pub use conv::{col2im, conv2d, im2col, max_pool2d, Conv2dOpts};
pub use elementwise::{
    abs, add, add_n, cos, div, exp, fill, log, maximum, minimum, mul, neg, pow, relu, sigmoid,
    sign, sin, sqrt, square, sub, tan, tanh,
};
pub use error::MathError;
pub use index::{arg_max, arg_min, scatter};
pub use linalg::{matmul, MatmulOpts};
pub use reduce::{
    reduce_abs_sum, reduce_max, reduce_mean, reduce_min, reduce_prod, reduce_sum, ReduceOpts,
};
pub use shape_ops::tile;
pub use softmax::softmax;

use tensor_core::{Shape, Tensor, TensorError};

/// Validates an optional pre-allocated destination against the inferred
/// shape, allocating a zeroed tensor when none was provided.
pub(crate) fn prepare_dst(
    op: &'static str,
    shape: &Shape,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    match dst {
        None => Ok(Tensor::zeros(shape.clone())),
        Some(t) if t.shape() == shape => Ok(t),
        Some(t) => Err(TensorError::ShapeMismatch {
            op,
            lhs: shape.clone(),
            rhs: t.shape().clone(),
        }
        .into()),
    }
}

/// Moves a computed result into the caller's destination (validating its
/// shape) or hands the result back directly.
pub(crate) fn deliver(
    op: &'static str,
    result: Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    match dst {
        None => Ok(result),
        Some(mut d) => {
            if d.shape() != result.shape() {
                return Err(TensorError::ShapeMismatch {
                    op,
                    lhs: result.shape().clone(),
                    rhs: d.shape().clone(),
                }
                .into());
            }
            d.as_mut_slice().copy_from_slice(result.as_slice());
            Ok(d)
        }
    }
}
