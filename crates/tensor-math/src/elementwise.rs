// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Elementwise operations: binary with broadcasting, unary maps, fill,
//! and n-ary addition.
//!
//! Numerical edge cases never raise — `div` by zero, `log(0)`, and
//! `sqrt` of a negative produce the IEEE-754 result.

use crate::{deliver, prepare_dst, MathError};
use compute_kernel::{BinaryFn, Executor, Op, UnaryFn};
use tensor_core::{Tensor, TensorError};

fn binary(
    ex: &Executor,
    op: &'static str,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
    body: BinaryFn,
) -> Result<Tensor, MathError> {
    let shape = lhs.shape().broadcast_with(rhs.shape())?;
    let mut out = prepare_dst(op, &shape, dst)?;
    ex.exec(Op::Pairwise {
        lhs: lhs.view(),
        rhs: rhs.view(),
        dst: &mut out,
        body,
    })?;
    Ok(out)
}

fn unary(
    ex: &Executor,
    op: &'static str,
    src: &Tensor,
    dst: Option<Tensor>,
    body: UnaryFn,
) -> Result<Tensor, MathError> {
    let mut out = prepare_dst(op, src.shape(), dst)?;
    ex.exec(Op::Transform {
        src: src.view(),
        dst: &mut out,
        body,
    })?;
    Ok(out)
}

/// Elementwise addition with broadcasting.
pub fn add(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "add", lhs, rhs, dst, |x, y| x + y)
}

/// Elementwise subtraction with broadcasting.
pub fn sub(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "sub", lhs, rhs, dst, |x, y| x - y)
}

/// Elementwise multiplication with broadcasting.
pub fn mul(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "mul", lhs, rhs, dst, |x, y| x * y)
}

/// Elementwise division with broadcasting.
pub fn div(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "div", lhs, rhs, dst, |x, y| x / y)
}

/// Elementwise power with broadcasting: `lhs ^ rhs`.
pub fn pow(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "pow", lhs, rhs, dst, f32::powf)
}

/// Elementwise maximum with broadcasting.
pub fn maximum(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "maximum", lhs, rhs, dst, f32::max)
}

/// Elementwise minimum with broadcasting.
pub fn minimum(
    ex: &Executor,
    lhs: &Tensor,
    rhs: &Tensor,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    binary(ex, "minimum", lhs, rhs, dst, f32::min)
}

/// Elementwise negation.
pub fn neg(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "neg", src, dst, |x| -x)
}

/// Elementwise absolute value.
pub fn abs(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "abs", src, dst, f32::abs)
}

/// Elementwise sign: −1, 0, or 1.
pub fn sign(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "sign", src, dst, |x| if x == 0.0 { 0.0 } else { x.signum() })
}

/// Elementwise square.
pub fn square(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "square", src, dst, |x| x * x)
}

/// Elementwise square root.
pub fn sqrt(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "sqrt", src, dst, f32::sqrt)
}

/// Elementwise natural exponential.
pub fn exp(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "exp", src, dst, f32::exp)
}

/// Elementwise natural logarithm.
pub fn log(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "log", src, dst, f32::ln)
}

/// Elementwise sine.
pub fn sin(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "sin", src, dst, f32::sin)
}

/// Elementwise cosine.
pub fn cos(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "cos", src, dst, f32::cos)
}

/// Elementwise tangent.
pub fn tan(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "tan", src, dst, f32::tan)
}

/// Rectified linear unit: `max(0, x)`.
pub fn relu(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "relu", src, dst, |x| x.max(0.0))
}

/// Logistic sigmoid: `1 / (1 + e^(−x))`.
pub fn sigmoid(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "sigmoid", src, dst, |x| 1.0 / (1.0 + (-x).exp()))
}

/// Hyperbolic tangent.
pub fn tanh(ex: &Executor, src: &Tensor, dst: Option<Tensor>) -> Result<Tensor, MathError> {
    unary(ex, "tanh", src, dst, f32::tanh)
}

/// Writes `value` into every element of `dst` in place.
pub fn fill(ex: &Executor, dst: &mut Tensor, value: f32) -> Result<(), MathError> {
    ex.exec(Op::Fill { dst, value })?;
    Ok(())
}

/// Sums a list of same-shaped tensors element-wise.
///
/// Operands are not broadcast against each other — every shape must equal
/// the first.
///
/// # Errors
/// Returns [`TensorError::LengthMismatch`] for an empty list and
/// [`TensorError::ShapeMismatch`] for any shape disagreement.
pub fn add_n(
    ex: &Executor,
    tensors: &[&Tensor],
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    let first = tensors.first().ok_or(TensorError::LengthMismatch {
        op: "add_n",
        expected: 1,
        actual: 0,
    })?;
    for t in &tensors[1..] {
        if t.shape() != first.shape() {
            return Err(TensorError::ShapeMismatch {
                op: "add_n",
                lhs: first.shape().clone(),
                rhs: t.shape().clone(),
            }
            .into());
        }
    }

    let mut acc = first.view().to_tensor();
    for t in &tensors[1..] {
        acc = add(ex, &acc, t, None)?;
    }
    deliver("add_n", acc, dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Shape;

    fn approx_eq(a: &[f32], b: &[f32], tol: f32) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| (x - y).abs() < tol)
    }

    #[test]
    fn test_add_row_broadcast() {
        let ex = Executor::new();
        let m = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let row = Tensor::from_f32(Shape::vector(2), &[10.0, 20.0]).unwrap();

        let out = add(&ex, &m, &row, None).unwrap();
        assert_eq!(out.shape(), &Shape::matrix(2, 2));
        assert_eq!(out.as_slice(), &[11.0, 22.0, 13.0, 24.0]);
    }

    #[test]
    fn test_sub_and_div() {
        let ex = Executor::new();
        let a = Tensor::from_f32(Shape::vector(3), &[4.0, 9.0, 16.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(3), &[2.0, 3.0, 4.0]).unwrap();

        assert_eq!(sub(&ex, &a, &b, None).unwrap().as_slice(), &[2.0, 6.0, 12.0]);
        assert_eq!(div(&ex, &a, &b, None).unwrap().as_slice(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_div_by_zero_propagates_inf() {
        let ex = Executor::new();
        let a = Tensor::from_f32(Shape::vector(2), &[1.0, -1.0]).unwrap();
        let zero = Tensor::scalar(0.0);

        let out = div(&ex, &a, &zero, None).unwrap();
        assert_eq!(out.as_slice(), &[f32::INFINITY, f32::NEG_INFINITY]);
    }

    #[test]
    fn test_unary_catalogue() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::vector(3), &[-1.0, 0.0, 4.0]).unwrap();

        assert_eq!(neg(&ex, &t, None).unwrap().as_slice(), &[1.0, 0.0, -4.0]);
        assert_eq!(abs(&ex, &t, None).unwrap().as_slice(), &[1.0, 0.0, 4.0]);
        assert_eq!(sign(&ex, &t, None).unwrap().as_slice(), &[-1.0, 0.0, 1.0]);
        assert_eq!(square(&ex, &t, None).unwrap().as_slice(), &[1.0, 0.0, 16.0]);
        assert_eq!(relu(&ex, &t, None).unwrap().as_slice(), &[0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_sqrt_of_negative_is_nan() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::vector(2), &[-4.0, 9.0]).unwrap();
        let out = sqrt(&ex, &t, None).unwrap();
        assert!(out.as_slice()[0].is_nan());
        assert_eq!(out.as_slice()[1], 3.0);
    }

    #[test]
    fn test_sigmoid_midpoint() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::vector(1), &[0.0]).unwrap();
        assert!(approx_eq(sigmoid(&ex, &t, None).unwrap().as_slice(), &[0.5], 1e-6));
    }

    #[test]
    fn test_preallocated_destination() {
        let ex = Executor::new();
        let a = Tensor::from_f32(Shape::vector(2), &[1.0, 2.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(2), &[3.0, 4.0]).unwrap();
        let dst = Tensor::zeros(Shape::vector(2));

        let out = add(&ex, &a, &b, Some(dst)).unwrap();
        assert_eq!(out.as_slice(), &[4.0, 6.0]);
    }

    #[test]
    fn test_wrong_destination_shape() {
        let ex = Executor::new();
        let a = Tensor::zeros(Shape::vector(2));
        let b = Tensor::zeros(Shape::vector(2));
        let wrong = Tensor::zeros(Shape::vector(3));

        assert!(matches!(
            add(&ex, &a, &b, Some(wrong)),
            Err(MathError::Shape(TensorError::ShapeMismatch { .. }))
        ));
    }

    #[test]
    fn test_fill_in_place() {
        let ex = Executor::new();
        let mut t = Tensor::zeros(Shape::matrix(2, 2));
        fill(&ex, &mut t, 7.0).unwrap();
        assert_eq!(t.as_slice(), &[7.0; 4]);
    }

    #[test]
    fn test_add_n() {
        let ex = Executor::new();
        let a = Tensor::from_f32(Shape::vector(2), &[1.0, 2.0]).unwrap();
        let b = Tensor::from_f32(Shape::vector(2), &[10.0, 20.0]).unwrap();
        let c = Tensor::from_f32(Shape::vector(2), &[100.0, 200.0]).unwrap();

        let out = add_n(&ex, &[&a, &b, &c], None).unwrap();
        assert_eq!(out.as_slice(), &[111.0, 222.0]);

        // Single operand copies through.
        let single = add_n(&ex, &[&a], None).unwrap();
        assert_eq!(single.as_slice(), a.as_slice());
    }

    #[test]
    fn test_add_n_rejects_empty_and_mismatched() {
        let ex = Executor::new();
        assert!(add_n(&ex, &[], None).is_err());

        let a = Tensor::zeros(Shape::vector(2));
        let b = Tensor::zeros(Shape::vector(3));
        assert!(add_n(&ex, &[&a, &b], None).is_err());
    }
}
