// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Reductions over one or more axes.
//!
//! The kernel always reduces into a keep-dims destination; this module
//! allocates that destination, runs the sweep, and reshapes down when the
//! caller asked for dropped axes.

use crate::{prepare_dst, MathError};
use compute_kernel::{BinaryFn, Executor, FinalizeFn, Op, UnaryFn};
use tensor_core::Tensor;

/// Options shared by every reduction.
#[derive(Debug, Clone, Default)]
pub struct ReduceOpts {
    /// Axes to reduce; `None` reduces all of them. Negative values index
    /// from the end (−1 is the last axis).
    pub dims: Option<Vec<isize>>,
    /// Keep reduced axes as size 1 instead of removing them.
    pub keep_dims: bool,
}

impl ReduceOpts {
    /// Reduce every axis (the default).
    pub fn all() -> Self {
        Self::default()
    }

    /// Reduce a single axis.
    pub fn along(dim: isize) -> Self {
        Self {
            dims: Some(vec![dim]),
            keep_dims: false,
        }
    }

    /// Reduce the given axes.
    pub fn axes(dims: Vec<isize>) -> Self {
        Self {
            dims: Some(dims),
            keep_dims: false,
        }
    }

    /// Keep reduced axes as size 1.
    pub fn keep_dims(mut self) -> Self {
        self.keep_dims = true;
        self
    }
}

#[allow(clippy::too_many_arguments)]
fn reduce_with(
    ex: &Executor,
    op: &'static str,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
    body: UnaryFn,
    update: BinaryFn,
    initial: f32,
    finalize: Option<FinalizeFn>,
) -> Result<Tensor, MathError> {
    let mask = src.shape().reduced_dims(opts.dims.as_deref())?;
    let keep_shape = src.shape().reduce(&mask, true);
    let final_shape = src.shape().reduce(&mask, opts.keep_dims);

    let out = prepare_dst(op, &final_shape, dst)?;
    let mut out = out.into_reshaped(keep_shape)?;
    ex.exec(Op::Reduce {
        src: src.view(),
        dst: &mut out,
        reduced: mask,
        body,
        update,
        initial,
        finalize,
    })?;
    Ok(out.into_reshaped(final_shape)?)
}

/// Sums over the selected axes.
pub fn reduce_sum(
    ex: &Executor,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    reduce_with(ex, "reduce_sum", src, opts, dst, |x| x, |p, q| p + q, 0.0, None)
}

/// Arithmetic mean over the selected axes.
pub fn reduce_mean(
    ex: &Executor,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    reduce_with(
        ex,
        "reduce_mean",
        src,
        opts,
        dst,
        |x| x,
        |p, q| p + q,
        0.0,
        Some(|acc, n| acc / n),
    )
}

/// Product over the selected axes.
pub fn reduce_prod(
    ex: &Executor,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    reduce_with(ex, "reduce_prod", src, opts, dst, |x| x, |p, q| p * q, 1.0, None)
}

/// Minimum over the selected axes.
pub fn reduce_min(
    ex: &Executor,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    reduce_with(
        ex,
        "reduce_min",
        src,
        opts,
        dst,
        |x| x,
        f32::min,
        f32::INFINITY,
        None,
    )
}

/// Maximum over the selected axes.
pub fn reduce_max(
    ex: &Executor,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    reduce_with(
        ex,
        "reduce_max",
        src,
        opts,
        dst,
        |x| x,
        f32::max,
        f32::NEG_INFINITY,
        None,
    )
}

/// Sum of absolute values over the selected axes.
pub fn reduce_abs_sum(
    ex: &Executor,
    src: &Tensor,
    opts: &ReduceOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    reduce_with(
        ex,
        "reduce_abs_sum",
        src,
        opts,
        dst,
        f32::abs,
        |p, q| p + q,
        0.0,
        None,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::Shape;

    #[test]
    fn test_reduce_sum_axis0_drops_axis() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        let out = reduce_sum(&ex, &t, &ReduceOpts::along(0), None).unwrap();
        assert_eq!(out.shape(), &Shape::vector(3));
        assert_eq!(out.as_slice(), &[5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_reduce_mean_negative_axis_keep_dims() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::matrix(2, 2), &[1.0, 2.0, 3.0, 4.0]).unwrap();

        let out = reduce_mean(&ex, &t, &ReduceOpts::along(-1).keep_dims(), None).unwrap();
        assert_eq!(out.shape(), &Shape::matrix(2, 1));
        assert_eq!(out.as_slice(), &[1.5, 3.5]);
    }

    #[test]
    fn test_reduce_all_collapses_to_scalar() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::matrix(2, 3), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

        let out = reduce_sum(&ex, &t, &ReduceOpts::all(), None).unwrap();
        assert_eq!(out.shape(), &Shape::scalar());
        assert_eq!(out.as_slice(), &[21.0]);

        let mean = reduce_mean(&ex, &t, &ReduceOpts::all(), None).unwrap();
        assert_eq!(mean.as_slice(), &[3.5]);
    }

    #[test]
    fn test_reduce_min_max() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::matrix(2, 2), &[3.0, -1.0, 7.0, 0.5]).unwrap();

        let min = reduce_min(&ex, &t, &ReduceOpts::all(), None).unwrap();
        assert_eq!(min.as_slice(), &[-1.0]);

        let max = reduce_max(&ex, &t, &ReduceOpts::along(1), None).unwrap();
        assert_eq!(max.as_slice(), &[3.0, 7.0]);
    }

    #[test]
    fn test_reduce_prod() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::vector(4), &[1.0, 2.0, 3.0, 4.0]).unwrap();
        let out = reduce_prod(&ex, &t, &ReduceOpts::all(), None).unwrap();
        assert_eq!(out.as_slice(), &[24.0]);
    }

    #[test]
    fn test_reduce_abs_sum() {
        let ex = Executor::new();
        let t = Tensor::from_f32(Shape::vector(3), &[-2.0, 3.0, -4.0]).unwrap();
        let out = reduce_abs_sum(&ex, &t, &ReduceOpts::all(), None).unwrap();
        assert_eq!(out.as_slice(), &[9.0]);
    }

    #[test]
    fn test_reduce_multi_axis() {
        let ex = Executor::new();
        // [2, 2, 2] reduced over axes 0 and 2 -> [2].
        let t = Tensor::from_f32(
            Shape::new(vec![2, 2, 2]),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )
        .unwrap();

        let out = reduce_sum(&ex, &t, &ReduceOpts::axes(vec![0, 2]), None).unwrap();
        assert_eq!(out.shape(), &Shape::vector(2));
        // Axis-1 lane 0: 1+2+5+6, lane 1: 3+4+7+8.
        assert_eq!(out.as_slice(), &[14.0, 22.0]);
    }

    #[test]
    fn test_reduce_axis_out_of_range() {
        let ex = Executor::new();
        let t = Tensor::zeros(Shape::matrix(2, 2));
        assert!(reduce_sum(&ex, &t, &ReduceOpts::along(5), None).is_err());
    }
}
