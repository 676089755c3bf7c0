// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Convolution and pooling, composed over the kernel's `im2col` helper.
//!
//! `conv2d` is `matmul(kernel_matrix, im2col(image))` followed by reshape
//! and transpose; `max_pool2d` unrolls each channel separately and takes
//! the column maximum.

use crate::{deliver, reduce_max, MathError, ReduceOpts};
use compute_kernel::{Executor, Op};
use tensor_core::{Shape, Tensor, TensorError};

/// Stride options for convolution and pooling. Both default to 1.
#[derive(Debug, Clone, Copy)]
pub struct Conv2dOpts {
    pub stride_w: usize,
    pub stride_h: usize,
}

impl Default for Conv2dOpts {
    fn default() -> Self {
        Self {
            stride_w: 1,
            stride_h: 1,
        }
    }
}

/// Unrolls kernel-sized patches of an `[N, C, H, W]` image into a
/// `[C·kH·kW, N·outH·outW]` column matrix. See the kernel-level helper
/// for the exact layout.
pub fn im2col(
    image: &Tensor,
    kernel: (usize, usize),
    opts: Conv2dOpts,
) -> Result<Tensor, MathError> {
    Ok(compute_kernel::im2col(
        &image.view(),
        kernel,
        (opts.stride_h, opts.stride_w),
    )?)
}

/// Adjoint of [`im2col`]: folds a column matrix back into an image of
/// `image_shape`, summing overlapping contributions.
pub fn col2im(
    columns: &Tensor,
    image_shape: &Shape,
    kernel: (usize, usize),
    opts: Conv2dOpts,
) -> Result<Tensor, MathError> {
    Ok(compute_kernel::col2im(
        &columns.view(),
        image_shape,
        kernel,
        (opts.stride_h, opts.stride_w),
    )?)
}

/// 2-D convolution of an `[N, C, H, W]` image with `[K, C, kH, kW]`
/// kernels, producing `[N, K, outH, outW]` (valid padding).
///
/// # Errors
/// Returns [`TensorError::RankMismatch`] for non-rank-4 operands,
/// [`TensorError::ShapeMismatch`] for a channel-count disagreement, and
/// the window errors of [`im2col`].
pub fn conv2d(
    ex: &Executor,
    image: &Tensor,
    kernels: &Tensor,
    opts: Conv2dOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    for (label, operand) in [("conv2d (image)", image), ("conv2d (kernels)", kernels)] {
        if operand.rank() != 4 {
            return Err(TensorError::RankMismatch {
                op: label,
                expected: 4,
                actual: operand.rank(),
            }
            .into());
        }
    }
    let idims = image.shape().dims();
    let kdims = kernels.shape().dims();
    let (n, c, h, w) = (idims[0], idims[1], idims[2], idims[3]);
    let (k, kc, kh, kw) = (kdims[0], kdims[1], kdims[2], kdims[3]);
    if kc != c {
        return Err(TensorError::ShapeMismatch {
            op: "conv2d (channels)",
            lhs: image.shape().clone(),
            rhs: kernels.shape().clone(),
        }
        .into());
    }

    let out_h = compute_kernel::conv_output_size(h, kh, opts.stride_h)?;
    let out_w = compute_kernel::conv_output_size(w, kw, opts.stride_w)?;
    tracing::debug!(n, k, out_h, out_w, "conv2d via im2col + matmul");

    // [C·kh·kw, N·outH·outW] columns against the [K, C·kh·kw] kernel matrix.
    let columns = compute_kernel::im2col(&image.view(), (kh, kw), (opts.stride_h, opts.stride_w))?;
    let kernel_matrix = kernels.reshape(Shape::matrix(k, c * kh * kw))?;

    let mut product = Tensor::zeros(Shape::matrix(k, n * out_h * out_w));
    ex.exec(Op::Matmul {
        lhs: kernel_matrix,
        rhs: columns.view(),
        dst: &mut product,
        transpose_lhs: false,
        transpose_rhs: false,
    })?;

    // [K, N·outH·outW] -> [K, N, outH, outW] -> [N, K, outH, outW].
    let grouped = product.into_reshaped(Shape::new(vec![k, n, out_h, out_w]))?;
    let result = grouped.transpose(&[1, 0, 2, 3])?.to_tensor();
    deliver("conv2d", result, dst)
}

/// 2-D max pooling of an `[N, C, H, W]` image with a `(pH, pW)` window,
/// producing `[N, C, outH, outW]` (valid padding).
///
/// Each channel is unrolled independently, so a column holds exactly one
/// pooling window; the column maximum is the pooled value.
pub fn max_pool2d(
    ex: &Executor,
    image: &Tensor,
    pool: (usize, usize),
    opts: Conv2dOpts,
    dst: Option<Tensor>,
) -> Result<Tensor, MathError> {
    if image.rank() != 4 {
        return Err(TensorError::RankMismatch {
            op: "max_pool2d",
            expected: 4,
            actual: image.rank(),
        }
        .into());
    }
    let dims = image.shape().dims();
    let (n, c, h, w) = (dims[0], dims[1], dims[2], dims[3]);
    let (ph, pw) = pool;
    let out_h = compute_kernel::conv_output_size(h, ph, opts.stride_h)?;
    let out_w = compute_kernel::conv_output_size(w, pw, opts.stride_w)?;

    // Treat every channel as its own sample: [N·C, 1, H, W] unrolls to
    // [pH·pW, N·C·outH·outW] with one window per column.
    let merged = image.reshape(Shape::new(vec![n * c, 1, h, w]))?;
    let columns =
        compute_kernel::im2col(&merged, (ph, pw), (opts.stride_h, opts.stride_w))?;
    let pooled = reduce_max(ex, &columns, &ReduceOpts::along(0), None)?;

    let result = pooled.into_reshaped(Shape::new(vec![n, c, out_h, out_w]))?;
    deliver("max_pool2d", result, dst)
}
