// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Convolution helpers: patch unrolling (`im2col`), its adjoint
//! (`col2im`), and window-size arithmetic.
//!
//! `im2col` turns convolution into one large matrix multiply: every
//! kernel-sized patch of the `[N, C, H, W]` image becomes a column of
//! length `C·kH·kW`. There is no padding; windows must fit the input.

use crate::KernelError;
use tensor_core::{Shape, Tensor, TensorError, TensorView};

/// Computes the output extent of a valid (unpadded) sliding window:
/// `(input − kernel) / stride + 1`.
///
/// # Errors
/// Returns [`KernelError::WindowMismatch`] if the kernel is empty, the
/// stride is zero, or the kernel exceeds the input extent.
pub fn conv_output_size(input: usize, kernel: usize, stride: usize) -> Result<usize, KernelError> {
    if kernel == 0 || stride == 0 || kernel > input {
        return Err(KernelError::WindowMismatch {
            input,
            kernel,
            stride,
        });
    }
    Ok((input - kernel) / stride + 1)
}

/// Unrolls every kernel-sized patch of an `[N, C, H, W]` image into the
/// columns of a `[C·kH·kW, N·outH·outW]` matrix.
///
/// Column `n·outH·outW + oh·outW + ow` holds the patch at output position
/// `(oh, ow)` of sample `n`; row `(c·kH + ki)·kW + kj` holds kernel cell
/// `(ki, kj)` of channel `c`.
///
/// # Errors
/// Returns [`TensorError::RankMismatch`] if the image is not rank 4 and
/// [`KernelError::WindowMismatch`] if the window does not fit.
pub fn im2col(
    image: &TensorView,
    kernel: (usize, usize),
    stride: (usize, usize),
) -> Result<Tensor, KernelError> {
    let (n, c, h, w) = image_dims(image)?;
    let (kh, kw) = kernel;
    let (sh, sw) = stride;
    let out_h = conv_output_size(h, kh, sh)?;
    let out_w = conv_output_size(w, kw, sw)?;

    let cols = n * out_h * out_w;
    let mut out = Tensor::zeros(Shape::matrix(c * kh * kw, cols));

    let a = image.as_slice();
    let s = image.strides().as_slice().to_vec();
    let buf = out.as_mut_slice();

    for ci in 0..c {
        for ki in 0..kh {
            for kj in 0..kw {
                let row = (ci * kh + ki) * kw + kj;
                let row_offset = row * cols;
                for ni in 0..n {
                    let src_base = ni * s[0] + ci * s[1];
                    let col_base = row_offset + ni * out_h * out_w;
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let src = src_base + (oh * sh + ki) * s[2] + (ow * sw + kj) * s[3];
                            buf[col_base + oh * out_w + ow] = a[src];
                        }
                    }
                }
            }
        }
    }

    Ok(out)
}

/// Adjoint of [`im2col`]: scatters a `[C·kH·kW, N·outH·outW]` column
/// matrix back into an `[N, C, H, W]` image, summing every contribution
/// at overlapping positions.
///
/// # Errors
/// Returns [`TensorError::ShapeMismatch`] if the column matrix does not
/// match the unrolling of `image_shape`, plus the [`im2col`] errors.
pub fn col2im(
    columns: &TensorView,
    image_shape: &Shape,
    kernel: (usize, usize),
    stride: (usize, usize),
) -> Result<Tensor, KernelError> {
    if image_shape.rank() != 4 {
        return Err(TensorError::RankMismatch {
            op: "col2im",
            expected: 4,
            actual: image_shape.rank(),
        }
        .into());
    }
    let dims = image_shape.dims();
    let (n, c, h, w) = (dims[0], dims[1], dims[2], dims[3]);
    let (kh, kw) = kernel;
    let (sh, sw) = stride;
    let out_h = conv_output_size(h, kh, sh)?;
    let out_w = conv_output_size(w, kw, sw)?;

    let cols = n * out_h * out_w;
    let expected = Shape::matrix(c * kh * kw, cols);
    if columns.shape() != &expected {
        return Err(TensorError::ShapeMismatch {
            op: "col2im",
            lhs: expected,
            rhs: columns.shape().clone(),
        }
        .into());
    }

    let mut out = Tensor::zeros(image_shape.clone());
    let istr = out.strides().as_slice().to_vec();
    let a = columns.as_slice();
    let cstr = columns.strides().as_slice().to_vec();
    let buf = out.as_mut_slice();

    for ci in 0..c {
        for ki in 0..kh {
            for kj in 0..kw {
                let row = (ci * kh + ki) * kw + kj;
                for ni in 0..n {
                    let dst_base = ni * istr[0] + ci * istr[1];
                    let col_base = ni * out_h * out_w;
                    for oh in 0..out_h {
                        for ow in 0..out_w {
                            let col = col_base + oh * out_w + ow;
                            let dst = dst_base + (oh * sh + ki) * istr[2] + (ow * sw + kj) * istr[3];
                            buf[dst] += a[row * cstr[0] + col * cstr[1]];
                        }
                    }
                }
            }
        }
    }

    Ok(out)
}

fn image_dims(image: &TensorView) -> Result<(usize, usize, usize, usize), KernelError> {
    if image.rank() != 4 {
        return Err(TensorError::RankMismatch {
            op: "im2col",
            expected: 4,
            actual: image.rank(),
        }
        .into());
    }
    let dims = image.shape().dims();
    Ok((dims[0], dims[1], dims[2], dims[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_size() {
        assert_eq!(conv_output_size(5, 3, 1).unwrap(), 3);
        assert_eq!(conv_output_size(5, 3, 2).unwrap(), 2);
        assert_eq!(conv_output_size(4, 4, 1).unwrap(), 1);
        assert!(conv_output_size(3, 4, 1).is_err());
        assert!(conv_output_size(3, 2, 0).is_err());
    }

    #[test]
    fn test_im2col_single_channel() {
        // 1x1x3x3 image, 2x2 kernel, stride 1 -> [4, 4].
        let image = Tensor::from_f32(
            Shape::new(vec![1, 1, 3, 3]),
            &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0],
        )
        .unwrap();
        let cols = im2col(&image.view(), (2, 2), (1, 1)).unwrap();

        assert_eq!(cols.shape(), &Shape::matrix(4, 4));
        // Rows are kernel cells, columns are the 4 patch positions.
        assert_eq!(
            cols.as_slice(),
            &[
                1.0, 2.0, 4.0, 5.0, // top-left cell of each patch
                2.0, 3.0, 5.0, 6.0, // top-right
                4.0, 5.0, 7.0, 8.0, // bottom-left
                5.0, 6.0, 8.0, 9.0, // bottom-right
            ]
        );
    }

    #[test]
    fn test_im2col_two_channels_batch() {
        // 2 samples, 2 channels of 2x2, 1x1 kernel: columns enumerate
        // sample-major patch positions, rows enumerate channels.
        let image = Tensor::from_f32(
            Shape::new(vec![2, 2, 2, 2]),
            &[
                1.0, 2.0, 3.0, 4.0, // n0 c0
                5.0, 6.0, 7.0, 8.0, // n0 c1
                9.0, 10.0, 11.0, 12.0, // n1 c0
                13.0, 14.0, 15.0, 16.0, // n1 c1
            ],
        )
        .unwrap();
        let cols = im2col(&image.view(), (1, 1), (1, 1)).unwrap();

        assert_eq!(cols.shape(), &Shape::matrix(2, 8));
        assert_eq!(
            cols.as_slice(),
            &[
                1.0, 2.0, 3.0, 4.0, 9.0, 10.0, 11.0, 12.0, // channel 0
                5.0, 6.0, 7.0, 8.0, 13.0, 14.0, 15.0, 16.0, // channel 1
            ]
        );
    }

    #[test]
    fn test_col2im_counts_patch_membership() {
        // Unroll then fold a ones-image: each input cell accumulates one
        // contribution per patch it belongs to. For 3x3 input with a 2x2
        // stride-1 kernel the counts are [1,2,1 / 2,4,2 / 1,2,1].
        let image = Tensor::filled(Shape::new(vec![1, 1, 3, 3]), 1.0);
        let cols = im2col(&image.view(), (2, 2), (1, 1)).unwrap();
        let folded = col2im(&cols.view(), image.shape(), (2, 2), (1, 1)).unwrap();

        assert_eq!(
            folded.as_slice(),
            &[1.0, 2.0, 1.0, 2.0, 4.0, 2.0, 1.0, 2.0, 1.0]
        );
    }

    #[test]
    fn test_col2im_shape_validation() {
        let bad = Tensor::zeros(Shape::matrix(3, 3));
        let err = col2im(&bad.view(), &Shape::new(vec![1, 1, 3, 3]), (2, 2), (1, 1));
        assert!(err.is_err());
    }

    #[test]
    fn test_im2col_requires_rank4() {
        let flat = Tensor::zeros(Shape::matrix(3, 3));
        assert!(im2col(&flat.view(), (2, 2), (1, 1)).is_err());
    }
}
