// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for kernel execution.

/// Errors that can occur while executing an op.
///
/// A destination partially written before an error is undefined; the
/// kernel never attempts recovery or partial completion.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// Shape, rank, or axis validation failed.
    #[error("shape error: {0}")]
    Shape(#[from] tensor_core::TensorError),

    /// A scatter index named a position outside the destination.
    #[error("index {index} out of range for extent {extent} in {op}")]
    IndexOutOfRange {
        op: &'static str,
        index: isize,
        extent: usize,
    },

    /// A convolution window does not fit the input extent.
    #[error("kernel {kernel} with stride {stride} does not fit input extent {input}")]
    WindowMismatch {
        input: usize,
        kernel: usize,
        stride: usize,
    },
}
