// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error type for the operation façade.

/// Errors surfaced by the named operations.
///
/// All errors are synchronous and terminal for the call; a destination
/// tensor passed into a failing call must be considered undefined.
#[derive(Debug, thiserror::Error)]
pub enum MathError {
    /// The kernel rejected or failed the op.
    #[error("kernel error: {0}")]
    Kernel(#[from] compute_kernel::KernelError),

    /// Shape inference failed before the op was submitted.
    #[error("shape error: {0}")]
    Shape(#[from] tensor_core::TensorError),
}
