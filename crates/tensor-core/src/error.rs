// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for tensor and shape operations.

use crate::Shape;

/// Errors that can occur during tensor and shape operations.
///
/// Numerical conditions (division by zero, `log(0)`, `sqrt` of a negative)
/// are not errors — the IEEE-754 result propagates through the buffer.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// Two shapes cannot be broadcast against each other.
    #[error("incompatible broadcast: {lhs} vs {rhs}")]
    BroadcastIncompatible { lhs: Shape, rhs: Shape },

    /// Two tensors have incompatible shapes for the requested operation.
    #[error("shape mismatch in {op}: {lhs} vs {rhs}")]
    ShapeMismatch {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// An operation received a tensor of the wrong rank.
    #[error("rank mismatch in {op}: expected rank {expected}, got {actual}")]
    RankMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A buffer or shape has the wrong number of elements.
    #[error("length mismatch in {op}: expected {expected} elements, got {actual}")]
    LengthMismatch {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// An axis argument does not name a dimension of the tensor.
    #[error("axis {axis} out of range for rank {rank}")]
    AxisOutOfRange { axis: isize, rank: usize },

    /// A transpose permutation does not cover every axis exactly once.
    #[error("invalid permutation {perm:?} for rank {rank}")]
    InvalidPermutation { perm: Vec<usize>, rank: usize },
}
