// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Op descriptors: data records submitted to the [`crate::Executor`].
//!
//! Each descriptor names a kernel family, borrows its operand views
//! read-only and its destination tensor write-only, and carries the scalar
//! callbacks the walker applies per element. The families form a closed
//! set, so dispatch is exhaustive at compile time.
//!
//! Callbacks are plain `fn` pointers: the walkers stay monomorphic and the
//! per-element call is trivially inlinable.

use tensor_core::{Tensor, TensorView};

/// A scalar function applied per element (transform body, reduction body).
pub type UnaryFn = fn(f32) -> f32;

/// A binary scalar function (pairwise body, reduction update combinator).
///
/// Reduction updates must be commutative and associative; the traversal
/// order is defined but not part of the caller-visible contract.
pub type BinaryFn = fn(f32, f32) -> f32;

/// A post-sweep finalizer: `(accumulator, reduced_count) -> result`.
/// Mean divides by the count; most reducers have none.
pub type FinalizeFn = fn(f32, f32) -> f32;

/// An index-reduction update: `(acc, acc_index, value, index)` to the new
/// `(acc, acc_index)` pair. Argmax keeps the strictly larger value, so
/// ties resolve to the earliest index.
pub type IndexUpdateFn = fn(f32, usize, f32, usize) -> (f32, usize);

/// An op executed without a dimension argument — see [`crate::Executor::exec`].
pub enum Op<'a> {
    /// Two operands, broadcast to the destination shape, combined per
    /// element by `body`.
    Pairwise {
        lhs: TensorView<'a>,
        rhs: TensorView<'a>,
        dst: &'a mut Tensor,
        body: BinaryFn,
    },

    /// One operand, same shape as the destination, mapped per element.
    Transform {
        src: TensorView<'a>,
        dst: &'a mut Tensor,
        body: UnaryFn,
    },

    /// Collapse the masked input axes into the destination.
    ///
    /// The destination must have the keep-dims reduced shape (reduced axes
    /// become size 1); the façade reshapes down afterwards if the caller
    /// asked for dropped axes.
    Reduce {
        src: TensorView<'a>,
        dst: &'a mut Tensor,
        /// One flag per input axis; `true` marks a reduced axis.
        reduced: Vec<bool>,
        /// Applied to each input element before accumulation (identity for
        /// sum/min/max, `|x|` for abs-sum).
        body: UnaryFn,
        /// Commutative-associative accumulator.
        update: BinaryFn,
        /// Accumulator seed (0 for sum, 1 for prod, ±∞ for min/max).
        initial: f32,
        /// Optional post-sweep transformation over the destination.
        finalize: Option<FinalizeFn>,
    },

    /// 2-D matrix multiply with optional operand transposes (special op).
    Matmul {
        lhs: TensorView<'a>,
        rhs: TensorView<'a>,
        dst: &'a mut Tensor,
        transpose_lhs: bool,
        transpose_rhs: bool,
    },

    /// Numerically stable softmax along `dim` (special op).
    Softmax {
        src: TensorView<'a>,
        dst: &'a mut Tensor,
        dim: usize,
    },

    /// Write a constant into every destination element (the in-place `set`).
    Fill { dst: &'a mut Tensor, value: f32 },
}

impl Op<'_> {
    /// Returns the family label used in dispatch traces.
    pub fn family(&self) -> &'static str {
        match self {
            Op::Pairwise { .. } => "pairwise",
            Op::Transform { .. } => "transform",
            Op::Reduce { .. } => "reduce",
            Op::Matmul { .. } => "matmul",
            Op::Softmax { .. } => "softmax",
            Op::Fill { .. } => "fill",
        }
    }
}

/// An op executed against a target dimension — see
/// [`crate::Executor::exec_at_dim`].
pub enum DimOp<'a> {
    /// Scan the target axis for every other multi-index, threading
    /// `(acc, acc_index)` through `update`, and write the winning index
    /// into the destination (target coordinate fixed at 0).
    IndexReduce {
        src: TensorView<'a>,
        dst: &'a mut Tensor,
        update: IndexUpdateFn,
        initial: f32,
    },

    /// Scatter: write each value into the rank-2 destination at the
    /// position named by `indices` along the target axis. Used by
    /// max-pool gradient propagation.
    IndexSet {
        values: TensorView<'a>,
        indices: TensorView<'a>,
        dst: &'a mut Tensor,
    },
}

impl DimOp<'_> {
    /// Returns the family label used in dispatch traces.
    pub fn family(&self) -> &'static str {
        match self {
            DimOp::IndexReduce { .. } => "index-reduce",
            DimOp::IndexSet { .. } => "index-set",
        }
    }
}
