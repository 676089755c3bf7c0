// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The kernel dispatcher.
//!
//! [`Executor`] is an explicit handle rather than ambient global state:
//! construct one, share it, or make a fresh one per test. It holds no
//! mutable state, so it is trivially cheap to create and discard, and
//! swapping in a different execution backend means passing a different
//! executor value to the callers.
//!
//! Execution is single-threaded and synchronous: every op runs to
//! completion before `exec` returns, and the destination is fully written
//! on `Ok`. On `Err` the destination contents are undefined. Operand
//! views are borrowed read-only and the destination exclusively — the
//! borrow checker rules out aliased reads of the write region.

use crate::op::{DimOp, Op};
use crate::{index, special, walk, KernelError};
use tensor_core::TensorError;

/// Dispatches op descriptors to the family walkers and special executors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor;

impl Executor {
    /// Creates a new executor.
    pub fn new() -> Self {
        Executor
    }

    /// Executes an op without a dimension argument: pairwise, transform,
    /// reduction, fill, and the special ops (matmul, softmax).
    ///
    /// # Errors
    /// Returns [`KernelError`] when operand shapes are inconsistent with
    /// each other or with the destination.
    pub fn exec(&self, op: Op<'_>) -> Result<(), KernelError> {
        tracing::trace!(family = op.family(), "dispatching op");
        match op {
            Op::Pairwise {
                lhs,
                rhs,
                dst,
                body,
            } => {
                let expected = lhs.shape().broadcast_with(rhs.shape())?;
                if dst.shape() != &expected {
                    return Err(TensorError::ShapeMismatch {
                        op: "pairwise (output)",
                        lhs: expected,
                        rhs: dst.shape().clone(),
                    }
                    .into());
                }
                walk::pairwise(&lhs, &rhs, dst, body);
                Ok(())
            }
            Op::Transform { src, dst, body } => {
                if src.shape() != dst.shape() {
                    return Err(TensorError::ShapeMismatch {
                        op: "transform (output)",
                        lhs: src.shape().clone(),
                        rhs: dst.shape().clone(),
                    }
                    .into());
                }
                walk::transform(&src, dst, body);
                Ok(())
            }
            Op::Reduce {
                src,
                dst,
                reduced,
                body,
                update,
                initial,
                finalize,
            } => {
                if reduced.len() != src.rank() {
                    return Err(TensorError::RankMismatch {
                        op: "reduce (mask)",
                        expected: src.rank(),
                        actual: reduced.len(),
                    }
                    .into());
                }
                let expected = src.shape().reduce(&reduced, true);
                if dst.shape() != &expected {
                    return Err(TensorError::ShapeMismatch {
                        op: "reduce (output)",
                        lhs: expected,
                        rhs: dst.shape().clone(),
                    }
                    .into());
                }
                walk::reduce(&src, dst, &reduced, body, update, initial, finalize);
                Ok(())
            }
            Op::Matmul {
                lhs,
                rhs,
                dst,
                transpose_lhs,
                transpose_rhs,
            } => special::matmul(&lhs, &rhs, dst, transpose_lhs, transpose_rhs),
            Op::Softmax { src, dst, dim } => {
                if dim >= src.rank() {
                    return Err(TensorError::AxisOutOfRange {
                        axis: dim as isize,
                        rank: src.rank(),
                    }
                    .into());
                }
                if src.shape() != dst.shape() {
                    return Err(TensorError::ShapeMismatch {
                        op: "softmax (output)",
                        lhs: src.shape().clone(),
                        rhs: dst.shape().clone(),
                    }
                    .into());
                }
                special::softmax(&src, dst, dim);
                Ok(())
            }
            Op::Fill { dst, value } => {
                dst.fill(value);
                Ok(())
            }
        }
    }

    /// Executes an index-family op against a target dimension.
    ///
    /// # Errors
    /// Returns [`KernelError`] for an out-of-range dimension, shape
    /// disagreements, or a scatter index outside the destination.
    pub fn exec_at_dim(&self, op: DimOp<'_>, dim: usize) -> Result<(), KernelError> {
        tracing::trace!(family = op.family(), dim, "dispatching dim op");
        match op {
            DimOp::IndexReduce {
                src,
                dst,
                update,
                initial,
            } => {
                if dim >= src.rank() {
                    return Err(TensorError::AxisOutOfRange {
                        axis: dim as isize,
                        rank: src.rank(),
                    }
                    .into());
                }
                let mut mask = vec![false; src.rank()];
                mask[dim] = true;
                let expected = src.shape().reduce(&mask, true);
                if dst.shape() != &expected {
                    return Err(TensorError::ShapeMismatch {
                        op: "index-reduce (output)",
                        lhs: expected,
                        rhs: dst.shape().clone(),
                    }
                    .into());
                }
                index::index_reduce(&src, dst, dim, update, initial);
                Ok(())
            }
            DimOp::IndexSet {
                values,
                indices,
                dst,
            } => {
                if dst.rank() != 2 {
                    return Err(TensorError::RankMismatch {
                        op: "index-set",
                        expected: 2,
                        actual: dst.rank(),
                    }
                    .into());
                }
                if dim >= 2 {
                    return Err(TensorError::AxisOutOfRange {
                        axis: dim as isize,
                        rank: 2,
                    }
                    .into());
                }
                let lanes = dst.shape().dims()[1 - dim];
                for (label, operand) in
                    [("index-set (values)", &values), ("index-set (indices)", &indices)]
                {
                    if operand.rank() != 1 {
                        return Err(TensorError::RankMismatch {
                            op: label,
                            expected: 1,
                            actual: operand.rank(),
                        }
                        .into());
                    }
                    if operand.num_elements() != lanes {
                        return Err(TensorError::LengthMismatch {
                            op: label,
                            expected: lanes,
                            actual: operand.num_elements(),
                        }
                        .into());
                    }
                }
                index::index_set(&values, &indices, dst, dim)
            }
        }
    }
}
