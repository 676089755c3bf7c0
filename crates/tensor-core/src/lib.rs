// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Tensor values, shapes, and stride arithmetic for the CPU tensor engine.
//!
//! This crate provides:
//! - [`Tensor`] — an owned, contiguous, row-major `f32` tensor.
//! - [`TensorView`] — zero-copy reshape/transpose/broadcast views.
//! - [`Shape`] / [`Strides`] — broadcast, reduction-shape, and offset
//!   arithmetic shared by every kernel walker.
//! - Clean error types via `thiserror`.
//!
//! # Design Goals
//! - Views never copy; reshape and transpose only touch shape and strides.
//! - One element type (`f32`); numerical edge cases follow IEEE-754 and
//!   never raise.
//! - Shape arithmetic is total and checked — every failure is a typed
//!   [`TensorError`].

mod error;
mod shape;
mod tensor;

pub use error::TensorError;
pub use shape::{broadcast_strides, Shape, Strides};
pub use tensor::{Tensor, TensorView};
