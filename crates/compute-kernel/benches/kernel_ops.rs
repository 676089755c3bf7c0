// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Benchmarks for the hot kernel walkers.

use compute_kernel::{Executor, Op};
use criterion::{criterion_group, criterion_main, Criterion};
use tensor_core::{Shape, Tensor};

fn bench_pairwise_broadcast(c: &mut Criterion) {
    let ex = Executor::new();
    let a = Tensor::filled(Shape::new(vec![64, 256, 8]), 1.5);
    let b = Tensor::filled(Shape::new(vec![256, 1]), 2.0);
    let mut dst = Tensor::zeros(Shape::new(vec![64, 256, 8]));

    c.bench_function("pairwise_add_broadcast_64x256x8", |bench| {
        bench.iter(|| {
            ex.exec(Op::Pairwise {
                lhs: a.view(),
                rhs: b.view(),
                dst: &mut dst,
                body: |x, y| x + y,
            })
            .unwrap();
        })
    });
}

fn bench_reduce_sum(c: &mut Criterion) {
    let ex = Executor::new();
    let a = Tensor::filled(Shape::matrix(512, 512), 0.25);
    let mut dst = Tensor::zeros(Shape::matrix(1, 512));

    c.bench_function("reduce_sum_512x512_axis0", |bench| {
        bench.iter(|| {
            ex.exec(Op::Reduce {
                src: a.view(),
                dst: &mut dst,
                reduced: vec![true, false],
                body: |x| x,
                update: |p, q| p + q,
                initial: 0.0,
                finalize: None,
            })
            .unwrap();
        })
    });
}

fn bench_matmul(c: &mut Criterion) {
    let ex = Executor::new();
    let a = Tensor::filled(Shape::matrix(128, 128), 0.5);
    let b = Tensor::filled(Shape::matrix(128, 128), 0.25);
    let mut dst = Tensor::zeros(Shape::matrix(128, 128));

    c.bench_function("matmul_128", |bench| {
        bench.iter(|| {
            ex.exec(Op::Matmul {
                lhs: a.view(),
                rhs: b.view(),
                dst: &mut dst,
                transpose_lhs: false,
                transpose_rhs: false,
            })
            .unwrap();
        })
    });
}

criterion_group!(benches, bench_pairwise_broadcast, bench_reduce_sum, bench_matmul);
criterion_main!(benches);
