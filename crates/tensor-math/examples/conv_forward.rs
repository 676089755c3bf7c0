// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Example: a small convolutional forward pass.
//!
//! Runs conv2d → relu → max-pool → softmax over a synthetic image and
//! prints the class distribution, demonstrating how the named operations
//! compose over one shared executor.
//!
//! ```bash
//! cargo run -p tensor-math --example conv_forward
//! ```

use tensor_core::{Shape, Tensor};
use tensor_math::{conv2d, max_pool2d, relu, softmax, Conv2dOpts, Executor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing.
    tracing_subscriber::fmt()
        .with_env_filter("debug")
        .init();

    let ex = Executor::new();

    // A synthetic 1x1x6x6 image with a bright diagonal.
    let mut pixels = vec![0.0f32; 36];
    for i in 0..6 {
        pixels[i * 6 + i] = 1.0;
    }
    let image = Tensor::from_f32(Shape::new(vec![1, 1, 6, 6]), &pixels)?;

    // Two 3x3 feature detectors: a diagonal edge and a horizontal bar.
    let diagonal = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];
    let horizontal = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0, 0.0, 0.0];
    let mut weights = Vec::with_capacity(18);
    weights.extend_from_slice(&diagonal);
    weights.extend_from_slice(&horizontal);
    let kernels = Tensor::from_f32(Shape::new(vec![2, 1, 3, 3]), &weights)?;

    // conv2d -> relu -> max-pool over each 2x2 window.
    let features = conv2d(&ex, &image, &kernels, Conv2dOpts::default(), None)?;
    let activated = relu(&ex, &features, None)?;
    let pooled = max_pool2d(
        &ex,
        &activated,
        (2, 2),
        Conv2dOpts {
            stride_w: 2,
            stride_h: 2,
        },
        None,
    )?;
    println!("pooled feature map: {}", pooled.shape());

    // Global feature response per detector, softmaxed into a distribution.
    let responses = tensor_math::reduce_sum(
        &ex,
        &pooled,
        &tensor_math::ReduceOpts::axes(vec![0, 2, 3]),
        None,
    )?;
    let distribution = softmax(&ex, &responses, -1, None)?;

    println!(
        "{:<16} {:>10} {:>12}",
        "detector", "response", "probability",
    );
    println!("{}", "-".repeat(40));
    for (name, (raw, prob)) in ["diagonal", "horizontal"].iter().zip(
        responses
            .as_slice()
            .iter()
            .zip(distribution.as_slice().iter()),
    ) {
        println!("{name:<16} {raw:>10.2} {prob:>12.4}");
    }

    Ok(())
}
