#![allow(dead_code)]

use ndarray::{Array1, Array2};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use sweepnorm::sweep::ChannelData;

pub const EPS_TRANSFORM: f64 = 1e-9;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// Finite sample values of moderate magnitude.
pub fn arb_value() -> impl Strategy<Value = f64> {
    -1e6f64..1e6
}

/// `(start, step, count)` for an evenly spaced sweep with a non-zero step.
pub fn arb_sweep() -> impl Strategy<Value = (f64, f64, usize)> {
    (
        -100.0f64..100.0,
        prop_oneof![-10.0f64..-0.01, 0.01f64..10.0],
        2usize..50,
    )
}

pub fn linspace(start: f64, step: f64, count: usize) -> Vec<f64> {
    (0..count).map(|i| start + step * i as f64).collect()
}

/// A line or a plane with up to `max_len` samples per axis.
pub fn arb_channel_data(max_len: usize) -> BoxedStrategy<ChannelData> {
    let line = prop::collection::vec(arb_value(), 1..=max_len)
        .prop_map(|v| ChannelData::Line(Array1::from(v)));
    let plane = (1..=max_len, 1..=max_len)
        .prop_flat_map(|(rows, cols)| {
            prop::collection::vec(arb_value(), rows * cols).prop_map(move |v| {
                ChannelData::Plane(
                    Array2::from_shape_vec((rows, cols), v).expect("shape matches length"),
                )
            })
        });
    prop_oneof![line, plane].boxed()
}

/// Radii and angles of the same shape, with `r >= 0` and `deg` in `(-180, 180)`.
pub fn arb_polar_pair(max_len: usize) -> BoxedStrategy<(Vec<f64>, Vec<f64>)> {
    (1..=max_len)
        .prop_flat_map(|n| {
            (
                prop::collection::vec(0.001f64..1e3, n),
                prop::collection::vec(-179.9f64..179.9, n),
            )
        })
        .boxed()
}

pub fn assert_close(a: f64, b: f64, eps: f64) -> Result<(), String> {
    if (a - b).abs() <= eps * (1.0 + a.abs().max(b.abs())) {
        Ok(())
    } else {
        Err(format!("{a} != {b} (eps {eps})"))
    }
}
