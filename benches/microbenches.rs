//! Criterion microbenches for sweep decoding and range inference.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - Text sweep decoding, 1D and 2D (from_sweep_txt_str)
//! - Axis range inference (infer_range)
//! - Display extraction of an alternating 2D channel (get_channel)

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

use sweepnorm::sweep::infer_range;
use sweepnorm::sweep::io_text::from_sweep_txt_str;

/// Builds a 2D sweep of `outer` x `inner` points with three output channels.
fn sweep_2d_fixture(outer: usize, inner: usize) -> String {
    let mut text = String::from(
        "#sweep_multi_options:= {'beforewait': [0.02, 0.5]}\n#instrument setup\n#x\ty\tv\tw\ttime\n",
    );
    for i in 0..outer {
        for j in 0..inner {
            let j = if i % 2 == 0 { j } else { inner - 1 - j };
            let v = (i * inner + j) as f64;
            text.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\n",
                i as f64 * 0.1,
                j as f64 * 0.01,
                v.sin(),
                v.cos(),
                1000.0 + v
            ));
        }
    }
    text
}

fn sweep_1d_fixture(points: usize) -> String {
    let mut text = String::from("#gate\tcurrent\ttime\n");
    for i in 0..points {
        let x = i as f64 * 0.001;
        text.push_str(&format!("{}\t{}\t{}\n", x, x.exp(), i));
    }
    text
}

/// Benchmark text decoding.
fn bench_txt_decode(c: &mut Criterion) {
    let one_d = sweep_1d_fixture(10_000);
    let two_d = sweep_2d_fixture(100, 100);

    let mut group = c.benchmark_group("sweep_txt_decode");

    group.throughput(Throughput::Bytes(one_d.len() as u64));
    group.bench_function("1d_10k_points", |b| {
        b.iter(|| {
            let ds = from_sweep_txt_str(black_box(&one_d)).unwrap();
            black_box(ds)
        })
    });

    group.throughput(Throughput::Bytes(two_d.len() as u64));
    group.bench_function("2d_100x100", |b| {
        b.iter(|| {
            let ds = from_sweep_txt_str(black_box(&two_d)).unwrap();
            black_box(ds)
        })
    });

    group.finish();
}

/// Benchmark range inference, including the aborted-sweep path.
fn bench_infer_range(c: &mut Criterion) {
    let complete: Vec<f64> = (0..100_000).map(|i| i as f64 * 0.5).collect();
    let mut aborted = complete.clone();
    aborted.extend(std::iter::repeat(f64::NAN).take(1000));

    let mut group = c.benchmark_group("infer_range");
    group.bench_function("complete", |b| b.iter(|| black_box(infer_range(black_box(&complete)))));
    group.bench_function("aborted", |b| b.iter(|| black_box(infer_range(black_box(&aborted)))));
    group.finish();
}

/// Benchmark display extraction with the alternation fix.
fn bench_get_channel(c: &mut Criterion) {
    let ds = from_sweep_txt_str(&sweep_2d_fixture(200, 200)).unwrap();

    let mut group = c.benchmark_group("get_channel");
    group.bench_function("alternate_200x200", |b| {
        b.iter(|| black_box(ds.get_channel(black_box("v"), true, false).unwrap()))
    });
    group.finish();
}

criterion_group!(benches, bench_txt_decode, bench_infer_range, bench_get_channel);
criterion_main!(benches);
