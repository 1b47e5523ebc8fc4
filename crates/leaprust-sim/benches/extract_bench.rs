//! Benchmarks for frame extraction

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use leaprust_core::{extract_frame, Frame};
use leaprust_sim::{frame, MotionModel, SimulatedConfig};

fn bench_extract_two_hands(c: &mut Criterion) {
    let live = frame(1, 1000, &[(true, 5), (false, 5)]);
    let mut out = Frame::blank();

    c.bench_function("extract_two_hands", |b| {
        b.iter(|| extract_frame(black_box(&live), &mut out))
    });
}

fn bench_extract_truncated(c: &mut Criterion) {
    let live = frame(1, 1000, &[(true, 7), (false, 7), (true, 7), (false, 7)]);
    let mut out = Frame::blank();

    c.bench_function("extract_truncated", |b| {
        b.iter(|| extract_frame(black_box(&live), &mut out))
    });
}

fn bench_extract_empty(c: &mut Criterion) {
    let live = frame(1, 1000, &[]);
    let mut out = Frame::blank();

    c.bench_function("extract_empty", |b| {
        b.iter(|| extract_frame(black_box(&live), &mut out))
    });
}

fn bench_motion_frame(c: &mut Criterion) {
    let mut motion = MotionModel::new(SimulatedConfig::default());
    let mut elapsed = Duration::ZERO;

    c.bench_function("motion_frame", |b| {
        b.iter(|| {
            elapsed += Duration::from_micros(16_667);
            motion.frame_at(black_box(elapsed))
        })
    });
}

criterion_group!(
    benches,
    bench_extract_two_hands,
    bench_extract_truncated,
    bench_extract_empty,
    bench_motion_frame
);
criterion_main!(benches);
