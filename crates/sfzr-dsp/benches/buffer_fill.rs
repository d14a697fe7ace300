//! Buffer fill benchmarks: interleaved vs per-channel layout

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use sfzr_core::Element;
use sfzr_dsp::simd::{Kernel, Scalar, Vector};
use sfzr_dsp::{AudioBuffer, JointBuffer, SplitBuffer};

const FRAMES: usize = 100_001;
const CHANNELS: usize = 2;

fn bench_layout<T: Element, B: AudioBuffer<T>, K: Kernel>(
    c: &mut Criterion,
    group_name: &str,
    mut buffer: B,
) {
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements((FRAMES * CHANNELS) as u64));

    let tag = if K::VECTORIZED { "vector" } else { "scalar" };
    group.bench_with_input(BenchmarkId::new("fill", tag), &FRAMES, |b, _| {
        b.iter(|| {
            buffer.fill_with::<K>(black_box(T::from_f64(0.25)));
        })
    });

    group.finish();
}

fn bench_fill_f32(c: &mut Criterion) {
    bench_layout::<f32, _, Scalar>(c, "joint_f32", JointBuffer::<f32>::new(CHANNELS, FRAMES));
    bench_layout::<f32, _, Vector>(c, "joint_f32", JointBuffer::<f32>::new(CHANNELS, FRAMES));
    bench_layout::<f32, _, Scalar>(c, "split_f32", SplitBuffer::<f32>::new(CHANNELS, FRAMES));
    bench_layout::<f32, _, Vector>(c, "split_f32", SplitBuffer::<f32>::new(CHANNELS, FRAMES));
}

fn bench_fill_f64(c: &mut Criterion) {
    bench_layout::<f64, _, Scalar>(c, "joint_f64", JointBuffer::<f64>::new(CHANNELS, FRAMES));
    bench_layout::<f64, _, Vector>(c, "joint_f64", JointBuffer::<f64>::new(CHANNELS, FRAMES));
    bench_layout::<f64, _, Scalar>(c, "split_f64", SplitBuffer::<f64>::new(CHANNELS, FRAMES));
    bench_layout::<f64, _, Vector>(c, "split_f64", SplitBuffer::<f64>::new(CHANNELS, FRAMES));
}

fn bench_fill_channels(c: &mut Criterion) {
    let mut group = c.benchmark_group("fill_channels_f32");
    group.throughput(Throughput::Elements((FRAMES * CHANNELS) as u64));

    let mut joint = JointBuffer::<f32>::new(CHANNELS, FRAMES);
    group.bench_function("joint", |b| {
        b.iter(|| joint.fill_channels_with::<Vector>(black_box(&[0.25, -0.25])))
    });

    let mut split = SplitBuffer::<f32>::new(CHANNELS, FRAMES);
    group.bench_function("split", |b| {
        b.iter(|| split.fill_channels_with::<Vector>(black_box(&[0.25, -0.25])))
    });

    group.finish();
}

criterion_group!(benches, bench_fill_f32, bench_fill_f64, bench_fill_channels);
criterion_main!(benches);
