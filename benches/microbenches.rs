//! Criterion microbenches for birdcrop's pure stages.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - bounding-box manifest parsing (bounding_boxes_from_str)
//! - square normalization over a batch of boxes
//! - stratified splitting of a synthetic dataset

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use std::hint::black_box;

use birdcrop::geometry::{square_normalize, BoundingBox};
use birdcrop::manifest::bounding_boxes_from_str;
use birdcrop::split::{split_dataset, SplitOptions};
use birdcrop::{Dataset, Sample};
use image::RgbImage;

fn box_manifest(lines: usize) -> String {
    (0..lines)
        .map(|i| {
            format!(
                "{} {}.0 {}.0 {}.0 {}.0\n",
                i + 1,
                i % 200,
                (i * 7) % 150,
                20 + i % 90,
                30 + (i * 3) % 80
            )
        })
        .collect()
}

/// Benchmark bounding-box manifest parsing.
fn bench_manifest_parse(c: &mut Criterion) {
    let text = box_manifest(2_000);
    let mut group = c.benchmark_group("manifest_parse");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("bounding_boxes_from_str", |b| {
        b.iter(|| {
            let boxes = bounding_boxes_from_str(black_box(&text)).unwrap();
            black_box(boxes)
        })
    });

    group.finish();
}

/// Benchmark square normalization over a parsed manifest.
fn bench_square_normalize(c: &mut Criterion) {
    let boxes: Vec<BoundingBox> = bounding_boxes_from_str(&box_manifest(2_000)).unwrap();
    let mut group = c.benchmark_group("square_normalize");
    group.throughput(Throughput::Elements(boxes.len() as u64));

    group.bench_function("batch", |b| {
        b.iter(|| {
            for bbox in &boxes {
                black_box(square_normalize(500, 375, black_box(bbox)).unwrap());
            }
        })
    });

    group.finish();
}

/// Benchmark stratified splitting.
///
/// Samples are 1x1 so the timing reflects bucketing and shuffling only.
fn bench_split(c: &mut Criterion) {
    let dataset = Dataset::new(
        (0..10_000)
            .map(|i| Sample::new(RgbImage::new(1, 1), format!("{:03}.Bird/{i}.jpg", i % 200 + 1)))
            .collect(),
    );
    let opts = SplitOptions {
        seed: Some(12345),
        ..Default::default()
    };

    let mut group = c.benchmark_group("split");
    group.throughput(Throughput::Elements(dataset.len() as u64));

    group.bench_function("split_dataset", |b| {
        b.iter_batched(
            || dataset.clone(),
            |ds| black_box(split_dataset(ds, &opts).unwrap()),
            BatchSize::LargeInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_manifest_parse,
    bench_square_normalize,
    bench_split,
);
criterion_main!(benches);
