use criterion::{Criterion, criterion_group, criterion_main};
use medview::image::{self, Histogram, Image};
use medview::types::ToneParameters;
use medview::volume::{self, TransferFunction, VolumeGeometry};
use ndarray::Array;
use std::hint::black_box;

/// 32 slices of 256x256 CT-like values
fn synthetic_volume() -> Image {
    let data = Array::from_shape_fn((32, 256, 256, 1), |(z, y, x, _)| {
        ((x * 7 + y * 13 + z * 101) % 4096) as f32 - 1024.0
    });
    Image::new(data).unwrap()
}

// ============================================================================
// TIER 1: VIEW PIPELINE (Primary Baseline)
// ============================================================================

/// Normalize once, then adjust and histogram the middle slice
fn bench_view_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("view_pipeline");
    let volume = synthetic_volume();
    let tone = ToneParameters::new(1.2, 1.5).unwrap();

    group.bench_function("normalize_32x256x256", |b| {
        b.iter(|| black_box(image::normalize(black_box(&volume))));
    });

    let slice = image::normalize(&volume).slice(16).unwrap();
    group.bench_function("adjust_and_histogram", |b| {
        b.iter(|| {
            let adjusted = image::adjust(black_box(&slice), tone);
            black_box(Histogram::compute(&adjusted))
        });
    });

    group.finish();
}

// ============================================================================
// TIER 2: VOLUME OUTPUT (Diagnostic)
// ============================================================================

fn bench_volume_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("volume_output");
    let volume = synthetic_volume();
    let geometry = VolumeGeometry::default();
    let tf = TransferFunction::default();

    group.bench_function("encode_nrrd", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            volume::encode_nrrd(black_box(&volume), &geometry, &mut out).unwrap();
            black_box(out)
        });
    });

    group.bench_function("render_preview", |b| {
        b.iter(|| black_box(volume::render_preview(black_box(&volume), &tf).unwrap()));
    });

    group.finish();
}

criterion_group!(benches, bench_view_pipeline, bench_volume_output);

criterion_main!(benches);
