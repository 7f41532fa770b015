//! Overlay compositing benchmarks
//!
//! Measures the in-memory overlay pass and a full decode/compose/encode cycle
//! with the built-in font, so results do not depend on installed font files.

use brand_compositor::{
    canvas::Canvas,
    overlay::{gradient_band, OverlayCompositor, OverlayLayout, OverlaySpec},
    palette::{Color, BRAND},
    text::FontResolver,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tempfile::TempDir;

fn spec() -> OverlaySpec {
    OverlaySpec::new("COMPETE WITH YOUR FAMILY", "Household leaderboards  •  Real rewards")
}

fn bench_gradient_band(c: &mut Criterion) {
    let mut group = c.benchmark_group("gradient_band");
    for width in [1024u32, 2048] {
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, &width| {
            b.iter(|| gradient_band(black_box(width), 140, BRAND.dark_navy, 0.9));
        });
    }
    group.finish();
}

fn bench_apply(c: &mut Criterion) {
    let compositor = OverlayCompositor::new(OverlayLayout::default(), FontResolver::builtin_only());
    let base = Canvas::new_filled(1024, 768, Color::new(200, 180, 160));
    let spec = spec();

    c.bench_function("overlay_apply_1024x768", |b| {
        b.iter(|| {
            let mut canvas = base.clone();
            compositor.apply(black_box(&mut canvas), &spec).unwrap();
            canvas
        });
    });
}

fn bench_compose_file(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("source.png");
    let output = temp_dir.path().join("branded.png");
    Canvas::new_filled(1024, 768, Color::new(200, 180, 160))
        .save(&source, 95)
        .unwrap();

    let compositor = OverlayCompositor::new(OverlayLayout::default(), FontResolver::builtin_only());
    let spec = spec();

    let mut group = c.benchmark_group("overlay_compose");
    group.sample_size(20);
    group.bench_function("png_roundtrip", |b| {
        b.iter(|| compositor.compose(&source, &spec, &output).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_gradient_band, bench_apply, bench_compose_file);
criterion_main!(benches);
