//! Benchmarks for description rendering.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use folio::markup::{render, summary};

fn bench_render_simple(c: &mut Criterion) {
    let text = "# Hello\n\nWorld with **bold** and `code`";
    c.bench_function("render_simple", |b| b.iter(|| render(black_box(text))));
}

fn bench_render_description(c: &mut Criterion) {
    let text = include_str!("../tests/fixtures/description.md");
    c.bench_function("render_description", |b| {
        b.iter(|| render(black_box(text)))
    });
}

fn bench_render_unmatched_markers(c: &mut Criterion) {
    // Every opener scans to the end of the line without finding a closer.
    let text = "*`".repeat(2_000);
    c.bench_function("render_unmatched_markers", |b| {
        b.iter(|| render(black_box(&text)))
    });
}

fn bench_summary(c: &mut Criterion) {
    let text = include_str!("../tests/fixtures/description.md");
    c.bench_function("summary", |b| b.iter(|| summary(black_box(text), 120)));
}

criterion_group!(
    benches,
    bench_render_simple,
    bench_render_description,
    bench_render_unmatched_markers,
    bench_summary
);
criterion_main!(benches);
