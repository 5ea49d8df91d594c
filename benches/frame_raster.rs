use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use paint_window::core::{
    copy_rows, FrameRenderer, PixelFormat, RasterProvider, RowLayout, Scene, SurfaceProvider,
};
use paint_window::gpu::tessellate;

/// Benchmark: one full frame per scene at the default window size
fn bench_render_frame(c: &mut Criterion) {
    let provider = RasterProvider::new(PixelFormat::Rgba8Premul);
    let mut group = c.benchmark_group("render_frame_800x600");

    for scene in [Scene::DiagonalLine, Scene::VerticalLine, Scene::BlueRect] {
        let renderer = FrameRenderer::new(scene);
        let mut canvas = provider.create_surface(800, 600).unwrap();
        let id = BenchmarkId::from_parameter(format!("{scene:?}"));
        group.bench_with_input(id, &renderer, |b, renderer| {
            b.iter(|| renderer.render_frame(black_box(&mut canvas)))
        });
    }

    group.finish();
}

/// Benchmark: row copy into a window buffer, with and without flip
fn bench_copy_rows(c: &mut Criterion) {
    let src = vec![0x7Fu8; 800 * 600 * 4];
    let mut dst = vec![0u8; 800 * 600 * 4];
    let layout = RowLayout::new(800 * 4, 4);
    let mut group = c.benchmark_group("copy_rows_800x600");

    for flip in [false, true] {
        group.bench_with_input(BenchmarkId::from_parameter(flip), &flip, |b, &flip| {
            b.iter(|| copy_rows(black_box(&src), layout, &mut dst, layout, 600, flip))
        });
    }

    group.finish();
}

/// Benchmark: command tessellation for the GPU path
fn bench_tessellate(c: &mut Criterion) {
    let commands = Scene::DiagonalLine.commands();
    c.bench_function("tessellate_diagonal_line", |b| {
        b.iter(|| tessellate(black_box(&commands), 800, 600))
    });
}

criterion_group!(benches, bench_render_frame, bench_copy_rows, bench_tessellate);
criterion_main!(benches);
