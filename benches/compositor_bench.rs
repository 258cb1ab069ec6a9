// Compositor Benchmarks
// Performance benchmarks for composite passes, cached reads and frame conversion

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use nes_shell::frames::{StaticNoise, FRAME_HEIGHT, FRAME_WIDTH};
use nes_shell::{
    AreaTable, Color, Compositor, ControllerArea, FrameConverter, HitTester, ManualClock, Point,
    Raster, Size,
};
use std::hint::black_box;
use std::sync::Arc;

fn frame_compositor() -> (Compositor, ManualClock) {
    let clock = ManualClock::new();
    let base = Raster::filled(FRAME_WIDTH as u32, FRAME_HEIGHT as u32, Color::BLACK);
    (Compositor::with_clock(base, Arc::new(clock.clone())), clock)
}

/// Benchmark a full composite pass with a growing number of overlays
fn bench_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");

    for overlays in [1usize, 4, 16] {
        group.bench_with_input(
            BenchmarkId::new("rerender", overlays),
            &overlays,
            |b, &overlays| {
                let (compositor, _) = frame_compositor();
                let image = Arc::new(Raster::filled(32, 32, Color::rgba(255, 255, 255, 96)));
                for i in 0..overlays {
                    compositor.add_overlay(
                        Arc::clone(&image),
                        Point::new((i * 12) as f32, (i * 10) as f32),
                        0,
                        0,
                    );
                }
                let base = compositor.base_image();

                b.iter(|| {
                    // Replacing the base forces a full pass every iteration
                    compositor.set_base_image(Arc::clone(&base)).ok();
                    black_box(compositor.get_image());
                });
            },
        );
    }

    group.bench_function("cached_read", |b| {
        let (compositor, _) = frame_compositor();
        compositor.add_overlay(Raster::filled(64, 64, Color::WHITE), Point::ORIGIN, 0, 0);
        compositor.get_image();

        b.iter(|| black_box(compositor.get_image()));
    });

    group.finish();
}

/// Benchmark palette conversion of one emulator frame
fn bench_frame_conversion(c: &mut Criterion) {
    let mut noise = StaticNoise::from_seed(1);
    let frame = noise.frame();
    let mut converter = FrameConverter::new();

    c.bench_function("frame_conversion", |b| {
        b.iter(|| black_box(converter.convert(black_box(&frame)).ok()));
    });
}

/// Benchmark hit testing against the controller areas
fn bench_hit_test(c: &mut Criterion) {
    let mut table = AreaTable::from_regions::<ControllerArea>(Size::new(691.0, 308.0));
    let tester = HitTester::new(2.0);
    tester.rescale(&mut table, Size::new(1382.0, 616.0));

    c.bench_function("hit_test", |b| {
        b.iter(|| black_box(tester.locate(black_box(Point::new(492.0, 400.0)), &table)));
    });
}

criterion_group!(benches, bench_composite, bench_frame_conversion, bench_hit_test);
criterion_main!(benches);
