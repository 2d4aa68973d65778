// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{
    BatchSize, BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main,
};
use kurbo::{Point, Rect, Size, Vec2};
use std::time::Duration;
use understory_zoom::{DecayFling, FlingAxis, FlingSimulator, ZoomEngine};

fn laid_out() -> ZoomEngine {
    let mut engine = ZoomEngine::new();
    engine.set_view_size(Size::new(1280.0, 720.0));
    engine.set_content_rect(Rect::new(0.0, 0.0, 4096.0, 4096.0));
    engine.zoom_to(2.0, false);
    engine
}

fn bench_gestures(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoom/gestures");

    for steps in [16usize, 256, 4_096] {
        group.throughput(Throughput::Elements(steps as u64));

        group.bench_with_input(BenchmarkId::new("drag", steps), &steps, |b, &steps| {
            b.iter_batched(
                laid_out,
                |mut engine| {
                    for i in 0..steps {
                        let dx = if i % 2 == 0 { 3.0 } else { -2.0 };
                        engine.on_drag(Vec2::new(dx, 1.0));
                    }
                    engine.on_drag_end();
                    black_box(engine.matrix());
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("pinch", steps), &steps, |b, &steps| {
            b.iter_batched(
                laid_out,
                |mut engine| {
                    for i in 0..steps {
                        let factor = if i % 2 == 0 { 1.02 } else { 0.99 };
                        engine.on_pinch(Point::new(400.0, 300.0), factor);
                    }
                    engine.on_pinch_end();
                    black_box(engine.matrix());
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_frames(c: &mut Criterion) {
    let mut group = c.benchmark_group("zoom/frames");
    group.measurement_time(Duration::from_secs(3));

    group.bench_function("animation_to_rest", |b| {
        b.iter_batched(
            laid_out,
            |mut engine| {
                engine.zoom_to(1.0, true);
                let mut now = Duration::ZERO;
                while engine.on_frame(now) {
                    now += Duration::from_millis(4);
                }
                black_box(engine.zoom());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("fling_to_rest", |b| {
        b.iter_batched(
            laid_out,
            |mut engine| {
                engine.on_fling(Vec2::new(-6_000.0, 4_000.0));
                let mut now = Duration::ZERO;
                while engine.on_frame(now) {
                    now += Duration::from_millis(4);
                }
                black_box(engine.real_pan());
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("decay_compute", |b| {
        let axis = FlingAxis {
            min: -10_000.0,
            start: 0.0,
            max: 0.0,
        };
        b.iter(|| {
            let mut sim = DecayFling::default();
            sim.fling(axis, axis, Vec2::new(-5_000.0, 2_500.0), 120.0);
            let mut ms = 0;
            while sim.compute(Duration::from_millis(ms)) {
                ms += 8;
            }
            black_box(sim.position());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_gestures, bench_frames);
criterion_main!(benches);
