// Criterion benchmarks for Swipe Deck

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use swipe_deck::core::motion::{release_decision, visual_frame};
use swipe_deck::core::{CardStack, MotionThresholds};
use swipe_deck::models::{Action, Candidate, Offset, Transition};

fn create_candidates(count: usize) -> Vec<Candidate> {
    (0..count)
        .map(|i| Candidate::with_id(i.to_string(), format!("User {}", i), 20 + (i % 20) as u8))
        .collect()
}

fn bench_visual_frame(c: &mut Criterion) {
    let thresholds = MotionThresholds::default();
    c.bench_function("visual_frame", |b| {
        b.iter(|| {
            visual_frame(
                black_box(Offset::new(-137.0, 42.0)),
                black_box(390.0),
                &thresholds,
                Transition::Immediate,
            )
        });
    });
}

fn bench_release_decision(c: &mut Criterion) {
    let thresholds = MotionThresholds::default();
    c.bench_function("release_decision", |b| {
        b.iter(|| release_decision(black_box(120.0), black_box(-15.0), black_box(390.0), &thresholds));
    });
}

fn bench_drag_gesture(c: &mut Criterion) {
    let stack = CardStack::new(create_candidates(1), 390.0, MotionThresholds::default()).unwrap();

    c.bench_function("drag_gesture_60_updates", |b| {
        b.iter(|| {
            for step in 0..60 {
                let dx = step as f64 * 1.5;
                black_box(stack.drag_changed("0", dx, dx * 0.3));
            }
            black_box(stack.drag_ended("0", 45.0, 13.5))
        });
    });
}

fn bench_routed_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("routed_fanout");

    for deck_size in [10, 100, 1000].iter() {
        let stack = CardStack::new(create_candidates(*deck_size), 390.0, MotionThresholds::default()).unwrap();

        group.bench_with_input(BenchmarkId::new("like_then_redo", deck_size), deck_size, |b, _| {
            b.iter(|| {
                black_box(stack.tap(Action::Like));
                black_box(stack.tap(Action::Redo))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_visual_frame,
    bench_release_decision,
    bench_drag_gesture,
    bench_routed_fanout
);

criterion_main!(benches);
