//! Paint Function Benchmarks
//!
//! Measures the pure state-to-parameters derivation across hover variants.
//! This runs once per display frame, so it must stay far below the frame
//! interval.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use lamco_cursor_overlay::config::PaintConfig;
use lamco_cursor_overlay::geom::{Point, Rect, Vector};
use lamco_cursor_overlay::paint::compose_frame;
use lamco_cursor_overlay::platform::{LayerHandle, LayerPair};
use lamco_cursor_overlay::state::{CursorState, HoverTarget};

fn state_for(hover: Option<HoverTarget>) -> CursorState {
    let layers = LayerPair {
        glyph: LayerHandle::new(1),
        highlight: LayerHandle::new(2),
    };
    let mut state = CursorState::new(10.0, layers);
    state.position = Point::new(412.0, 280.0);
    state.previous_position = Point::new(400.0, 278.0);
    state.velocity = Vector::new(12.0, 2.0);
    state.hover_target = hover;
    state
}

fn bench_compose_frame(c: &mut Criterion) {
    let config = PaintConfig::default();
    let mut group = c.benchmark_group("compose_frame");

    let variants = [
        ("idle", None),
        ("text", Some(HoverTarget::text())),
        (
            "link",
            Some(HoverTarget::area_small(Some(Rect::new(
                380.0, 260.0, 120.0, 32.0,
            )))),
        ),
        (
            "area",
            Some(HoverTarget::area_large(Some(Rect::new(
                0.0, 0.0, 640.0, 480.0,
            )))),
        ),
    ];

    for (name, hover) in variants {
        let state = state_for(hover);
        group.bench_with_input(BenchmarkId::from_parameter(name), &state, |b, state| {
            b.iter(|| compose_frame(black_box(state), black_box(&config)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compose_frame);
criterion_main!(benches);
