//! Tick loop throughput.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use pianoroll::config::EngineConfig;
use pianoroll::game::judgment::Judgment;
use pianoroll::{tick, EngineState, InputEvent, FRAME_RATE};

const DT: f32 = 1.0 / FRAME_RATE as f32;

fn started(level: i64) -> EngineState {
    let config = EngineConfig {
        start_level: level,
        ..EngineConfig::default()
    };
    let mut state = EngineState::new(&config);
    tick(&mut state, 0.0, &[InputEvent::Start]);
    state
}

/// State with a screen full of notes at the hardest level.
fn crowded() -> EngineState {
    let mut state = started(10);
    for _ in 0..(5 * FRAME_RATE) {
        tick(&mut state, DT, &[]);
    }
    state
}

fn bench_idle_ticks(c: &mut Criterion) {
    c.bench_function("tick_600_idle_frames", |b| {
        b.iter_batched(
            || started(1),
            |mut state| {
                for _ in 0..600 {
                    black_box(tick(&mut state, DT, &[]));
                }
                state
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_crowded_tick(c: &mut Criterion) {
    let base = crowded();
    let letters: Vec<InputEvent> = base
        .controller
        .active_letters()
        .iter()
        .take(8)
        .map(|c| InputEvent::key(*c))
        .collect();

    c.bench_function("tick_crowded_with_presses", |b| {
        b.iter_batched(
            || base.clone(),
            |mut state| black_box(tick(&mut state, DT, &letters)),
            BatchSize::SmallInput,
        )
    });
}

fn bench_press(c: &mut Criterion) {
    let base = crowded();
    let letter = base.controller.active_letters()[0];

    c.bench_function("press_nearest_note", |b| {
        b.iter_batched(
            || base.clone(),
            |mut state| -> Judgment { black_box(state.press(letter)) },
            BatchSize::SmallInput,
        )
    });
}

fn bench_state_hash(c: &mut Criterion) {
    let state = crowded();
    c.bench_function("compute_state_hash", |b| b.iter(|| black_box(state.compute_hash())));
}

criterion_group!(benches, bench_idle_ticks, bench_crowded_tick, bench_press, bench_state_hash);
criterion_main!(benches);
