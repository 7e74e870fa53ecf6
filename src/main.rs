//! Pianoroll Demo Driver
//!
//! Runs a headless session with an autoplay bot, replays the recording to
//! verify determinism, and prints the run summary.
//!
//! Usage: `pianoroll [config.json]`

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use pianoroll::{
    FRAME_RATE, VERSION,
    config::EngineConfig,
    core::rng::DeterministicRng,
    game::{
        difficulty::{MAX_LEVEL, SPAWN_INTERVALS, FALL_SPEEDS},
        events::GameEventData,
        input::{InputEvent, InputFrame},
        note::NoteId,
        state::EngineState,
        summary::RunSummary,
        tick::{tick, replay_session, SessionRecording},
    },
};

/// Session length in seconds.
const SESSION_SECONDS: u32 = 90;

/// Seconds between level raises.
const LEVEL_UP_SECONDS: u32 = 20;

/// Second at which the bot cycles the layout.
const LAYOUT_CYCLE_SECOND: u32 = 45;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = load_config()?;

    info!("Pianoroll Engine v{}", VERSION);
    info!("Frame Rate: {} Hz", FRAME_RATE);
    info!(
        "Level 1: interval {:.2}s, speed {}; level {}: interval {:.2}s, speed {}",
        SPAWN_INTERVALS[0],
        FALL_SPEEDS[0],
        MAX_LEVEL,
        SPAWN_INTERVALS[SPAWN_INTERVALS.len() - 1],
        FALL_SPEEDS[FALL_SPEEDS.len() - 1],
    );

    demo_session(config)
}

/// Read the config path from the first argument, or use defaults.
fn load_config() -> Result<EngineConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config {}", path))?;
            let config = EngineConfig::from_json(&text)
                .with_context(|| format!("Invalid config {}", path))?;
            info!("Loaded config from {}", path);
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Autoplay bot: presses each note once at a jittered distance from the line.
struct Bot {
    rng: DeterministicRng,
    /// Offset from the target line at which each note will be pressed
    plans: BTreeMap<NoteId, f32>,
}

impl Bot {
    fn new(seed: u64) -> Self {
        Self {
            rng: DeterministicRng::new(seed ^ 0xB07),
            plans: BTreeMap::new(),
        }
    }

    /// Inputs for the next frame, predicting positions after `dt`.
    fn inputs(&mut self, state: &EngineState, dt: f32) -> Vec<InputEvent> {
        let target_y = state.target_y();
        let step = state.controller.fall_speed() * dt;
        let mut inputs = Vec::new();

        for note in state.notes().iter().filter(|n| n.is_pending()) {
            let offset = *self
                .plans
                .entry(note.id)
                .or_insert_with(|| self.rng.next_range(-45.0, 35.0));
            if offset.is_nan() {
                continue;
            }
            if note.y + step >= target_y + offset {
                inputs.push(InputEvent::key(note.letter));
                // Mark as pressed; the note will be hit, missed or left pending
                self.plans.insert(note.id, f32::NAN);
            }
        }

        // Occasional stray press
        if self.rng.next_bool(0.004) {
            if let Some(letter) = self.rng.choose(state.controller.active_letters()) {
                inputs.push(InputEvent::key(*letter));
            }
        }

        self.plans.retain(|id, _| state.notes.get(*id).is_some());
        inputs
    }
}

/// Run a scripted session and verify it replays identically.
fn demo_session(config: EngineConfig) -> Result<()> {
    info!("=== Starting Demo Session ===");
    info!("RNG Seed: {}", config.seed);

    let run_id = Uuid::new_v4();
    let mut state = EngineState::new(&config);
    let mut recording = SessionRecording::new(config.clone());
    let mut bot = Bot::new(config.seed);

    let dt = 1.0 / FRAME_RATE as f32;
    let total_frames = SESSION_SECONDS * FRAME_RATE;
    let mut total_events = 0usize;

    for frame in 0..=total_frames {
        let mut inputs = Vec::new();

        if frame == 0 {
            inputs.push(InputEvent::Start);
        } else if frame == total_frames {
            inputs.push(InputEvent::Quit);
        } else {
            let second = frame / FRAME_RATE;
            if frame % FRAME_RATE == 0 && second % LEVEL_UP_SECONDS == 0 {
                let next = state.controller.level().get() as i64 + 2;
                inputs.push(InputEvent::SelectLevel(next));
            }
            if frame == LAYOUT_CYCLE_SECOND * FRAME_RATE {
                inputs.push(InputEvent::CycleLayout);
            }
            inputs.extend(bot.inputs(&state, dt));
        }

        let elapsed = if frame == 0 { 0.0 } else { dt };
        let result = tick(&mut state, elapsed, &inputs);
        recording.record(InputFrame::with_events(elapsed, inputs));
        total_events += result.events.len();

        for event in &result.events {
            match &event.data {
                GameEventData::LevelChanged { old_level, new_level } => {
                    info!("Level {} -> {}", old_level, new_level);
                }
                GameEventData::LayoutChanged { old_layout, new_layout } => {
                    info!("Layout {} -> {}", old_layout, new_layout);
                }
                GameEventData::NoteHit { letter, tier, distance, .. } => {
                    debug!("Hit {:?} {:?} at {:.1}", letter, tier, distance);
                }
                GameEventData::PressMissed { letter, reason } => {
                    debug!("Press {:?} missed: {:?}", letter, reason);
                }
                _ => {}
            }
        }

        if frame > 0 && frame % (10 * FRAME_RATE) == 0 {
            let hud = state.snapshot();
            info!(
                "t={}s: score {}, combo {}, accuracy {}%, {} notes in flight",
                frame / FRAME_RATE,
                hud.score,
                hud.combo,
                hud.accuracy,
                state.notes().len()
            );
        }

        if result.stopped {
            info!("Session stopped at tick {}", state.tick);
            break;
        }
    }

    info!("Total events: {}", total_events);

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let bytes = recording.to_bytes().context("Failed to encode recording")?;
    let decoded = SessionRecording::from_bytes(&bytes).context("Failed to decode recording")?;
    info!("Recording: {} frames, {} bytes", decoded.frames.len(), bytes.len());

    let hash = state.compute_hash();
    let (replayed, _) = replay_session(&decoded);
    let replay_hash = replayed.compute_hash();

    info!("Final State Hash:  {}", hex::encode(hash));
    info!("Replay State Hash: {}", hex::encode(replay_hash));
    if hash == replay_hash {
        info!("DETERMINISM VERIFIED: Hashes match!");
    } else {
        warn!("DETERMINISM FAILURE: Hashes differ!");
    }

    let summary = RunSummary::from_state(&state, run_id, Utc::now());
    println!("{}", summary.to_json().context("Failed to encode summary")?);

    Ok(())
}
