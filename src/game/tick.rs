//! Simulation Tick
//!
//! One call per loop iteration: spawn on schedule, advance notes, then
//! judge the inputs collected since the previous iteration so presses see
//! the freshest positions.

use serde::{Serialize, Deserialize};

use crate::config::EngineConfig;
use crate::core::rng::RandomSource;
use crate::game::events::GameEvent;
use crate::game::input::{InputEvent, InputFrame};
use crate::game::state::{EngineState, Phase};

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Whether the session is stopped
    pub stopped: bool,
}

/// Run one simulation step.
///
/// # Arguments
///
/// * `state` - The engine state (will be mutated)
/// * `elapsed` - Seconds since the previous call; non-positive or
///   non-finite values skip every time-driven update
/// * `inputs` - Inputs in arrival order
///
/// A stopped state is left untouched.
pub fn tick<R: RandomSource>(
    state: &mut EngineState<R>,
    elapsed: f32,
    inputs: &[InputEvent],
) -> TickResult {
    let mut result = TickResult::default();

    if state.phase == Phase::Stopped {
        result.stopped = true;
        return result;
    }

    // 0. Advance tick counter
    state.tick += 1;

    let timed = elapsed.is_finite() && elapsed > 0.0;
    if state.phase == Phase::Playing && timed {
        state.time += elapsed as f64;

        // 1. Spawn on schedule
        update_spawn_clock(state, elapsed);

        // 2. Move notes, auto-miss, retention
        state.advance(elapsed);
    }

    // 3. Inputs against fresh positions
    apply_inputs(state, inputs);

    result.stopped = state.phase == Phase::Stopped;
    result.events = state.take_events();
    result
}

/// Spawn when the interval has elapsed, restarting the clock from the spawn.
fn update_spawn_clock<R: RandomSource>(state: &mut EngineState<R>, elapsed: f32) {
    state.since_spawn += elapsed;
    if state.since_spawn >= state.controller.spawn_interval() {
        state.spawn_note();
        state.since_spawn = 0.0;
    }
}

/// Apply inputs in arrival order. Anything after a quit is dropped.
fn apply_inputs<R: RandomSource>(state: &mut EngineState<R>, inputs: &[InputEvent]) {
    for input in inputs {
        match input {
            InputEvent::Start => {
                state.start();
            }
            InputEvent::Quit => {
                state.stop();
                break;
            }
            InputEvent::KeyPress(symbol) => {
                state.press(*symbol);
            }
            InputEvent::SelectLevel(level) => state.select_level(*level),
            InputEvent::SelectLayout(name) => state.select_layout(name),
            InputEvent::CycleLayout => state.cycle_layout(),
        }
    }
}

// =============================================================================
// RECORDING AND REPLAY
// =============================================================================

/// Everything needed to reproduce a session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecording {
    /// Session configuration (including seed)
    pub config: EngineConfig,
    /// Frames in order
    pub frames: Vec<InputFrame>,
}

impl SessionRecording {
    /// Start an empty recording.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            frames: Vec::new(),
        }
    }

    /// Append a frame.
    pub fn record(&mut self, frame: InputFrame) {
        self.frames.push(frame);
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

/// Replay a recording from a fresh state.
///
/// Returns the final state and every event produced.
pub fn replay_session(recording: &SessionRecording) -> (EngineState, Vec<GameEvent>) {
    let mut state = EngineState::new(&recording.config);
    let mut all_events = Vec::new();

    for frame in &recording.frames {
        let result = tick(&mut state, frame.elapsed, &frame.events);
        all_events.extend(result.events);

        if result.stopped {
            break;
        }
    }

    (state, all_events)
}
