//! Engine State
//!
//! The single context object the driving loop owns. Every component
//! (notes, progression, difficulty, random source) lives here and is
//! mutated only through this type or `tick`.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::{EngineConfig, Playfield};
use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::rng::{DeterministicRng, RandomSource};
use crate::game::difficulty::DifficultyController;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::normalize_symbol;
use crate::game::judgment::{judge, Judgment};
use crate::game::layout::{KeyDescriptor, LayoutMode};
use crate::game::note::{Note, NoteId, NoteStore};
use crate::game::progression::Progression;

// =============================================================================
// PHASE
// =============================================================================

/// Session phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Phase {
    /// Waiting for the start input; presses are not judged
    #[default]
    Intro = 0,
    /// Notes spawn and fall
    Playing = 1,
    /// Terminal; ticks do nothing
    Stopped = 2,
}

// =============================================================================
// HUD SNAPSHOT
// =============================================================================

/// Values the HUD displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudSnapshot {
    /// Total points
    pub score: u32,
    /// Current combo
    pub combo: u32,
    /// Best combo
    pub max_combo: u32,
    /// Hit percentage (floored)
    pub accuracy: u32,
    /// Difficulty level
    pub level: u8,
    /// Layout mode
    pub layout: LayoutMode,
    /// Active key positions
    pub active_keys: usize,
    /// Session phase
    pub phase: Phase,
}

// =============================================================================
// ENGINE STATE
// =============================================================================

/// Complete state of a session.
#[derive(Clone, Debug)]
pub struct EngineState<R: RandomSource = DeterministicRng> {
    /// Geometry in use
    pub playfield: Playfield,

    /// Iterations processed
    pub tick: u64,

    /// Seconds of play simulated
    pub time: f64,

    /// Current phase
    pub phase: Phase,

    /// RNG seed (for verification)
    pub seed: u64,

    /// Spawn random source
    pub rng: R,

    /// Notes in flight
    pub notes: NoteStore,

    /// Score and counters
    pub progress: Progression,

    /// Level and layout
    pub controller: DifficultyController,

    /// Seconds since the last spawn
    pub since_spawn: f32,

    /// Events generated this tick (cleared each tick)
    pending_events: Vec<GameEvent>,
}

impl EngineState<DeterministicRng> {
    /// Create a state seeded from the config.
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_rng(config, DeterministicRng::new(config.seed))
    }
}

impl<R: RandomSource> EngineState<R> {
    /// Create a state with an injected random source.
    pub fn with_rng(config: &EngineConfig, rng: R) -> Self {
        Self {
            playfield: config.playfield.clone(),
            tick: 0,
            time: 0.0,
            phase: Phase::Intro,
            seed: config.seed,
            rng,
            notes: NoteStore::new(),
            progress: Progression::new(),
            controller: DifficultyController::new(
                config.start_level,
                config.start_layout,
                config.playfield.clone(),
            ),
            since_spawn: 0.0,
            pending_events: Vec::new(),
        }
    }

    /// Target line of the playfield.
    #[inline]
    pub fn target_y(&self) -> f32 {
        self.playfield.target_y()
    }

    /// Leave the intro. Restarts the spawn clock.
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Intro {
            return false;
        }
        self.since_spawn = 0.0;
        self.set_phase(Phase::Playing);
        true
    }

    /// Stop the session for good.
    pub fn stop(&mut self) {
        if self.phase != Phase::Stopped {
            self.set_phase(Phase::Stopped);
        }
    }

    fn set_phase(&mut self, new_phase: Phase) {
        let old_phase = std::mem::replace(&mut self.phase, new_phase);
        debug!("Phase {:?} -> {:?}", old_phase, new_phase);
        self.push_event(GameEventData::PhaseChanged { old_phase, new_phase });
    }

    /// Spawn one note from the active letters.
    pub fn spawn_note(&mut self) -> Option<NoteId> {
        let id = self.notes.spawn(
            self.controller.active_letters(),
            self.controller.layout(),
            self.playfield.spawn_y(),
            &mut self.rng,
        )?;
        if let Some(note) = self.notes.get(id) {
            let data = GameEventData::NoteSpawned {
                note_id: id,
                letter: note.letter,
                x: note.x,
            };
            self.push_event(data);
        }
        Some(id)
    }

    /// Advance notes by `elapsed` seconds at the current fall speed.
    pub fn advance(&mut self, elapsed: f32) {
        let missed = self.notes.advance(
            elapsed,
            self.controller.fall_speed(),
            self.playfield.target_y(),
            self.playfield.retention_limit(),
            &mut self.progress,
        );
        for note in missed {
            self.push_event(GameEventData::NoteMissed {
                note_id: note.id,
                letter: note.letter,
            });
        }
    }

    /// Judge a key press. Presses outside `Playing` are ignored.
    pub fn press(&mut self, symbol: char) -> Judgment {
        if self.phase != Phase::Playing {
            return Judgment::Ignored;
        }

        let letter = normalize_symbol(symbol);
        let target_y = self.playfield.target_y();
        let judgment = judge(
            letter,
            target_y,
            &self.controller,
            &mut self.notes,
            &mut self.progress,
        );

        match judgment {
            Judgment::Ignored => {}
            Judgment::Hit { note_id, tier, distance, points } => {
                let combo = self.progress.combo;
                self.push_event(GameEventData::NoteHit {
                    note_id,
                    letter,
                    tier,
                    distance,
                    points,
                    combo,
                });
            }
            Judgment::Miss(reason) => {
                self.push_event(GameEventData::PressMissed { letter, reason });
            }
        }

        judgment
    }

    /// Select a difficulty level (clamped).
    pub fn select_level(&mut self, n: i64) {
        if let Some(old) = self.controller.set_level(n) {
            self.push_event(GameEventData::LevelChanged {
                old_level: old.get(),
                new_level: self.controller.level().get(),
            });
        }
    }

    /// Select a layout mode.
    pub fn set_layout(&mut self, mode: LayoutMode) {
        if let Some(old_layout) = self.controller.set_layout(mode) {
            self.push_event(GameEventData::LayoutChanged {
                old_layout,
                new_layout: mode,
            });
        }
    }

    /// Select a layout mode by name; unknown names are ignored.
    pub fn select_layout(&mut self, name: &str) {
        if let Some(old_layout) = self.controller.select_layout(name) {
            let new_layout = self.controller.mode();
            self.push_event(GameEventData::LayoutChanged { old_layout, new_layout });
        }
    }

    /// Switch to the next layout mode.
    pub fn cycle_layout(&mut self) {
        self.set_layout(self.controller.mode().next());
    }

    /// Notes for drawing, in spawn order.
    pub fn notes(&self) -> &[Note] {
        self.notes.notes()
    }

    /// Keys for drawing.
    pub fn keys(&self) -> &[KeyDescriptor] {
        self.controller.layout().keys()
    }

    /// HUD values.
    pub fn snapshot(&self) -> HudSnapshot {
        HudSnapshot {
            score: self.progress.score,
            combo: self.progress.combo,
            max_combo: self.progress.max_combo,
            accuracy: self.progress.accuracy(),
            level: self.controller.level().get(),
            layout: self.controller.mode(),
            active_keys: self.controller.layout().active_key_count(),
            phase: self.phase,
        }
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_f64(self.time);
            hasher.update_u8(self.phase as u8);
            hasher.update_u8(self.controller.level().get());
            hasher.update_u8(self.controller.mode() as u8);
            hasher.update_f32(self.since_spawn);

            let rng_state = self.rng.digest_state();
            hasher.update_u64(rng_state[0]);
            hasher.update_u64(rng_state[1]);

            self.notes.hash_into(hasher);
            self.progress.hash_into(hasher);
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event stamped with the current tick and time.
    pub fn push_event(&mut self, data: GameEventData) {
        self.pending_events.push(GameEvent::new(self.tick, self.time, data));
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::judgment::Tier;

    fn playing() -> EngineState {
        let mut state = EngineState::new(&EngineConfig::default());
        state.start();
        state.take_events();
        state
    }

    #[test]
    fn test_new_state_defaults() {
        let state = EngineState::new(&EngineConfig::default());
        let hud = state.snapshot();

        assert_eq!(hud.phase, Phase::Intro);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.layout, LayoutMode::Latin);
        assert_eq!(hud.active_keys, 4);
        assert_eq!(hud.score, 0);
        assert_eq!(hud.accuracy, 0);
        assert!(state.notes().is_empty());
        assert_eq!(state.keys().len(), 26);
    }

    #[test]
    fn test_press_in_intro_is_ignored() {
        let mut state = EngineState::new(&EngineConfig::default());
        assert_eq!(state.press('a'), Judgment::Ignored);
        assert_eq!(state.progress, Progression::new());
    }

    #[test]
    fn test_start_only_once() {
        let mut state = EngineState::new(&EngineConfig::default());
        assert!(state.start());
        assert!(!state.start());
        let events = state.take_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0].data,
            GameEventData::PhaseChanged { old_phase: Phase::Intro, new_phase: Phase::Playing }
        ));
    }

    #[test]
    fn test_press_is_normalized() {
        let mut state = playing();
        let id = state.notes.insert('A', 148.0, 550.0);

        let result = state.press('a');

        assert!(matches!(result, Judgment::Hit { note_id, tier: Tier::Perfect, .. } if note_id == id));
        let events = state.take_events();
        assert!(matches!(events[0].data, GameEventData::NoteHit { letter: 'A', combo: 1, .. }));
    }

    #[test]
    fn test_spawn_note_emits_event() {
        let mut state = playing();
        let id = state.spawn_note().unwrap();

        let note = state.notes.get(id).unwrap();
        assert!(state.controller.is_active(note.letter));
        assert_eq!(note.y, 20.0);

        let events = state.take_events();
        assert!(matches!(events[0].data, GameEventData::NoteSpawned { note_id, .. } if note_id == id));
    }

    #[test]
    fn test_layout_events_only_on_change() {
        let mut state = playing();
        state.select_layout("invalid");
        state.set_layout(LayoutMode::Latin);
        assert!(state.take_events().is_empty());

        state.cycle_layout();
        let events = state.take_events();
        assert!(matches!(
            events[0].data,
            GameEventData::LayoutChanged { old_layout: LayoutMode::Latin, new_layout: LayoutMode::Cyrillic }
        ));
    }

    #[test]
    fn test_level_change_keeps_notes_in_flight() {
        let mut state = playing();
        let id = state.notes.insert('F', 412.0, 300.0);

        state.select_level(10);
        state.set_layout(LayoutMode::Cyrillic);

        let note = state.notes.get(id).unwrap();
        assert_eq!(note.x, 412.0);
        assert!(note.is_pending());
        // 'F' is no longer active, so pressing it does nothing
        assert_eq!(state.press('F'), Judgment::Ignored);
    }

    #[test]
    fn test_hash_determinism() {
        let config = EngineConfig::default();
        let mut a = EngineState::new(&config);
        let mut b = EngineState::new(&config);
        for state in [&mut a, &mut b] {
            state.start();
            state.spawn_note();
            state.advance(0.5);
        }
        assert_eq!(a.compute_hash(), b.compute_hash());

        a.advance(0.1);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_snapshot_json() {
        let state = playing();
        let json = serde_json::to_value(state.snapshot()).unwrap();
        assert_eq!(json["phase"], "playing");
        assert_eq!(json["layout"], "latin");
    }
}
