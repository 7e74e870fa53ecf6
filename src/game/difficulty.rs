//! Difficulty and Layout Controller
//!
//! Holds the current level and layout mode and derives everything that
//! depends on them: spawn interval, fall speed, active letters and lanes.
//! Changes apply to future spawns only; notes in flight keep their lane.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::Playfield;
use crate::game::layout::{active_letters, LaneLayout, LayoutMode};

/// Lowest selectable level.
pub const MIN_LEVEL: u8 = 1;

/// Highest selectable level.
pub const MAX_LEVEL: u8 = 10;

/// Seconds between spawns, indexed by `level - 1`.
pub const SPAWN_INTERVALS: [f32; 10] = [0.65, 0.60, 0.55, 0.50, 0.45, 0.41, 0.37, 0.33, 0.29, 0.25];

/// Fall speed in units per second, indexed by `level - 1`.
pub const FALL_SPEEDS: [f32; 10] = [250.0, 275.0, 300.0, 320.0, 345.0, 370.0, 400.0, 430.0, 460.0, 500.0];

/// Active key positions, indexed by `level - 1`.
pub const KEY_COUNTS: [usize; 10] = [4, 6, 9, 12, 15, 18, 21, 24, 28, 32];

/// Difficulty level in `MIN_LEVEL..=MAX_LEVEL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Level(u8);

impl Default for Level {
    fn default() -> Self {
        Self(MIN_LEVEL)
    }
}

impl Level {
    /// Clamp any integer into the valid range.
    pub fn clamped(n: i64) -> Self {
        Self(n.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8)
    }

    /// Numeric value.
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    #[inline]
    fn index(self) -> usize {
        (self.0 - MIN_LEVEL) as usize
    }

    /// Seconds between spawns.
    #[inline]
    pub fn spawn_interval(self) -> f32 {
        SPAWN_INTERVALS[self.index()]
    }

    /// Fall speed in units per second.
    #[inline]
    pub fn fall_speed(self) -> f32 {
        FALL_SPEEDS[self.index()]
    }

    /// Requested number of active key positions.
    #[inline]
    pub fn key_count(self) -> usize {
        KEY_COUNTS[self.index()]
    }
}

/// Level and layout selection with derived parameters.
#[derive(Clone, Debug)]
pub struct DifficultyController {
    level: Level,
    mode: LayoutMode,
    active_letters: Vec<char>,
    layout: LaneLayout,
    playfield: Playfield,
}

impl DifficultyController {
    /// Create a controller; `level` is clamped.
    pub fn new(level: i64, mode: LayoutMode, playfield: Playfield) -> Self {
        let level = Level::clamped(level);
        let layout = LaneLayout::compute(mode, level.key_count(), &playfield);
        Self {
            level,
            mode,
            active_letters: active_letters(mode, level.key_count()),
            layout,
            playfield,
        }
    }

    /// Select a level, clamping out-of-range values.
    ///
    /// Returns the previous level when the level actually changed.
    pub fn set_level(&mut self, n: i64) -> Option<Level> {
        let level = Level::clamped(n);
        if level == self.level {
            return None;
        }
        let old = std::mem::replace(&mut self.level, level);
        self.recompute();
        debug!(
            "Level {} -> {} (interval {:.2}s, speed {}, keys {})",
            old.get(),
            level.get(),
            level.spawn_interval(),
            level.fall_speed(),
            self.layout.active_key_count()
        );
        Some(old)
    }

    /// Select a layout mode.
    ///
    /// Returns the previous mode when the mode actually changed.
    pub fn set_layout(&mut self, mode: LayoutMode) -> Option<LayoutMode> {
        if mode == self.mode {
            return None;
        }
        let old = std::mem::replace(&mut self.mode, mode);
        self.recompute();
        debug!("Layout {} -> {}", old, mode);
        Some(old)
    }

    /// Select a layout mode by name; unknown names leave the layout unchanged.
    pub fn select_layout(&mut self, name: &str) -> Option<LayoutMode> {
        match name.parse::<LayoutMode>() {
            Ok(mode) => self.set_layout(mode),
            Err(e) => {
                debug!("Ignoring layout selection: {}", e);
                None
            }
        }
    }

    fn recompute(&mut self) {
        let key_count = self.level.key_count();
        self.active_letters = active_letters(self.mode, key_count);
        self.layout = LaneLayout::compute(self.mode, key_count, &self.playfield);
    }

    /// Current level.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Current layout mode.
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Seconds between spawns at the current level.
    pub fn spawn_interval(&self) -> f32 {
        self.level.spawn_interval()
    }

    /// Fall speed at the current level.
    pub fn fall_speed(&self) -> f32 {
        self.level.fall_speed()
    }

    /// Symbols that may spawn, in interleaved order.
    pub fn active_letters(&self) -> &[char] {
        &self.active_letters
    }

    /// Whether a symbol may currently be judged.
    pub fn is_active(&self, symbol: char) -> bool {
        self.active_letters.contains(&symbol)
    }

    /// Current lane layout.
    pub fn layout(&self) -> &LaneLayout {
        &self.layout
    }
}
