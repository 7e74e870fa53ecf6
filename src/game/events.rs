//! Game Events
//!
//! Events generated during simulation for rendering feedback, logging and
//! replay comparison. Ignored presses produce no event.

use serde::{Serialize, Deserialize};

use crate::game::judgment::{MissReason, Tier};
use crate::game::layout::LayoutMode;
use crate::game::note::NoteId;
use crate::game::state::Phase;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Note entered the playfield
    NoteSpawned {
        /// New note
        note_id: NoteId,
        /// Symbol to press
        letter: char,
        /// Lane centre
        x: f32,
    },

    /// Press struck a note
    NoteHit {
        /// Struck note
        note_id: NoteId,
        /// Pressed symbol
        letter: char,
        /// Grade
        tier: Tier,
        /// Distance from the target line
        distance: f32,
        /// Points awarded
        points: u32,
        /// Combo after the hit
        combo: u32,
    },

    /// Note left the judgable band unstruck
    NoteMissed {
        /// Missed note
        note_id: NoteId,
        /// Its symbol
        letter: char,
    },

    /// Press counted as a miss
    PressMissed {
        /// Pressed symbol
        letter: char,
        /// Why it missed
        reason: MissReason,
    },

    /// Difficulty level changed
    LevelChanged {
        /// Previous level
        old_level: u8,
        /// Current level
        new_level: u8,
    },

    /// Layout mode changed
    LayoutChanged {
        /// Previous mode
        old_layout: LayoutMode,
        /// Current mode
        new_layout: LayoutMode,
    },

    /// Session phase changed
    PhaseChanged {
        /// Previous phase
        old_phase: Phase,
        /// Current phase
        new_phase: Phase,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u64,

    /// Simulation time in seconds
    pub time: f64,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u64, time: f64, data: GameEventData) -> Self {
        Self { tick, time, data }
    }

    /// Whether this event changed the miss counter.
    pub fn is_miss(&self) -> bool {
        matches!(
            self.data,
            GameEventData::NoteMissed { .. } | GameEventData::PressMissed { .. }
        )
    }

    /// Tier of a hit event.
    pub fn hit_tier(&self) -> Option<Tier> {
        match self.data {
            GameEventData::NoteHit { tier, .. } => Some(tier),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_miss_classification() {
        let missed = GameEvent::new(1, 0.5, GameEventData::NoteMissed { note_id: 0, letter: 'A' });
        let pressed = GameEvent::new(
            1,
            0.5,
            GameEventData::PressMissed { letter: 'A', reason: MissReason::NoCandidate },
        );
        let level = GameEvent::new(1, 0.5, GameEventData::LevelChanged { old_level: 1, new_level: 2 });

        assert!(missed.is_miss());
        assert!(pressed.is_miss());
        assert!(!level.is_miss());
    }

    #[test]
    fn test_hit_tier() {
        let hit = GameEvent::new(
            3,
            1.0,
            GameEventData::NoteHit {
                note_id: 4,
                letter: 'S',
                tier: Tier::Great,
                distance: 20.0,
                points: 150,
                combo: 2,
            },
        );
        assert_eq!(hit.hit_tier(), Some(Tier::Great));
        assert!(!hit.is_miss());
    }

    #[test]
    fn test_event_json_shape() {
        let event = GameEvent::new(
            7,
            0.25,
            GameEventData::LayoutChanged {
                old_layout: LayoutMode::Latin,
                new_layout: LayoutMode::Dual,
            },
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["tick"], 7);
        assert_eq!(json["data"]["LayoutChanged"]["new_layout"], "dual");
    }
}
