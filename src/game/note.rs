//! Note Store
//!
//! Owns every note in flight: spawning, falling, auto-miss and retention.

use serde::{Serialize, Deserialize};
use tracing::{debug, warn};

use crate::core::hash::StateHasher;
use crate::core::rng::RandomSource;
use crate::game::judgment::{Tier, GOOD_WINDOW};
use crate::game::layout::LaneLayout;
use crate::game::progression::Progression;

/// Note identifier (monotonic, in spawn order).
pub type NoteId = u32;

/// Judgment state of a note. Terminal states never change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteStatus {
    /// Still falling and judgable
    #[default]
    Falling,
    /// Struck by the player
    Hit(Tier),
    /// Passed the judgable band unstruck
    Missed,
}

impl NoteStatus {
    fn code(self) -> u8 {
        match self {
            NoteStatus::Falling => 0,
            NoteStatus::Hit(tier) => 1 + tier as u8,
            NoteStatus::Missed => 255,
        }
    }
}

/// One falling symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Spawn-order id
    pub id: NoteId,
    /// Symbol to press
    pub letter: char,
    /// Lane centre, fixed at spawn
    pub x: f32,
    /// Vertical position (grows downward)
    pub y: f32,
    /// Judgment state
    pub status: NoteStatus,
}

impl Note {
    /// Whether the note can still be judged.
    #[inline]
    pub fn is_pending(&self) -> bool {
        self.status == NoteStatus::Falling
    }

    /// Whether the note was struck.
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self.status, NoteStatus::Hit(_))
    }

    /// Whether the note was missed.
    #[inline]
    pub fn is_missed(&self) -> bool {
        self.status == NoteStatus::Missed
    }
}

/// Notes in flight, kept in spawn order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteStore {
    notes: Vec<Note>,
    next_id: NoteId,
}

impl NoteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a falling note at an explicit position.
    pub fn insert(&mut self, letter: char, x: f32, y: f32) -> NoteId {
        let id = self.next_id;
        self.next_id += 1;
        self.notes.push(Note {
            id,
            letter,
            x,
            y,
            status: NoteStatus::Falling,
        });
        id
    }

    /// Spawn a note for a symbol drawn uniformly from `letters`.
    ///
    /// Does nothing when `letters` is empty.
    pub fn spawn<R: RandomSource + ?Sized>(
        &mut self,
        letters: &[char],
        layout: &LaneLayout,
        spawn_y: f32,
        rng: &mut R,
    ) -> Option<NoteId> {
        if letters.is_empty() {
            return None;
        }

        let index = rng.next_index(letters.len());
        let Some(&letter) = letters.get(index) else {
            warn!("Random index {} out of range for {} letters", index, letters.len());
            return None;
        };
        let Some(lane) = layout.lane(letter) else {
            warn!("No lane for active letter {:?}", letter);
            return None;
        };

        let id = self.insert(letter, lane.x, spawn_y);
        debug!("Spawned note {} {:?} at x={:.1}", id, letter, lane.x);
        Some(id)
    }

    /// Move every note down by `fall_speed * elapsed`.
    ///
    /// Pending notes past `target_y + GOOD_WINDOW` become missed and are
    /// registered once with `progress`. Judged notes keep falling with no
    /// further effect until they reach `retention_limit` and are dropped.
    /// Returns the newly missed notes.
    pub fn advance(
        &mut self,
        elapsed: f32,
        fall_speed: f32,
        target_y: f32,
        retention_limit: f32,
        progress: &mut Progression,
    ) -> Vec<Note> {
        if !(elapsed > 0.0) {
            return Vec::new();
        }

        let miss_line = target_y + GOOD_WINDOW;
        let step = fall_speed * elapsed;
        let mut missed = Vec::new();

        for note in self.notes.iter_mut() {
            note.y += step;
            if note.is_pending() && note.y > miss_line {
                note.status = NoteStatus::Missed;
                progress.register_miss();
                missed.push(note.clone());
            }
        }

        self.notes.retain(|n| n.y < retention_limit);
        missed
    }

    /// Pending note of `letter` closest to `target_y`, with its distance.
    ///
    /// Equal distances resolve to the earliest spawn.
    pub fn nearest_pending(&self, letter: char, target_y: f32) -> Option<(NoteId, f32)> {
        self.notes
            .iter()
            .filter(|n| n.letter == letter && n.is_pending())
            .map(|n| (n.id, (n.y - target_y).abs()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    /// Mark a pending note as hit. Returns false if it was not pending.
    pub fn mark_hit(&mut self, id: NoteId, tier: Tier) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) if note.is_pending() => {
                note.status = NoteStatus::Hit(tier);
                true
            }
            _ => false,
        }
    }

    /// Look up a note still in the store.
    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// All notes in spawn order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Number of notes in the store.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Number of notes still judgable.
    pub fn pending_count(&self) -> usize {
        self.notes.iter().filter(|n| n.is_pending()).count()
    }

    /// Hash into engine state digest.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.next_id);
        hasher.update_u32(self.notes.len() as u32);
        for note in &self.notes {
            hasher.update_u32(note.id);
            hasher.update_char(note.letter);
            hasher.update_f32(note.x);
            hasher.update_f32(note.y);
            hasher.update_u8(note.status.code());
        }
    }
}
