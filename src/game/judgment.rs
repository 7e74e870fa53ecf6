//! Judgment Engine
//!
//! Resolves a key press against the falling notes. The press goes to the
//! pending note of that letter closest to the target line, and the
//! distance is graded against three nested windows, tightest first.

use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::game::difficulty::DifficultyController;
use crate::game::note::{NoteId, NoteStore};
use crate::game::progression::Progression;

/// Perfect window (distance units from the target line).
pub const PERFECT_WINDOW: f32 = 14.0;

/// Great window.
pub const GREAT_WINDOW: f32 = 26.0;

/// Good window. Pending notes past `target_y + GOOD_WINDOW` are missed.
pub const GOOD_WINDOW: f32 = 40.0;

/// Hit quality.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Tier {
    /// Within `PERFECT_WINDOW`
    Perfect = 0,
    /// Within `GREAT_WINDOW`
    Great = 1,
    /// Within `GOOD_WINDOW`
    Good = 2,
}

impl Tier {
    /// Tiers in evaluation order.
    pub const ALL: [Tier; 3] = [Tier::Perfect, Tier::Great, Tier::Good];

    /// Maximum distance for this tier (inclusive).
    pub fn window(self) -> f32 {
        match self {
            Tier::Perfect => PERFECT_WINDOW,
            Tier::Great => GREAT_WINDOW,
            Tier::Good => GOOD_WINDOW,
        }
    }

    /// Score awarded for this tier.
    pub fn points(self) -> u32 {
        match self {
            Tier::Perfect => 300,
            Tier::Great => 150,
            Tier::Good => 75,
        }
    }

    /// Grade a distance; `None` when it exceeds every window.
    pub fn classify(distance: f32) -> Option<Tier> {
        Self::ALL.into_iter().find(|tier| distance <= tier.window())
    }
}

/// Why a press counted as a miss.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum MissReason {
    /// No pending note of that letter
    NoCandidate,
    /// Nearest pending note was outside every window
    OutOfWindow {
        /// Note that was evaluated (left pending)
        note_id: NoteId,
        /// Its distance from the target line
        distance: f32,
    },
}

/// Result of judging one press.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Judgment {
    /// Letter not active; nothing changed
    Ignored,
    /// Note struck
    Hit {
        /// Struck note
        note_id: NoteId,
        /// Grade
        tier: Tier,
        /// Distance from the target line
        distance: f32,
        /// Points awarded
        points: u32,
    },
    /// Penalized press
    Miss(MissReason),
}

/// Judge a press of `letter` (already normalized).
///
/// Updates the note store and the progression tracker.
pub fn judge(
    letter: char,
    target_y: f32,
    controller: &DifficultyController,
    notes: &mut NoteStore,
    progress: &mut Progression,
) -> Judgment {
    if !controller.is_active(letter) {
        trace!("Ignoring press {:?}: not active", letter);
        return Judgment::Ignored;
    }

    let Some((note_id, distance)) = notes.nearest_pending(letter, target_y) else {
        progress.register_miss();
        trace!("Press {:?} missed: no candidate", letter);
        return Judgment::Miss(MissReason::NoCandidate);
    };

    match Tier::classify(distance) {
        Some(tier) => {
            notes.mark_hit(note_id, tier);
            let points = progress.register_hit(tier);
            trace!("Press {:?} hit note {} ({:?}, distance {:.1})", letter, note_id, tier, distance);
            Judgment::Hit { note_id, tier, distance, points }
        }
        None => {
            progress.register_miss();
            trace!("Press {:?} missed: note {} at distance {:.1}", letter, note_id, distance);
            Judgment::Miss(MissReason::OutOfWindow { note_id, distance })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Playfield;
    use crate::game::layout::LayoutMode;
    use crate::game::note::NoteStatus;

    const TARGET: f32 = 550.0;

    fn setup() -> (DifficultyController, NoteStore, Progression) {
        (
            DifficultyController::new(1, LayoutMode::Latin, Playfield::default()),
            NoteStore::new(),
            Progression::new(),
        )
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(Tier::classify(0.0), Some(Tier::Perfect));
        assert_eq!(Tier::classify(14.0), Some(Tier::Perfect));
        assert_eq!(Tier::classify(14.01), Some(Tier::Great));
        assert_eq!(Tier::classify(26.0), Some(Tier::Great));
        assert_eq!(Tier::classify(26.01), Some(Tier::Good));
        assert_eq!(Tier::classify(40.0), Some(Tier::Good));
        assert_eq!(Tier::classify(40.01), None);
    }

    #[test]
    fn test_perfect_hit() {
        let (c, mut notes, mut p) = setup();
        let id = notes.insert('A', 148.0, TARGET - 10.0);

        let result = judge('A', TARGET, &c, &mut notes, &mut p);

        assert!(matches!(result, Judgment::Hit { tier: Tier::Perfect, points: 300, .. }));
        assert_eq!(p.score, 300);
        assert_eq!(p.combo, 1);
        assert_eq!(notes.get(id).unwrap().status, NoteStatus::Hit(Tier::Perfect));
    }

    #[test]
    fn test_great_and_good_hits() {
        let (c, mut notes, mut p) = setup();
        notes.insert('S', 236.0, TARGET + 20.0);
        notes.insert('D', 324.0, TARGET - 35.0);

        assert!(matches!(judge('S', TARGET, &c, &mut notes, &mut p), Judgment::Hit { tier: Tier::Great, .. }));
        assert!(matches!(judge('D', TARGET, &c, &mut notes, &mut p), Judgment::Hit { tier: Tier::Good, .. }));
        assert_eq!(p.score, 225);
        assert_eq!(p.combo, 2);
    }

    #[test]
    fn test_nearest_candidate_wins() {
        let (c, mut notes, mut p) = setup();
        let far = notes.insert('A', 148.0, TARGET - 30.0);
        let near = notes.insert('A', 148.0, TARGET - 5.0);

        let result = judge('A', TARGET, &c, &mut notes, &mut p);

        assert!(matches!(result, Judgment::Hit { note_id, tier: Tier::Perfect, .. } if note_id == near));
        assert_eq!(notes.get(far).unwrap().status, NoteStatus::Falling);
    }

    #[test]
    fn test_equal_distance_prefers_earlier_spawn() {
        let (c, mut notes, mut p) = setup();
        let first = notes.insert('F', 412.0, TARGET - 8.0);
        let second = notes.insert('F', 412.0, TARGET + 8.0);

        let result = judge('F', TARGET, &c, &mut notes, &mut p);

        assert!(matches!(result, Judgment::Hit { note_id, .. } if note_id == first));
        assert_eq!(notes.get(second).unwrap().status, NoteStatus::Falling);
    }

    #[test]
    fn test_no_candidate_is_miss() {
        let (c, mut notes, mut p) = setup();
        p.register_hit(Tier::Good);

        let result = judge('A', TARGET, &c, &mut notes, &mut p);

        assert_eq!(result, Judgment::Miss(MissReason::NoCandidate));
        assert_eq!(p.combo, 0);
        assert_eq!(p.misses, 1);
        assert_eq!(p.score, 75);
    }

    #[test]
    fn test_out_of_window_leaves_note_pending() {
        let (c, mut notes, mut p) = setup();
        let id = notes.insert('A', 148.0, TARGET - 120.0);

        let result = judge('A', TARGET, &c, &mut notes, &mut p);

        assert!(matches!(result, Judgment::Miss(MissReason::OutOfWindow { .. })));
        assert_eq!(p.misses, 1);
        assert_eq!(notes.get(id).unwrap().status, NoteStatus::Falling);
    }

    #[test]
    fn test_inactive_letter_ignored() {
        let (c, mut notes, mut p) = setup();
        notes.insert('Q', 104.0, TARGET);

        let result = judge('Q', TARGET, &c, &mut notes, &mut p);

        assert_eq!(result, Judgment::Ignored);
        assert_eq!(p, Progression::new());
    }

    #[test]
    fn test_already_hit_note_is_not_a_candidate() {
        let (c, mut notes, mut p) = setup();
        notes.insert('A', 148.0, TARGET);

        judge('A', TARGET, &c, &mut notes, &mut p);
        let second = judge('A', TARGET, &c, &mut notes, &mut p);

        assert_eq!(second, Judgment::Miss(MissReason::NoCandidate));
        assert_eq!(p.hits, 1);
        assert_eq!(p.misses, 1);
    }
}
