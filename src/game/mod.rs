//! Game Logic Module
//!
//! All simulation code. Deterministic given the seed and input frames.
//!
//! ## Module Structure
//!
//! - `layout`: Key-to-lane mapping and layout modes
//! - `difficulty`: Level tables, active letters
//! - `note`: Note store (spawn, fall, auto-miss, retention)
//! - `judgment`: Timing windows and press resolution
//! - `progression`: Score, combo, accuracy
//! - `input`: Input events and normalization
//! - `state`: Engine context object and HUD snapshot
//! - `tick`: Simulation step, recording and replay
//! - `events`: Game events
//! - `summary`: End-of-run results

pub mod layout;
pub mod difficulty;
pub mod note;
pub mod judgment;
pub mod progression;
pub mod input;
pub mod state;
pub mod tick;
pub mod events;
pub mod summary;

// Re-export key types
pub use layout::{KeyDescriptor, Lane, LaneLayout, LayoutMode, Script};
pub use difficulty::{DifficultyController, Level};
pub use note::{Note, NoteId, NoteStatus, NoteStore};
pub use judgment::{Judgment, MissReason, Tier};
pub use progression::Progression;
pub use input::{InputEvent, InputFrame};
pub use state::{EngineState, HudSnapshot, Phase};
pub use tick::{tick, replay_session, SessionRecording, TickResult};
pub use events::{GameEvent, GameEventData};
pub use summary::RunSummary;
