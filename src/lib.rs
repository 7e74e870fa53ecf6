//! # Pianoroll Engine
//!
//! Falling-note rhythm-matching engine. Letters fall along keyboard-shaped
//! lanes toward a target line; pressing the letter while its note is near
//! the line scores a perfect, great or good hit.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      PIANOROLL ENGINE                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/              - Deterministic primitives               │
//! │  ├── rng.rs         - Xorshift128+ PRNG, RandomSource trait  │
//! │  └── hash.rs        - State hashing for replay checks        │
//! │                                                              │
//! │  game/              - Simulation                             │
//! │  ├── layout.rs      - Key-to-lane mapping, layout modes      │
//! │  ├── difficulty.rs  - Level tables, active letters           │
//! │  ├── note.rs        - Note store                             │
//! │  ├── judgment.rs    - Timing windows, press resolution       │
//! │  ├── progression.rs - Score, combo, accuracy                 │
//! │  ├── state.rs       - Engine context, HUD snapshot           │
//! │  ├── tick.rs        - Simulation step, replay                │
//! │  └── summary.rs     - End-of-run results                     │
//! │                                                              │
//! │  config.rs          - Playfield geometry, start parameters   │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Given identical config (including seed) and input frames, a session
//! produces identical events and an identical state hash. Rendering and
//! raw input polling live outside this crate.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod game;

// Re-export commonly used types
pub use config::{ConfigError, EngineConfig, Playfield};
pub use crate::core::rng::{DeterministicRng, RandomSource};
pub use game::input::{InputEvent, InputFrame};
pub use game::layout::LayoutMode;
pub use game::state::{EngineState, HudSnapshot, Phase};
pub use game::tick::{tick, TickResult};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Frame rate the demo driver simulates (Hz)
pub const FRAME_RATE: u32 = 60;
