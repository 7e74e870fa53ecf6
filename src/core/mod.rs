//! Core deterministic primitives.
//!
//! Randomness and state hashing shared by the simulation. Nothing in here
//! reads the clock or the environment.

pub mod rng;
pub mod hash;

// Re-export core types
pub use rng::{DeterministicRng, RandomSource};
pub use hash::{compute_state_hash, StateHash, StateHasher};
