//! Run Summary
//!
//! End-of-session results for display or export. Nothing here is persisted.

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::core::rng::RandomSource;
use crate::game::judgment::Tier;
use crate::game::layout::LayoutMode;
use crate::game::state::EngineState;

/// Final results of one session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,
    /// When the run finished
    pub finished_at: DateTime<Utc>,
    /// Total points
    pub score: u32,
    /// Best combo
    pub max_combo: u32,
    /// Hit percentage (floored)
    pub accuracy: u32,
    /// Successful judgments
    pub hits: u32,
    /// Misses
    pub misses: u32,
    /// Perfect hits
    pub perfect: u32,
    /// Great hits
    pub great: u32,
    /// Good hits
    pub good: u32,
    /// Level at the end of the run
    pub level: u8,
    /// Layout at the end of the run
    pub layout: LayoutMode,
    /// Seconds played
    pub duration_secs: f64,
    /// Final state digest (hex)
    pub state_hash: String,
}

impl RunSummary {
    /// Summarize a state. Id and timestamp are passed in so results stay reproducible.
    pub fn from_state<R: RandomSource>(
        state: &EngineState<R>,
        run_id: Uuid,
        finished_at: DateTime<Utc>,
    ) -> Self {
        let progress = &state.progress;
        Self {
            run_id,
            finished_at,
            score: progress.score,
            max_combo: progress.max_combo,
            accuracy: progress.accuracy(),
            hits: progress.hits,
            misses: progress.misses,
            perfect: progress.tier_count(Tier::Perfect),
            great: progress.tier_count(Tier::Great),
            good: progress.tier_count(Tier::Good),
            level: state.controller.level().get(),
            layout: state.controller.mode(),
            duration_secs: state.time,
            state_hash: hex::encode(state.compute_hash()),
        }
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
