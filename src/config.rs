//! Engine Configuration
//!
//! Playfield geometry and session start parameters. Timing windows, tier
//! scores and the level table are fixed constants and absent.

use serde::{Serialize, Deserialize};

use crate::game::layout::LayoutMode;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Malformed JSON.
    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A geometry value is not a positive finite number.
    #[error("Playfield {field} must be positive and finite, got {value}")]
    NonPositive {
        /// Offending field name
        field: &'static str,
        /// Offending value
        value: f32,
    },

    /// Target line does not sit inside the lane area.
    #[error("Target line {target_y} is outside the lane area {lane_top}..{lane_bottom}")]
    TargetOutsideLanes {
        /// Computed target line
        target_y: f32,
        /// Lane area top
        lane_top: f32,
        /// Lane area bottom
        lane_bottom: f32,
    },

    /// Notes would drop off the retention limit before reaching the target.
    #[error("Retention limit {retention_limit} must lie below the miss line {miss_line}")]
    RetentionAboveMissLine {
        /// Computed retention limit
        retention_limit: f32,
        /// Target line plus the widest window
        miss_line: f32,
    },
}

/// Playfield geometry in screen units (y grows downward).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    /// Screen width
    pub width: f32,
    /// Screen height
    pub height: f32,
    /// Top of the lane area
    pub lane_top: f32,
    /// Distance from the screen bottom to the lane area bottom
    pub lane_bottom_margin: f32,
    /// Distance from the lane area bottom up to the target line
    pub target_offset: f32,
    /// Distance above the lane top where notes appear
    pub spawn_offset: f32,
    /// Distance below the screen bottom where notes are discarded
    pub retention_margin: f32,
    /// Horizontal space not used by lanes (split across both sides)
    pub side_padding: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            lane_top: 60.0,
            lane_bottom_margin: 140.0,
            target_offset: 10.0,
            spawn_offset: 40.0,
            retention_margin: 60.0,
            side_padding: 120.0,
        }
    }
}

impl Playfield {
    /// Bottom of the lane area.
    #[inline]
    pub fn lane_bottom(&self) -> f32 {
        self.height - self.lane_bottom_margin
    }

    /// Vertical position of the target line.
    #[inline]
    pub fn target_y(&self) -> f32 {
        self.lane_bottom() - self.target_offset
    }

    /// Starting `y` of a freshly spawned note.
    #[inline]
    pub fn spawn_y(&self) -> f32 {
        self.lane_top - self.spawn_offset
    }

    /// Notes at or beyond this `y` are dropped from the store.
    #[inline]
    pub fn retention_limit(&self) -> f32 {
        self.height + self.retention_margin
    }

    /// Width shared by the lanes of the widest row.
    #[inline]
    pub fn usable_width(&self) -> f32 {
        self.width - self.side_padding
    }

    /// Check geometry consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("usable width", self.usable_width()),
            ("lane bottom", self.lane_bottom()),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive { field, value });
            }
        }

        let target_y = self.target_y();
        if !(target_y > self.lane_top && target_y <= self.lane_bottom()) {
            return Err(ConfigError::TargetOutsideLanes {
                target_y,
                lane_top: self.lane_top,
                lane_bottom: self.lane_bottom(),
            });
        }

        let miss_line = target_y + crate::game::judgment::GOOD_WINDOW;
        if self.retention_limit() <= miss_line {
            return Err(ConfigError::RetentionAboveMissLine {
                retention_limit: self.retention_limit(),
                miss_line,
            });
        }

        Ok(())
    }
}

/// Configuration for an engine session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Playfield geometry
    pub playfield: Playfield,
    /// Initial difficulty level (clamped on use)
    pub start_level: i64,
    /// Initial input layout
    pub start_layout: LayoutMode,
    /// Seed for the spawn RNG
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            start_level: 1,
            start_layout: LayoutMode::Latin,
            seed: 12345,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.playfield.validate()
    }
}
