//! Lane Layout
//!
//! Maps key symbols to lanes. Lanes form a keyboard-shaped grid of three
//! rows; in dual mode the Latin and Cyrillic symbols printed on the same
//! physical key share one lane.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Deserialize};

use crate::config::Playfield;

/// Latin rows (QWERTY), top to bottom.
pub const LATIN_ROWS: [&str; 3] = ["QWERTYUIOP", "ASDFGHJKL", "ZXCVBNM"];

/// Cyrillic rows (ЙЦУКЕН), top to bottom.
pub const CYRILLIC_ROWS: [&str; 3] = ["ЙЦУКЕНГШЩЗХЪ", "ФЫВАПРОЛДЖЭ", "ЯЧСМИТЬБЮ"];

/// Order in which rows are unlocked as the key count grows: home row, top, bottom.
pub const ROW_INTRO_ORDER: [usize; 3] = [1, 0, 2];

/// Number of lane rows.
pub const ROW_COUNT: usize = 3;

// =============================================================================
// SCRIPTS AND MODES
// =============================================================================

/// Alphabet printed on the keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Script {
    /// QWERTY letters
    Latin = 0,
    /// ЙЦУКЕН letters
    Cyrillic = 1,
}

impl Script {
    /// Rows of this script, top to bottom.
    pub fn rows(self) -> &'static [&'static str; 3] {
        match self {
            Script::Latin => &LATIN_ROWS,
            Script::Cyrillic => &CYRILLIC_ROWS,
        }
    }

    /// Symbol at a grid position, if the script has a key there.
    pub fn symbol_at(self, row: usize, column: usize) -> Option<char> {
        self.rows().get(row)?.chars().nth(column)
    }

    /// Number of keys in a row.
    pub fn row_len(self, row: usize) -> usize {
        self.rows().get(row).map_or(0, |r| r.chars().count())
    }
}

/// Which alphabet(s) the player practices.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum LayoutMode {
    /// Latin only
    #[default]
    Latin = 0,
    /// Cyrillic only
    Cyrillic = 1,
    /// Both alphabets on shared lanes
    Dual = 2,
}

impl LayoutMode {
    /// All modes in cycle order.
    pub const ALL: [LayoutMode; 3] = [LayoutMode::Latin, LayoutMode::Cyrillic, LayoutMode::Dual];

    /// Scripts this mode spawns, in interleave order.
    pub fn scripts(self) -> &'static [Script] {
        match self {
            LayoutMode::Latin => &[Script::Latin],
            LayoutMode::Cyrillic => &[Script::Cyrillic],
            LayoutMode::Dual => &[Script::Latin, Script::Cyrillic],
        }
    }

    /// Next mode for the cycle binding.
    pub fn next(self) -> LayoutMode {
        match self {
            LayoutMode::Latin => LayoutMode::Cyrillic,
            LayoutMode::Cyrillic => LayoutMode::Dual,
            LayoutMode::Dual => LayoutMode::Latin,
        }
    }

    /// Canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            LayoutMode::Latin => "latin",
            LayoutMode::Cyrillic => "cyrillic",
            LayoutMode::Dual => "dual",
        }
    }

    /// Lanes in a row of this mode's grid.
    pub fn row_len(self, row: usize) -> usize {
        self.scripts().iter().map(|s| s.row_len(row)).max().unwrap_or(0)
    }

    /// Total number of lanes in this mode's grid.
    pub fn lane_count(self) -> usize {
        (0..ROW_COUNT).map(|row| self.row_len(row)).sum()
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown layout mode name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown layout mode: {0:?}")]
pub struct ParseLayoutError(pub String);

impl FromStr for LayoutMode {
    type Err = ParseLayoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "latin" | "en" => Ok(LayoutMode::Latin),
            "cyrillic" | "ru" => Ok(LayoutMode::Cyrillic),
            "dual" | "mixed" => Ok(LayoutMode::Dual),
            _ => Err(ParseLayoutError(s.to_string())),
        }
    }
}

// =============================================================================
// LANES
// =============================================================================

/// Position of a lane.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lane {
    /// Horizontal centre
    pub x: f32,
    /// Row index (0 = top)
    pub row: usize,
    /// Column within the row
    pub column: usize,
}

/// Visual key for the rendering side.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Row-major index in the grid
    pub index: usize,
    /// Lane position
    pub lane: Lane,
    /// Printed label, e.g. `"Q"` or `"Q/Й"`
    pub label: String,
    /// Whether notes can currently spawn on this key
    pub active: bool,
}

/// Grid positions in unlock order for a mode.
pub fn intro_positions(mode: LayoutMode) -> impl Iterator<Item = (usize, usize)> {
    ROW_INTRO_ORDER
        .into_iter()
        .flat_map(move |row| (0..mode.row_len(row)).map(move |column| (row, column)))
}

/// Spawnable symbols for a mode and active key count.
///
/// Scripts are interleaved per position, so dual mode splits spawn
/// probability evenly between alphabets on shared lanes.
pub fn active_letters(mode: LayoutMode, key_count: usize) -> Vec<char> {
    intro_positions(mode)
        .take(key_count)
        .flat_map(|(row, column)| {
            mode.scripts()
                .iter()
                .filter_map(move |script| script.symbol_at(row, column))
        })
        .collect()
}

/// Lane assignment for one `(mode, key count)` configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct LaneLayout {
    mode: LayoutMode,
    lanes: BTreeMap<char, Lane>,
    keys: Vec<KeyDescriptor>,
    active_keys: usize,
}

impl LaneLayout {
    /// Compute the layout. Same inputs always give the same layout.
    pub fn compute(mode: LayoutMode, key_count: usize, field: &Playfield) -> Self {
        let active: Vec<(usize, usize)> = intro_positions(mode).take(key_count).collect();
        let reference_len = mode.row_len(0).max(1) as f32;

        let mut lanes = BTreeMap::new();
        let mut keys = Vec::with_capacity(mode.lane_count());

        for row in 0..ROW_COUNT {
            let len = mode.row_len(row);
            if len == 0 {
                continue;
            }
            let row_width = field.usable_width() * (len as f32 / reference_len);
            let start_x = (field.width - row_width) / 2.0;
            let gap = row_width / len as f32;

            for column in 0..len {
                let lane = Lane {
                    x: start_x + column as f32 * gap + gap / 2.0,
                    row,
                    column,
                };
                let symbols: Vec<char> = mode
                    .scripts()
                    .iter()
                    .filter_map(|script| script.symbol_at(row, column))
                    .collect();
                for symbol in &symbols {
                    lanes.insert(*symbol, lane);
                }
                keys.push(KeyDescriptor {
                    index: keys.len(),
                    lane,
                    label: symbols
                        .iter()
                        .map(char::to_string)
                        .collect::<Vec<_>>()
                        .join("/"),
                    active: active.contains(&(row, column)),
                });
            }
        }

        Self {
            mode,
            lanes,
            keys,
            active_keys: active.len(),
        }
    }

    /// Lane for a symbol, if the symbol belongs to this layout.
    pub fn lane(&self, symbol: char) -> Option<&Lane> {
        self.lanes.get(&symbol)
    }

    /// Visual keys, row-major.
    pub fn keys(&self) -> &[KeyDescriptor] {
        &self.keys
    }

    /// Mode this layout was computed for.
    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Number of active key positions.
    pub fn active_key_count(&self) -> usize {
        self.active_keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("latin".parse::<LayoutMode>(), Ok(LayoutMode::Latin));
        assert_eq!(" RU ".parse::<LayoutMode>(), Ok(LayoutMode::Cyrillic));
        assert_eq!("Dual".parse::<LayoutMode>(), Ok(LayoutMode::Dual));
        assert_eq!(
            "invalid".parse::<LayoutMode>(),
            Err(ParseLayoutError("invalid".to_string()))
        );
    }

    #[test]
    fn test_mode_cycle_visits_all() {
        let mut mode = LayoutMode::Latin;
        for expected in LayoutMode::ALL.iter().cycle().skip(1).take(3) {
            mode = mode.next();
            assert_eq!(mode, *expected);
        }
    }

    #[test]
    fn test_lane_counts() {
        assert_eq!(LayoutMode::Latin.lane_count(), 26);
        assert_eq!(LayoutMode::Cyrillic.lane_count(), 32);
        assert_eq!(LayoutMode::Dual.lane_count(), 32);
    }

    #[test]
    fn test_latin_lane_positions() {
        let layout = LaneLayout::compute(LayoutMode::Latin, 4, &Playfield::default());

        // Top row spans the usable width: 880 / 10 lanes, starting at 60
        let q = layout.lane('Q').unwrap();
        assert_eq!(q.row, 0);
        assert!((q.x - 104.0).abs() < 1e-3);
        let p = layout.lane('P').unwrap();
        assert!((p.x - 896.0).abs() < 1e-3);

        // Shorter rows are centred with the same gap
        let a = layout.lane('A').unwrap();
        assert_eq!(a.row, 1);
        assert!((a.x - 148.0).abs() < 1e-3);

        assert!(layout.lane('Й').is_none());
    }

    #[test]
    fn test_dual_lanes_are_shared() {
        let layout = LaneLayout::compute(LayoutMode::Dual, 32, &Playfield::default());

        assert_eq!(layout.lane('Q'), layout.lane('Й'));
        assert_eq!(layout.lane('A'), layout.lane('Ф'));
        assert_eq!(layout.lane('M'), layout.lane('Ь'));
        assert_ne!(layout.lane('Q'), layout.lane('W'));

        assert_eq!(layout.keys().len(), 32);
        assert_eq!(layout.keys()[0].label, "Q/Й");
        assert_eq!(layout.keys()[10].label, "Х");
    }

    #[test]
    fn test_active_letters_latin_start_on_home_row() {
        assert_eq!(active_letters(LayoutMode::Latin, 4), vec!['A', 'S', 'D', 'F']);
        assert_eq!(active_letters(LayoutMode::Latin, 11), "ASDFGHJKLQW".chars().collect::<Vec<_>>());
    }

    #[test]
    fn test_active_letters_capped_by_grid() {
        assert_eq!(active_letters(LayoutMode::Latin, 32).len(), 26);
        assert_eq!(active_letters(LayoutMode::Cyrillic, 32).len(), 32);
        assert!(active_letters(LayoutMode::Latin, 0).is_empty());
    }

    #[test]
    fn test_active_letters_dual_interleaves() {
        assert_eq!(
            active_letters(LayoutMode::Dual, 3),
            vec!['A', 'Ф', 'S', 'Ы', 'D', 'В']
        );
        // Home row position 10 only exists in Cyrillic
        let dual = active_letters(LayoutMode::Dual, 10);
        assert_eq!(dual.len(), 19);
        assert_eq!(*dual.last().unwrap(), 'Ж');
    }

    #[test]
    fn test_active_flags_match_count() {
        let layout = LaneLayout::compute(LayoutMode::Cyrillic, 6, &Playfield::default());
        let active: Vec<&str> = layout
            .keys()
            .iter()
            .filter(|k| k.active)
            .map(|k| k.label.as_str())
            .collect();
        assert_eq!(active, vec!["Ф", "Ы", "В", "А", "П", "Р"]);
        assert_eq!(layout.active_key_count(), 6);
    }

    #[test]
    fn test_compute_is_idempotent() {
        let field = Playfield::default();
        let a = LaneLayout::compute(LayoutMode::Dual, 12, &field);
        let b = LaneLayout::compute(LayoutMode::Dual, 12, &field);
        assert_eq!(a, b);
    }
}
