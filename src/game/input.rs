//! Input Events and Normalization
//!
//! Inputs arrive already translated from key codes. Symbols are upper-cased
//! here so every later comparison is exact.

use serde::{Serialize, Deserialize};

/// Upper-case a pressed symbol.
///
/// Symbols whose upper-case form is more than one character are kept as is.
pub fn normalize_symbol(symbol: char) -> char {
    let mut upper = symbol.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(c), None) => c,
        _ => symbol,
    }
}

/// One discrete input from the driving loop.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Leave the intro and start playing
    Start,
    /// Stop the session
    Quit,
    /// Letter key pressed
    KeyPress(char),
    /// Difficulty selection (clamped to the valid range)
    SelectLevel(i64),
    /// Layout selection by name (unknown names are ignored)
    SelectLayout(String),
    /// Switch to the next layout mode
    CycleLayout,
}

impl InputEvent {
    /// Key press with a normalized symbol.
    pub fn key(symbol: char) -> Self {
        InputEvent::KeyPress(normalize_symbol(symbol))
    }
}

/// Inputs and elapsed time of one loop iteration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Seconds since the previous iteration
    pub elapsed: f32,
    /// Inputs in arrival order
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    /// Frame with inputs.
    pub fn with_events(elapsed: f32, events: Vec<InputEvent>) -> Self {
        Self { elapsed, events }
    }
}
