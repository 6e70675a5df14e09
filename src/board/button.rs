//! Button definitions and ladder calibration for the 5-key nav pad.
//!
//! All five keys share one ADC input through a resistor ladder; each
//! key pulls the node to a distinct voltage. The levels below are
//! measured averaged readings in millivolts, ascending, with the
//! open-circuit rest level last.

use smol_keypad::ladder::Ladder;

/// All physical keys on the pad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Up,
    Down,
    Right,
    Action,
}

impl Button {
    pub const fn name(self) -> &'static str {
        match self {
            Button::Left => "Left",
            Button::Up => "Up",
            Button::Down => "Down",
            Button::Right => "Right",
            Button::Action => "Action",
        }
    }
}

impl core::fmt::Display for Button {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Averaged pad reading per key (mV), ascending; last entry is the
/// no-press rest level. The decoder derives its noise margin from the
/// gaps, so re-measuring a board only means editing this table.
pub const PAD_LEVELS: [i32; 6] = [8, 372, 846, 1311, 1924, 2438];

// Key order matches PAD_LEVELS.
const PAD_KEYS: [Button; 5] = [
    Button::Left,
    Button::Up,
    Button::Down,
    Button::Right,
    Button::Action,
];

/// Hold threshold: a press outlasting this many ms reports Hold
/// instead of Click.
pub const HOLD_MS: u32 = 600;

/// Decoder key index -> semantic button.
pub fn key_button(index: u8) -> Option<Button> {
    PAD_KEYS.get(index as usize).copied()
}

/// The pad's calibration table, margin derived.
pub fn pad_ladder() -> Ladder<'static> {
    Ladder::new(&PAD_LEVELS)
}
