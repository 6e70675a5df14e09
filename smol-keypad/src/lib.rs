// smol-keypad: minimal no_std decoder for resistor-ladder analog keypads.
// ladder: calibration levels, derived noise margin, value classification
// filter: fixed-window running average over raw ADC samples
// keypad: jitter-gated state machine emitting Up/Down/Click/Hold events

#![no_std]

#[cfg(test)]
extern crate std;

pub mod filter;
pub mod keypad;
pub mod ladder;
