// Firmware for an analog resistor-ladder keypad (ESP32-C3)

#![no_std]

pub mod board;
pub mod drivers;
pub mod kernel;
