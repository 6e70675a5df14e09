//! GPIO |    Function    |      Notes
//! -----+----------------+------------------------------------------
//!  2   | ADC1 - Pad     | Resistance ladder: Left/Up/Down/Right/Action
//! 20   | UART0 RX       | Console / log output
//! 21   | UART0 TX       | Console / log output

// ----- Keypad (ADC) -----
pub const PAD_ADC: u8 = 2; // GPIO2, ADC1 channel 2
