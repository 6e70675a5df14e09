// Debounced input from the pad's ADC ladder
//
// One analog channel, one key at a time (hardware property of the
// ladder). The smol-keypad decoder does the smoothing, classification
// and click/hold timing; this driver owns the ADC, implements the
// decoder's hardware trait, and re-shapes decoder events into
// per-button firmware events.

use esp_hal::time::Instant;
use smol_keypad::keypad::{KeyEvent, KeyState, Keypad, KeypadHw};

use crate::board::button::{self, Button, HOLD_MS};
use crate::board::pins::PAD_ADC;
use crate::board::InputHw;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Press(Button),
    Release(Button),
    Click(Button),
    Hold(Button),
}

// Up to three events can land in one poll: a direct key-to-key
// rollover closes the old key with Release (+Click) before the new
// key's Press.
struct EventQueue {
    buf: [Option<Event>; 3],
}

impl EventQueue {
    const fn new() -> Self {
        Self { buf: [None; 3] }
    }

    fn push(&mut self, ev: Event) {
        for slot in self.buf.iter_mut() {
            if slot.is_none() {
                *slot = Some(ev);
                return;
            }
        }
        // NOTE: all slots full means the decoder emitted more than it
        // can per poll; silently dropping is safer than panic.
    }

    fn pop(&mut self) -> Option<Event> {
        for slot in self.buf.iter_mut() {
            if let Some(ev) = slot.take() {
                return Some(ev);
            }
        }
        None
    }

    fn is_empty(&self) -> bool {
        self.buf.iter().all(|s| s.is_none())
    }
}

impl KeypadHw for InputHw {
    fn read_analog(&mut self, channel: u8) -> i32 {
        debug_assert_eq!(channel, PAD_ADC);
        let mv: u16 = nb::block!(self.adc.read_oneshot(&mut self.pad)).unwrap();
        mv as i32
    }

    fn now_millis(&mut self) -> u32 {
        // the decoder's time deltas are wrapping u32 subtractions, so
        // truncating the 64-bit uptime loses nothing
        Instant::now().duration_since_epoch().as_millis() as u32
    }
}

pub struct InputDriver {
    hw: InputHw,
    pad: Keypad<'static>,
    queue: EventQueue,
}

impl InputDriver {
    pub fn new(hw: InputHw) -> Self {
        Self {
            hw,
            pad: Keypad::new(PAD_ADC, button::pad_ladder(), HOLD_MS),
            queue: EventQueue::new(),
        }
    }

    /// Poll for the next input event.
    ///
    /// Drains events queued by an earlier poll first; otherwise takes
    /// one ADC sample and queues whatever the decoder emits for it.
    pub fn poll(&mut self) -> Option<Event> {
        if !self.queue.is_empty() {
            return self.queue.pop();
        }

        let Self { hw, pad, queue } = self;
        pad.poll(hw, |ev| {
            if let Some(ev) = translate(ev) {
                queue.push(ev);
            }
        });
        queue.pop()
    }

    /// True while a press or release is still travelling through the
    /// decoder's smoothing window.
    pub fn is_settling(&self) -> bool {
        self.pad.is_settling()
    }
}

fn translate(ev: KeyEvent) -> Option<Event> {
    let button = button::key_button(ev.key)?;
    match ev.state {
        KeyState::Down => Some(Event::Press(button)),
        KeyState::Up => Some(Event::Release(button)),
        KeyState::Click => Some(Event::Click(button)),
        KeyState::Hold => Some(Event::Hold(button)),
        // declared by the decoder, reserved, never emitted
        KeyState::DoubleClick => None,
    }
}
