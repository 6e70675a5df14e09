//! Jitter-gated keypad state machine.
//!
//! One `poll` per loop iteration: take a sample, fold it into the
//! running average, classify, and compare against the resting state.
//! Transitions are only accepted once the raw sample agrees with the
//! average (the signal has settled) and the average has moved past the
//! noise margin since the last accepted transition. A held key does
//! not re-trigger, and a ladder mid-swing never classifies.
//!
//! Timing (click/hold) is measured against a wrapping `u32` millisecond
//! clock; subtraction stays correct across counter wraparound.

use crate::filter::RunningAverage;
use crate::ladder::Ladder;

/// Default minimum press duration for a Click, in ms. Presses shorter
/// than this are treated as contact bounce and release silently.
pub const DEFAULT_CLICK_MS: u32 = 33;

// A reading counts as settled when the raw sample is within this
// distance of the window average.
const SETTLE_DELTA: i32 = 2;

/// Hardware the decoder polls: one analog channel and a millisecond
/// counter. The channel id is opaque; it only has to mean something to
/// the implementation.
pub trait KeypadHw {
    /// One raw analog sample from the given channel.
    fn read_analog(&mut self, channel: u8) -> i32;

    /// Monotonic milliseconds, wrapping at `u32::MAX`.
    fn now_millis(&mut self) -> u32;
}

/// Key interaction states carried by [`KeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Up,
    Down,
    Click,
    DoubleClick, // not implemented yet
    Hold,
}

/// One notification from the decoder: which key, what happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// Key index into the calibration table (rest entry excluded).
    pub key: u8,
    pub state: KeyState,
}

// Resting interaction state. Click is notification-only and never
// rests; a key is either down (hold timer armed) or already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Down { key: u8, since: u32 },
    Held { key: u8 },
}

impl Phase {
    fn key(self) -> Option<u8> {
        match self {
            Phase::Idle => None,
            Phase::Down { key, .. } | Phase::Held { key } => Some(key),
        }
    }
}

/// Decoder for one resistor-ladder channel.
///
/// Construct with the channel id, a [`Ladder`] (caller-owned levels)
/// and the hold threshold; the click threshold defaults to
/// [`DEFAULT_CLICK_MS`]. Call [`Keypad::poll`] at a steady cadence from
/// one loop. The decoder is synchronous and keeps all state inline, so
/// it must not be polled concurrently and the notification closure must
/// not re-enter it.
pub struct Keypad<'a> {
    channel: u8,
    ladder: Ladder<'a>,
    hold_ms: u32,
    click_ms: u32,
    window: RunningAverage,
    phase: Phase,
    // average at the last accepted transition; movement past the noise
    // margin relative to this is required before the next one
    last_accepted: i32,
    settling: bool,
}

impl<'a> Keypad<'a> {
    pub fn new(channel: u8, ladder: Ladder<'a>, hold_ms: u32) -> Self {
        Self {
            channel,
            hold_ms,
            click_ms: DEFAULT_CLICK_MS,
            window: RunningAverage::new(ladder.rest()),
            phase: Phase::Idle,
            last_accepted: ladder.rest(),
            settling: false,
            ladder,
        }
    }

    /// Override the minimum press duration for a Click.
    pub fn with_click_time(mut self, click_ms: u32) -> Self {
        self.click_ms = click_ms;
        self
    }

    /// Replace the calibration table (margin comes re-derived with the
    /// new [`Ladder`]). Re-primes the window to the new rest level and
    /// drops any in-flight interaction, so a stale average can't fire a
    /// phantom transition against the new bands.
    pub fn set_ladder(&mut self, ladder: Ladder<'a>) {
        self.window = RunningAverage::new(ladder.rest());
        self.last_accepted = ladder.rest();
        self.phase = Phase::Idle;
        self.settling = false;
        self.ladder = ladder;
    }

    /// The key currently pressed or held, if any.
    pub fn active_key(&self) -> Option<u8> {
        self.phase.key()
    }

    /// True while the last poll was suppressed because the raw sample
    /// still disagreed with the average: a press or release is in
    /// flight through the window. Callers can use this to keep a fast
    /// poll cadence until the signal lands.
    pub fn is_settling(&self) -> bool {
        self.settling
    }

    /// Take one sample and advance the state machine.
    ///
    /// Emits zero or more notifications through `notify`, synchronously,
    /// before returning. Per poll the order is Up, then Click, then
    /// Down; Hold only ever fires alone. A direct key-to-key rollover
    /// closes out the old key (Up, and Click if it was a quick press)
    /// before the new key's Down.
    pub fn poll<H: KeypadHw>(&mut self, hw: &mut H, mut notify: impl FnMut(KeyEvent)) {
        let now = hw.now_millis();
        let sample = hw.read_analog(self.channel);

        let average = self.window.update(sample);
        let key = self.ladder.classify(average);
        let jitter = (sample - average).abs();

        self.settling = jitter >= SETTLE_DELTA;

        let settled = jitter < SETTLE_DELTA;
        let moved = (self.last_accepted - average).abs() > self.ladder.margin();

        if settled && moved && key != self.phase.key() {
            self.last_accepted = average;

            // close out whatever was previously active
            match self.phase {
                Phase::Down { key: prev, since } => {
                    notify(KeyEvent {
                        key: prev,
                        state: KeyState::Up,
                    });
                    // bounce filter: only presses that outlasted the
                    // click time count as a click; hold and click are
                    // mutually exclusive
                    if now.wrapping_sub(since) > self.click_ms {
                        notify(KeyEvent {
                            key: prev,
                            state: KeyState::Click,
                        });
                    }
                }
                Phase::Held { key: prev } => {
                    notify(KeyEvent {
                        key: prev,
                        state: KeyState::Up,
                    });
                }
                Phase::Idle => {}
            }

            self.phase = match key {
                Some(key) => {
                    log::debug!("keypad: key {} down (avg {})", key, average);
                    notify(KeyEvent {
                        key,
                        state: KeyState::Down,
                    });
                    Phase::Down { key, since: now }
                }
                None => {
                    log::debug!("keypad: idle (avg {})", average);
                    Phase::Idle
                }
            };
        } else if let Phase::Down { key, since } = self.phase {
            // no accepted change: run the hold timer
            if now.wrapping_sub(since) > self.hold_ms {
                self.phase = Phase::Held { key };
                notify(KeyEvent {
                    key,
                    state: KeyState::Hold,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scripted stand-in for the ADC + clock: returns queued samples
    // (repeating the last one when the script runs out) and advances
    // the clock by a fixed step on every poll.
    struct ScriptHw {
        samples: std::vec::Vec<i32>,
        pos: usize,
        now: u32,
        step: u32,
    }

    impl ScriptHw {
        fn new(step: u32) -> Self {
            Self {
                samples: std::vec::Vec::new(),
                pos: 0,
                now: 0,
                step,
            }
        }

        fn feed(&mut self, sample: i32, polls: usize) -> &mut Self {
            for _ in 0..polls {
                self.samples.push(sample);
            }
            self
        }
    }

    impl KeypadHw for ScriptHw {
        fn read_analog(&mut self, _channel: u8) -> i32 {
            let index = self.pos.min(self.samples.len() - 1);
            self.pos += 1;
            self.samples[index]
        }

        fn now_millis(&mut self) -> u32 {
            self.now = self.now.wrapping_add(self.step);
            self.now
        }
    }

    const LEVELS: [i32; 3] = [100, 300, 500];

    fn pad(hold_ms: u32) -> Keypad<'static> {
        Keypad::new(0, Ladder::new(&LEVELS), hold_ms)
    }

    fn run(pad: &mut Keypad<'_>, hw: &mut ScriptHw, polls: usize) -> std::vec::Vec<KeyEvent> {
        let mut events = std::vec::Vec::new();
        for _ in 0..polls {
            pad.poll(hw, |ev| events.push(ev));
        }
        events
    }

    fn ev(key: u8, state: KeyState) -> KeyEvent {
        KeyEvent { key, state }
    }

    #[test]
    fn steady_rest_emits_nothing() {
        let mut pad = pad(600);
        let mut hw = ScriptHw::new(10);
        hw.feed(500, 50);
        assert_eq!(run(&mut pad, &mut hw, 50), std::vec![]);
    }

    #[test]
    fn rest_noise_within_margin_emits_nothing() {
        let mut pad = pad(600);
        let mut hw = ScriptHw::new(10);
        for _ in 0..25 {
            hw.feed(499, 1).feed(501, 1);
        }
        assert_eq!(run(&mut pad, &mut hw, 50), std::vec![]);
    }

    #[test]
    fn press_emits_one_down_once_the_window_settles() {
        let mut pad = pad(600);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 5);
        // the averaged value walks 420, 340, 260, 180, 100; jitter
        // blocks the first four polls, the fifth lands
        assert_eq!(run(&mut pad, &mut hw, 5), std::vec![ev(0, KeyState::Down)]);
    }

    #[test]
    fn held_samples_do_not_retrigger_down() {
        let mut pad = pad(100_000);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 40);
        let events = run(&mut pad, &mut hw, 40);
        assert_eq!(events, std::vec![ev(0, KeyState::Down)]);
        assert_eq!(pad.active_key(), Some(0));
    }

    #[test]
    fn press_noise_within_margin_does_not_release() {
        let mut pad = pad(100_000);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 5);
        for _ in 0..10 {
            hw.feed(99, 1).feed(101, 1);
        }
        let events = run(&mut pad, &mut hw, 25);
        assert_eq!(events, std::vec![ev(0, KeyState::Down)]);
    }

    #[test]
    fn quick_press_clicks_on_release() {
        // 10ms polls: down accepted at t=50, up accepted at t=100,
        // press lasted 50ms > 33ms click time
        let mut pad = pad(100_000);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 5).feed(500, 5);
        assert_eq!(
            run(&mut pad, &mut hw, 10),
            std::vec![
                ev(0, KeyState::Down),
                ev(0, KeyState::Up),
                ev(0, KeyState::Click)
            ]
        );
    }

    #[test]
    fn bounce_shorter_than_click_time_releases_silently() {
        // 3ms polls: down at t=15, up at t=30; 15ms of press is under
        // the 33ms click floor, so no Click fires
        let mut pad = pad(100_000);
        let mut hw = ScriptHw::new(3);
        hw.feed(100, 5).feed(500, 5);
        assert_eq!(
            run(&mut pad, &mut hw, 10),
            std::vec![ev(0, KeyState::Down), ev(0, KeyState::Up)]
        );
    }

    #[test]
    fn custom_click_floor_applies() {
        // 50ms of press is over the default floor but under a raised one
        let mut pad = pad(100_000).with_click_time(100);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 5).feed(500, 5);
        assert_eq!(
            run(&mut pad, &mut hw, 10),
            std::vec![ev(0, KeyState::Down), ev(0, KeyState::Up)]
        );
    }

    #[test]
    fn hold_fires_exactly_once() {
        // down accepted at t=50; hold threshold 120ms trips strictly
        // after t=170, i.e. on the 18th poll, and never again
        let mut pad = pad(120);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 40);
        let events = run(&mut pad, &mut hw, 40);
        assert_eq!(
            events,
            std::vec![ev(0, KeyState::Down), ev(0, KeyState::Hold)]
        );
    }

    #[test]
    fn release_after_hold_suppresses_click() {
        let mut pad = pad(120);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 20).feed(500, 5);
        assert_eq!(
            run(&mut pad, &mut hw, 25),
            std::vec![
                ev(0, KeyState::Down),
                ev(0, KeyState::Hold),
                ev(0, KeyState::Up)
            ]
        );
    }

    #[test]
    fn rollover_closes_the_old_key_before_the_new_down() {
        let mut pad = pad(100_000);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 5).feed(300, 5);
        assert_eq!(
            run(&mut pad, &mut hw, 10),
            std::vec![
                ev(0, KeyState::Down),
                ev(0, KeyState::Up),
                ev(0, KeyState::Click),
                ev(1, KeyState::Down)
            ]
        );
    }

    #[test]
    fn hold_timing_survives_clock_wraparound() {
        let mut pad = pad(120);
        let mut hw = ScriptHw::new(10);
        // the press lands just before the counter wraps; the hold
        // threshold trips on the far side of zero
        hw.now = u32::MAX - 60;
        hw.feed(100, 40);
        let events = run(&mut pad, &mut hw, 40);
        assert_eq!(
            events,
            std::vec![ev(0, KeyState::Down), ev(0, KeyState::Hold)]
        );
    }

    #[test]
    fn settling_is_reported_during_a_transition() {
        let mut pad = pad(600);
        let mut hw = ScriptHw::new(10);
        hw.feed(500, 2).feed(100, 5);
        let _ = run(&mut pad, &mut hw, 3);
        // first 100-sample poll: average way above the raw sample
        assert!(pad.is_settling());
        let _ = run(&mut pad, &mut hw, 4);
        assert!(!pad.is_settling());
    }

    #[test]
    fn set_ladder_resets_the_interaction() {
        let mut pad = pad(600);
        let mut hw = ScriptHw::new(10);
        hw.feed(100, 5);
        assert_eq!(run(&mut pad, &mut hw, 5), std::vec![ev(0, KeyState::Down)]);

        const WIDE: [i32; 4] = [150, 450, 750, 1020];
        pad.set_ladder(Ladder::new(&WIDE));
        assert_eq!(pad.active_key(), None);

        // window is re-primed to the new rest level: holding there is
        // silent, and a press classifies against the new bands
        let mut hw = ScriptHw::new(10);
        hw.feed(1020, 5).feed(450, 5);
        assert_eq!(
            run(&mut pad, &mut hw, 10),
            std::vec![ev(1, KeyState::Down)]
        );
    }
}
