// Adaptive input polling cadence
//
// The decoder wants a steady fast cadence while anything is moving;
// once the pad has been idle for a while the poll ticker slows down to
// save power. Any activity (an event, or a ladder transition still
// settling in the smoothing window) snaps straight back to fast.

use core::fmt;

/// Input poll cadence tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PollRate {
    #[default]
    Fast,
    Normal,
    Slow,
}

impl PollRate {
    /// Poll interval at this tier, in milliseconds.
    pub const fn interval_ms(self) -> u64 {
        match self {
            PollRate::Fast => 10,
            PollRate::Normal => 50,
            PollRate::Slow => 100,
        }
    }
}

impl fmt::Display for PollRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PollRate::Fast => write!(f, "Fast({}ms)", self.interval_ms()),
            PollRate::Normal => write!(f, "Normal({}ms)", self.interval_ms()),
            PollRate::Slow => write!(f, "Slow({}ms)", self.interval_ms()),
        }
    }
}

// Consecutive idle polls before decaying one tier.
const FAST_IDLE_POLLS: u32 = 200; // 200 × 10ms = 2s
const NORMAL_IDLE_POLLS: u32 = 100; // 100 × 50ms = 5s

/// Tracks pad activity and picks the polling tier.
pub struct AdaptivePoller {
    rate: PollRate,
    idle_polls: u32,
}

impl AdaptivePoller {
    pub const fn new() -> Self {
        Self {
            rate: PollRate::Fast,
            idle_polls: 0,
        }
    }

    pub fn rate(&self) -> PollRate {
        self.rate
    }

    /// Note an active poll. Returns true when the tier changed.
    pub fn on_activity(&mut self) -> bool {
        self.idle_polls = 0;
        if self.rate != PollRate::Fast {
            self.rate = PollRate::Fast;
            return true;
        }
        false
    }

    /// Note an idle poll, decaying the tier after enough of them.
    /// Returns true when the tier changed.
    pub fn on_idle(&mut self) -> bool {
        self.idle_polls = self.idle_polls.saturating_add(1);
        match self.rate {
            PollRate::Fast if self.idle_polls >= FAST_IDLE_POLLS => {
                self.rate = PollRate::Normal;
                self.idle_polls = 0;
                true
            }
            PollRate::Normal if self.idle_polls >= NORMAL_IDLE_POLLS => {
                self.rate = PollRate::Slow;
                self.idle_polls = 0;
                true
            }
            _ => false,
        }
    }
}

impl Default for AdaptivePoller {
    fn default() -> Self {
        Self::new()
    }
}
