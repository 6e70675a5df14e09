// Polling cadence control and the embassy tasks that run it.

pub mod poll;
pub mod tasks;

pub use poll::{AdaptivePoller, PollRate};
