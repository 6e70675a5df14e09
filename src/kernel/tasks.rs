// Embassy tasks — input polling and event fan-out
//
// `input_task` owns the InputDriver (and therefore the ADC). It polls
// on a Ticker whose period follows the AdaptivePoller tier and
// publishes debounced events through INPUT_EVENTS. Consumers receive
// from the channel; they never touch the hardware.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Ticker};
use log::info;

use crate::drivers::input::{Event, InputDriver};
use crate::kernel::poll::AdaptivePoller;

/// Capacity of the input event channel.
///
/// Generous: at the fast 10ms cadence the consumer drains every event
/// long before eight can accumulate.
pub const INPUT_CHANNEL_CAP: usize = 8;

/// Debounced input events, input task -> consumer.
pub static INPUT_EVENTS: Channel<CriticalSectionRawMutex, Event, INPUT_CHANNEL_CAP> =
    Channel::new();

/// The input polling task.
///
/// Polls the ladder decoder at the adaptive cadence. The tier stays
/// fast while events arrive or a transition is still settling in the
/// smoothing window, and decays toward slow polling when the pad has
/// been idle for a while.
#[embassy_executor::task]
pub async fn input_task(mut input: InputDriver) -> ! {
    let mut poller = AdaptivePoller::new();
    let mut ticker = Ticker::every(Duration::from_millis(poller.rate().interval_ms()));

    loop {
        ticker.next().await;

        let event = input.poll();
        if let Some(ev) = event {
            // try_send: drop on overflow rather than stall the ticker;
            // in practice the consumer drains faster than the pad can
            // produce.
            let _ = INPUT_EVENTS.try_send(ev);
        }

        let active = event.is_some() || input.is_settling();
        let changed = if active {
            poller.on_activity()
        } else {
            poller.on_idle()
        };
        if changed {
            info!("input poll: {}", poller.rate());
            ticker = Ticker::every(Duration::from_millis(poller.rate().interval_ms()));
        }
    }
}
