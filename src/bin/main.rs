// ladderpad entry point
//
// Boot sequence: logger -> esp-rtos on TIMG0 -> board/ADC -> executor.
// Two tasks: input_task polls the ladder decoder on an adaptive
// ticker; event_task drains the channel and reports on the console.

#![no_std]
#![no_main]

use esp_backtrace as _;
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use log::info;
use static_cell::StaticCell;

use ladderpad::board::Board;
use ladderpad::drivers::input::{Event, InputDriver};
use ladderpad::kernel::tasks::{INPUT_EVENTS, input_task};

esp_bootloader_esp_idf::esp_app_desc!();

static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

#[esp_hal::main]
fn main() -> ! {
    esp_println::logger::init_logger_from_env();
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    info!("booting...");

    let timg0 = TimerGroup::new(unsafe { peripherals.TIMG0.clone_unchecked() });
    esp_rtos::start(timg0.timer0);

    let board = Board::init(peripherals);
    let input = InputDriver::new(board.input);
    info!("hardware initialized.");

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(move |spawner| {
        spawner.must_spawn(input_task(input));
        spawner.must_spawn(event_task());
    })
}

/// Drains debounced pad events and reports them. A real application
/// hangs its dispatch off this channel; for bring-up the console log
/// is the application.
#[embassy_executor::task]
async fn event_task() -> ! {
    loop {
        match INPUT_EVENTS.receive().await {
            Event::Press(button) => info!("press: {}", button),
            Event::Release(button) => info!("release: {}", button),
            Event::Click(button) => info!("click: {}", button),
            Event::Hold(button) => info!("hold: {}", button),
        }
    }
}
