#![no_std]
#![no_main]

// Panic handler and debugging
use defmt::unwrap;

use defmt_rtt as _;
use panic_probe as _;

// Device
use embassy_executor::Spawner;
use embassy_nrf::{
    bind_interrupts,
    gpio::{Input, Level, Output, OutputDrive, Pull},
    peripherals::SPI2,
    spim,
};
use embassy_sync::{blocking_mutex::raw::ThreadModeRawMutex, channel::Channel};
use embassy_time::{Duration, Timer};

bind_interrupts!(struct Irqs {
    SPIM2_SPIS2_SPI2 => spim::InterruptHandler<SPI2>;
});

// Crate
use watchface_water::{
    config::{WatchFaceConfig, DEFAULT_UTC_OFFSET_SECS, TIME_TICK_RATE_MS},
    host::{watchface::WatchFaceHost, HostEvent, EVENT_QUEUE_DEPTH},
    peripherals::{
        backlight::{Backlight, INTERACTIVE_BRIGHTNESS},
        button::Button,
        display::Display,
    },
    refresher::{aligned_delay_ms, RefreshMode},
    system::{
        config::SystemConfig,
        time::{ClockSource, TimeManager, TimeReference},
    },
};

// Others
use chrono::FixedOffset;

// Include build time UTC epoch
include!(concat!(env!("OUT_DIR"), "/utc.rs"));

// Lifecycle events for the watch face
static EVENTS: Channel<ThreadModeRawMutex, HostEvent, EVENT_QUEUE_DEPTH> = Channel::new();

/// Draw the watch face until it is destroyed.
#[embassy_executor::task(pool_size = 1)]
async fn watch_face(mut host: WatchFaceHost<TimeManager, Display<SPI2>>) {
    host.run(EVENTS.receiver()).await;
    defmt::info!("Watch face destroyed");
}

/// Deliver a time tick on every wall-clock minute.
#[embassy_executor::task(pool_size = 1)]
async fn time_tick(clock: TimeManager) {
    loop {
        let delay = aligned_delay_ms(clock.epoch_millis(), TIME_TICK_RATE_MS);
        Timer::after(Duration::from_millis(delay)).await;

        if EVENTS.try_send(HostEvent::TimeTick).is_err() {
            defmt::warn!("Event queue full, time tick dropped");
        }
    }
}

/// Toggle ambient mode on every button press.
#[embassy_executor::task(pool_size = 1)]
async fn ambient_toggle(mut button: Button, mut backlight: Backlight<'static>) {
    let mut mode = RefreshMode::Interactive;
    loop {
        button.wait_for_press().await;

        mode = match mode {
            RefreshMode::Interactive => RefreshMode::Ambient,
            RefreshMode::Ambient => RefreshMode::Interactive,
        };
        if let Err(err) = backlight.follow(mode) {
            defmt::warn!("Backlight not updated: {}", err);
        }

        EVENTS
            .send(HostEvent::AmbientModeChanged(mode == RefreshMode::Ambient))
            .await;
    }
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_nrf::init(SystemConfig::new());
    defmt::info!("Initializing");

    // Initialize Backlight
    let backlight = unwrap!(Backlight::init(
        Output::new(p.P0_14, Level::High, OutputDrive::Standard),
        Output::new(p.P0_22, Level::High, OutputDrive::Standard),
        Output::new(p.P0_23, Level::High, OutputDrive::Standard),
        INTERACTIVE_BRIGHTNESS,
    ));

    // Initialize Button
    let button = Button::init(
        Input::new(p.P0_13, Pull::None),
        Output::new(p.P0_15, Level::Low, OutputDrive::Standard),
    );

    // Initialize SPI
    let mut spim_config = spim::Config::default();
    // Use SPI at 8MHz (the fastest clock available on the nRF52832),
    // otherwise refreshing will be super slow.
    spim_config.frequency = spim::Frequency::M8;
    // SPI must be used in mode 3. Mode 0 (the default) won't work.
    spim_config.mode = spim::MODE_3;

    let spim = spim::Spim::new(p.SPI2, Irqs, p.P0_02, p.P0_04, p.P0_03, spim_config);

    // Initialize LCD
    let display = unwrap!(Display::init(
        spim,
        Output::new(p.P0_25, Level::High, OutputDrive::Standard),
        Output::new(p.P0_18, Level::Low, OutputDrive::Standard),
        Output::new(p.P0_26, Level::Low, OutputDrive::Standard),
    ));

    // Initialize clock from build time
    let offset = unwrap!(FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS));
    let reference = TimeReference::from_epoch_secs(BUILD_UTC_EPOCH);

    let host = WatchFaceHost::new(
        TimeManager::init(reference, offset),
        WatchFaceConfig::default(),
        display,
    );

    defmt::info!("Initialization finished");

    // Schedule tasks
    unwrap!(spawner.spawn(watch_face(host)));
    unwrap!(spawner.spawn(time_tick(TimeManager::init(reference, offset))));
    unwrap!(spawner.spawn(ambient_toggle(button, backlight)));

    // The screen is on from boot
    EVENTS.send(HostEvent::VisibilityChanged(true)).await;
}
