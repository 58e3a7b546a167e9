//! Host simulator
//!
//! Runs the second-aligned watch face and the 200 ms poller view against
//! in-memory frame buffers. A scripted lifecycle drives the watch face
//! through visibility, ambient and time zone changes. Set
//! `WATCHFACE_UTC_OFFSET_SECS` to start in another zone.

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::FixedOffset;
use embassy_executor::Spawner;
use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use embassy_time::{Duration, Timer};
use embedded_graphics::geometry::Size;
use log::{info, warn};

use watchface_water::{
    config::{HourFormat, WatchFaceConfig, DEFAULT_UTC_OFFSET_SECS, LCD_H, LCD_W},
    framebuffer::FrameBuffer,
    host::{
        poller::{offer_tick, PollerView, Tick, TICK_QUEUE_DEPTH},
        watchface::WatchFaceHost,
        HostEvent, EVENT_QUEUE_DEPTH,
    },
    system::time::{TimeManager, TimeReference},
};

static EVENTS: Channel<CriticalSectionRawMutex, HostEvent, EVENT_QUEUE_DEPTH> = Channel::new();
static TICKS: Channel<CriticalSectionRawMutex, Tick, TICK_QUEUE_DEPTH> = Channel::new();

/// Frames the poller view draws before the simulator exits
const POLLER_FRAMES: u32 = 60;

#[embassy_executor::task]
async fn watch_face(mut host: WatchFaceHost<TimeManager, FrameBuffer>) {
    host.run(EVENTS.receiver()).await;

    let palette = host.face().config().palette;
    info!(
        "Watch face destroyed; last frame: {} filled, {} unfilled, {} ambient pixels",
        host.display().count(palette.filled),
        host.display().count(palette.unfilled),
        host.display().count(palette.ambient_background),
    );
}

#[embassy_executor::task]
async fn poller_view(mut view: PollerView<TimeManager, FrameBuffer>) {
    let receiver = TICKS.receiver();
    for _ in 0..POLLER_FRAMES {
        view.step(&receiver).await;
    }

    let palette = view.face().config().palette;
    info!(
        "Poller view drew {} frames; {} filled pixels",
        POLLER_FRAMES,
        view.display().count(palette.filled),
    );
}

/// Scripted platform lifecycle.
#[embassy_executor::task]
async fn lifecycle() {
    let script = [
        (0, HostEvent::VisibilityChanged(true)),
        (3, HostEvent::AmbientModeChanged(true)),
        (1, HostEvent::TimeTick),
        (2, HostEvent::AmbientModeChanged(false)),
        (2, HostEvent::TimezoneChanged(offset(9 * 3_600))),
        (2, HostEvent::VisibilityChanged(false)),
        (1, HostEvent::TimezoneChanged(offset(-5 * 3_600))),
        (1, HostEvent::VisibilityChanged(true)),
        (2, HostEvent::SurfaceChanged(Size::new(LCD_W / 2, LCD_H / 2))),
        (2, HostEvent::Destroy),
    ];

    for (delay_secs, event) in script {
        Timer::after(Duration::from_secs(delay_secs)).await;
        info!("Lifecycle: {:?}", event);
        EVENTS.send(event).await;
    }

    Timer::after(Duration::from_secs(1)).await;
    std::process::exit(0);
}

fn offset(secs: i32) -> FixedOffset {
    FixedOffset::east_opt(secs).unwrap_or_else(|| FixedOffset::east_opt(0).unwrap())
}

fn now_reference() -> TimeReference {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0);
    TimeReference::from_epoch_millis(millis)
}

fn platform_offset() -> FixedOffset {
    let secs = match std::env::var("WATCHFACE_UTC_OFFSET_SECS") {
        Ok(value) => value.parse().unwrap_or_else(|_| {
            warn!("Ignoring WATCHFACE_UTC_OFFSET_SECS={}", value);
            DEFAULT_UTC_OFFSET_SECS
        }),
        Err(_) => DEFAULT_UTC_OFFSET_SECS,
    };
    offset(secs)
}

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    info!("Simulator starting");

    let offset = platform_offset();
    let size = Size::new(LCD_W, LCD_H);

    let host = WatchFaceHost::new(
        TimeManager::init(now_reference(), offset),
        WatchFaceConfig::default(),
        FrameBuffer::new(size),
    );
    let view = PollerView::new(
        TimeManager::init(now_reference(), offset),
        WatchFaceConfig::default().with_hour_format(HourFormat::TwelveHour),
        FrameBuffer::new(size),
    );

    // The poller ticks from its own thread, like a platform timer would
    let period = std::time::Duration::from_millis(view.period().as_millis());
    std::thread::spawn(move || {
        let sender = TICKS.sender();
        loop {
            offer_tick(&sender);
            std::thread::sleep(period);
        }
    });

    spawner.spawn(watch_face(host)).unwrap();
    spawner.spawn(poller_view(view)).unwrap();
    spawner.spawn(lifecycle()).unwrap();
}
