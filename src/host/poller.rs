//! Fixed-interval poller view
//!
//! A producer, typically a timer on another thread, ticks every 200 ms and
//! posts into a bounded channel with [`offer_tick`]. The view task owning the
//! refresher and the display consumes the ticks. A tick that finds the
//! channel full is dropped rather than waited on.

use embassy_sync::{
    blocking_mutex::raw::RawMutex,
    channel::{Receiver, Sender},
};
use embassy_time::Duration;
use embedded_graphics::draw_target::DrawTarget;

use super::{render, render_logged};
use crate::{
    config::WatchFaceConfig,
    refresher::{Cadence, PeriodicRefresher},
    system::time::ClockSource,
    trace,
    ui::{ColorMode, WatchFace, WaterWatchface},
    Error,
};

/// Ticks the view may lag behind before new ones are dropped
pub const TICK_QUEUE_DEPTH: usize = 2;

/// One poll of the wall clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tick;

/// Post a tick without waiting. Returns whether it was queued.
pub fn offer_tick<M, const N: usize>(sender: &Sender<'_, M, Tick, N>) -> bool
where
    M: RawMutex,
{
    match sender.try_send(Tick) {
        Ok(()) => true,
        Err(_) => {
            trace!("View busy, tick dropped");
            false
        }
    }
}

pub struct PollerView<C, D> {
    refresher: PeriodicRefresher<C>,
    face: WaterWatchface,
    display: D,
}

impl<C, D> PollerView<C, D>
where
    C: ClockSource,
    D: DrawTarget<Color = ColorMode>,
{
    pub fn new(clock: C, config: WatchFaceConfig, display: D) -> Self {
        let mut face = WaterWatchface::new(config);
        face.on_surface_changed(display.bounding_box().size);
        Self {
            refresher: PeriodicRefresher::new(clock, Cadence::polling())
                .with_hour_format(config.hour_format),
            face,
            display,
        }
    }

    /// Period the producer should tick at
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.refresher.cadence().period_ms())
    }

    /// Recompute the state and redraw.
    pub fn handle_tick(&mut self) -> Result<bool, Error> {
        self.refresher.on_tick();
        render(&mut self.refresher, &self.face, &mut self.display)
    }

    /// Wait for one tick and handle it.
    pub async fn step<M, const N: usize>(&mut self, ticks: &Receiver<'_, M, Tick, N>)
    where
        M: RawMutex,
    {
        ticks.receive().await;
        self.refresher.on_tick();
        render_logged(&mut self.refresher, &self.face, &mut self.display);
    }

    pub async fn run<M, const N: usize>(&mut self, ticks: Receiver<'_, M, Tick, N>) -> !
    where
        M: RawMutex,
    {
        loop {
            self.step(&ticks).await;
        }
    }

    pub fn refresher(&self) -> &PeriodicRefresher<C> {
        &self.refresher
    }

    pub fn refresher_mut(&mut self) -> &mut PeriodicRefresher<C> {
        &mut self.refresher
    }

    pub fn face(&self) -> &WaterWatchface {
        &self.face
    }

    pub fn display(&self) -> &D {
        &self.display
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::HourFormat,
        framebuffer::FrameBuffer,
        testing::{FailingDisplay, ManualClock},
    };
    use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
    use embedded_graphics::geometry::{Point, Size};

    fn view(clock: ManualClock) -> PollerView<ManualClock, FrameBuffer> {
        PollerView::new(clock, WatchFaceConfig::default(), FrameBuffer::new(Size::new(240, 240)))
    }

    #[test]
    fn full_queue_drops_ticks() {
        let ticks = Channel::<NoopRawMutex, Tick, TICK_QUEUE_DEPTH>::new();
        let sender = ticks.sender();
        assert!(offer_tick(&sender));
        assert!(offer_tick(&sender));
        assert!(!offer_tick(&sender));

        assert_eq!(ticks.try_receive(), Ok(Tick));
        assert!(offer_tick(&sender));
    }

    #[test]
    fn every_tick_redraws() {
        let mut view = view(ManualClock::at_local(8, 0));
        assert_eq!(view.period(), Duration::from_millis(200));

        assert!(view.handle_tick().unwrap());
        assert!(view.handle_tick().unwrap());
        let palette = view.face().config().palette;
        assert_eq!(view.display().pixel(Point::new(0, 239)), Some(palette.unfilled));

        // Visibility does not gate the poller
        view.refresher_mut().on_became_hidden();
        view.refresher_mut().clock_mut().set_epoch_millis((8 * 3_600 + 45 * 60) * 1_000);
        assert!(view.handle_tick().unwrap());
        assert_eq!(view.display().pixel(Point::new(0, 239)), Some(palette.filled));
        assert_eq!(view.display().pixel(Point::new(0, 59)), Some(palette.unfilled));
        assert_eq!(view.display().pixel(Point::new(0, 60)), Some(palette.filled));
    }

    #[test]
    fn step_consumes_one_tick() {
        let ticks = Channel::<NoopRawMutex, Tick, TICK_QUEUE_DEPTH>::new();
        let receiver = ticks.receiver();
        offer_tick(&ticks.sender());
        offer_tick(&ticks.sender());

        let mut view = view(ManualClock::at_local(12, 30));
        embassy_futures::block_on(view.step(&receiver));

        assert_eq!(ticks.try_receive(), Ok(Tick));
        let palette = view.face().config().palette;
        assert_eq!(view.display().pixel(Point::new(0, 200)), Some(palette.filled));
    }

    #[test]
    fn step_keeps_going_after_failed_draw() {
        let ticks = Channel::<NoopRawMutex, Tick, TICK_QUEUE_DEPTH>::new();
        let receiver = ticks.receiver();
        offer_tick(&ticks.sender());
        offer_tick(&ticks.sender());

        let mut view = PollerView::new(
            ManualClock::at_local(12, 30),
            WatchFaceConfig::default(),
            FailingDisplay,
        );
        assert_eq!(view.handle_tick(), Err(Error::Draw));

        embassy_futures::block_on(view.step(&receiver));
        embassy_futures::block_on(view.step(&receiver));
        assert!(ticks.try_receive().is_err());
        assert!(view.refresher().is_timer_running());
    }

    #[test]
    fn twelve_hour_view_wraps_afternoon() {
        let config = WatchFaceConfig::default().with_hour_format(HourFormat::TwelveHour);
        assert_eq!(config.hour_format, HourFormat::TwelveHour);

        let mut view = PollerView::new(
            ManualClock::at_local(15, 20),
            config,
            FrameBuffer::new(Size::new(240, 240)),
        );
        view.refresher_mut().invalidate();
        let frame = view.refresher_mut().take_frame().unwrap();
        assert_eq!(frame.state.hour_text(), "03");
        assert_eq!(frame.state.minute_text(), "20");
    }
}
