//! Second-aligned watch face host
//!
//! Waits for whichever comes first, the refresher's pending tick or a
//! lifecycle event, then draws the frame that produced.

use embassy_futures::select::{select, Either};
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Receiver};
use embassy_time::{Duration, Timer};
use embedded_graphics::draw_target::DrawTarget;

use super::{render, render_logged, HostEvent};
use crate::{
    config::WatchFaceConfig,
    info,
    refresher::{Cadence, PeriodicRefresher},
    system::time::ClockSource,
    ui::{ColorMode, WatchFace, WaterWatchface},
    Error,
};

/// Whether the host keeps running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

pub struct WatchFaceHost<C, D> {
    refresher: PeriodicRefresher<C>,
    face: WaterWatchface,
    display: D,
}

impl<C, D> WatchFaceHost<C, D>
where
    C: ClockSource,
    D: DrawTarget<Color = ColorMode>,
{
    pub fn new(clock: C, config: WatchFaceConfig, display: D) -> Self {
        let mut face = WaterWatchface::new(config);
        face.on_surface_changed(display.bounding_box().size);
        Self {
            refresher: PeriodicRefresher::new(clock, Cadence::second_aligned())
                .with_hour_format(config.hour_format),
            face,
            display,
        }
    }

    pub fn handle_event(&mut self, event: HostEvent) -> Control {
        match event {
            HostEvent::VisibilityChanged(true) => self.refresher.on_became_visible(),
            HostEvent::VisibilityChanged(false) => self.refresher.on_became_hidden(),
            HostEvent::AmbientModeChanged(ambient) => {
                self.refresher.on_ambient_mode_changed(ambient)
            }
            HostEvent::TimezoneChanged(offset) => self.refresher.on_timezone_changed(offset),
            HostEvent::TimeTick => self.refresher.on_time_tick(),
            HostEvent::SurfaceChanged(size) => {
                self.face.on_surface_changed(size);
                self.refresher.invalidate();
            }
            HostEvent::Destroy => {
                self.refresher.destroy();
                return Control::Stop;
            }
        }
        Control::Continue
    }

    /// The pending tick fired.
    pub fn handle_tick(&mut self) {
        self.refresher.on_tick();
    }

    /// Draw the pending frame, if any.
    pub fn render(&mut self) -> Result<bool, Error> {
        render(&mut self.refresher, &self.face, &mut self.display)
    }

    /// Run until a [`HostEvent::Destroy`] arrives.
    pub async fn run<M, const N: usize>(&mut self, events: Receiver<'_, M, HostEvent, N>)
    where
        M: RawMutex,
    {
        info!("Watch face host running");
        loop {
            let wake = match self.refresher.remaining_ms() {
                Some(delay) => {
                    select(Timer::after(Duration::from_millis(delay)), events.receive()).await
                }
                None => Either::Second(events.receive().await),
            };

            match wake {
                Either::First(()) => self.handle_tick(),
                Either::Second(event) => {
                    if self.handle_event(event) == Control::Stop {
                        info!("Watch face host stopped");
                        return;
                    }
                }
            }

            render_logged(&mut self.refresher, &self.face, &mut self.display);
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
        framebuffer::FrameBuffer,
        refresher::RefreshMode,
        testing::{FailingDisplay, ManualClock},
    };
    use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
    use embedded_graphics::{
        geometry::{Point, Size},
        pixelcolor::{Rgb565, RgbColor},
    };

    fn host(clock: ManualClock) -> WatchFaceHost<ManualClock, FrameBuffer> {
        WatchFaceHost::new(clock, WatchFaceConfig::default(), FrameBuffer::new(Size::new(240, 240)))
    }

    #[test]
    fn visible_face_ticks_and_draws() {
        let mut host = host(ManualClock::at_local(10, 30));
        assert!(!host.render().unwrap());

        host.handle_event(HostEvent::VisibilityChanged(true));
        assert_eq!(host.refresher().remaining_ms(), Some(0));

        host.handle_tick();
        assert!(host.render().unwrap());
        assert!(!host.render().unwrap());
        assert_eq!(host.refresher().remaining_ms(), Some(1_000));

        let palette = host.face().config().palette;
        assert_eq!(host.display().pixel(Point::new(0, 0)), Some(palette.unfilled));
        assert_eq!(host.display().pixel(Point::new(0, 200)), Some(palette.filled));
    }

    #[test]
    fn ambient_event_redraws_flat_and_stops() {
        let mut host = host(ManualClock::at_local(10, 5));
        host.handle_event(HostEvent::VisibilityChanged(true));
        host.handle_tick();
        host.render().unwrap();

        host.handle_event(HostEvent::AmbientModeChanged(true));
        assert_eq!(host.refresher().mode(), RefreshMode::Ambient);
        assert!(!host.refresher().is_timer_running());
        assert!(host.render().unwrap());
        assert_eq!(host.display().pixel(Point::new(0, 239)), Some(Rgb565::BLACK));

        host.handle_event(HostEvent::TimeTick);
        assert!(host.render().unwrap());
        assert_eq!(host.display().pixel(Point::new(0, 239)), Some(Rgb565::BLACK));
    }

    #[test]
    fn surface_change_relayouts_and_redraws() {
        let mut host = host(ManualClock::at_local(9, 30));
        host.handle_event(HostEvent::SurfaceChanged(Size::new(120, 120)));
        assert_eq!(host.face().center(), Point::new(60, 60));
        assert!(host.render().unwrap());
        let palette = host.face().config().palette;
        assert_eq!(host.display().pixel(Point::new(0, 59)), Some(palette.unfilled));
        assert_eq!(host.display().pixel(Point::new(0, 60)), Some(palette.filled));
    }

    #[test]
    fn destroy_stops_host() {
        let mut host = host(ManualClock::at_epoch_millis(0));
        host.handle_event(HostEvent::VisibilityChanged(true));
        assert_eq!(host.handle_event(HostEvent::Destroy), Control::Stop);
        assert!(!host.refresher().is_timer_running());
    }

    #[test]
    fn failed_draw_is_reported() {
        let mut host = WatchFaceHost::new(
            ManualClock::at_epoch_millis(0),
            WatchFaceConfig::default(),
            FailingDisplay,
        );
        host.handle_event(HostEvent::TimeTick);
        assert_eq!(host.render(), Err(Error::Draw));
    }

    #[test]
    fn run_keeps_going_after_failed_draw() {
        let events = Channel::<NoopRawMutex, HostEvent, 8>::new();
        events.try_send(HostEvent::TimeTick).unwrap();
        events.try_send(HostEvent::TimeTick).unwrap();
        events.try_send(HostEvent::Destroy).unwrap();

        let mut host = WatchFaceHost::new(
            ManualClock::at_epoch_millis(0),
            WatchFaceConfig::default(),
            FailingDisplay,
        );
        embassy_futures::block_on(host.run(events.receiver()));

        assert!(events.try_receive().is_err());
        assert!(!host.refresher().is_timer_running());
    }

    #[test]
    fn run_drains_events_until_destroy() {
        let events = Channel::<NoopRawMutex, HostEvent, 8>::new();
        events.try_send(HostEvent::AmbientModeChanged(true)).unwrap();
        events.try_send(HostEvent::VisibilityChanged(true)).unwrap();
        events.try_send(HostEvent::Destroy).unwrap();

        let mut host = host(ManualClock::at_local(10, 45));
        embassy_futures::block_on(host.run(events.receiver()));

        assert!(host.refresher().is_visible());
        assert!(!host.refresher().is_timer_running());
        assert_eq!(host.display().pixel(Point::new(0, 239)), Some(Rgb565::BLACK));
        assert!(events.try_receive().is_err());
    }
}
