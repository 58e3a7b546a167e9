//! Hosts embedding a refresher
//!
//! Both hosts confine the refresher and the drawing surface to one task.
//! Everything else reaches them through bounded channels.

use chrono::FixedOffset;
use embedded_graphics::{draw_target::DrawTarget, geometry::Size};

use crate::{
    refresher::PeriodicRefresher,
    system::time::ClockSource,
    trace,
    ui::{ColorMode, WatchFace},
    warn, Error,
};

pub mod poller;
pub mod watchface;

/// Depth of the lifecycle event queue
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Lifecycle notifications delivered by the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    VisibilityChanged(bool),
    AmbientModeChanged(bool),
    TimezoneChanged(FixedOffset),
    /// Once per wall-clock minute
    TimeTick,
    SurfaceChanged(Size),
    Destroy,
}

/// Draw the pending frame, if any. Returns whether a frame was drawn.
pub fn render<C, F, D>(
    refresher: &mut PeriodicRefresher<C>,
    face: &F,
    display: &mut D,
) -> Result<bool, Error>
where
    C: ClockSource,
    F: WatchFace,
    D: DrawTarget<Color = ColorMode>,
{
    let Some(frame) = refresher.take_frame() else {
        return Ok(false);
    };
    trace!(
        "Frame {}:{} fill {} {:?}",
        frame.state.hour_text(),
        frame.state.minute_text(),
        frame.state.fill_fraction(),
        frame.mode
    );
    face.draw(display, &frame).map_err(|_| Error::Draw)?;
    Ok(true)
}

/// Like [`render`], but a failed frame is logged and skipped.
fn render_logged<C, F, D>(refresher: &mut PeriodicRefresher<C>, face: &F, display: &mut D)
where
    C: ClockSource,
    F: WatchFace,
    D: DrawTarget<Color = ColorMode>,
{
    if let Err(err) = render(refresher, face, display) {
        warn!("Frame dropped: {}", err);
    }
}
