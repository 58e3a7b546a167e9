//! UI definitions module

use core::fmt::Write;

use chrono::Timelike;
use embedded_graphics::{draw_target::DrawTarget, geometry::Size, pixelcolor::Rgb565};
use heapless::String;

use crate::{config::HourFormat, refresher::Frame};

mod water_watchface;

pub use water_watchface::WaterWatchface;

/// Pixel colour of every drawing surface the watch face renders to.
pub type ColorMode = Rgb565;

pub trait WatchFace {
    /// The drawing surface was (re)sized
    fn on_surface_changed(&mut self, size: Size);

    /// Draw one frame
    fn draw<D>(&self, target: &mut D, frame: &Frame) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = ColorMode>;
}

/// Hour and minute text plus the background fill, derived from one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    hour_text: String<2>,
    minute_text: String<2>,
    fill_fraction: f32,
}

impl DisplayState {
    /// State at `now` with a 24-hour clock.
    pub fn at<T: Timelike>(now: &T) -> Self {
        Self::with_hour_format(now, HourFormat::TwentyFourHour)
    }

    pub fn with_hour_format<T: Timelike>(now: &T, hour_format: HourFormat) -> Self {
        let minute = now.minute();
        Self {
            hour_text: two_digits(hour_format.apply(now.hour())),
            minute_text: two_digits(minute),
            fill_fraction: minute as f32 / 60.0,
        }
    }

    pub fn hour_text(&self) -> &str {
        &self.hour_text
    }

    pub fn minute_text(&self) -> &str {
        &self.minute_text
    }

    /// Share of the screen height in the filled colour, in [0, 1).
    pub fn fill_fraction(&self) -> f32 {
        self.fill_fraction
    }
}

/// Zero-padded decimal of a clock value (0-59).
fn two_digits(value: u32) -> String<2> {
    let mut text = String::new();
    // Clock values never exceed two digits
    let _ = write!(text, "{:02}", value % 100);
    text
}
