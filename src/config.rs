//! Watch face configuration
//!
//! Style constants and timing values consumed when a host is set up.

use embedded_graphics::{
    mono_font::{iso_8859_1::FONT_10X20, MonoFont},
    pixelcolor::{Rgb565, RgbColor},
};
use profont::PROFONT_24_POINT;

/// Redraw cadence of the watch face while visible and interactive.
pub const INTERACTIVE_UPDATE_RATE_MS: u64 = 1_000;

/// Period of the fixed-interval poller view.
pub const POLL_PERIOD_MS: u64 = 200;

/// Period of the minute tick delivered by the host.
pub const TIME_TICK_RATE_MS: u64 = 60_000;

/// Platform time zone at boot, seconds east of UTC.
pub const DEFAULT_UTC_OFFSET_SECS: i32 = 3_600;

/// Display size of the PineTime LCD.
pub const LCD_W: u32 = 240;
pub const LCD_H: u32 = 240;

/// How the hour is rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HourFormat {
    /// 00-23
    #[default]
    TwentyFourHour,
    /// 00-11, noon and midnight render as 00
    TwelveHour,
}

impl HourFormat {
    /// Map an hour of day (0-23) into this format.
    pub fn apply(self, hour: u32) -> u32 {
        match self {
            HourFormat::TwentyFourHour => hour,
            HourFormat::TwelveHour => hour % 12,
        }
    }
}

/// Background and text colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Lower part of the background, grows with the minute
    pub filled: Rgb565,
    /// Upper part of the background
    pub unfilled: Rgb565,
    /// Flat background in ambient mode
    pub ambient_background: Rgb565,
    /// Hour and minute text
    pub text: Rgb565,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            filled: Rgb565::new(0x02, 0x22, 0x1a),
            unfilled: Rgb565::new(0x0c, 0x19, 0x0c),
            ambient_background: Rgb565::BLACK,
            text: Rgb565::WHITE,
        }
    }
}

/// Fixed configuration of a watch face instance.
#[derive(Clone, Copy)]
pub struct WatchFaceConfig {
    pub palette: Palette,
    /// Hour font
    pub thin: &'static MonoFont<'static>,
    /// Minute font
    pub light: &'static MonoFont<'static>,
    pub hour_format: HourFormat,
}

impl Default for WatchFaceConfig {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            thin: &PROFONT_24_POINT,
            light: &FONT_10X20,
            hour_format: HourFormat::default(),
        }
    }
}

impl WatchFaceConfig {
    /// Same configuration with another hour format.
    pub fn with_hour_format(mut self, hour_format: HourFormat) -> Self {
        self.hour_format = hour_format;
        self
    }
}
