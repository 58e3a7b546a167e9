//! Test doubles shared by the unit tests

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use embedded_graphics::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::Rgb565,
    Pixel,
};

use crate::system::time::{local_time, ClockSource};

/// Clock that only moves when told to.
pub struct ManualClock {
    epoch_ms: u64,
    offset: FixedOffset,
    resets: u32,
}

impl ManualClock {
    pub fn at_epoch_millis(epoch_ms: u64) -> Self {
        Self {
            epoch_ms,
            offset: utc(),
            resets: 0,
        }
    }

    /// 1 January 1970 at `hour:minute` UTC.
    pub fn at_local(hour: u64, minute: u64) -> Self {
        Self::at_epoch_millis((hour * 3_600 + minute * 60) * 1_000)
    }

    pub fn advance_millis(&mut self, millis: u64) {
        self.epoch_ms += millis;
    }

    pub fn set_epoch_millis(&mut self, epoch_ms: u64) {
        self.epoch_ms = epoch_ms;
    }

    /// Number of `reset_timezone` calls so far
    pub fn resets(&self) -> u32 {
        self.resets
    }

    fn utc_now(&self) -> NaiveDateTime {
        DateTime::from_timestamp_millis(self.epoch_ms as i64)
            .unwrap()
            .naive_utc()
    }
}

impl ClockSource for ManualClock {
    fn epoch_millis(&self) -> u64 {
        self.epoch_ms
    }

    fn set_to_now(&mut self) -> NaiveDateTime {
        local_time(self.utc_now(), self.offset)
    }

    fn reset_timezone(&mut self, offset: FixedOffset) {
        self.offset = offset;
        self.resets += 1;
    }

    fn timezone(&self) -> FixedOffset {
        self.offset
    }
}

pub fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

/// Display that rejects every pixel.
pub struct FailingDisplay;

impl OriginDimensions for FailingDisplay {
    fn size(&self) -> Size {
        Size::new(240, 240)
    }
}

impl DrawTarget for FailingDisplay {
    type Color = Rgb565;
    type Error = ();

    fn draw_iter<I>(&mut self, _pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        Err(())
    }
}
