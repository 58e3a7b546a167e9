//! Time keeping module

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use embassy_time::Instant;

use crate::info;

/// Source of wall-clock time for a refresher.
pub trait ClockSource {
    /// Milliseconds since the Unix epoch, UTC.
    fn epoch_millis(&self) -> u64;

    /// Re-read the clock and return the current local time.
    fn set_to_now(&mut self) -> NaiveDateTime;

    /// Drop the tracked time and start tracking in `offset`.
    fn reset_timezone(&mut self, offset: FixedOffset);

    /// Zone the clock currently reports local time in.
    fn timezone(&self) -> FixedOffset;
}

/// A known UTC time paired with the system instant it was taken at.
#[derive(Debug, Clone, Copy)]
pub struct TimeReference {
    /// Clock time
    time: NaiveDateTime,
    /// Related system time
    instant: Instant,
}

impl Default for TimeReference {
    fn default() -> Self {
        Self {
            time: NaiveDateTime::default(),
            instant: Instant::from_ticks(0),
        }
    }
}

impl TimeReference {
    /// Create new time reference from a UTC `NaiveDateTime`, taken now
    pub fn from_datetime(time: NaiveDateTime) -> Self {
        Self::at(time, Instant::now())
    }

    /// Create new time reference from seconds since the Unix epoch, taken now
    pub fn from_epoch_secs(secs: i64) -> Self {
        match DateTime::from_timestamp(secs, 0) {
            Some(time) => Self::from_datetime(time.naive_utc()),
            None => Self::default(),
        }
    }

    /// Create new time reference from milliseconds since the Unix epoch, taken now
    pub fn from_epoch_millis(millis: i64) -> Self {
        match DateTime::from_timestamp_millis(millis) {
            Some(time) => Self::from_datetime(time.naive_utc()),
            None => Self::default(),
        }
    }

    /// Reference `time` observed at `instant`
    pub fn at(time: NaiveDateTime, instant: Instant) -> Self {
        Self { time, instant }
    }

    /// UTC time at `instant`, extrapolated from this reference
    pub fn time_at(&self, instant: Instant) -> NaiveDateTime {
        let elapsed = instant.saturating_duration_since(self.instant).as_micros();
        i64::try_from(elapsed)
            .ok()
            .and_then(|micros| self.time.checked_add_signed(TimeDelta::microseconds(micros)))
            .unwrap_or(self.time)
    }
}

/// Wall clock driven by the embassy time driver.
pub struct TimeManager {
    reference: TimeReference,
    offset: FixedOffset,
    /// Local time as of the last `set_to_now`
    current: NaiveDateTime,
}

impl TimeManager {
    /// Initialize time measurement on boot
    pub fn init(reference: TimeReference, offset: FixedOffset) -> Self {
        let mut manager = Self {
            reference,
            offset,
            current: NaiveDateTime::default(),
        };
        manager.set_to_now();
        manager
    }

    /// Get current UTC time
    pub fn get_time(&self) -> NaiveDateTime {
        self.reference.time_at(Instant::now())
    }

    /// Update time reference
    pub fn set_time(&mut self, reference: TimeReference) {
        self.reference = reference;
        self.set_to_now();
    }

    /// Local time as of the last refresh
    pub fn current(&self) -> NaiveDateTime {
        self.current
    }
}

impl ClockSource for TimeManager {
    fn epoch_millis(&self) -> u64 {
        u64::try_from(self.get_time().and_utc().timestamp_millis()).unwrap_or(0)
    }

    fn set_to_now(&mut self) -> NaiveDateTime {
        self.current = local_time(self.get_time(), self.offset);
        self.current
    }

    fn reset_timezone(&mut self, offset: FixedOffset) {
        info!("Time zone reset to {} s east of UTC", offset.local_minus_utc());
        self.offset = offset;
        self.current = NaiveDateTime::default();
        self.set_to_now();
    }

    fn timezone(&self) -> FixedOffset {
        self.offset
    }
}

/// Convert a UTC time into local time in `offset`
pub fn local_time(utc: NaiveDateTime, offset: FixedOffset) -> NaiveDateTime {
    utc.and_utc().with_timezone(&offset).naive_local()
}
