//! Periodic display refresher
//!
//! Decides whether the redraw loop runs, schedules its ticks and derives the
//! display state each time a frame is requested. It never sleeps or draws by
//! itself: the host waits for [`PeriodicRefresher::next_deadline_ms`], calls
//! [`PeriodicRefresher::on_tick`] and draws whatever
//! [`PeriodicRefresher::take_frame`] hands back.

use chrono::FixedOffset;

use crate::{
    config::{HourFormat, INTERACTIVE_UPDATE_RATE_MS, POLL_PERIOD_MS},
    debug, info,
    system::time::ClockSource,
    trace,
    ui::DisplayState,
};

mod task;

pub use task::ScheduledTask;

/// Whether the face renders fully or in low-power form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RefreshMode {
    #[default]
    Interactive,
    Ambient,
}

/// When ticks fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cadence {
    /// On wall-clock boundaries of `rate_ms`, only while visible and interactive
    Aligned { rate_ms: u64 },
    /// Every `period_ms`, unconditionally
    FixedInterval { period_ms: u64 },
}

impl Cadence {
    /// The watch face cadence: every wall-clock second.
    pub const fn second_aligned() -> Self {
        Cadence::Aligned {
            rate_ms: INTERACTIVE_UPDATE_RATE_MS,
        }
    }

    /// The poller view cadence: every 200 ms.
    pub const fn polling() -> Self {
        Cadence::FixedInterval {
            period_ms: POLL_PERIOD_MS,
        }
    }

    /// Nominal spacing between ticks
    pub fn period_ms(&self) -> u64 {
        match *self {
            Cadence::Aligned { rate_ms } => rate_ms,
            Cadence::FixedInterval { period_ms } => period_ms,
        }
    }

    /// Delay from `now_ms` until the next tick.
    pub fn next_delay_ms(&self, now_ms: u64) -> u64 {
        match *self {
            Cadence::Aligned { rate_ms } => aligned_delay_ms(now_ms, rate_ms),
            Cadence::FixedInterval { period_ms } => period_ms,
        }
    }
}

/// Delay until the next multiple of `rate_ms` strictly after `now_ms`.
///
/// A tick landing exactly on a boundary waits a full period.
pub fn aligned_delay_ms(now_ms: u64, rate_ms: u64) -> u64 {
    rate_ms - (now_ms % rate_ms)
}

/// One frame to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub state: DisplayState,
    pub mode: RefreshMode,
}

pub struct PeriodicRefresher<C> {
    clock: C,
    cadence: Cadence,
    hour_format: HourFormat,
    visible: bool,
    mode: RefreshMode,
    task: ScheduledTask,
    /// A redraw was requested and not yet taken
    dirty: bool,
    /// Platform time zone, re-applied whenever the face becomes visible
    zone: FixedOffset,
    /// Timezone changes reach the clock only while registered
    tz_listener: bool,
}

impl<C> PeriodicRefresher<C>
where
    C: ClockSource,
{
    /// Create a hidden, interactive refresher with nothing scheduled.
    pub fn new(clock: C, cadence: Cadence) -> Self {
        let zone = clock.timezone();
        Self {
            clock,
            cadence,
            hour_format: HourFormat::default(),
            visible: false,
            mode: RefreshMode::Interactive,
            task: ScheduledTask::idle(),
            dirty: false,
            zone,
            tz_listener: false,
        }
    }

    pub fn with_hour_format(mut self, hour_format: HourFormat) -> Self {
        self.hour_format = hour_format;
        self
    }

    /// The surface became visible.
    pub fn on_became_visible(&mut self) {
        info!("Watch face visible");
        self.visible = true;
        self.register_timezone_listener();

        // The zone may have changed while nobody was listening
        self.clock.reset_timezone(self.zone);

        self.update_timer();
    }

    /// The surface was hidden.
    pub fn on_became_hidden(&mut self) {
        info!("Watch face hidden");
        self.visible = false;
        self.unregister_timezone_listener();
        self.update_timer();
    }

    pub fn on_ambient_mode_changed(&mut self, ambient: bool) {
        let mode = if ambient {
            RefreshMode::Ambient
        } else {
            RefreshMode::Interactive
        };
        if self.mode != mode {
            info!("Refresh mode changed to {:?}", mode);
            self.mode = mode;
            self.invalidate();
        }

        self.update_timer();
    }

    /// The platform time zone changed to `offset`.
    ///
    /// Neither redraws nor touches the timer; the next frame picks up the zone.
    pub fn on_timezone_changed(&mut self, offset: FixedOffset) {
        self.zone = offset;
        if self.tz_listener {
            self.clock.reset_timezone(offset);
            self.clock.set_to_now();
        }
    }

    /// Once-a-minute tick from the host, also delivered in ambient mode.
    pub fn on_time_tick(&mut self) {
        self.invalidate();
    }

    /// The pending tick fired: request a redraw and schedule the next one.
    pub fn on_tick(&mut self) {
        trace!("Tick");
        self.task.cancel();
        self.invalidate();
        if self.should_run() {
            let now = self.clock.epoch_millis();
            let delay = self.cadence.next_delay_ms(now);
            debug!("Next tick in {} ms", delay);
            self.task.reschedule(now, delay);
        }
    }

    /// Stop for good.
    pub fn destroy(&mut self) {
        if self.task.cancel() {
            debug!("Pending tick cancelled on destroy");
        }
        self.unregister_timezone_listener();
    }

    /// Request one redraw.
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Take the pending redraw, computing its state from the current time.
    pub fn take_frame(&mut self) -> Option<Frame> {
        if !core::mem::take(&mut self.dirty) {
            return None;
        }
        let now = self.clock.set_to_now();
        Some(Frame {
            state: DisplayState::with_hour_format(&now, self.hour_format),
            mode: self.mode,
        })
    }

    /// Whether the periodic tick should be running.
    pub fn should_run(&self) -> bool {
        match self.cadence {
            Cadence::Aligned { .. } => self.visible && self.mode == RefreshMode::Interactive,
            Cadence::FixedInterval { .. } => true,
        }
    }

    pub fn is_timer_running(&self) -> bool {
        self.task.is_pending()
    }

    /// Epoch milliseconds of the pending tick.
    pub fn next_deadline_ms(&self) -> Option<u64> {
        self.task.deadline_ms()
    }

    /// Milliseconds until the pending tick, measured on the refresher's clock.
    pub fn remaining_ms(&self) -> Option<u64> {
        self.task.remaining_ms(self.clock.epoch_millis())
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn mode(&self) -> RefreshMode {
        self.mode
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn is_listening_for_timezone(&self) -> bool {
        self.tz_listener
    }

    /// Cancel the pending tick and, if the loop should run, fire one right away.
    fn update_timer(&mut self) {
        self.task.cancel();
        if self.should_run() {
            debug!("Timer started, first tick in 0 ms");
            self.task.reschedule(self.clock.epoch_millis(), 0);
        }
    }

    fn register_timezone_listener(&mut self) {
        if !self.tz_listener {
            self.tz_listener = true;
            debug!("Listening for time zone changes");
        }
    }

    fn unregister_timezone_listener(&mut self) {
        if self.tz_listener {
            self.tz_listener = false;
            debug!("Stopped listening for time zone changes");
        }
    }
}
