//! Owned handle for the refresher's single pending tick

/// The next tick of a refresher, if one is pending.
///
/// There is at most one pending tick: `reschedule` replaces whatever was
/// pending before, so a handle can never leak a second timer.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduledTask {
    /// Epoch milliseconds at which the tick fires
    deadline_ms: Option<u64>,
}

impl ScheduledTask {
    /// Handle with nothing pending
    pub const fn idle() -> Self {
        Self { deadline_ms: None }
    }

    /// Drop the pending tick. Returns whether one was pending.
    pub fn cancel(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    /// Fire `delay_ms` after `now_ms`, replacing any pending tick.
    pub fn reschedule(&mut self, now_ms: u64, delay_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn is_pending(&self) -> bool {
        self.deadline_ms.is_some()
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Milliseconds left until the tick fires, zero once it is due.
    pub fn remaining_ms(&self, now_ms: u64) -> Option<u64> {
        self.deadline_ms
            .map(|deadline| deadline.saturating_sub(now_ms))
    }
}
