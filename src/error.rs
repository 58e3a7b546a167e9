//! Crate error type

/// Errors raised by drawing and hardware set-up.
///
/// Refreshing itself never fails; these only come from the collaborators the
/// refresher hands frames to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    #[error("drawing to the display failed")]
    Draw,
    #[error("backlight level {0} is out of bounds (0-7)")]
    BacklightOutOfBounds(u8),
    #[error("display controller failed to initialise")]
    DisplayInit,
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
