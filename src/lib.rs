//! Water watch face
//!
//! Shows the hour and minute as large text over a background that fills up
//! from the bottom as the hour progresses. The redraw cadence is owned by a
//! [`refresher::PeriodicRefresher`], embedded once per host: the second-aligned
//! watch face host and the fixed-interval poller view.

#![cfg_attr(not(any(test, feature = "simulator")), no_std)]

#[cfg(feature = "log")]
#[allow(unused_imports)]
pub(crate) use log::{debug, error, info, trace, warn};

#[cfg(all(feature = "defmt", not(feature = "log")))]
#[allow(unused_imports)]
pub(crate) use defmt::{debug, error, info, trace, warn};

#[cfg(not(any(feature = "log", feature = "defmt")))]
mod noop_log {
    macro_rules! noop {
        ($($arg:tt)*) => {{}};
    }
    #[allow(unused_imports)]
    pub(crate) use noop as trace;
    #[allow(unused_imports)]
    pub(crate) use noop as debug;
    #[allow(unused_imports)]
    pub(crate) use noop as info;
    #[allow(unused_imports)]
    pub(crate) use noop as warn;
    #[allow(unused_imports)]
    pub(crate) use noop as error;
}
#[cfg(not(any(feature = "log", feature = "defmt")))]
#[allow(unused_imports)]
pub(crate) use noop_log::{debug, error, info, trace, warn};

// Link the executor's integrated timer queue into the unit-test binary.
#[cfg(test)]
extern crate embassy_executor;

pub mod config;
pub mod error;
pub mod host;
pub mod refresher;
pub mod system;
pub mod ui;

#[cfg(feature = "pinetime")]
pub mod peripherals;

#[cfg(any(test, feature = "simulator"))]
pub mod framebuffer;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
