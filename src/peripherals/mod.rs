//! PineTime peripherals used by the watch face

pub mod backlight;
pub mod button;
pub mod display;
