//! System services: wall clock and, on the PineTime, chip configuration

#[cfg(feature = "pinetime")]
pub mod config;
pub mod time;
