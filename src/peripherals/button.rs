//! Button control module for PineTime

use debouncr::{debounce_2, Debouncer, Edge, Repeat2};
use embassy_nrf::{
    gpio::{Input, Output},
    peripherals::{P0_13, P0_15},
};
use embassy_time::{Duration, Timer};

/// Poll interval of the button
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

struct ButtonConfig<'a> {
    /// Button detection pin (high/low)
    pin_button: Input<'a, P0_13>,
    /// Button enable pin
    pin_enable: Output<'a, P0_15>,
    /// Debouncer for button
    debouncer: Debouncer<u8, Repeat2>,
}

pub struct Button {
    /// Button configuration
    config: ButtonConfig<'static>,
}

impl Button {
    /// Configure button on boot
    pub fn init(button_pin: Input<'static, P0_13>, enable_pin: Output<'static, P0_15>) -> Self {
        Self {
            config: ButtonConfig {
                pin_button: button_pin,
                pin_enable: enable_pin,
                debouncer: debounce_2(false),
            },
        }
    }

    /// Sample the button once. True on a debounced press.
    pub async fn pressed(&mut self) -> bool {
        let config = &mut self.config;

        // Enable button
        config.pin_enable.set_high();
        // The button needs a short time to give stable outputs
        Timer::after(Duration::from_nanos(1)).await;

        let pressed = config.debouncer.update(config.pin_button.is_high()) == Some(Edge::Rising);

        // Button consumes around 34µA when P0.15 is left high.
        // To reduce current consumption, set it low most of the time.
        config.pin_enable.set_low();

        pressed
    }

    /// Wait for the next debounced press.
    pub async fn wait_for_press(&mut self) {
        while !self.pressed().await {
            Timer::after(POLL_INTERVAL).await;
        }
    }
}
