//! Peripheral interfaces the tabs drive.
//!
//! Implementations live with the board (see `board`) or in tests. Hardware
//! writes are infallible here: a failing bus is a board bring-up problem, and
//! the only call allowed to fail at runtime is a Wi-Fi scan.

use alloc::vec::Vec;

use crate::{
    color::Color,
    fmt::Loggable,
    scan::AccessPoint,
};

/// Which LED bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Side {
    Left,
    Right,
}

/// Addressable RGB LED strip with a framebuffer flushed by [`show`](LedStrip::show).
#[allow(async_fn_in_trait)]
pub trait LedStrip {
    fn set_pixel(&mut self, index: usize, color: Color);

    /// Paint every LED of one bar.
    fn set_side(&mut self, side: Side, color: Color);

    /// Global brightness, 0–255, applied on the next [`show`](LedStrip::show).
    fn set_brightness(&mut self, level: u8);

    /// Turn every LED off in the framebuffer.
    fn clear(&mut self);

    /// Push the framebuffer to the LEDs.
    async fn show(&mut self);
}

/// Power management: battery gauge, backlight, indicator LED and motor.
pub trait PowerManagement {
    /// Battery voltage in volts.
    fn battery_voltage(&mut self) -> f32;

    /// Battery current in amps; positive or zero while charging.
    fn battery_current(&mut self) -> f32;

    fn set_backlight_level(&mut self, percent: u8);

    /// Boards without an auxiliary LED keep the default, which does nothing.
    fn set_aux_led(&mut self, _on: bool) {}

    fn set_vibration_strength(&mut self, percent: u8);
}

/// A radio that can list nearby access points.
#[allow(async_fn_in_trait)]
pub trait Radio {
    type Error: Loggable;

    /// Run one blocking scan and return every access point found, in the
    /// order the radio reports them.
    async fn scan(&mut self) -> Result<Vec<AccessPoint>, Self::Error>;
}
