//! Vibration motor control for haptic feedback.

use esp_hal::gpio::{
    Level,
    Output,
    OutputConfig,
};

use super::VibrationResources;

/// Controls the onboard vibration motor.
///
/// The motor hangs off a plain GPIO, so any non-zero strength runs it flat
/// out.
pub struct Vibration {
    pin: Output<'static>,
}

impl From<VibrationResources<'static>> for Vibration {
    fn from(res: VibrationResources<'static>) -> Self {
        Self {
            pin: Output::new(res.motor, Level::Low, OutputConfig::default()),
        }
    }
}

impl Vibration {
    pub fn set_strength(&mut self, percent: u8) {
        if percent > 0 {
            self.pin.set_high();
        } else {
            self.pin.set_low();
        }
    }
}
