//! The badge's power management, assembled from its discrete parts.

use super::{
    Backlight,
    BatterySense,
    Vibration,
};
use crate::drivers::PowerManagement;

/// Backlight, motor and battery sense behind one [`PowerManagement`].
///
/// The badge has no auxiliary indicator LED, so the default no-op is kept.
pub struct BadgePower {
    pub backlight: Backlight,
    pub vibration: Vibration,
    pub battery: BatterySense,
}

impl BadgePower {
    pub const fn new(backlight: Backlight, vibration: Vibration, battery: BatterySense) -> Self {
        Self {
            backlight,
            vibration,
            battery,
        }
    }
}

impl PowerManagement for BadgePower {
    fn battery_voltage(&mut self) -> f32 {
        self.battery.voltage()
    }

    fn battery_current(&mut self) -> f32 {
        self.battery.current()
    }

    fn set_backlight_level(&mut self, percent: u8) {
        self.backlight.set_level(percent);
    }

    fn set_vibration_strength(&mut self, percent: u8) {
        self.vibration.set_strength(percent);
    }
}
