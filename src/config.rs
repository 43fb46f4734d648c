//! Compile-time tuning for the three tabs.

use embassy_time::Duration;

use crate::{
    color::Color,
    event::ControlRange,
};

// ── LED bar ─────────────────────────────────────────────────────────────────

/// Number of addressable LEDs driven by the colour-cycle animation.
pub const LED_COUNT: usize = 10;

/// Colour the LED bar starts with before any slider is touched.
pub const DEFAULT_BAR_COLOR: Color = Color::new(255, 153, 0);

/// Hold after each fill or clear write.
pub const FILL_HOLD: Duration = Duration::from_millis(70);

/// Hold after each step of the brightness ramp.
pub const DIM_HOLD: Duration = Duration::from_millis(25);

/// Brightness the ramp starts from; it counts down to 1.
pub const DIM_START: u8 = 40;

/// Brightness restored at the end of every cycle.
pub const REST_BRIGHTNESS: u8 = 20;

/// Side colours of the sign-on sequence.
pub const LEFT_SIDE_COLOR: Color = Color::INK;
pub const RIGHT_SIDE_COLOR: Color = Color::WHITE;

/// Range of each colour-channel slider.
pub const CHANNEL_RANGE: ControlRange = ControlRange::new(0, 255);

// ── Power ───────────────────────────────────────────────────────────────────

/// Battery poll cadence.
pub const BATTERY_POLL_PERIOD: Duration = Duration::from_millis(200);

/// Range of the backlight slider, in percent.
pub const BRIGHTNESS_RANGE: ControlRange = ControlRange::new(30, 100);

/// Backlight level before the slider is touched.
pub const DEFAULT_BRIGHTNESS: u8 = 80;

/// Motor strength while the vibration switch is on.
pub const VIBRATION_STRENGTH: u8 = 50;

// ── Wi-Fi ───────────────────────────────────────────────────────────────────

/// Access points kept on screen after each scan.
pub const MAX_ACCESS_POINTS: usize = 6;

/// Longest SSID the radio reports.
pub const SSID_LEN: usize = 32;

/// Rescan cadence when the scanner runs on a timer instead of on request.
pub const SCAN_INTERVAL: Duration = Duration::from_secs(10);
