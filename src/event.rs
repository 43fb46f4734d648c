//! Control handlers bound to the value they drive.
//!
//! The UI dispatcher calls [`EventSink::on_change`] only when a control's
//! value actually changed. The sink clamps the raw input into the control's
//! range and writes it into its [`GuardedValue`]; it never blocks beyond that
//! value's critical section.

use crate::{
    battery::PowerSettings,
    color::{
        Channel,
        Color,
    },
    config::{
        BRIGHTNESS_RANGE,
        CHANNEL_RANGE,
    },
    guarded::GuardedValue,
};

/// Inclusive range of a slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControlRange {
    pub min: i32,
    pub max: i32,
}

impl ControlRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    /// Bring `raw` into range. In-range values, bounds included, are untouched.
    pub const fn clamp(self, raw: i32) -> i32 {
        if raw < self.min {
            self.min
        } else if raw > self.max {
            self.max
        } else {
            raw
        }
    }
}

/// A typed change handler owning a reference to exactly one value.
pub struct EventSink<'a, T, F> {
    target: &'a GuardedValue<T>,
    apply: F,
}

impl<'a, T: Copy, F> EventSink<'a, T, F> {
    pub const fn new(target: &'a GuardedValue<T>, apply: F) -> Self {
        Self { target, apply }
    }

    /// Feed a changed control value into the bound [`GuardedValue`].
    pub fn on_change<I>(&self, input: I) -> T
    where
        F: Fn(&mut T, I),
    {
        self.target.update(|value| (self.apply)(value, input))
    }
}

/// Slider handler for one channel of the shared LED colour.
pub fn color_channel_sink(
    color: &GuardedValue<Color>,
    channel: Channel,
) -> EventSink<'_, Color, impl Fn(&mut Color, i32)> {
    EventSink::new(color, move |c: &mut Color, raw: i32| {
        // Clamped into 0..=255, so the cast is lossless.
        let value = CHANNEL_RANGE.clamp(raw) as u8;
        c.set_channel(channel, value);
        info!("{}: {} Color: {:x}", channel.name(), value, c.packed());
    })
}

/// Backlight brightness slider, in percent.
pub fn brightness_sink(
    settings: &GuardedValue<PowerSettings>,
) -> EventSink<'_, PowerSettings, impl Fn(&mut PowerSettings, i32)> {
    EventSink::new(settings, |s: &mut PowerSettings, raw: i32| {
        s.backlight = BRIGHTNESS_RANGE.clamp(raw) as u8;
        info!("Screen brightness: {}", s.backlight);
    })
}

/// Switch for the auxiliary (power indicator) LED.
pub fn aux_led_sink(
    settings: &GuardedValue<PowerSettings>,
) -> EventSink<'_, PowerSettings, impl Fn(&mut PowerSettings, bool)> {
    EventSink::new(settings, |s: &mut PowerSettings, on: bool| {
        s.aux_led = on;
        info!("LED state: {}", on);
    })
}

/// Switch for the vibration motor.
pub fn vibration_sink(
    settings: &GuardedValue<PowerSettings>,
) -> EventSink<'_, PowerSettings, impl Fn(&mut PowerSettings, bool)> {
    EventSink::new(settings, |s: &mut PowerSettings, on: bool| {
        s.vibration = on;
        info!("Vibration motor state: {}", on);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BAR_COLOR;

    #[test]
    fn channel_bounds_pass_through() {
        let color = GuardedValue::new(DEFAULT_BAR_COLOR);
        let red = color_channel_sink(&color, Channel::Red);
        let blue = color_channel_sink(&color, Channel::Blue);

        assert_eq!(red.on_change(0).red, 0);
        assert_eq!(blue.on_change(255).blue, 255);
        assert_eq!(color.get(), Color::new(0, 153, 255));
    }

    #[test]
    fn channel_out_of_range_is_clamped() {
        let color = GuardedValue::new(Color::BLACK);
        let green = color_channel_sink(&color, Channel::Green);

        assert_eq!(green.on_change(300).green, 255);
        assert_eq!(green.on_change(-4).green, 0);
    }

    #[test]
    fn three_channel_sinks_compose_one_color() {
        let color = GuardedValue::new(Color::BLACK);
        for (channel, raw) in Channel::ALL.into_iter().zip([0x23, 0x2f, 0x3e]) {
            color_channel_sink(&color, channel).on_change(raw);
        }
        assert_eq!(color.get().packed(), 0x23_2f_3e);
    }

    #[test]
    fn brightness_bounds_pass_through() {
        let settings = GuardedValue::new(PowerSettings::default());
        let brightness = brightness_sink(&settings);

        assert_eq!(brightness.on_change(30).backlight, 30);
        assert_eq!(brightness.on_change(100).backlight, 100);
        assert_eq!(brightness.on_change(29).backlight, 30);
        assert_eq!(brightness.on_change(101).backlight, 100);
    }

    #[test]
    fn switches_touch_only_their_field() {
        let settings = GuardedValue::new(PowerSettings::default());
        aux_led_sink(&settings).on_change(true);
        vibration_sink(&settings).on_change(true);
        vibration_sink(&settings).on_change(false);

        let s = settings.get();
        assert!(s.aux_led);
        assert!(!s.vibration);
        assert_eq!(s.backlight, PowerSettings::default().backlight);
    }

    #[test]
    fn range_clamps_to_its_bounds() {
        assert_eq!(BRIGHTNESS_RANGE.clamp(30), 30);
        assert_eq!(BRIGHTNESS_RANGE.clamp(i32::MIN), 30);
        assert_eq!(CHANNEL_RANGE.clamp(128), 128);
        assert_eq!(CHANNEL_RANGE.clamp(i32::MAX), 255);
    }
}
