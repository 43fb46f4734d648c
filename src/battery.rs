//! Power tab: battery indicator and power-unit controls.
//!
//! The [`BatteryPoller`] is the power tab's periodic task. Every tick it
//! pushes changed [`PowerSettings`] to the power unit, reads the battery and
//! redraws the indicator under the display lock.

use embassy_time::Duration;
use palette::Srgb;

use crate::{
    config::{
        BATTERY_POLL_PERIOD,
        DEFAULT_BRIGHTNESS,
        VIBRATION_STRENGTH,
    },
    display::{
        DisplayLock,
        Screen,
    },
    drivers::PowerManagement,
    guarded::GuardedValue,
    periodic::Periodic,
};

/// Discrete battery level shown by the indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatteryTier {
    Empty,
    Tier1,
    Tier2,
    Tier3,
    Full,
}

impl BatteryTier {
    /// Lower bounds, inclusive, from the top tier down.
    const THRESHOLDS: [(f32, Self); 4] = [
        (4.100, Self::Full),
        (3.95, Self::Tier3),
        (3.82, Self::Tier2),
        (3.60, Self::Tier1),
    ];

    /// Map a voltage to its tier. There is no hysteresis: a voltage hovering
    /// on a threshold flips the tier on every poll.
    pub fn from_voltage(volts: f32) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| volts >= *min)
            .map_or(Self::Empty, |&(_, tier)| tier)
    }

    /// Indicator colour.
    pub const fn color(self) -> Srgb<u8> {
        match self {
            Self::Full | Self::Tier3 => Srgb::new(0x0a, 0xb3, 0x00),
            Self::Tier2 => Srgb::new(0xff, 0x99, 0x00),
            Self::Tier1 | Self::Empty => Srgb::new(0xff, 0x00, 0x00),
        }
    }

    /// Number of filled bars in a four-bar battery glyph.
    pub const fn bars(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Tier1 => 1,
            Self::Tier2 => 2,
            Self::Tier3 => 3,
            Self::Full => 4,
        }
    }
}

/// Colour of the charging mark.
pub const CHARGING_COLOR: Srgb<u8> = Srgb::new(0x00, 0x00, 0xcc);

/// The battery counts as charging while current flows in, or none flows.
pub fn is_charging(amps: f32) -> bool {
    amps >= 0.0
}

/// One battery reading, as drawn by the indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryStatus {
    pub tier: BatteryTier,
    pub charging: bool,
    pub voltage: f32,
}

impl BatteryStatus {
    pub fn from_reading(voltage: f32, current: f32) -> Self {
        Self {
            tier: BatteryTier::from_voltage(voltage),
            charging: is_charging(current),
            voltage,
        }
    }
}

/// What the power tab's controls ask of the power unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSettings {
    /// Backlight level in percent.
    pub backlight: u8,
    pub aux_led: bool,
    pub vibration: bool,
}

impl PowerSettings {
    pub const fn vibration_strength(self) -> u8 {
        if self.vibration { VIBRATION_STRENGTH } else { 0 }
    }
}

impl Default for PowerSettings {
    fn default() -> Self {
        Self {
            backlight: DEFAULT_BRIGHTNESS,
            aux_led: false,
            vibration: false,
        }
    }
}

/// The power tab's periodic task.
pub struct BatteryPoller<'a, P, S> {
    power: P,
    settings: &'a GuardedValue<PowerSettings>,
    display: &'a DisplayLock<S>,
    applied: Option<PowerSettings>,
}

impl<'a, P: PowerManagement, S: Screen> BatteryPoller<'a, P, S> {
    pub const fn new(
        power: P,
        settings: &'a GuardedValue<PowerSettings>,
        display: &'a DisplayLock<S>,
    ) -> Self {
        Self {
            power,
            settings,
            display,
            applied: None,
        }
    }

    /// Push the requested settings to the power unit, touching only the
    /// outputs that changed since the last push.
    fn apply_settings(&mut self) {
        let wanted = self.settings.get();
        let previous = self.applied;
        if previous == Some(wanted) {
            return;
        }

        if previous.map(|p| p.backlight) != Some(wanted.backlight) {
            self.power.set_backlight_level(wanted.backlight);
        }
        if previous.map(|p| p.aux_led) != Some(wanted.aux_led) {
            self.power.set_aux_led(wanted.aux_led);
        }
        if previous.map(|p| p.vibration) != Some(wanted.vibration) {
            self.power.set_vibration_strength(wanted.vibration_strength());
        }

        debug!("Power settings applied: {:?}", wanted);
        self.applied = Some(wanted);
    }

    pub fn read_status(&mut self) -> BatteryStatus {
        let voltage = self.power.battery_voltage();
        let current = self.power.battery_current();
        BatteryStatus::from_reading(voltage, current)
    }

    pub fn power(&self) -> &P {
        &self.power
    }
}

impl<P: PowerManagement, S: Screen> Periodic for BatteryPoller<'_, P, S> {
    async fn tick(&mut self) -> Duration {
        self.apply_settings();
        let status = self.read_status();
        trace!("Battery: {}V {:?}", status.voltage, status.tier);

        self.display.lock().await.show_battery(status);
        BATTERY_POLL_PERIOD
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use embassy_futures::block_on;

    use super::*;
    use crate::{
        periodic::PeriodicTask,
        testing::{
            FakeScreen,
            RecordingDelay,
        },
    };

    #[test]
    fn tiers_from_voltage() {
        assert_eq!(BatteryTier::from_voltage(4.10), BatteryTier::Full);
        assert_eq!(BatteryTier::from_voltage(3.99), BatteryTier::Tier3);
        assert_eq!(BatteryTier::from_voltage(3.90), BatteryTier::Tier2);
        assert_eq!(BatteryTier::from_voltage(3.70), BatteryTier::Tier1);
        assert_eq!(BatteryTier::from_voltage(3.50), BatteryTier::Empty);
    }

    #[test]
    fn tier_colors_and_bars() {
        let green: Srgb<u8> = Srgb::new(0x0a, 0xb3, 0x00);
        let orange: Srgb<u8> = Srgb::new(0xff, 0x99, 0x00);
        let red: Srgb<u8> = Srgb::new(0xff, 0x00, 0x00);
        let expected = [
            (BatteryTier::Full, green, 4),
            (BatteryTier::Tier3, green, 3),
            (BatteryTier::Tier2, orange, 2),
            (BatteryTier::Tier1, red, 1),
            (BatteryTier::Empty, red, 0),
        ];
        for (tier, color, bars) in expected {
            assert_eq!(tier.color(), color, "{tier:?}");
            assert_eq!(tier.bars(), bars, "{tier:?}");
        }
        assert_ne!(CHARGING_COLOR, green);
        assert_ne!(CHARGING_COLOR, red);
    }

    #[test]
    fn thresholds_belong_to_the_higher_tier() {
        assert_eq!(BatteryTier::from_voltage(4.100), BatteryTier::Full);
        assert_eq!(BatteryTier::from_voltage(3.95), BatteryTier::Tier3);
        assert_eq!(BatteryTier::from_voltage(3.82), BatteryTier::Tier2);
        assert_eq!(BatteryTier::from_voltage(3.60), BatteryTier::Tier1);
    }

    #[test]
    fn just_below_thresholds_fall_a_tier() {
        assert_eq!(BatteryTier::from_voltage(4.099), BatteryTier::Tier3);
        assert_eq!(BatteryTier::from_voltage(3.949), BatteryTier::Tier2);
        assert_eq!(BatteryTier::from_voltage(3.819), BatteryTier::Tier1);
        assert_eq!(BatteryTier::from_voltage(3.599), BatteryTier::Empty);
    }

    #[test]
    fn no_hysteresis_at_a_threshold() {
        let tiers: Vec<_> = [3.82, 3.819, 3.82, 3.819]
            .into_iter()
            .map(BatteryTier::from_voltage)
            .collect();
        assert_eq!(
            tiers,
            [BatteryTier::Tier2, BatteryTier::Tier1, BatteryTier::Tier2, BatteryTier::Tier1]
        );
    }

    #[test]
    fn charging_indicator_follows_current_sign() {
        assert!(is_charging(0.0));
        assert!(is_charging(0.25));
        assert!(!is_charging(-0.01));
    }

    #[derive(Debug, PartialEq)]
    enum PowerCall {
        Backlight(u8),
        AuxLed(bool),
        Vibration(u8),
    }

    struct FakePower {
        voltage: f32,
        current: f32,
        calls: Vec<PowerCall>,
    }

    impl PowerManagement for FakePower {
        fn battery_voltage(&mut self) -> f32 {
            self.voltage
        }

        fn battery_current(&mut self) -> f32 {
            self.current
        }

        fn set_backlight_level(&mut self, percent: u8) {
            self.calls.push(PowerCall::Backlight(percent));
        }

        fn set_aux_led(&mut self, on: bool) {
            self.calls.push(PowerCall::AuxLed(on));
        }

        fn set_vibration_strength(&mut self, percent: u8) {
            self.calls.push(PowerCall::Vibration(percent));
        }
    }

    #[test]
    fn poller_shows_status_and_applies_only_changes() {
        let settings = GuardedValue::new(PowerSettings::default());
        let display = DisplayLock::new(FakeScreen::default());
        let power = FakePower {
            voltage: 3.90,
            current: -0.2,
            calls: Vec::new(),
        };
        let mut task = PeriodicTask::new(
            BatteryPoller::new(power, &settings, &display),
            RecordingDelay::default(),
        );

        block_on(async {
            task.step().await;
            task.step().await;
            settings.update(|s| s.vibration = true);
            task.step().await;
        });

        assert_eq!(
            task.work().power().calls,
            [
                PowerCall::Backlight(80),
                PowerCall::AuxLed(false),
                PowerCall::Vibration(0),
                PowerCall::Vibration(50),
            ]
        );

        let screen = block_on(display.lock());
        assert_eq!(
            screen.battery,
            Some(BatteryStatus {
                tier: BatteryTier::Tier2,
                charging: false,
                voltage: 3.90,
            })
        );
    }

    #[test]
    fn poller_waits_its_period() {
        let settings = GuardedValue::new(PowerSettings::default());
        let display = DisplayLock::new(FakeScreen::default());
        let power = FakePower {
            voltage: 4.2,
            current: 0.0,
            calls: Vec::new(),
        };
        let mut task = PeriodicTask::new(
            BatteryPoller::new(power, &settings, &display),
            RecordingDelay::default(),
        );

        let pause = block_on(task.step());
        assert_eq!(pause, BATTERY_POLL_PERIOD);
        assert_eq!(block_on(display.lock()).battery.map(|b| b.charging), Some(true));
    }
}
