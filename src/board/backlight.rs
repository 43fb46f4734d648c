//! Display backlight, dimmed with LEDC PWM.

use esp_hal::{
    gpio::DriveMode,
    ledc::{
        LSGlobalClkSource,
        Ledc,
        LowSpeed,
        channel::{
            self,
            ChannelIFace as _,
        },
        timer::{
            self,
            TimerIFace as _,
        },
    },
    time::Rate,
};

use crate::{
    board::BacklightResources,
    config::DEFAULT_BRIGHTNESS,
    mk_static,
};

/// Controls the display backlight level.
pub struct Backlight {
    channel: channel::Channel<'static, LowSpeed>,
}

impl From<BacklightResources<'static>> for Backlight {
    fn from(res: BacklightResources<'static>) -> Self {
        let mut ledc = Ledc::new(res.ledc);
        ledc.set_global_slow_clock(LSGlobalClkSource::APBClk);

        let pwm_timer = mk_static!(
            timer::Timer<'static, LowSpeed>,
            ledc.timer::<LowSpeed>(timer::Number::Timer0)
        );
        pwm_timer
            .configure(timer::config::Config {
                duty: timer::config::Duty::Duty8Bit,
                clock_source: timer::LSClockSource::APBClk,
                frequency: Rate::from_khz(20),
            })
            .unwrap();

        let mut channel = ledc.channel(channel::Number::Channel0, res.led);
        channel
            .configure(channel::config::Config {
                timer: pwm_timer,
                duty_pct: DEFAULT_BRIGHTNESS,
                drive_mode: DriveMode::PushPull,
            })
            .unwrap();

        Self { channel }
    }
}

impl Backlight {
    /// Set the level in percent, 0–100.
    pub fn set_level(&mut self, percent: u8) {
        let percent = percent.min(100);
        if let Err(e) = self.channel.set_duty(percent) {
            error!("Backlight duty {}% rejected: {}", percent, defmt::Debug2Format(&e));
        }
    }
}
