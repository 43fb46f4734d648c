//! WS2812 LED bar driver using the RMT peripheral.
//!
//! The badge has 10 RGB LEDs in two bars of five; the colour-cycle animation
//! drives them through [`LedStrip`].

use embassy_time::{
    Duration,
    Timer,
};
use esp_hal::{
    Blocking,
    gpio::Level,
    rmt::{
        PulseCode,
        Tx,
    },
};

use crate::{
    color::Color,
    config::{
        LED_COUNT,
        REST_BRIGHTNESS,
    },
    drivers::{
        LedStrip,
        Side,
    },
};

/// Number of LEDs per bar (left or right).
/// Indexing is counter clockwise starting from the bottom right: index 0 is
/// bottom right, 4 top right, 5 top left, 9 bottom left.
pub const BAR_COUNT: usize = LED_COUNT / 2;

/// WS2812 strip with an in-memory framebuffer and a global brightness.
///
/// The framebuffer holds full-scale colours; brightness is applied when the
/// frame is flushed with [`show`](LedStrip::show).
pub struct Leds<'a> {
    channel: Option<esp_hal::rmt::Channel<'a, Blocking, Tx>>,
    framebuffer: [Color; LED_COUNT],
    brightness: u8,
}

impl<'a> Leds<'a> {
    pub const fn new(channel: esp_hal::rmt::Channel<'a, Blocking, Tx>) -> Self {
        Self {
            channel: Some(channel),
            framebuffer: [Color::BLACK; LED_COUNT],
            brightness: REST_BRIGHTNESS,
        }
    }

    /// Fill the right bar, bottom to top. Hardware indices 0..4 already run
    /// bottom to top.
    fn set_right_bar(&mut self, colors: &[Color; BAR_COUNT]) {
        self.framebuffer[..BAR_COUNT].copy_from_slice(colors);
    }

    /// Fill the left bar, bottom to top. Hardware index 5 is the top and 9
    /// the bottom, so the slice is reversed.
    fn set_left_bar(&mut self, colors: &[Color; BAR_COUNT]) {
        for i in 0..BAR_COUNT {
            self.framebuffer[BAR_COUNT + i] = colors[BAR_COUNT - 1 - i];
        }
    }

    /// WS2812 bit timing at 40 MHz RMT clock.
    const fn bit_to_pulse(bit: bool) -> PulseCode {
        if bit {
            // '1': 0.8 µs high (32 ticks), 0.45 µs low (18 ticks)
            PulseCode::new(Level::High, 32, Level::Low, 18)
        } else {
            // '0': 0.4 µs high (16 ticks), 0.85 µs low (34 ticks)
            PulseCode::new(Level::High, 16, Level::Low, 34)
        }
    }

    fn byte_to_pulses(byte: u8) -> [PulseCode; 8] {
        let mut pulses = [PulseCode::default(); 8];
        for (i, pulse) in pulses.iter_mut().enumerate() {
            *pulse = Self::bit_to_pulse((byte >> (7 - i)) & 1 != 0);
        }
        pulses
    }
}

impl LedStrip for Leds<'_> {
    fn set_pixel(&mut self, index: usize, color: Color) {
        if let Some(led) = self.framebuffer.get_mut(index) {
            *led = color;
        }
    }

    fn set_side(&mut self, side: Side, color: Color) {
        let bar = [color; BAR_COUNT];
        match side {
            Side::Left => self.set_left_bar(&bar),
            Side::Right => self.set_right_bar(&bar),
        }
    }

    fn set_brightness(&mut self, level: u8) {
        self.brightness = level;
    }

    fn clear(&mut self) {
        self.framebuffer.fill(Color::BLACK);
    }

    async fn show(&mut self) {
        let Some(channel) = self.channel.take() else {
            error!("RMT channel lost during previous transmission");
            return;
        };

        let brightness = self.brightness;
        let pulses = self
            .framebuffer
            .iter()
            .flat_map(|color| {
                let c = color.scaled(brightness);
                // WS2812 expects GRB byte order
                [
                    Self::byte_to_pulses(c.green),
                    Self::byte_to_pulses(c.red),
                    Self::byte_to_pulses(c.blue),
                ]
                .into_iter()
                .flatten()
            })
            .chain(core::iter::once(PulseCode::end_marker()))
            .collect::<alloc::vec::Vec<_>>();

        let transaction = match channel.transmit(&pulses) {
            Ok(t) => t,
            Err(e) => {
                error!("RMT transmit failed: {}", e);
                return;
            }
        };

        self.channel = Some(match transaction.wait() {
            Ok(ch) => ch,
            Err((err, ch)) => {
                error!("RMT transaction failed: {}", err);
                ch
            }
        });

        // WS2812 reset time
        Timer::after(Duration::from_micros(50)).await;
    }
}
