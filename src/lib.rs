//! # factory-demo
//!
//! Factory demo firmware for the Disobey 2026 badge: three tabs exercising
//! the LED bar, the power unit and the Wi-Fi radio.
//!
//! - **LED Bar**: RGB sliders set a shared colour that a looping
//!   fill/clear/dim animation paints onto the 10 LEDs ([`animation`])
//! - **Power**: battery tier indicator polled every 200 ms, plus backlight,
//!   indicator LED and vibration controls ([`battery`])
//! - **Wi-Fi**: scans on demand and lists the six first access points
//!   ([`scan`])
//!
//! UI handlers and background tasks share state through
//! [`GuardedValue`](guarded::GuardedValue)s and draw under one
//! [`DisplayLock`](display::DisplayLock). Everything above the [`drivers`]
//! traits runs on the host; the `board` feature adds the ESP32-S3 bindings.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! let peripherals = factory_demo::board::init();
//! let resources = split_resources!(peripherals);
//!
//! let color = mk_static!(GuardedValue<Color>, GuardedValue::new(DEFAULT_BAR_COLOR));
//! let leds: Leds = resources.leds.into();
//! let cycle = PeriodicTask::new(ColorCycle::new(leds, color), Delay);
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
mod fmt;

pub mod animation;
pub mod battery;
pub mod color;
pub mod config;
pub mod display;
pub mod drivers;
pub mod event;
pub mod guarded;
pub mod periodic;
pub mod scan;

#[cfg(feature = "board")]
pub mod board;

#[cfg(test)]
mod testing;

pub use fmt::Loggable;
