//! Fakes shared by the unit tests.

use std::vec::Vec;

use embedded_hal_async::delay::DelayNs;

use crate::{
    battery::BatteryStatus,
    display::Screen,
    scan::AccessPoint,
};

/// Records every delay instead of sleeping.
#[derive(Default)]
pub struct RecordingDelay {
    pub waits_ns: Vec<u64>,
}

impl RecordingDelay {
    pub fn waits_ms(&self) -> Vec<u64> {
        self.waits_ns.iter().map(|ns| ns / 1_000_000).collect()
    }
}

impl DelayNs for RecordingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits_ns.push(u64::from(ns));
    }

    async fn delay_us(&mut self, us: u32) {
        self.waits_ns.push(u64::from(us) * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits_ns.push(u64::from(ms) * 1_000_000);
    }
}

/// A screen that keeps what it was asked to show.
#[derive(Default)]
pub struct FakeScreen {
    pub battery: Option<BatteryStatus>,
    pub access_points: Vec<AccessPoint>,
}

impl Screen for FakeScreen {
    fn show_battery(&mut self, status: BatteryStatus) {
        self.battery = Some(status);
    }

    fn clear_access_points(&mut self) {
        self.access_points.clear();
    }

    fn append_access_point(&mut self, ap: &AccessPoint) {
        self.access_points.push(ap.clone());
    }

    fn access_point(&self, index: usize) -> Option<&AccessPoint> {
        self.access_points.get(index)
    }
}
