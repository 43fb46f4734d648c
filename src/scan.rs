//! Wi-Fi tab: access point scanning.
//!
//! The scanner sleeps until asked (the tab was opened, or a rescan was
//! requested), scans once and swaps the on-screen list. The swap clears and
//! refills the list inside a single display-lock hold, so a viewer sees
//! either the old list or the new one, never a mix.

use embassy_sync::{
    blocking_mutex::raw::CriticalSectionRawMutex,
    signal::Signal,
};
use embassy_time::Duration;
use heapless::String;

use crate::{
    config::{
        MAX_ACCESS_POINTS,
        SCAN_INTERVAL,
        SSID_LEN,
    },
    display::{
        DisplayLock,
        Screen,
    },
    drivers::Radio,
    periodic::Periodic,
};

/// One discovered access point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPoint {
    pub ssid: String<SSID_LEN>,
    /// Signal strength in dBm.
    pub rssi: i8,
    /// Primary channel.
    pub channel: u8,
}

impl AccessPoint {
    /// Build a record, cutting the SSID at the last whole character that fits.
    pub fn new(ssid: &str, rssi: i8, channel: u8) -> Self {
        let mut name = String::new();
        for c in ssid.chars() {
            if name.push(c).is_err() {
                break;
            }
        }
        Self {
            ssid: name,
            rssi,
            channel,
        }
    }
}

/// Wakes the scanner. Raised by the UI when the Wi-Fi tab opens.
pub type ScanRequest = Signal<CriticalSectionRawMutex, ()>;

/// Row selection of the tab on screen.
///
/// Every scan rebuilds the access point list from its first entry, so asking
/// for one also puts the cursor back on row 0; a click then names the entry
/// that is highlighted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCursor {
    row: usize,
}

impl RowCursor {
    pub const fn row(self) -> usize {
        self.row
    }

    pub const fn reset(&mut self) {
        self.row = 0;
    }

    pub const fn up(&mut self) {
        self.row = self.row.saturating_sub(1);
    }

    /// Move down, staying on the last of `rows` entries.
    pub fn down(&mut self, rows: usize) {
        self.row = (self.row + 1).min(rows.saturating_sub(1));
    }

    /// Wake the scanner and go back to the top of the list.
    pub fn rescan(&mut self, request: &ScanRequest) {
        self.reset();
        request.signal(());
    }
}

/// The Wi-Fi tab's scan task.
pub struct WifiScanner<'a, R, S> {
    radio: R,
    display: &'a DisplayLock<S>,
    request: &'a ScanRequest,
}

impl<'a, R: Radio, S: Screen> WifiScanner<'a, R, S> {
    pub const fn new(radio: R, display: &'a DisplayLock<S>, request: &'a ScanRequest) -> Self {
        Self {
            radio,
            display,
            request,
        }
    }

    /// Scan once and replace the displayed list.
    ///
    /// Returns how many access points are now shown. A failed scan leaves the
    /// previous list in place and returns `None`; the next request retries.
    pub async fn refresh(&mut self) -> Option<usize> {
        let found = match self.radio.scan().await {
            Ok(found) => found,
            Err(e) => {
                warn!("Wi-Fi scan failed: {:?}", e);
                return None;
            }
        };
        info!("Total APs scanned = {}", found.len());

        let shown = &found[..found.len().min(MAX_ACCESS_POINTS)];
        {
            let mut screen = self.display.lock().await;
            screen.clear_access_points();
            for ap in shown {
                screen.append_access_point(ap);
            }
        }

        for ap in shown {
            info!("SSID {} RSSI {} Channel {}", ap.ssid.as_str(), ap.rssi, ap.channel);
        }
        Some(shown.len())
    }

    /// Scan every time a request comes in. Never returns.
    pub async fn run(mut self) -> ! {
        loop {
            self.request.wait().await;
            self.refresh().await;
        }
    }

    pub fn radio(&self) -> &R {
        &self.radio
    }
}

/// Timer-driven mode: rescan on a fixed interval instead of on request.
impl<R: Radio, S: Screen> Periodic for WifiScanner<'_, R, S> {
    async fn tick(&mut self) -> Duration {
        self.refresh().await;
        SCAN_INTERVAL
    }
}

/// Click handler for an entry of the list. Only logs the SSID.
pub async fn access_point_clicked<S: Screen>(display: &DisplayLock<S>, index: usize) {
    let screen = display.lock().await;
    if let Some(ap) = screen.access_point(index) {
        info!("Clicked: {}", ap.ssid.as_str());
    }
}
