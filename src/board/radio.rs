//! Wi-Fi station used only for scanning.

use alloc::vec::Vec;

use esp_radio::wifi::{
    ClientConfig,
    ModeConfig,
    ScanConfig,
    WifiController,
    WifiError,
};

use super::RadioResources;
use crate::{
    config::MAX_ACCESS_POINTS,
    drivers::Radio,
    scan::AccessPoint,
};

/// Extra results requested beyond what the list shows, so truncation has
/// something to cut.
const SCAN_HEADROOM: usize = 4;

pub struct EspRadio {
    controller: WifiController<'static>,
}

impl EspRadio {
    /// Bring the radio up in station mode without connecting anywhere.
    pub fn new(
        radio: &'static esp_radio::Controller<'static>,
        res: RadioResources<'static>,
    ) -> Result<Self, WifiError> {
        let (mut controller, _interfaces) = esp_radio::wifi::new(radio, res.wifi, Default::default())?;
        controller.set_config(&ModeConfig::Client(ClientConfig::default()))?;
        controller.start()?;
        info!("Wi-Fi station started");
        Ok(Self { controller })
    }
}

impl Radio for EspRadio {
    type Error = WifiError;

    async fn scan(&mut self) -> Result<Vec<AccessPoint>, WifiError> {
        let found = self
            .controller
            .scan_with_config_async(ScanConfig::default().with_max(MAX_ACCESS_POINTS + SCAN_HEADROOM))
            .await?;
        Ok(found
            .iter()
            .map(|ap| AccessPoint::new(&ap.ssid, ap.signal_strength, ap.channel))
            .collect())
    }
}
