//! Battery voltage and charger status.
//!
//! The cell sits behind a 2:1 divider on an ADC1 pin; the charger pulls its
//! STAT line low while charging. There is no current gauge, so the charging
//! state stands in for the sign of the current.

use esp_hal::{
    Blocking,
    analog::adc::{
        Adc,
        AdcCalBasic,
        AdcConfig,
        AdcPin,
        Attenuation,
    },
    gpio::{
        Input,
        InputConfig,
        Pull,
    },
    peripherals::{
        ADC1,
        GPIO9,
    },
};

use super::BatteryResources;

const DIVIDER_RATIO: f32 = 2.0;

/// Nominal charge current reported while STAT is asserted.
const CHARGING_CURRENT: f32 = 0.5;
/// Nominal draw of the running badge.
const DISCHARGE_CURRENT: f32 = -0.12;

type SensePin = AdcPin<GPIO9<'static>, ADC1<'static>, AdcCalBasic<ADC1<'static>>>;

pub struct BatterySense {
    adc: Adc<'static, ADC1<'static>, Blocking>,
    pin: SensePin,
    charge: Input<'static>,
}

impl From<BatteryResources<'static>> for BatterySense {
    fn from(res: BatteryResources<'static>) -> Self {
        let mut config = AdcConfig::new();
        let pin = config
            .enable_pin_with_cal::<_, AdcCalBasic<ADC1<'static>>>(res.sense, Attenuation::_11dB);
        Self {
            adc: Adc::new(res.adc, config),
            pin,
            charge: Input::new(res.charge, InputConfig::default().with_pull(Pull::Up)),
        }
    }
}

impl BatterySense {
    /// Cell voltage in volts.
    pub fn voltage(&mut self) -> f32 {
        match nb::block!(self.adc.read_oneshot(&mut self.pin)) {
            Ok(millivolts) => f32::from(millivolts) * DIVIDER_RATIO / 1000.0,
            Err(()) => 0.0,
        }
    }

    /// Estimated cell current in amps; non-negative while charging.
    pub fn current(&self) -> f32 {
        if self.charge.is_low() {
            CHARGING_CURRENT
        } else {
            DISCHARGE_CURRENT
        }
    }
}
