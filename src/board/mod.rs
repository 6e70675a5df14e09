//! Board Support Package for the ladderpad reference hardware.
//!
//! Maps the physical hardware to named subsystems so no other part of
//! the firmware needs to know GPIO numbers or peripheral details. Pin
//! assignments live in [`pins`], ladder calibration in [`button`].

pub mod button;
pub mod pins;

pub use button::Button;

use esp_hal::{
    analog::adc::{Adc, AdcCalCurve, AdcConfig, AdcPin, Attenuation},
    peripherals::{ADC1, GPIO2, Peripherals},
    Blocking,
};

/// Input subsystem hardware: ADC reading the pad's ladder node.
pub struct InputHw {
    pub adc: Adc<'static, ADC1<'static>, Blocking>,
    pub pad: AdcPin<GPIO2<'static>, ADC1<'static>, AdcCalCurve<ADC1<'static>>>,
}

/// Complete board hardware, ready for driver initialization.
pub struct Board {
    pub input: InputHw,
}

impl Board {
    pub fn init(p: Peripherals) -> Self {
        let mut adc_cfg = AdcConfig::new();

        // 11dB attenuation for the full 0-3.3V ladder range, with
        // curve calibration so readings come back in millivolts
        let pad = adc_cfg.enable_pin_with_cal::<_, AdcCalCurve<ADC1>>(p.GPIO2, Attenuation::_11dB);
        let adc = Adc::new(p.ADC1, adc_cfg);

        Board {
            input: InputHw { adc, pad },
        }
    }
}
