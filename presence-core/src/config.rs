//! Compile-time parameters of the device.

/// Number of consecutive ADC samples to average.
pub const HISTORY_LEN: usize = 5;

/// ADC limits, mapping linearly from 0 to 5 V.
pub const ADC_MIN: u16 = 0;
pub const ADC_MAX: u16 = 1023;

/// Resolution of a raw reading.
pub const ADC_BITS: u8 = 10;

/// Disallow presence state changes within this many ms of each other.
pub const MIN_DWELL_MS: u32 = 1000;

pub const DEFAULT_VOLUME: u16 = 50;

/// Left/right attenuation written at startup. 0 is the loudest setting.
pub const INITIAL_ATTENUATION: u8 = 0;

pub const BIT_RATE_KBPS: u16 = 192;

pub const TRACK_NUMBER: u16 = 1;

/// Analog input the sonar is wired to.
pub const SONAR_CHANNEL: u8 = 0;

/// An object closer than this counts as present.
pub const DISTANCE_THRESHOLD_IN: u32 = 72;
pub const DISTANCE_THRESHOLD: u16 = inches_to_adc(DISTANCE_THRESHOLD_IN);

/// Converts inches to ADC units so a distance can be compared with sonar
/// readings.
///
/// The sonar outputs 9.8 mV per inch and the ADC maps 5000 mV to 1023, so
/// one inch is `1023 * 9.8 / 5000` ADC units. Only convert in this
/// direction; going from ADC units back to inches loses precision.
pub const fn inches_to_adc(inches: u32) -> u16 {
    ((inches * 50127) / 25000) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_in_adc_units() {
        assert_eq!(DISTANCE_THRESHOLD, 144);
        assert_eq!(inches_to_adc(0), 0);
        assert_eq!(inches_to_adc(1), 2);
        // 5000 mV / 9.8 mV per inch, truncated
        assert!(inches_to_adc(510) <= ADC_MAX);
    }
}
