use core::marker::PhantomData;

use embedded_hal::adc::{Channel, OneShot};

use crate::config::{ADC_BITS, ADC_MAX};
use crate::hal::RawSampler;

/// Samples one ADC pin, scaled down to the 10-bit range the thresholds
/// are expressed in.
pub struct AdcSampler<ADC, A, PIN> {
    adc: A,
    pin: PIN,
    shift: u8,
    _adc: PhantomData<ADC>,
}

impl<ADC, A, PIN> AdcSampler<ADC, A, PIN>
where
    A: OneShot<ADC, u16, PIN>,
    PIN: Channel<ADC>,
{
    /// `bits` is the converter's resolution.
    pub fn new(adc: A, pin: PIN, bits: u8) -> Self {
        Self { adc, pin, shift: bits.saturating_sub(ADC_BITS), _adc: PhantomData }
    }

    pub fn free(self) -> (A, PIN) {
        (self.adc, self.pin)
    }
}

impl<ADC, A, PIN> RawSampler for AdcSampler<ADC, A, PIN>
where
    A: OneShot<ADC, u16, PIN>,
    PIN: Channel<ADC>,
{
    type Error = A::Error;

    fn sample(&mut self) -> Result<u16, Self::Error> {
        let raw: u16 = nb::block!(self.adc.read(&mut self.pin))?;
        // A shift past the word width leaves nothing
        let scaled = raw.checked_shr(u32::from(self.shift)).unwrap_or(0);
        Ok(scaled.min(ADC_MAX))
    }
}
