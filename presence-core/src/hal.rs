//! Capabilities the control logic needs from the board.

use core::fmt::Debug;

/// One analog channel returning raw readings in `ADC_MIN..=ADC_MAX`.
pub trait RawSampler {
    type Error;

    fn sample(&mut self) -> Result<u16, Self::Error>;
}

/// Milliseconds since power-on, wrapping at `u32::MAX`.
pub trait Clock {
    fn now_millis(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_millis(&self) -> u32 {
        (**self).now_millis()
    }
}

/// Commands understood by the MP3 player.
///
/// Volumes are attenuations: 0 is the loudest setting.
pub trait PlaybackDevice {
    type Error: Debug;

    fn open(&mut self) -> Result<(), Self::Error>;
    fn set_bit_rate(&mut self, kbps: u16) -> Result<(), Self::Error>;
    fn set_volume(&mut self, left: u8, right: u8) -> Result<(), Self::Error>;
    fn start_track(&mut self, track: u16) -> Result<(), Self::Error>;
    fn resume_stream(&mut self) -> Result<(), Self::Error>;
    fn pause_stream(&mut self) -> Result<(), Self::Error>;
}
