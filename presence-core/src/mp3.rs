//! Driver for serial-controlled MP3 modules (DFPlayer and compatibles).
//!
//! Every command is one 10-byte frame:
//! `7E FF 06 cmd feedback param_hi param_lo chk_hi chk_lo EF`, where the
//! checksum is the two's complement of the sum of bytes 1 to 6.

use embedded_hal::serial::Write;

use crate::hal::PlaybackDevice;

const START: u8 = 0x7E;
const VERSION: u8 = 0xFF;
const LEN: u8 = 0x06;
const NO_FEEDBACK: u8 = 0x00;
const END: u8 = 0xEF;

const SOURCE_SD: u16 = 0x02;
const MAX_LEVEL: u16 = 30;
// Attenuation from which the output is silent
const SILENT: u16 = 0xFE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
enum Command {
    PlayTrack = 0x03,
    Volume = 0x06,
    Source = 0x09,
    Resume = 0x0D,
    Pause = 0x0E,
}

pub struct Mp3Module<TX> {
    tx: TX,
    bit_rate: u16,
}

impl<TX, E> Mp3Module<TX>
where
    TX: Write<u8, Error = E>,
{
    /// The module needs about a second after power-up before it listens.
    pub fn new(tx: TX) -> Self {
        Self { tx, bit_rate: 0 }
    }

    /// Bit rate last requested. The module decodes at the file's own rate.
    pub fn bit_rate(&self) -> u16 {
        self.bit_rate
    }

    pub fn free(self) -> TX {
        self.tx
    }

    fn send(&mut self, cmd: Command, param: u16) -> Result<(), E> {
        for byte in frame(cmd, param) {
            nb::block!(self.tx.write(byte))?;
        }
        nb::block!(self.tx.flush())
    }
}

fn frame(cmd: Command, param: u16) -> [u8; 10] {
    let [hi, lo] = param.to_be_bytes();
    let mut buf = [START, VERSION, LEN, cmd as u8, NO_FEEDBACK, hi, lo, 0, 0, END];
    let sum = buf[1..7].iter().fold(0_u16, |acc, &b| acc.wrapping_add(b as u16));
    let [chk_hi, chk_lo] = 0_u16.wrapping_sub(sum).to_be_bytes();
    buf[7] = chk_hi;
    buf[8] = chk_lo;
    buf
}

/// Maps a decoder attenuation (0 loudest, 0xFE silent) onto the module's
/// 0..=30 level. The louder channel wins since the module has only one.
fn level(left: u8, right: u8) -> u16 {
    let attenuation = (left.min(right) as u16).min(SILENT);
    MAX_LEVEL * (SILENT - attenuation) / SILENT
}

impl<TX, E> PlaybackDevice for Mp3Module<TX>
where
    TX: Write<u8, Error = E>,
    E: core::fmt::Debug,
{
    type Error = E;

    fn open(&mut self) -> Result<(), E> {
        self.send(Command::Source, SOURCE_SD)
    }

    fn set_bit_rate(&mut self, kbps: u16) -> Result<(), E> {
        self.bit_rate = kbps;
        Ok(())
    }

    fn set_volume(&mut self, left: u8, right: u8) -> Result<(), E> {
        self.send(Command::Volume, level(left, right))
    }

    fn start_track(&mut self, track: u16) -> Result<(), E> {
        self.send(Command::PlayTrack, track)
    }

    fn resume_stream(&mut self) -> Result<(), E> {
        self.send(Command::Resume, 0)
    }

    fn pause_stream(&mut self) -> Result<(), E> {
        self.send(Command::Pause, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Wire {
        bytes: Vec<u8>,
        flushes: usize,
        full: bool,
        broken: bool,
    }

    impl Write<u8> for Wire {
        type Error = &'static str;

        fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
            if self.broken {
                return Err(nb::Error::Other("framing"));
            }
            // Every other write finds the FIFO full
            self.full = !self.full;
            if self.full {
                return Err(nb::Error::WouldBlock);
            }
            self.bytes.push(word);
            Ok(())
        }

        fn flush(&mut self) -> nb::Result<(), Self::Error> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn play_track_frame() {
        let mut module = Mp3Module::new(Wire::default());
        module.start_track(1).unwrap();
        let wire = module.free();
        assert_eq!(wire.bytes, [0x7E, 0xFF, 0x06, 0x03, 0x00, 0x00, 0x01, 0xFE, 0xF7, 0xEF]);
        assert_eq!(wire.flushes, 1);
    }

    #[test]
    fn pause_and_resume_frames() {
        let mut module = Mp3Module::new(Wire::default());
        module.pause_stream().unwrap();
        module.resume_stream().unwrap();
        let wire = module.free();
        assert_eq!(&wire.bytes[..10], [0x7E, 0xFF, 0x06, 0x0E, 0x00, 0x00, 0x00, 0xFE, 0xED, 0xEF]);
        assert_eq!(&wire.bytes[10..], [0x7E, 0xFF, 0x06, 0x0D, 0x00, 0x00, 0x00, 0xFE, 0xEE, 0xEF]);
    }

    #[test]
    fn open_selects_sd_card() {
        let mut module = Mp3Module::new(Wire::default());
        module.open().unwrap();
        assert_eq!(module.free().bytes[3..7], [0x09, 0x00, 0x00, 0x02]);
    }

    #[test]
    fn attenuation_maps_to_level() {
        assert_eq!(level(0, 0), 30);
        assert_eq!(level(0xFE, 0xFE), 0);
        assert_eq!(level(0xFF, 0xFF), 0);
        assert_eq!(level(127, 127), 15);
        assert_eq!(level(0xFE, 0), 30);

        let mut module = Mp3Module::new(Wire::default());
        module.set_volume(0, 0).unwrap();
        assert_eq!(module.free().bytes[3..7], [0x06, 0x00, 0x00, 30]);
    }

    #[test]
    fn bit_rate_is_recorded_only() {
        let mut module = Mp3Module::new(Wire::default());
        module.set_bit_rate(192).unwrap();
        assert_eq!(module.bit_rate(), 192);
        assert!(module.free().bytes.is_empty());
    }

    #[test]
    fn write_error_aborts_frame() {
        let mut module = Mp3Module::new(Wire { broken: true, ..Wire::default() });
        assert_eq!(module.pause_stream(), Err("framing"));
        let wire = module.free();
        assert!(wire.bytes.is_empty());
        assert_eq!(wire.flushes, 0);
    }
}
