//! A board-level wrapper around [`Codec`].
//!
//! This adds the things a board needs at power on but the chip doesn't know
//! about: which volume and word length to start with, and an optional GPIO
//! that enables an external power amplifier.

use core::convert::Infallible;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Write, WriteRead};
use embedded_hal::digital::v2::OutputPin;

use crate::bus::{BusConfig, BusPins};
use crate::codec::{Codec, CodecState, RegisterDump, Sequence, State, DEFAULT_BITS_PER_SAMPLE};
use crate::{BusAddress, Error};

//
// Public Types
//

/// An ES8311 plus the board-level settings around it.
pub struct AudioCodec<I2C, D, PA = NoAmplifier> {
    codec: Codec<I2C, D>,
    amplifier: PA,
    volume: u8,
    bits_per_sample: u8,
}

/// Use this when there is no amplifier enable pin.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct NoAmplifier;

/// Errors from [`AudioCodec::begin`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError<E, P> {
    /// The CODEC failed
    Codec(Error<E>),
    /// The amplifier enable pin couldn't be driven
    Amplifier(P),
}

//
// Public Data
//

/// The volume, in percent, applied after bring-up.
pub const DEFAULT_VOLUME: u8 = 70;

//
// impls on Public Types
//

impl OutputPin for NoAmplifier {
    type Error = Infallible;

    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<E, P> From<Error<E>> for DeviceError<E, P> {
    fn from(e: Error<E>) -> DeviceError<E, P> {
        DeviceError::Codec(e)
    }
}

impl<E, P> core::fmt::Display for DeviceError<E, P>
where
    E: core::fmt::Debug,
    P: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DeviceError::Codec(e) => write!(f, "codec: {}", e),
            DeviceError::Amplifier(e) => write!(f, "amplifier pin: {:?}", e),
        }
    }
}

impl<I2C, D> AudioCodec<I2C, D, NoAmplifier> {
    /// Create a wrapper for a board with no amplifier enable pin.
    pub fn new(address: BusAddress, delay: D) -> AudioCodec<I2C, D, NoAmplifier> {
        AudioCodec::with_amplifier(address, delay, NoAmplifier)
    }
}

impl<I2C, D, PA> AudioCodec<I2C, D, PA> {
    /// Create a wrapper which drives `amplifier` high before bring-up.
    pub fn with_amplifier(address: BusAddress, delay: D, amplifier: PA) -> AudioCodec<I2C, D, PA> {
        AudioCodec {
            codec: Codec::new(address, delay),
            amplifier,
            volume: DEFAULT_VOLUME,
            bits_per_sample: DEFAULT_BITS_PER_SAMPLE,
        }
    }

    /// Change the volume applied by [`AudioCodec::begin`].
    pub fn with_volume(mut self, percent: u8) -> Self {
        self.volume = percent.min(100);
        self
    }

    /// Change the word length applied by [`AudioCodec::begin`].
    pub fn with_bits_per_sample(mut self, bits: u8) -> Self {
        self.bits_per_sample = bits;
        self
    }

    /// The volume that is, or will be, applied.
    pub fn volume(&self) -> u8 {
        self.volume
    }

    /// Where the CODEC is in its bring-up.
    pub fn state(&self) -> State {
        self.codec.state()
    }

    /// The settings last written to the CODEC.
    pub fn settings(&self) -> &CodecState {
        self.codec.settings()
    }

    /// Get at the underlying driver.
    pub fn codec(&mut self) -> &mut Codec<I2C, D> {
        &mut self.codec
    }

    /// Take apart the wrapper.
    pub fn release(self) -> (Codec<I2C, D>, PA) {
        (self.codec, self.amplifier)
    }
}

impl<I2C, D, PA, E, P> AudioCodec<I2C, D, PA>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    D: DelayMs<u8>,
    PA: OutputPin<Error = P>,
{
    /// Power the amplifier, bring up the CODEC, then apply the default
    /// volume and word length.
    ///
    /// The defaults are applied even if some of the CODEC bring-up failed,
    /// as long as the device answered. The first failure is returned.
    pub fn begin<F>(&mut self, config: BusConfig, open: F) -> Result<(), DeviceError<E, P>>
    where
        F: FnOnce(BusPins) -> I2C,
    {
        self.amplifier.set_high().map_err(DeviceError::Amplifier)?;

        let mut sequence = Sequence::new();
        match self.codec.begin(config, open) {
            Err(e @ (Error::InvalidPins | Error::DeviceNotFound)) => return Err(e.into()),
            result => sequence.record(result),
        }
        sequence.record(self.codec.set_volume(self.volume));
        sequence.record(self.codec.set_bits_per_sample(self.bits_per_sample));
        sequence.finish()?;
        Ok(())
    }

    /// Turn the external amplifier on or off.
    pub fn set_amplifier_enabled(&mut self, enabled: bool) -> Result<(), P> {
        if enabled {
            self.amplifier.set_high()
        } else {
            self.amplifier.set_low()
        }
    }

    /// See [`Codec::set_volume`].
    pub fn set_volume(&mut self, percent: u8) -> Result<(), Error<E>> {
        self.codec.set_volume(percent)?;
        self.volume = percent.min(100);
        Ok(())
    }

    /// See [`Codec::get_volume`].
    pub fn get_volume(&mut self) -> Result<u8, Error<E>> {
        self.codec.get_volume()
    }

    /// See [`Codec::set_sample_rate`].
    pub fn set_sample_rate(&mut self, sample_rate_hz: u32) -> Result<(), Error<E>> {
        self.codec.set_sample_rate(sample_rate_hz)
    }

    /// See [`Codec::set_bits_per_sample`].
    pub fn set_bits_per_sample(&mut self, bits: u8) -> Result<(), Error<E>> {
        self.codec.set_bits_per_sample(bits)?;
        self.bits_per_sample = bits;
        Ok(())
    }

    /// See [`Codec::enable_microphone`].
    pub fn enable_microphone(&mut self, enable: bool) -> Result<(), Error<E>> {
        self.codec.enable_microphone(enable)
    }

    /// See [`Codec::set_microphone_gain`].
    pub fn set_microphone_gain(&mut self, gain: u8) -> Result<(), Error<E>> {
        self.codec.set_microphone_gain(gain)
    }

    /// See [`Codec::get_microphone_gain`].
    pub fn get_microphone_gain(&mut self) -> Result<u8, Error<E>> {
        self.codec.get_microphone_gain()
    }

    /// See [`Codec::dump_registers`].
    pub fn dump_registers(&mut self) -> RegisterDump {
        self.codec.dump_registers()
    }
}

//
// End of file
//
