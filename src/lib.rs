//! # ES8311 Driver
//!
//! This is a driver for the Everest Semiconductor ES8311 low-power mono audio
//! CODEC.
//!
//! Specifically, this driver is for setting the registers in the ES8311 over
//! I²C - this driver does not handle the digital audio interface (I²S, or
//! similar), which must supply MCLK at 256 x Fs (128 x Fs above 64 kHz).
//!
//! The ES8311 has the following inputs and outputs:
//!
//! * Mono analog Microphone Input, with PGA
//! * Mono analog Output, with headphone driver
//! * Digital Input (to the DAC)
//! * Digital Output (from the ADC)
//!
//! The [`Codec`] talks to the chip directly. Every register it only partly
//! owns is updated with a read-modify-write, so bits set by somebody else
//! survive.
//!
//! If you want the board-level defaults (volume, an amplifier enable pin),
//! use [`AudioCodec`] instead.
//!
//! # Example
//!
//! You might setup the Codec like this:
//!
//! ```rust
//! # use embedded_hal::blocking::delay::DelayMs;
//! # use embedded_hal::blocking::i2c::{SevenBitAddress, Write, WriteRead};
//! # struct I2c;
//! # impl Write for I2c {
//! #     type Error = ();
//! #     fn write(&mut self, _address: SevenBitAddress, _bytes: &[u8]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # impl WriteRead for I2c {
//! #     type Error = ();
//! #     fn write_read(&mut self, _address: SevenBitAddress, _bytes: &[u8], buffer: &mut [u8]) -> Result<(), Self::Error> {
//! #         buffer.fill(0);
//! #         Ok(())
//! #     }
//! # }
//! # struct Delay;
//! # impl DelayMs<u8> for Delay {
//! #     fn delay_ms(&mut self, _ms: u8) {}
//! # }
//! let mut codec = es8311::Codec::new(es8311::BusAddress::CeLow, Delay);
//! let config = es8311::BusConfig::new(15, 14).with_frequency(400_000);
//! if let Err(e) = codec.begin(config, |_pins| I2c) {
//!     // Codec didn't respond, or some of the bring-up didn't stick
//! }
//! codec.set_sample_rate(44_100).unwrap();
//! codec.set_bits_per_sample(24).unwrap();
//! codec.set_volume(70).unwrap();
//! codec.enable_microphone(true).unwrap();
//! codec.set_microphone_gain(4).unwrap();
//! ```

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

#[macro_use]
mod fmt;

pub mod bus;
pub mod codec;
pub mod coeffs;
pub mod device;

pub use bus::{BusConfig, BusError, BusPins, Transport};
pub use codec::{Codec, CodecState, RegisterDump, State};
pub use coeffs::CoefficientEntry;
pub use device::{AudioCodec, DeviceError, NoAmplifier};

//
// Public Types
//

/// The ES8311 has one of two I²C addresses, depending on whether the CE pin
/// is pulled high or low.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusAddress {
    /// The address when the CE pin is high
    CeHigh = 0x19,
    /// The address when the CE pin is low
    #[default]
    CeLow = 0x18,
}

/// Everything that can go wrong when configuring the ES8311.
///
/// `E` is the error type of your I²C bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// SDA or SCL wasn't given, so the bus was never opened
    InvalidPins,
    /// Nothing acknowledged the probe at the ES8311's address
    DeviceNotFound,
    /// A single register read or write failed
    BusTransactionFailed {
        /// The register being accessed
        register: u8,
        /// What the bus said
        cause: BusError<E>,
    },
    /// No clock coefficients for this sample rate (in Hz)
    UnsupportedRate(u32),
    /// Word length (in bits) isn't one of 16, 18, 20, 24 or 32
    UnsupportedWordLength(u8),
    /// [`Codec::begin`] hasn't opened the bus yet
    NotInitialized,
}

//
// impls on Public Types
//

impl From<BusAddress> for u8 {
    fn from(addr: BusAddress) -> u8 {
        addr as u8
    }
}

impl<E> core::fmt::Display for Error<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidPins => write!(f, "invalid SDA/SCL pins"),
            Error::DeviceNotFound => write!(f, "ES8311 not found"),
            Error::BusTransactionFailed { register, cause } => {
                write!(f, "register 0x{:02x}: {}", register, cause)
            }
            Error::UnsupportedRate(rate) => write!(f, "unsupported sample rate {} Hz", rate),
            Error::UnsupportedWordLength(bits) => {
                write!(f, "unsupported word length {} bits", bits)
            }
            Error::NotInitialized => write!(f, "bus not open"),
        }
    }
}

//
// End of file
//
