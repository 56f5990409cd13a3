//! Single-register transactions with the ES8311 over I²C.
//!
//! This layer does no retries. Retry policy, if any, belongs to the caller.

use embedded_hal::blocking::i2c::{Write, WriteRead};

//
// Public Types
//

/// How the I²C bus for the ES8311 should be set up.
///
/// The pins are optional so that an unconfigured board can be detected;
/// [`crate::Codec::begin`] refuses to open the bus unless both are given.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusConfig {
    /// The GPIO number of the data line
    pub sda: Option<u8>,
    /// The GPIO number of the clock line
    pub scl: Option<u8>,
    /// The bus clock, in Hz. Fixed for the lifetime of the bus.
    pub frequency_hz: u32,
}

/// A validated [`BusConfig`], handed to the function which opens the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusPins {
    /// The GPIO number of the data line
    pub sda: u8,
    /// The GPIO number of the clock line
    pub scl: u8,
    /// The bus clock, in Hz
    pub frequency_hz: u32,
}

/// Something went wrong with a single bus transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError<E> {
    /// The peripheral did not acknowledge, or the bus timed out. Contains
    /// whatever the HAL reported.
    NackOrTimeout(E),
}

/// Talks to exactly one device on an I²C bus, one register at a time.
pub struct Transport<I2C> {
    i2c: I2C,
    address: u8,
    frequency_hz: u32,
}

//
// Public Data
//

/// The bus clock most boards run the ES8311 at.
pub const DEFAULT_FREQUENCY_HZ: u32 = 400_000;

//
// impls on Public Types
//

impl BusConfig {
    /// Describe a bus on the given pins, running at [`DEFAULT_FREQUENCY_HZ`].
    pub const fn new(sda: u8, scl: u8) -> BusConfig {
        BusConfig {
            sda: Some(sda),
            scl: Some(scl),
            frequency_hz: DEFAULT_FREQUENCY_HZ,
        }
    }

    /// Change the bus clock.
    pub const fn with_frequency(self, frequency_hz: u32) -> BusConfig {
        BusConfig {
            frequency_hz,
            ..self
        }
    }

    /// Returns the pins, if both of them have been specified.
    pub fn pins(&self) -> Option<BusPins> {
        match (self.sda, self.scl) {
            (Some(sda), Some(scl)) => Some(BusPins {
                sda,
                scl,
                frequency_hz: self.frequency_hz,
            }),
            _ => None,
        }
    }
}

impl<E> core::fmt::Display for BusError<E>
where
    E: core::fmt::Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            BusError::NackOrTimeout(e) => write!(f, "no acknowledge or timeout: {:?}", e),
        }
    }
}

impl<I2C> Transport<I2C> {
    /// Wrap an already-configured bus. Every transaction goes to `address`.
    pub fn new(i2c: I2C, address: u8, frequency_hz: u32) -> Transport<I2C> {
        Transport {
            i2c,
            address,
            frequency_hz,
        }
    }

    /// The 7-bit address this transport talks to.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// The bus clock this transport was opened with.
    pub fn frequency_hz(&self) -> u32 {
        self.frequency_hz
    }

    /// Give back the underlying bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C, E> Transport<I2C>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
{
    /// Check the device is there, with a zero-length write.
    pub fn probe(&mut self) -> Result<(), BusError<E>> {
        self.i2c
            .write(self.address, &[])
            .map_err(BusError::NackOrTimeout)
    }

    /// Set one register.
    pub fn write(&mut self, register: u8, value: u8) -> Result<(), BusError<E>> {
        debug!("ES8311 write 0x{:02x} = 0x{:02x}", register, value);
        self.i2c
            .write(self.address, &[register, value])
            .map_err(BusError::NackOrTimeout)
    }

    /// Fetch one register.
    ///
    /// The register address is sent, then a single byte is read back after a
    /// repeated start, so nobody else can get onto the bus in between.
    pub fn read(&mut self, register: u8) -> Result<u8, BusError<E>> {
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.address, &[register], &mut buffer)
            .map_err(BusError::NackOrTimeout)?;
        Ok(buffer[0])
    }
}

//
// End of file
//
