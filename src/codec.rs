//! The ES8311 driver proper.
//!
//! The ES8311 registers can be read back over I²C, so every partial-register
//! update is a read-modify-write against the chip itself. Nothing is cached.

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Write, WriteRead};

use crate::bus::{BusConfig, BusPins, Transport};
use crate::coeffs::{self, CoefficientEntry};
use crate::{BusAddress, Error};

//
// Public Types
//

/// Where the driver is in its bring-up.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum State {
    /// [`Codec::begin`] hasn't been called.
    Uninitialized,
    /// The reset bits are asserted and we are waiting for the chip to settle.
    Resetting,
    /// Reset is released and the clocks, serial port and analog paths are
    /// being configured.
    PoweringUp,
    /// Every bring-up write was acknowledged.
    Configured,
    /// A bus transaction failed, or the device didn't answer the probe. Only
    /// a successful [`Codec::begin`] gets out of this state.
    Faulted,
}

/// What we last told the chip to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CodecState {
    /// The MCLK frequency the clock dividers are set up for
    pub mclk_hz: u32,
    /// The ADC and DAC sample rate
    pub sample_rate_hz: u32,
    /// Serial port word length
    pub bits_per_sample: u8,
    /// DAC volume, 0..=100
    pub volume: u8,
    /// ADC gain step, 0..=7
    pub mic_gain: u8,
}

/// A snapshot of every register, from [`Codec::dump_registers`].
///
/// Registers which could not be read show as zero.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RegisterDump {
    values: [u8; DUMP_LEN],
}

/// Drives an ES8311 CODEC over I²C.
pub struct Codec<I2C, D> {
    address: BusAddress,
    transport: Option<Transport<I2C>>,
    delay: D,
    state: State,
    settings: CodecState,
}

//
// Private Types
//

/// The registers we touch in the ES8311
#[derive(Copy, Clone, Debug)]
enum Register {
    Reset = 0x00,
    ClockManager1 = 0x01,
    ClockManager2 = 0x02,
    ClockManager3 = 0x03,
    ClockManager4 = 0x04,
    ClockManager5 = 0x05,
    ClockManager6 = 0x06,
    ClockManager7 = 0x07,
    ClockManager8 = 0x08,
    DacSerialPort = 0x09,
    AdcSerialPort = 0x0A,
    SystemPowerUp = 0x0D,
    SystemModulator = 0x0E,
    SystemDacPower = 0x12,
    SystemOutput = 0x13,
    SystemMicInput = 0x14,
    AdcGain = 0x16,
    AdcVolume = 0x17,
    AdcEqualizer = 0x1C,
    DacVolume = 0x32,
    DacEqualizer = 0x37,
}

/// Runs a series of register operations to the end, remembering the first
/// thing that went wrong.
pub(crate) struct Sequence<E> {
    first_error: Option<Error<E>>,
    failures: u8,
}

//
// Public Data
//

/// The sample rate [`Codec::begin`] sets up.
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 48_000;

/// The word length [`Codec::begin`] sets up.
pub const DEFAULT_BITS_PER_SAMPLE: u8 = 16;

/// How many registers [`Codec::dump_registers`] reads (0x00 to 0x49).
pub const DUMP_LEN: usize = 0x4A;

//
// Private Data
//

/// Assert every reset bit
const RESET_ASSERT: u8 = 0x1F;
/// Release reset, chip still powered down
const RESET_RELEASE: u8 = 0x00;
/// Release reset and power on
const POWER_ON: u8 = 0x80;
/// Every internal clock domain on
const ALL_CLOCKS_ON: u8 = 0x3F;
/// The chip's state machine needs this long after reset is asserted
const RESET_SETTLE_MS: u8 = 20;

/// Inverts BCLK when set
const BCLK_INVERT: u8 = 1 << 5;
/// Bits 4:2 of the serial port registers
const WORD_LENGTH_MASK: u8 = 0b0001_1100;
/// Analog mic on the MIC1P/MIC1N pair, maximum PGA gain
const MIC_INPUT_SELECT: u8 = 0x1A;
/// Bit 6 of the mic input register
const MIC_ENABLE: u8 = 1 << 6;
/// The ADC digital volume used whenever the mic is set up
const MIC_ADC_VOLUME: u8 = 0xC8;
/// Bits 2:0 of the ADC gain register
const MIC_GAIN_MASK: u8 = 0b0000_0111;
const MAX_MIC_GAIN: u8 = 7;

/// Analog power-up, run in this order after the clocks and serial port.
const ANALOG_BRING_UP: [(Register, u8); 6] = [
    // Power up analog circuitry
    (Register::SystemPowerUp, 0x01),
    // Enable analog PGA and ADC modulator
    (Register::SystemModulator, 0x02),
    // Power up DAC
    (Register::SystemDacPower, 0x00),
    // Enable output to HP drive
    (Register::SystemOutput, 0x10),
    // ADC equalizer bypass, cancel DC offset in digital domain
    (Register::AdcEqualizer, 0x6A),
    // Bypass DAC equalizer
    (Register::DacEqualizer, 0x08),
];

//
// impls on Public Types
//

impl CodecState {
    const fn new() -> CodecState {
        CodecState {
            mclk_hz: 0,
            sample_rate_hz: 0,
            bits_per_sample: 0,
            volume: 0,
            mic_gain: 0,
        }
    }
}

impl RegisterDump {
    /// The value of one register. Addresses outside the dump read as zero.
    pub fn get(&self, register: u8) -> u8 {
        self.values.get(register as usize).copied().unwrap_or(0)
    }

    /// All the registers, in address order.
    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Walk through `(address, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u8)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(address, value)| (address as u8, *value))
    }
}

impl<I2C, D> Codec<I2C, D> {
    /// Create a new ES8311 driver.
    ///
    /// Nothing is sent to the chip until you call [`Codec::begin`].
    pub fn new(address: BusAddress, delay: D) -> Codec<I2C, D> {
        Codec {
            address,
            transport: None,
            delay,
            state: State::Uninitialized,
            settings: CodecState::new(),
        }
    }

    /// Where we are in the bring-up.
    pub fn state(&self) -> State {
        self.state
    }

    /// The settings last successfully written.
    pub fn settings(&self) -> &CodecState {
        &self.settings
    }

    /// The current sample rate, in Hz.
    pub fn sample_rate_hz(&self) -> u32 {
        self.settings.sample_rate_hz
    }

    /// The current word length, in bits.
    pub fn bits_per_sample(&self) -> u8 {
        self.settings.bits_per_sample
    }

    /// Stop using the chip, and hand back the bus (if one was opened) and the
    /// delay.
    pub fn release(self) -> (Option<I2C>, D) {
        (self.transport.map(Transport::release), self.delay)
    }
}

impl<I2C, D, E> Codec<I2C, D>
where
    I2C: Write<Error = E> + WriteRead<Error = E>,
    D: DelayMs<u8>,
{
    /// Open the bus, reset the ES8311 and bring it up at 48 kHz, 16-bit.
    ///
    /// `open` is given the validated pins and bus frequency and must return
    /// an I²C bus set up to match. It is not called if either pin is missing.
    ///
    /// Once the device has answered, every step of the bring-up is attempted
    /// even if an earlier one failed. The first failure is returned at the
    /// end, and the register contents should then be treated as unknown.
    pub fn begin<F>(&mut self, config: BusConfig, open: F) -> Result<(), Error<E>>
    where
        F: FnOnce(BusPins) -> I2C,
    {
        let pins = match config.pins() {
            Some(pins) => pins,
            None => {
                error!("Invalid SDA/SCL pins");
                return Err(Error::InvalidPins);
            }
        };

        // Any bus from an earlier begin goes away first
        self.transport = None;
        let mut transport = Transport::new(open(pins), self.address.into(), pins.frequency_hz);
        if transport.probe().is_err() {
            error!("ES8311 not found at 0x{:02x}", transport.address());
            self.state = State::Faulted;
            return Err(Error::DeviceNotFound);
        }
        self.transport = Some(transport);
        // The reset below puts every register back to its power-on value
        self.settings = CodecState::new();

        let mut sequence = Sequence::new();

        self.state = State::Resetting;
        sequence.record(self.write(Register::Reset, RESET_ASSERT));
        self.delay.delay_ms(RESET_SETTLE_MS);
        sequence.record(self.write(Register::Reset, RESET_RELEASE));

        self.state = State::PoweringUp;
        sequence.record(self.write(Register::Reset, POWER_ON));
        sequence.record(self.write(Register::ClockManager1, ALL_CLOCKS_ON));
        sequence.record(self.modify(Register::ClockManager6, 0, BCLK_INVERT));
        sequence.record(self.set_sample_rate(DEFAULT_SAMPLE_RATE_HZ));
        sequence.record(self.set_bits_per_sample(DEFAULT_BITS_PER_SAMPLE));

        let sequence = ANALOG_BRING_UP
            .iter()
            .fold(sequence, |mut sequence, &(register, value)| {
                sequence.record(self.write(register, value));
                sequence
            });

        let failures = sequence.failures;
        match sequence.finish() {
            Ok(()) => {
                self.state = State::Configured;
                Ok(())
            }
            Err(e) => {
                error!("ES8311 bring-up had {} failed step(s)", failures);
                self.state = State::Faulted;
                Err(e)
            }
        }
    }

    /// Set up the clock dividers for a new sample rate.
    ///
    /// MCLK is assumed to be 256 x Fs (128 x Fs above 64 kHz). Rates with no
    /// entry in [`coeffs::COEFFICIENTS`] are rejected before anything is sent.
    pub fn set_sample_rate(&mut self, sample_rate_hz: u32) -> Result<(), Error<E>> {
        let mclk_hz = coeffs::mclk_for_rate(sample_rate_hz);
        let coeff = match coeffs::lookup(mclk_hz, sample_rate_hz) {
            Some(coeff) => coeff,
            None => {
                error!("Invalid sample rate {}", sample_rate_hz);
                return Err(Error::UnsupportedRate(sample_rate_hz));
            }
        };
        self.require_bus()?;

        let result = self.write_coefficients(coeff);
        if result.is_ok() {
            self.settings.mclk_hz = mclk_hz;
            self.settings.sample_rate_hz = sample_rate_hz;
        }
        self.track(result)
    }

    /// Set the word length of both the ADC and DAC serial ports.
    ///
    /// Only 16, 18, 20, 24 and 32 are supported.
    pub fn set_bits_per_sample(&mut self, bits: u8) -> Result<(), Error<E>> {
        let code = match word_length_code(bits) {
            Some(code) => code << 2,
            None => {
                error!("Invalid bits per sample {}", bits);
                return Err(Error::UnsupportedWordLength(bits));
            }
        };
        self.require_bus()?;

        let mut sequence = Sequence::new();
        sequence.record(self.modify(Register::DacSerialPort, code, WORD_LENGTH_MASK));
        sequence.record(self.modify(Register::AdcSerialPort, code, WORD_LENGTH_MASK));
        let result = sequence.finish();
        if result.is_ok() {
            self.settings.bits_per_sample = bits;
        }
        self.track(result)
    }

    /// Set the DAC volume, as a percentage. Values above 100 are treated as
    /// 100.
    pub fn set_volume(&mut self, percent: u8) -> Result<(), Error<E>> {
        let percent = percent.min(100);
        let result = self.write(Register::DacVolume, volume_to_register(percent));
        if result.is_ok() {
            self.settings.volume = percent;
        }
        self.track(result)
    }

    /// Get the DAC volume, as a percentage.
    ///
    /// This reads the chip, so it may differ by one from the value given to
    /// [`Codec::set_volume`] due to rounding.
    pub fn get_volume(&mut self) -> Result<u8, Error<E>> {
        let result = self.read(Register::DacVolume).map(register_to_volume);
        self.track(result)
    }

    /// Select the analog microphone input and turn it on or off.
    pub fn enable_microphone(&mut self, enable: bool) -> Result<(), Error<E>> {
        let value = if enable {
            MIC_INPUT_SELECT | MIC_ENABLE
        } else {
            MIC_INPUT_SELECT
        };
        let mut sequence = Sequence::new();
        sequence.record(self.write(Register::AdcVolume, MIC_ADC_VOLUME));
        sequence.record(self.modify(Register::SystemMicInput, value, 0x7F));
        let result = sequence.finish();
        self.track(result)
    }

    /// Set the microphone gain step. Values above 7 are treated as 7.
    pub fn set_microphone_gain(&mut self, gain: u8) -> Result<(), Error<E>> {
        let gain = gain.min(MAX_MIC_GAIN);
        let result = self.modify(Register::AdcGain, gain, MIC_GAIN_MASK);
        if result.is_ok() {
            self.settings.mic_gain = gain;
        }
        self.track(result.map(|_| ()))
    }

    /// Get the microphone gain step, read back from the chip.
    pub fn get_microphone_gain(&mut self) -> Result<u8, Error<E>> {
        let result = self.read(Register::AdcGain).map(|r| r & MIC_GAIN_MASK);
        self.track(result)
    }

    /// Read every register, for debugging.
    ///
    /// This never fails. Anything that can't be read, including everything
    /// when the bus isn't open, shows as zero.
    pub fn dump_registers(&mut self) -> RegisterDump {
        let mut values = [0u8; DUMP_LEN];
        if let Some(transport) = self.transport.as_mut() {
            for (address, value) in values.iter_mut().enumerate() {
                *value = transport.read(address as u8).unwrap_or(0);
                debug!("0x{:02x}: 0x{:02x}", address as u8, *value);
            }
        }
        RegisterDump { values }
    }

    /// Write the fields of one coefficient table row, in the order the chip
    /// wants them.
    fn write_coefficients(&mut self, coeff: &CoefficientEntry) -> Result<(), Error<E>> {
        let mut sequence = Sequence::new();

        sequence.record(self.modify(
            Register::ClockManager2,
            (coeff.pre_div.saturating_sub(1) << 5) | (coeff.pre_multiplier << 3),
            0b1111_1000,
        ));
        sequence.record(self.write(
            Register::ClockManager3,
            (coeff.fs_mode << 6) | coeff.adc_oversample,
        ));
        sequence.record(self.write(Register::ClockManager4, coeff.dac_oversample));
        sequence.record(self.write(
            Register::ClockManager5,
            (coeff.adc_div.saturating_sub(1) << 4) | coeff.dac_div.saturating_sub(1),
        ));
        sequence.record(self.modify(
            Register::ClockManager6,
            bclk_divider_code(coeff.bclk_div),
            0b0001_1111,
        ));
        sequence.record(self.modify(Register::ClockManager7, coeff.lrck_high, 0b0011_1111));
        sequence.record(self.write(Register::ClockManager8, coeff.lrck_low));

        sequence.finish()
    }

    /// Mark the driver as faulted if a transaction failed.
    fn track<T>(&mut self, result: Result<T, Error<E>>) -> Result<T, Error<E>> {
        if let Err(Error::BusTransactionFailed { .. }) = result {
            self.state = State::Faulted;
        }
        result
    }

    fn require_bus(&self) -> Result<(), Error<E>> {
        if self.transport.is_some() {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn write(&mut self, register: Register, value: u8) -> Result<(), Error<E>> {
        let transport = self.transport.as_mut().ok_or(Error::NotInitialized)?;
        transport
            .write(register as u8, value)
            .map_err(|cause| {
                warn!("ES8311 write to 0x{:02x} failed", register as u8);
                Error::BusTransactionFailed {
                    register: register as u8,
                    cause,
                }
            })
    }

    fn read(&mut self, register: Register) -> Result<u8, Error<E>> {
        let transport = self.transport.as_mut().ok_or(Error::NotInitialized)?;
        transport.read(register as u8).map_err(|cause| {
            warn!("ES8311 read of 0x{:02x} failed", register as u8);
            Error::BusTransactionFailed {
                register: register as u8,
                cause,
            }
        })
    }

    /// Change only the bits in `mask`, leaving the rest of the register as the
    /// chip has it. If the read fails, nothing is written.
    fn modify(&mut self, register: Register, value: u8, mask: u8) -> Result<u8, Error<E>> {
        let current = self.read(register)?;
        // Clear the bits we want to change, then set only within them
        let new_value = (current & !mask) | (value & mask);
        self.write(register, new_value)?;
        Ok(new_value)
    }
}

//
// impls on Private Types
//

impl<E> Sequence<E> {
    pub(crate) fn new() -> Sequence<E> {
        Sequence {
            first_error: None,
            failures: 0,
        }
    }

    /// Note the outcome of one step and carry on.
    pub(crate) fn record<T>(&mut self, result: Result<T, Error<E>>) {
        if let Err(e) = result {
            self.failures = self.failures.saturating_add(1);
            if self.first_error.is_none() {
                self.first_error = Some(e);
            }
        }
    }

    /// Ok only if every step was.
    pub(crate) fn finish(self) -> Result<(), Error<E>> {
        match self.first_error {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}

//
// Private Functions
//

/// The 3-bit word length field, shared by both serial ports.
fn word_length_code(bits: u8) -> Option<u8> {
    match bits {
        16 => Some(0b011),
        18 => Some(0b010),
        20 => Some(0b001),
        24 => Some(0b000),
        32 => Some(0b100),
        _ => None,
    }
}

/// The BCLK divider field is `div - 1` for small dividers but the raw value
/// from 19 upwards.
fn bclk_divider_code(bclk_div: u8) -> u8 {
    if bclk_div < 19 {
        bclk_div.saturating_sub(1)
    } else {
        bclk_div
    }
}

fn volume_to_register(percent: u8) -> u8 {
    if percent == 0 {
        0
    } else {
        ((u16::from(percent) * 256 / 100) - 1) as u8
    }
}

fn register_to_volume(register: u8) -> u8 {
    if register == 0 {
        0
    } else {
        ((u16::from(register) * 100 / 256) + 1) as u8
    }
}


//
// End of file
//
