//! A pretend ES8311 for the integration tests.
//!
//! Registers are a plain 256-byte file shared between clones, so a test can
//! hand one clone to the driver and inspect the other.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::blocking::i2c::{Write, WriteRead};

pub const ADDRESS: u8 = 0x18;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SimError {
    Nack,
}

#[derive(Debug)]
pub struct SimState {
    pub registers: [u8; 256],
    pub present: bool,
    /// Registers whose writes are NACKed
    pub failing_writes: Vec<u8>,
    /// Registers whose reads are NACKed
    pub failing_reads: Vec<u8>,
    pub probes: usize,
    pub writes: Vec<(u8, u8)>,
    pub reads: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct SimCodec {
    state: Rc<RefCell<SimState>>,
}

impl SimCodec {
    pub fn new() -> SimCodec {
        SimCodec {
            state: Rc::new(RefCell::new(SimState {
                registers: [0; 256],
                present: true,
                failing_writes: Vec::new(),
                failing_reads: Vec::new(),
                probes: 0,
                writes: Vec::new(),
                reads: Vec::new(),
            })),
        }
    }

    /// A bus with nothing on it
    pub fn absent() -> SimCodec {
        let sim = SimCodec::new();
        sim.state.borrow_mut().present = false;
        sim
    }

    pub fn reg(&self, register: u8) -> u8 {
        self.state.borrow().registers[register as usize]
    }

    pub fn seed(&self, register: u8, value: u8) {
        self.state.borrow_mut().registers[register as usize] = value;
    }

    pub fn fail_writes_to(&self, register: u8) {
        self.state.borrow_mut().failing_writes.push(register);
    }

    pub fn fail_reads_of(&self, register: u8) {
        self.state.borrow_mut().failing_reads.push(register);
    }

    pub fn writes(&self) -> Vec<(u8, u8)> {
        self.state.borrow().writes.clone()
    }

    pub fn writes_to(&self, register: u8) -> Vec<u8> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Every probe, write and read seen so far
    pub fn transactions(&self) -> usize {
        let state = self.state.borrow();
        state.probes + state.writes.len() + state.reads.len()
    }

    pub fn clear_log(&self) {
        let mut state = self.state.borrow_mut();
        state.writes.clear();
        state.reads.clear();
        state.probes = 0;
    }
}

impl Write for SimCodec {
    type Error = SimError;

    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<(), SimError> {
        let mut state = self.state.borrow_mut();
        if !state.present || address != ADDRESS {
            return Err(SimError::Nack);
        }
        match bytes {
            [] => {
                state.probes += 1;
                Ok(())
            }
            [register, value] => {
                if state.failing_writes.contains(register) {
                    return Err(SimError::Nack);
                }
                state.registers[*register as usize] = *value;
                state.writes.push((*register, *value));
                Ok(())
            }
            _ => panic!("unexpected write of {} bytes", bytes.len()),
        }
    }
}

impl WriteRead for SimCodec {
    type Error = SimError;

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), SimError> {
        let mut state = self.state.borrow_mut();
        if !state.present || address != ADDRESS {
            return Err(SimError::Nack);
        }
        assert_eq!(bytes.len(), 1, "register address is one byte");
        assert_eq!(buffer.len(), 1, "registers are read one at a time");
        let register = bytes[0];
        if state.failing_reads.contains(&register) {
            return Err(SimError::Nack);
        }
        buffer[0] = state.registers[register as usize];
        state.reads.push(register);
        Ok(())
    }
}

/// Remembers every delay asked for, without sleeping
#[derive(Debug, Default, Clone)]
pub struct RecordingDelay {
    pub delays: Rc<RefCell<Vec<u8>>>,
}

impl DelayMs<u8> for RecordingDelay {
    fn delay_ms(&mut self, ms: u8) {
        self.delays.borrow_mut().push(ms);
    }
}

/// The registers after a clean bring-up on a chip that started out all
/// zero, as `(address, value)`. Everything else stays zero.
pub const DEFAULT_SNAPSHOT: [(u8, u8); 13] = [
    (0x00, 0x80),
    (0x01, 0x3F),
    (0x03, 0x10),
    (0x04, 0x10),
    (0x06, 0x03),
    (0x08, 0xFF),
    (0x09, 0x0C),
    (0x0A, 0x0C),
    (0x0D, 0x01),
    (0x0E, 0x02),
    (0x13, 0x10),
    (0x1C, 0x6A),
    (0x37, 0x08),
];

/// An amplifier enable pin that remembers what it was told
#[derive(Debug, Default, Clone)]
pub struct RecordingPin {
    pub levels: Rc<RefCell<Vec<bool>>>,
    pub broken: bool,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PinError;

impl embedded_hal::digital::v2::OutputPin for RecordingPin {
    type Error = PinError;

    fn set_low(&mut self) -> Result<(), PinError> {
        if self.broken {
            return Err(PinError);
        }
        self.levels.borrow_mut().push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), PinError> {
        if self.broken {
            return Err(PinError);
        }
        self.levels.borrow_mut().push(true);
        Ok(())
    }
}
