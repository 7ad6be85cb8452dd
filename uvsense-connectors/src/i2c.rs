//! I2C adapters over `embedded-hal`
//!
//! A register read is a single `write_read`: the register offset goes out,
//! `buf.len()` bytes come back. HAL error kinds are folded into
//! `TransportError` so the driver's retry loop can treat every bus alike.
//!
//! Two shapes are provided:
//! - `HalI2cTransport`: one peripheral answering as one bus number
//! - `I2cBuses`: several peripherals, each registered under its bus number,
//!   for hosts exposing more than one I2C controller

use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use heapless::Vec;
use uvsense_core::{Transport, TransportError};

/// Translate a HAL error kind
pub fn map_error(kind: ErrorKind, address: u8) -> TransportError {
    match kind {
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        | ErrorKind::NoAcknowledge(NoAcknowledgeSource::Unknown) => {
            TransportError::NoAcknowledge { address }
        }
        ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data) => TransportError::Corrupted {
            reason: "data not acknowledged",
        },
        ErrorKind::Overrun => TransportError::Corrupted { reason: "overrun" },
        // Bus errors, arbitration loss, and anything newer
        _ => TransportError::Io,
    }
}

fn register_read<I: I2c>(
    i2c: &mut I,
    address: u8,
    register: u8,
    buf: &mut [u8],
) -> Result<usize, TransportError> {
    i2c.write_read(address, &[register], buf)
        .map_err(|err| map_error(err.kind(), address))?;
    Ok(buf.len())
}

/// One I2C peripheral serving one bus number
pub struct HalI2cTransport<I> {
    i2c: I,
    bus: u8,
}

impl<I: I2c> HalI2cTransport<I> {
    /// Serve `i2c` as bus `bus`
    pub fn new(i2c: I, bus: u8) -> Self {
        Self { i2c, bus }
    }

    /// Bus number served
    pub fn bus(&self) -> u8 {
        self.bus
    }

    /// Give the peripheral back
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> Transport for HalI2cTransport<I> {
    fn read_block(
        &mut self,
        bus: u8,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        if bus != self.bus {
            return Err(TransportError::BusUnavailable { bus });
        }
        register_read(&mut self.i2c, address, register, buf)
    }
}

/// Several I2C peripherals keyed by bus number
pub struct I2cBuses<I, const N: usize> {
    buses: Vec<(u8, I), N>,
}

impl<I: I2c, const N: usize> I2cBuses<I, N> {
    /// No buses yet
    pub fn new() -> Self {
        Self { buses: Vec::new() }
    }

    /// Register `i2c` as bus `bus`.
    ///
    /// Returns the peripheral back when the table is full or the bus number
    /// is already taken.
    pub fn add(&mut self, bus: u8, i2c: I) -> Result<(), I> {
        if self.buses.iter().any(|(number, _)| *number == bus) {
            return Err(i2c);
        }
        self.buses.push((bus, i2c)).map_err(|(_, i2c)| i2c)
    }

    /// Bus numbers registered, in insertion order
    pub fn bus_numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.buses.iter().map(|(number, _)| *number)
    }
}

impl<I: I2c, const N: usize> Default for I2cBuses<I, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: I2c, const N: usize> Transport for I2cBuses<I, N> {
    fn read_block(
        &mut self,
        bus: u8,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        let (_, i2c) = self
            .buses
            .iter_mut()
            .find(|(number, _)| *number == bus)
            .ok_or(TransportError::BusUnavailable { bus })?;
        register_read(i2c, address, register, buf)
    }
}
