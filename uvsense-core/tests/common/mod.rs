//! Shared test doubles for integration tests
//!
//! - `ScriptedSensor`: a transport hosting one sensor at a fixed bus/address,
//!   replaying scripted replies per register
//! - `RecordingDelay`: a delay provider that records every sleep
//! - Reply helpers for common wire encodings

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};

use embedded_hal::delay::DelayNs;
use uvsense_core::{Register, Transport, TransportError};

/// One scripted register reply
pub type Reply = Result<Vec<u8>, TransportError>;

/// Big-endian encoding of `value`
pub fn be(value: u16) -> Reply {
    Ok(value.to_be_bytes().to_vec())
}

/// Little-endian (byte-swapped) encoding of `value`
pub fn le(value: u16) -> Reply {
    Ok(value.to_le_bytes().to_vec())
}

/// Transport failure reply
pub fn fail() -> Reply {
    Err(TransportError::Timeout)
}

/// A sensor on one bus/address with scripted register replies
pub struct ScriptedSensor {
    bus: u8,
    address: u8,
    identity: [u8; 2],
    scripts: HashMap<u8, VecDeque<Reply>>,
    /// Every `(bus, address, register)` requested, in order
    pub requests: Vec<(u8, u8, u8)>,
}

impl ScriptedSensor {
    /// Sensor answering on `bus` at `address` with the documented identity
    pub fn new(bus: u8, address: u8) -> Self {
        Self {
            bus,
            address,
            identity: [0x42, 0x7C],
            scripts: HashMap::new(),
            requests: Vec::new(),
        }
    }

    /// Use a different identity payload
    pub fn with_identity(mut self, bytes: [u8; 2]) -> Self {
        self.identity = bytes;
        self
    }

    /// Queue replies for `register`; an exhausted queue times out
    pub fn script(mut self, register: Register, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.scripts
            .entry(register.offset())
            .or_default()
            .extend(replies);
        self
    }

    /// Queue big-endian raw intensity values
    pub fn raw_values(self, values: &[u16]) -> Self {
        self.script(Register::RawIntensity, values.iter().map(|&v| be(v)))
    }

    /// Number of requests for `register`
    pub fn count(&self, register: Register) -> usize {
        self.requests
            .iter()
            .filter(|(_, _, reg)| *reg == register.offset())
            .count()
    }
}

impl Transport for ScriptedSensor {
    fn read_block(
        &mut self,
        bus: u8,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        self.requests.push((bus, address, register));
        if bus != self.bus {
            return Err(TransportError::BusUnavailable { bus });
        }
        if address != self.address {
            return Err(TransportError::NoAcknowledge { address });
        }

        let bytes = if register == Register::Identity.offset() {
            self.identity.to_vec()
        } else {
            self.scripts
                .get_mut(&register)
                .and_then(VecDeque::pop_front)
                .unwrap_or(Err(TransportError::Timeout))?
        };
        let n = bytes.len().min(buf.len());
        buf[..n].copy_from_slice(&bytes[..n]);
        Ok(n)
    }
}

/// Delay provider recording each sleep in milliseconds
#[derive(Debug, Default)]
pub struct RecordingDelay {
    /// Sleeps in call order
    pub sleeps: Vec<u32>,
}

impl RecordingDelay {
    /// Total time slept
    pub fn total_ms(&self) -> u32 {
        self.sleeps.iter().sum()
    }
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.sleeps.push(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.sleeps.push(ms);
    }
}
