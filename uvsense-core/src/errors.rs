//! Error Types for Sensor Access Failures
//!
//! ## Design Philosophy
//!
//! The driver runs unattended on small boards, so its errors follow the same
//! rules as the rest of the crate:
//!
//! 1. **Small Size**: Every variant carries a handful of integers at most.
//!    Errors are produced inside retry loops and must be cheap to return.
//!
//! 2. **No Heap Allocation**: Messages are `&'static str`, never `String`.
//!
//! 3. **Copy Semantics**: Both error enums are `Copy`, so the retry loop can
//!    remember the last failure without juggling ownership.
//!
//! ## Error Categories
//!
//! ### Transport Failures
//! `TransportError` is what a bus adapter reports: missing bus, NACK, timeout,
//! short payload, framing. The register reader always absorbs these and
//! retries.
//!
//! ### Plausibility Failures
//! `DriverError::InvalidRange` and `DriverError::InvalidSentinel` reject a
//! single attempt. They are resolved internally by retrying and, after that,
//! by substituting the last accepted value.
//!
//! ### Caller-Visible Failures
//! - `NotFound`: discovery exhausted every bus/address pair
//! - `ReadFailed`: retries exhausted while in strict (force-real) mode
//! - `NotConnected`: strict read attempted without a bound device
//! - `InvalidConfig`: configuration rejected before use
//!
//! ## Handling Strategy
//!
//! ```rust
//! use uvsense_core::{DriverConfig, DriverError, UvSensor};
//!
//! match UvSensor::simulated(DriverConfig::default()) {
//!     Ok(mut sensor) => {
//!         let _index = sensor.read_index();
//!     }
//!     Err(DriverError::InvalidConfig { reason }) => {
//!         // fix the configuration
//!         let _ = reason;
//!     }
//!     Err(_) => {
//!         // strict mode refused to simulate
//!     }
//! }
//! ```

use thiserror_no_std::Error;

use crate::register::Register;

/// Result type for driver operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Failures reported by a bus adapter
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The adapter cannot reach the requested bus
    #[error("Bus {bus} is not available")]
    BusUnavailable {
        /// Bus number that was requested
        bus: u8,
    },

    /// Nobody answered at the address
    #[error("No acknowledge from device 0x{address:02X}")]
    NoAcknowledge {
        /// 7-bit device address
        address: u8,
    },

    /// The transaction did not complete in time
    #[error("Transport timed out")]
    Timeout,

    /// The device returned fewer bytes than requested
    #[error("Short read: expected {expected} bytes, got {actual}")]
    ShortRead {
        /// Bytes requested
        expected: usize,
        /// Bytes received
        actual: usize,
    },

    /// Frame failed its integrity check (CRC, unit id, function code)
    #[error("Corrupted frame: {reason}")]
    Corrupted {
        /// What failed to match
        reason: &'static str,
    },

    /// The device answered with a protocol exception
    #[error("Device exception code {code}")]
    DeviceException {
        /// Exception code from the device
        code: u8,
    },

    /// Any other bus failure
    #[error("Bus I/O failure")]
    Io,
}

/// Errors surfaced by discovery, register reads, and configuration
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverError {
    /// Underlying bus failure
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Discovery exhausted every candidate
    #[error("Sensor not found after {rounds} rounds ({probes} probes)")]
    NotFound {
        /// Scan rounds performed
        rounds: u8,
        /// Bus/address pairs probed in total
        probes: u16,
    },

    /// Decoded value lies outside the register's plausible range
    #[error("{register} value {value} outside range [0, {max}]")]
    InvalidRange {
        /// Register that was read
        register: Register,
        /// Decoded value
        value: u16,
        /// Largest plausible value
        max: u16,
    },

    /// Register returned the all-ones marker
    #[error("{register} returned the invalid marker 0xFFFF")]
    InvalidSentinel {
        /// Register that was read
        register: Register,
    },

    /// Every attempt failed; only surfaced in strict mode
    #[error("{register} read failed after {attempts} attempts")]
    ReadFailed {
        /// Register that was read
        register: Register,
        /// Attempts made
        attempts: u8,
    },

    /// Strict read attempted while no real device is bound
    #[error("No sensor connected")]
    NotConnected,

    /// Configuration rejected by `DriverConfig::validate`
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which rule was violated
        reason: &'static str,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for TransportError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::BusUnavailable { bus } => defmt::write!(fmt, "Bus {} unavailable", bus),
            Self::NoAcknowledge { address } => defmt::write!(fmt, "NACK from {=u8:#x}", address),
            Self::Timeout => defmt::write!(fmt, "Timeout"),
            Self::ShortRead { expected, actual } => {
                defmt::write!(fmt, "Short read {}/{}", actual, expected)
            }
            Self::Corrupted { reason } => defmt::write!(fmt, "Corrupted: {}", reason),
            Self::DeviceException { code } => defmt::write!(fmt, "Exception {}", code),
            Self::Io => defmt::write!(fmt, "I/O failure"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DriverError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::Transport(err) => defmt::write!(fmt, "Transport: {}", err),
            Self::NotFound { rounds, probes } => {
                defmt::write!(fmt, "Not found ({} rounds, {} probes)", rounds, probes)
            }
            Self::InvalidRange { register, value, max } => {
                defmt::write!(fmt, "{} value {} > {}", register, value, max)
            }
            Self::InvalidSentinel { register } => defmt::write!(fmt, "{} returned 0xFFFF", register),
            Self::ReadFailed { register, attempts } => {
                defmt::write!(fmt, "{} failed after {} attempts", register, attempts)
            }
            Self::NotConnected => defmt::write!(fmt, "Not connected"),
            Self::InvalidConfig { reason } => defmt::write!(fmt, "Invalid config: {}", reason),
        }
    }
}
