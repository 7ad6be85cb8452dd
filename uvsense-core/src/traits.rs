//! Core traits for the driver
//!
//! Two seams: `Transport` is what a bus adapter implements, `UvSource` is
//! what the driver facade dispatches to (the hardware pipeline or the
//! simulation). Keep them small; the adapters live on tiny boards.

use crate::calibration::RiskLevel;
use crate::errors::{DriverResult, TransportError};

/// Raw block reads from a numbered bus
///
/// One transport may serve several buses (a Linux host with `/dev/i2c-*`) or
/// exactly one (an MCU peripheral, a serial port). Requests for a bus the
/// adapter cannot reach return `TransportError::BusUnavailable`.
///
/// ## Example Implementation
///
/// ```rust
/// use uvsense_core::{Transport, TransportError};
///
/// struct Loopback;
///
/// impl Transport for Loopback {
///     fn read_block(
///         &mut self,
///         bus: u8,
///         _address: u8,
///         _register: u8,
///         buf: &mut [u8],
///     ) -> Result<usize, TransportError> {
///         if bus != 1 {
///             return Err(TransportError::BusUnavailable { bus });
///         }
///         buf.fill(0);
///         Ok(buf.len())
///     }
/// }
/// ```
pub trait Transport {
    /// Read `buf.len()` bytes starting at `register` from `address` on `bus`.
    ///
    /// Returns the number of bytes actually received.
    fn read_block(
        &mut self,
        bus: u8,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read_block(
        &mut self,
        bus: u8,
        address: u8,
        register: u8,
        buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        (**self).read_block(bus, address, register, buf)
    }
}

/// Something that produces the three UV quantities
///
/// Calls are not independent: implementations keep history, so the result
/// of one call depends on the calls before it.
pub trait UvSource {
    /// Raw intensity, `0..=ceiling`
    fn read_raw(&mut self) -> DriverResult<u16>;

    /// UV index, `0..=11`
    fn read_index(&mut self) -> DriverResult<u8>;

    /// Risk category, `0..=4`
    fn read_risk(&mut self) -> DriverResult<u8>;

    /// Risk category as an enum
    fn read_risk_level(&mut self) -> DriverResult<RiskLevel> {
        self.read_risk().map(RiskLevel::from_code)
    }
}
