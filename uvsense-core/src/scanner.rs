//! Bus discovery
//!
//! Probes every candidate bus/address pair with a 2-byte identity read until
//! one answers with an accepted identity. First match wins; transport errors
//! on a single pair count as a non-match and never abort the scan.
//!
//! ```text
//! round 1: bus 4 [0x23, 0x38] -> bus 1 [0x23, 0x38] -> ... -> bus 7
//!          back-off
//! round 2: ...
//! ```

use embedded_hal::delay::DelayNs;

use crate::config::ScanConfig;
use crate::errors::{DriverError, DriverResult, TransportError};
use crate::register::{swap_bytes, Register};
use crate::traits::Transport;

/// A discovered sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceHandle {
    /// Bus the sensor answered on
    pub bus: u8,
    /// 7-bit device address
    pub address: u8,
    /// Identity word as read (big-endian), possibly byte-swapped
    pub identity: u16,
}

impl DeviceHandle {
    /// Handle for a sensor at a known location, skipping discovery
    pub const fn fixed(bus: u8, address: u8) -> Self {
        Self {
            bus,
            address,
            identity: 0,
        }
    }
}

/// Result of probing one bus/address pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Identity accepted
    Matched {
        /// Identity word as read
        identity: u16,
    },
    /// Something answered, but not with an accepted identity
    NoMatch {
        /// Identity word as read
        identity: u16,
    },
    /// The transport failed for this pair
    TransportError(TransportError),
}

impl ProbeOutcome {
    /// Whether this outcome binds the device
    pub fn is_match(&self) -> bool {
        matches!(self, ProbeOutcome::Matched { .. })
    }
}

/// Scans candidate buses for the sensor
pub struct BusScanner<'a> {
    config: &'a ScanConfig,
}

impl<'a> BusScanner<'a> {
    /// Scanner over the candidates in `config`
    pub fn new(config: &'a ScanConfig) -> Self {
        Self { config }
    }

    /// Whether `identity` or its byte-swapped form is accepted
    pub fn accepts(&self, identity: u16) -> bool {
        let swapped = swap_bytes(identity);
        self.config
            .identities
            .iter()
            .any(|&known| known == identity || known == swapped)
    }

    /// Probe a single bus/address pair
    pub fn probe<T: Transport>(&self, transport: &mut T, bus: u8, address: u8) -> ProbeOutcome {
        let mut buf = [0u8; 2];
        match transport.read_block(bus, address, Register::Identity.offset(), &mut buf) {
            Ok(2) => {
                let identity = u16::from_be_bytes(buf);
                if self.accepts(identity) {
                    ProbeOutcome::Matched { identity }
                } else {
                    ProbeOutcome::NoMatch { identity }
                }
            }
            Ok(actual) => ProbeOutcome::TransportError(TransportError::ShortRead {
                expected: 2,
                actual,
            }),
            Err(err) => ProbeOutcome::TransportError(err),
        }
    }

    /// Find the sensor.
    ///
    /// Runs up to `rounds` passes, sleeping `backoff_ms` between passes (not
    /// after the last). Returns `NotFound` when every pass comes up empty.
    pub fn discover<T, D>(&self, transport: &mut T, delay: &mut D) -> DriverResult<DeviceHandle>
    where
        T: Transport,
        D: DelayNs,
    {
        let rounds = self.config.rounds;
        let mut probes: u16 = 0;

        for round in 1..=rounds {
            for &bus in &self.config.buses {
                for &address in &self.config.addresses {
                    probes = probes.saturating_add(1);
                    let outcome = self.probe(transport, bus, address);
                    log_debug!("probe bus {} addr 0x{:02X}: {:?}", bus, address, outcome);

                    if let ProbeOutcome::Matched { identity } = outcome {
                        log_info!(
                            "UV sensor found on bus {} at 0x{:02X} (id 0x{:04X})",
                            bus,
                            address,
                            identity
                        );
                        return Ok(DeviceHandle {
                            bus,
                            address,
                            identity,
                        });
                    }
                }
            }

            log_debug!("scan round {}/{} found nothing", round, rounds);
            if round < rounds {
                delay.delay_ms(self.config.backoff_ms);
            }
        }

        Err(DriverError::NotFound { rounds, probes })
    }
}
