//! Core driver for the 240370 UV index sensor
//!
//! Finds the sensor on an unknown bus, reads its registers robustly in the
//! presence of bus corruption and byte-order ambiguity, and derives UV index
//! and risk level through a calibration table and a smoothing policy.
//! Designed for small boards:
//!
//! Key constraints:
//! - `no_std` without the `std` feature
//! - No heap allocation anywhere in the driver
//! - Blocking, single-threaded; sleeps go through `embedded_hal::delay::DelayNs`
//!
//! ```no_run
//! use uvsense_core::{DriverConfig, Transport, TransportError, UvSensor};
//! # struct Bus;
//! # impl Transport for Bus {
//! #     fn read_block(&mut self, bus: u8, _: u8, _: u8, _: &mut [u8]) -> Result<usize, TransportError> {
//! #         Err(TransportError::BusUnavailable { bus })
//! #     }
//! # }
//! # struct Delay;
//! # impl embedded_hal::delay::DelayNs for Delay { fn delay_ns(&mut self, _: u32) {} }
//!
//! let mut sensor = UvSensor::begin(Bus, Delay, DriverConfig::default())?;
//! let index = sensor.read_index()?;
//! let risk = sensor.read_risk_level()?;
//! # Ok::<(), uvsense_core::DriverError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[macro_use]
mod logging;

pub mod calibration;
pub mod config;
pub mod constants;
pub mod driver;
pub mod errors;
pub mod filters;
pub mod history;
pub mod pipeline;
pub mod reader;
pub mod register;
pub mod scanner;
pub mod simulation;
pub mod traits;

// Public API
pub use calibration::{risk_for_index, Breakpoint, CalibrationTable, RiskLevel};
pub use config::{DriverConfig, FilterConfig, ReadConfig, ScanConfig, SimulationConfig};
pub use driver::{Detached, Mode, UvSensor};
pub use errors::{DriverError, DriverResult, TransportError};
pub use history::{QuantityHistory, ReadingHistory};
pub use pipeline::ValuePipeline;
pub use reader::RegisterReader;
pub use register::{Register, WordPair};
pub use scanner::{BusScanner, DeviceHandle, ProbeOutcome};
pub use simulation::SimulationSource;
pub use traits::{Transport, UvSource};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
