//! Constants for uvsense Core
//!
//! Centralised, documented constants used throughout the driver. Config
//! defaults are built from these values, so changing one here changes the
//! default behaviour everywhere.
//!
//! ## Organization
//!
//! - **Registers**: wire-level offsets, identities, ranges, bus candidates
//! - **Timing**: retry delays, scan back-off, warm-up
//! - **Filtering**: zero hysteresis and smoothing thresholds
//! - **Simulation**: synthetic waveform shape

/// Register offsets, identity values, and value ranges.
pub mod registers;

/// Retry, back-off, and warm-up delays.
pub mod timing;

/// Hysteresis and smoothing thresholds.
pub mod filtering;

/// Synthetic waveform parameters.
pub mod simulation;

pub use registers::{
    DEVICE_ADDR, DEVICE_ADDR_ALT, DEVICE_ID, DEVICE_ID_SWAPPED,
    RAW_CEILING, UV_INDEX_MAX, RISK_LEVEL_MAX,
};

pub use timing::{READ_ATTEMPTS, SCAN_ROUNDS};
