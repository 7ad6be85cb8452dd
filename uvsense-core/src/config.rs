//! Driver configuration
//!
//! Every knob the driver has lives here, grouped by the component that uses
//! it. Defaults come from [`crate::constants`]. With the `serde` feature the
//! structs deserialize with `#[serde(default)]`, so a config file only needs
//! the fields it changes:
//!
//! ```json
//! { "force_real": true, "read": { "attempts": 5 } }
//! ```

use heapless::Vec;

use crate::constants::{filtering, registers, simulation, timing};
use crate::errors::{DriverError, DriverResult};
use crate::calibration::CalibrationTable;

/// Capacity of the bus candidate list
pub const MAX_BUSES: usize = 8;
/// Capacity of the address candidate list
pub const MAX_ADDRESSES: usize = 4;
/// Capacity of the identity list
pub const MAX_IDENTITIES: usize = 4;
/// Capacity of the simulated waveform
pub const MAX_SIM_LEVELS: usize = 16;

/// Bus discovery settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScanConfig {
    /// Buses in probe order
    pub buses: Vec<u8, MAX_BUSES>,
    /// Addresses probed on every bus, in order
    pub addresses: Vec<u8, MAX_ADDRESSES>,
    /// Identity values accepted (either byte order also matches)
    pub identities: Vec<u16, MAX_IDENTITIES>,
    /// Full passes over every bus/address pair
    pub rounds: u8,
    /// Sleep between passes (milliseconds)
    pub backoff_ms: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            buses: Vec::from_slice(&registers::DEFAULT_BUSES).unwrap_or_default(),
            addresses: Vec::from_slice(&registers::DEFAULT_ADDRESSES).unwrap_or_default(),
            identities: Vec::from_slice(&registers::DEFAULT_IDENTITIES).unwrap_or_default(),
            rounds: timing::SCAN_ROUNDS,
            backoff_ms: timing::SCAN_BACKOFF_MS,
        }
    }
}

impl ScanConfig {
    /// Probe a single known bus and address
    pub fn fixed(bus: u8, address: u8) -> Self {
        let mut config = Self::default();
        config.buses.clear();
        config.addresses.clear();
        // Capacity is at least one, these cannot fail
        let _ = config.buses.push(bus);
        let _ = config.addresses.push(address);
        config
    }
}

/// Register read settings
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReadConfig {
    /// Attempts per register read
    pub attempts: u8,
    /// Base delay between attempts; attempt `n` waits `n` times this (ms)
    pub retry_delay_ms: u32,
    /// Throwaway identity reads before the first real read
    pub warmup_reads: u8,
    /// Pause after warm-up reads (ms)
    pub warmup_settle_ms: u32,
    /// Largest plausible raw intensity
    pub raw_ceiling: u16,
    /// Raw value substituted when retries fail with no usable history
    pub raw_fallback_floor: u16,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            attempts: timing::READ_ATTEMPTS,
            retry_delay_ms: timing::RETRY_DELAY_MS,
            warmup_reads: timing::WARMUP_READS,
            warmup_settle_ms: timing::WARMUP_SETTLE_MS,
            raw_ceiling: registers::RAW_CEILING,
            raw_fallback_floor: filtering::RAW_FALLBACK_FLOOR,
        }
    }
}

/// Hysteresis and smoothing settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Consecutive zero raw readings before zero is accepted
    pub raw_zero_threshold: u8,
    /// Consecutive zero index readings before zero is accepted
    pub index_zero_threshold: u8,
    /// Previous raw value above which a zero counts as a glitch
    pub zero_glitch_min_raw: u16,
    /// Divisor applied to the previous raw value while a zero is held
    pub raw_decay_divisor: u16,
    /// Relative raw change that triggers blending
    pub raw_jump_ratio: f32,
    /// Smallest weight a new raw sample gets when blended
    pub min_blend_weight: f32,
    /// Previous raw value below which blending is skipped
    pub smoothing_floor_raw: u16,
    /// Index change above which the index moves one level per call
    pub index_step_limit: u8,
    /// Risk change above which the risk moves one level per call
    pub risk_step_limit: u8,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            raw_zero_threshold: filtering::RAW_ZERO_THRESHOLD,
            index_zero_threshold: filtering::INDEX_ZERO_THRESHOLD,
            zero_glitch_min_raw: filtering::ZERO_GLITCH_MIN_RAW,
            raw_decay_divisor: filtering::RAW_DECAY_DIVISOR,
            raw_jump_ratio: filtering::RAW_JUMP_RATIO,
            min_blend_weight: filtering::MIN_BLEND_WEIGHT,
            smoothing_floor_raw: filtering::SMOOTHING_FLOOR_RAW,
            index_step_limit: filtering::INDEX_STEP_LIMIT,
            risk_step_limit: filtering::RISK_STEP_LIMIT,
        }
    }
}

/// Synthetic waveform settings
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Target UV index levels, cycled in order
    pub levels: Vec<u8, MAX_SIM_LEVELS>,
    /// Samples per level
    pub steps_per_level: u32,
    /// Uniform jitter amplitude (UV index units)
    pub jitter: f32,
    /// Raw counts per UV index unit
    pub raw_scale: u16,
    /// Jitter generator seed
    pub seed: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            levels: Vec::from_slice(&simulation::SIM_LEVELS).unwrap_or_default(),
            steps_per_level: simulation::SIM_STEPS_PER_LEVEL,
            jitter: simulation::SIM_JITTER,
            raw_scale: simulation::SIM_RAW_SCALE,
            seed: simulation::SIM_SEED,
        }
    }
}

/// Complete driver configuration
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriverConfig {
    /// Discovery
    pub scan: ScanConfig,
    /// Register reads
    pub read: ReadConfig,
    /// Smoothing
    pub filter: FilterConfig,
    /// Simulation fallback
    pub simulation: SimulationConfig,
    /// Never simulate; surface read failures to the caller
    pub force_real: bool,
    /// Skip discovery and simulate from the start
    pub simulate: bool,
}

impl DriverConfig {
    /// Real hardware only: discovery failure and exhausted reads are errors
    pub fn strict() -> Self {
        Self {
            force_real: true,
            ..Self::default()
        }
    }

    /// Simulation only: no bus is touched
    pub fn simulation() -> Self {
        Self {
            simulate: true,
            ..Self::default()
        }
    }

    /// Whether the simulation may ever be used
    pub fn allows_simulation(&self) -> bool {
        !self.force_real
    }

    /// Check the configuration before handing it to the driver
    pub fn validate(&self) -> DriverResult<()> {
        let invalid = |reason| Err(DriverError::InvalidConfig { reason });

        if self.scan.buses.is_empty() {
            return invalid("no candidate buses");
        }
        if self.scan.addresses.is_empty() {
            return invalid("no candidate addresses");
        }
        if self.scan.identities.is_empty() {
            return invalid("no accepted identities");
        }
        if self.scan.rounds == 0 {
            return invalid("scan rounds must be at least 1");
        }
        if self.read.attempts == 0 {
            return invalid("read attempts must be at least 1");
        }
        if self.read.raw_ceiling < CalibrationTable::VENDOR.saturation_raw() {
            return invalid("raw ceiling below the top calibration step");
        }
        if self.filter.raw_zero_threshold == 0 || self.filter.index_zero_threshold == 0 {
            return invalid("zero thresholds must be at least 1");
        }
        if self.filter.raw_decay_divisor < 2 {
            return invalid("raw decay divisor must be at least 2");
        }
        if !(self.filter.raw_jump_ratio > 0.0) {
            return invalid("jump ratio must be positive");
        }
        if !(0.0..=1.0).contains(&self.filter.min_blend_weight) {
            return invalid("blend weight must lie in [0, 1]");
        }
        if self.filter.index_step_limit == 0 || self.filter.risk_step_limit == 0 {
            return invalid("step limits must be at least 1");
        }
        if self.allows_simulation() {
            if self.simulation.levels.is_empty() {
                return invalid("simulation waveform is empty");
            }
            if self.simulation.steps_per_level == 0 {
                return invalid("simulation steps per level must be at least 1");
            }
        }
        if self.force_real && self.simulate {
            return invalid("force_real and simulate are mutually exclusive");
        }
        Ok(())
    }
}
