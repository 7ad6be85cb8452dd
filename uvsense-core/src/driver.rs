//! Driver facade
//!
//! `UvSensor` ties discovery, the register reader, the value pipeline, and the
//! simulation fallback together behind one type.
//!
//! ## Mode Selection
//!
//! ```text
//! config.simulate ───────────────────────────────> Simulated
//! discover() ── found ───────────────────────────> Hardware
//!            └─ NotFound ── force_real ──────────> Err(NotFound)
//!                       └── otherwise ───────────> Simulated
//! ```
//!
//! ## Example
//!
//! ```rust
//! use uvsense_core::{DriverConfig, UvSensor};
//!
//! let mut sensor = UvSensor::simulated(DriverConfig::default()).unwrap();
//! let index = sensor.read_index().unwrap();
//! assert!(index <= 11);
//! ```

use embedded_hal::delay::DelayNs;

use crate::calibration::RiskLevel;
use crate::config::DriverConfig;
use crate::constants::registers::DEVICE_ID;
use crate::errors::{DriverError, DriverResult, TransportError};
use crate::history::ReadingHistory;
use crate::pipeline::ValuePipeline;
use crate::reader::RegisterReader;
use crate::register::Register;
use crate::scanner::{BusScanner, DeviceHandle};
use crate::simulation::SimulationSource;
use crate::traits::{Transport, UvSource};

/// Where readings come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// A discovered sensor
    Hardware,
    /// The synthetic waveform
    Simulated,
}

enum Backend<T, D> {
    Hardware(ValuePipeline<T, D>),
    Simulated(SimulationSource),
}

/// UV index sensor driver
pub struct UvSensor<T, D> {
    backend: Backend<T, D>,
    config: DriverConfig,
}

impl<T, D> UvSensor<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Discover the sensor and bind to it.
    ///
    /// Falls back to simulation when discovery fails, unless
    /// `config.force_real` is set, in which case `NotFound` is returned.
    pub fn begin(mut transport: T, mut delay: D, config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;
        if config.simulate {
            log_info!("simulation requested, skipping discovery");
            return Ok(Self::simulating(config));
        }

        let found = BusScanner::new(&config.scan).discover(&mut transport, &mut delay);
        match found {
            Ok(handle) => Ok(Self::bind(transport, delay, handle, config)),
            Err(err) if config.force_real => {
                log_warn!("UV sensor not found: {}", err);
                Err(err)
            }
            Err(_err) => {
                log_warn!("UV sensor not found ({}), using simulation", _err);
                Ok(Self::simulating(config))
            }
        }
    }

    /// Bind to a sensor at a known location without scanning
    pub fn attach(transport: T, delay: D, handle: DeviceHandle, config: DriverConfig) -> DriverResult<Self> {
        config.validate()?;
        Ok(Self::bind(transport, delay, handle, config))
    }

    fn bind(transport: T, delay: D, handle: DeviceHandle, config: DriverConfig) -> Self {
        let reader = RegisterReader::new(transport, delay, handle, config.read.clone());
        let pipeline = ValuePipeline::new(reader, config.filter.clone(), config.force_real);
        Self {
            backend: Backend::Hardware(pipeline),
            config,
        }
    }

    fn simulating(config: DriverConfig) -> Self {
        let source = SimulationSource::new(config.simulation.clone(), config.read.raw_ceiling);
        Self {
            backend: Backend::Simulated(source),
            config,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        match self.backend {
            Backend::Hardware(_) => Mode::Hardware,
            Backend::Simulated(_) => Mode::Simulated,
        }
    }

    /// Whether readings are synthetic
    pub fn is_simulated(&self) -> bool {
        self.mode() == Mode::Simulated
    }

    /// The bound sensor, or `NotConnected` while simulating
    pub fn device(&self) -> DriverResult<DeviceHandle> {
        match &self.backend {
            Backend::Hardware(pipeline) => Ok(pipeline.handle()),
            Backend::Simulated(_) => Err(DriverError::NotConnected),
        }
    }

    /// Smoothing history; `None` while simulating
    pub fn history(&self) -> Option<&ReadingHistory> {
        match &self.backend {
            Backend::Hardware(pipeline) => Some(pipeline.history()),
            Backend::Simulated(_) => None,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Raw intensity
    pub fn read_raw(&mut self) -> DriverResult<u16> {
        self.source().read_raw()
    }

    /// UV index (0 to 11)
    pub fn read_index(&mut self) -> DriverResult<u8> {
        self.source().read_index()
    }

    /// Risk category code (0 to 4)
    pub fn read_risk(&mut self) -> DriverResult<u8> {
        self.source().read_risk()
    }

    /// Risk category
    pub fn read_risk_level(&mut self) -> DriverResult<RiskLevel> {
        self.source().read_risk_level()
    }

    /// Read the sensor's own value of a register, bypassing the smoothing
    /// history. While simulating, synthetic values are returned.
    pub fn read_reported(&mut self, register: Register) -> DriverResult<u16> {
        match &mut self.backend {
            Backend::Hardware(pipeline) => pipeline.read_reported(register),
            Backend::Simulated(sim) => Ok(match register {
                Register::Identity => DEVICE_ID,
                Register::RawIntensity => sim.next_raw(),
                Register::UvIndex => u16::from(sim.next_index()),
                Register::RiskLevel => u16::from(sim.next_risk()),
            }),
        }
    }

    fn source(&mut self) -> &mut dyn UvSource {
        match &mut self.backend {
            Backend::Hardware(pipeline) => pipeline,
            Backend::Simulated(sim) => sim,
        }
    }
}

impl<T, D> UvSource for UvSensor<T, D>
where
    T: Transport,
    D: DelayNs,
{
    fn read_raw(&mut self) -> DriverResult<u16> {
        UvSensor::read_raw(self)
    }

    fn read_index(&mut self) -> DriverResult<u8> {
        UvSensor::read_index(self)
    }

    fn read_risk(&mut self) -> DriverResult<u8> {
        UvSensor::read_risk(self)
    }
}

/// Stand-in transport and delay for a driver that never touches a bus
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl Transport for Detached {
    fn read_block(
        &mut self,
        bus: u8,
        _address: u8,
        _register: u8,
        _buf: &mut [u8],
    ) -> Result<usize, TransportError> {
        Err(TransportError::BusUnavailable { bus })
    }
}

impl DelayNs for Detached {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl UvSensor<Detached, Detached> {
    /// Simulation-only driver; no bus is touched.
    ///
    /// Fails with `InvalidConfig` if `config.force_real` is set.
    pub fn simulated(config: DriverConfig) -> DriverResult<Self> {
        let config = DriverConfig {
            simulate: true,
            ..config
        };
        config.validate()?;
        Ok(Self::simulating(config))
    }
}
