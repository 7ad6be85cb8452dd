//! Bus Adapters and Host Utilities for uvsense
//!
//! ## Overview
//!
//! The core driver only knows the `Transport` trait: "read N bytes starting
//! at register R from address A on bus B". This crate provides the concrete
//! adapters the sensor is actually wired through, plus the pieces a hosted
//! deployment needs around the driver.
//!
//! ## Adapter Selection Guide
//!
//! ### I2C (`i2c` feature)
//!
//! **When to use:**
//! - Sensor on a Gravity/Qwiic connector
//! - Any `embedded-hal` 1.0 I2C implementation (MCU HALs, `linux-embedded-hal`)
//!
//! **Characteristics:**
//! - One `write_read` per register
//! - Words usually arrive little-endian; the core decodes either order
//! - `I2cBuses` serves several controllers so discovery can scan them all
//!
//! ### Modbus RTU (`modbus` feature)
//!
//! **When to use:**
//! - Sensor jumpered to UART mode
//! - Any `embedded-io` serial port, 9600 8N1
//!
//! **Characteristics:**
//! - Function 0x04, one register per word
//! - CRC-16 checked on every response; exceptions mapped to
//!   `TransportError::DeviceException`
//!
//! ## Host Utilities (`std` feature)
//!
//! - `StdDelay`: `DelayNs` over `std::thread::sleep`
//! - `load_config` / `load_config_str`: JSON configuration files
//!
//! ## Example
//!
//! ```rust,ignore
//! use linux_embedded_hal::I2cdev;
//! use uvsense_connectors::{HalI2cTransport, StdDelay, load_config};
//! use uvsense_core::UvSensor;
//!
//! let i2c = I2cdev::new("/dev/i2c-4")?;
//! let config = load_config("uvsense.json")?;
//! let mut sensor = UvSensor::begin(HalI2cTransport::new(i2c, 4), StdDelay, config)?;
//! println!("UV index {}", sensor.read_index()?);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "i2c")]
pub mod i2c;

#[cfg(feature = "modbus")]
pub mod modbus;

#[cfg(feature = "std")]
pub mod delay;

#[cfg(feature = "std")]
pub mod config;

#[cfg(feature = "i2c")]
pub use i2c::{HalI2cTransport, I2cBuses};

#[cfg(feature = "modbus")]
pub use modbus::{ModbusError, ModbusTransport};

#[cfg(feature = "std")]
pub use delay::StdDelay;

#[cfg(feature = "std")]
pub use config::{load_config, load_config_str, ConfigLoadError};
