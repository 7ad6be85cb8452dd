//! Register map and 16-bit word decoding
//!
//! The sensor exposes four input registers the driver cares about. Each is a
//! single 16-bit word, but the byte order that arrives over the bus depends on
//! the adapter: the Arduino I2C path swaps pairs, Modbus is big-endian, and
//! some Linux SMBus stacks return either. Decoding therefore keeps both
//! interpretations and lets the register's plausible range pick one.

use core::fmt;

use crate::constants::registers::{
    INVALID_SENTINEL, REG_DATA, REG_INDEX, REG_PID, REG_RISK, UV_INDEX_MAX, RISK_LEVEL_MAX,
};

/// Registers read by the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Register {
    /// Device identity (product id)
    Identity,
    /// Unscaled UV intensity
    RawIntensity,
    /// UV index as computed by the sensor
    UvIndex,
    /// Risk category as computed by the sensor
    RiskLevel,
}

impl Register {
    /// All registers, in offset order
    pub const ALL: [Register; 4] = [
        Register::Identity,
        Register::RawIntensity,
        Register::UvIndex,
        Register::RiskLevel,
    ];

    /// Register offset on the wire
    pub const fn offset(self) -> u8 {
        match self {
            Register::Identity => REG_PID,
            Register::RawIntensity => REG_DATA,
            Register::UvIndex => REG_INDEX,
            Register::RiskLevel => REG_RISK,
        }
    }

    /// Largest plausible value, or `None` for the identity register
    pub const fn valid_max(self, raw_ceiling: u16) -> Option<u16> {
        match self {
            Register::Identity => None,
            Register::RawIntensity => Some(raw_ceiling),
            Register::UvIndex => Some(UV_INDEX_MAX as u16),
            Register::RiskLevel => Some(RISK_LEVEL_MAX as u16),
        }
    }

    /// Whether `value` lies in the register's plausible range
    pub const fn accepts(self, value: u16, raw_ceiling: u16) -> bool {
        match self.valid_max(raw_ceiling) {
            Some(max) => value <= max,
            None => true,
        }
    }

    /// Whether the all-ones marker means "invalid" for this register
    pub const fn rejects_sentinel(self) -> bool {
        !matches!(self, Register::Identity)
    }

    /// Human readable name
    pub const fn name(self) -> &'static str {
        match self {
            Register::Identity => "Identity",
            Register::RawIntensity => "Raw intensity",
            Register::UvIndex => "UV index",
            Register::RiskLevel => "Risk level",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Both interpretations of a 2-byte register payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPair {
    /// Big-endian interpretation
    pub normal: u16,
    /// Little-endian interpretation
    pub swapped: u16,
}

impl WordPair {
    /// Decode two bytes as received from the bus
    pub const fn from_bytes(bytes: [u8; 2]) -> Self {
        Self {
            normal: u16::from_be_bytes(bytes),
            swapped: u16::from_le_bytes(bytes),
        }
    }

    /// Pick the interpretation that fits `register`'s range.
    ///
    /// When both or neither fit, the big-endian reading wins.
    pub const fn select(self, register: Register, raw_ceiling: u16) -> u16 {
        let normal_ok = register.accepts(self.normal, raw_ceiling);
        let swapped_ok = register.accepts(self.swapped, raw_ceiling);
        if !normal_ok && swapped_ok {
            self.swapped
        } else {
            self.normal
        }
    }
}

/// Swap the two bytes of a word
pub const fn swap_bytes(value: u16) -> u16 {
    value.rotate_left(8)
}

/// Whether a decoded value is the reserved all-ones marker
pub const fn is_sentinel(value: u16) -> bool {
    value == INVALID_SENTINEL
}
