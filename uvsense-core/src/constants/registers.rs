//! Register Map and Wire-Level Constants
//!
//! Offsets, identity values, and bus candidates for the 240370 UV index
//! sensor. These are the only constants that appear on the wire.

// ===== DEVICE ADDRESSING =====

/// Factory I2C / Modbus unit address.
///
/// Source: DFRobot SEN0636 wiki and Arduino library
pub const DEVICE_ADDR: u8 = 0x23;

/// Alternate address seen on some carrier boards.
///
/// Source: Field reports from UniHiker deployments
pub const DEVICE_ADDR_ALT: u8 = 0x38;

/// Bus probe order.
///
/// Bus 4 hosts the Gravity connector on the UniHiker and is tried first.
/// The rest follow the usual Linux numbering.
pub const DEFAULT_BUSES: [u8; 8] = [4, 1, 0, 2, 3, 5, 6, 7];

/// Address probe order.
pub const DEFAULT_ADDRESSES: [u8; 2] = [DEVICE_ADDR, DEVICE_ADDR_ALT];

// ===== REGISTER OFFSETS =====

/// Product id register.
pub const REG_PID: u8 = 0x00;

/// Raw UV intensity register.
pub const REG_DATA: u8 = 0x06;

/// UV index register.
pub const REG_INDEX: u8 = 0x07;

/// Risk level register.
pub const REG_RISK: u8 = 0x08;

// ===== IDENTITY =====

/// Product id as documented.
pub const DEVICE_ID: u16 = 0x427C;

/// Product id with its bytes swapped by the transport.
pub const DEVICE_ID_SWAPPED: u16 = 0x7C42;

/// Identity values accepted during discovery.
pub const DEFAULT_IDENTITIES: [u16; 2] = [DEVICE_ID, DEVICE_ID_SWAPPED];

// ===== VALUE RANGES =====

/// Reserved all-ones word returned by a glitching bus.
pub const INVALID_SENTINEL: u16 = 0xFFFF;

/// Ceiling for raw intensity.
///
/// The sensor output saturates well below this; anything higher is a
/// byte-order or bus error.
///
/// Source: Vendor calibration curve (index 11 starts at 1079)
pub const RAW_CEILING: u16 = 1200;

/// Highest UV index.
pub const UV_INDEX_MAX: u8 = 11;

/// Highest risk category (Extreme).
pub const RISK_LEVEL_MAX: u8 = 4;
