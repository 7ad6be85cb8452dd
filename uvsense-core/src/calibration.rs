//! Calibration Curve and Risk Mapping
//!
//! ## Motivation
//!
//! The sensor reports an unscaled intensity. Turning that into a UV index is a
//! step function taken from the vendor's published curve; turning the index
//! into a risk category follows the WHO bands. Both are small, static tables,
//! so lookups are a linear scan with no floating point.
//!
//! ## Vendor Curve
//!
//! ```text
//! raw      | < 50 | < 227 | < 318 | < 408 | < 503 | < 606 | < 696 | < 795 | < 881 | < 976 | < 1079 | else
//! UV index |   0  |   1   |   2   |   3   |   4   |   5   |   6   |   7   |   8   |   9   |   10   |  11
//! ```
//!
//! Historical driver variants patched individual raw values (3, 6, 14, 48,
//! 512, 1024) with hand-picked results. Those were symptoms of byte-order
//! errors, which the register reader now fixes at the source, so the table is
//! the only mapping.
//!
//! ## Risk Bands
//!
//! ```text
//! UV index | 0-2 | 3-5      | 6-7  | 8-10      | 11+
//! risk     | Low | Moderate | High | Very High | Extreme
//! ```

use core::fmt;

use crate::constants::registers::UV_INDEX_MAX;

/// One step of the calibration curve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoint {
    /// Exclusive upper bound of raw values in this step
    pub upper: u16,
    /// UV index for raw values below `upper`
    pub index: u8,
}

const fn bp(upper: u16, index: u8) -> Breakpoint {
    Breakpoint { upper, index }
}

/// Raw intensity to UV index lookup
#[derive(Debug, Clone, Copy)]
pub struct CalibrationTable {
    /// Breakpoints in ascending order of `upper`
    breakpoints: &'static [Breakpoint],
    /// Index for raw values at or above the last breakpoint
    saturation_index: u8,
}

/// Vendor calibration curve
const VENDOR_BREAKPOINTS: [Breakpoint; 11] = [
    bp(50, 0),
    bp(227, 1),
    bp(318, 2),
    bp(408, 3),
    bp(503, 4),
    bp(606, 5),
    bp(696, 6),
    bp(795, 7),
    bp(881, 8),
    bp(976, 9),
    bp(1079, 10),
];

impl CalibrationTable {
    /// The vendor's published curve
    pub const VENDOR: Self = Self {
        breakpoints: &VENDOR_BREAKPOINTS,
        saturation_index: UV_INDEX_MAX,
    };

    /// Build a table from custom breakpoints.
    ///
    /// Returns `None` unless the bounds strictly increase and the indices
    /// never decrease and stay at or below `saturation_index`.
    pub fn new(breakpoints: &'static [Breakpoint], saturation_index: u8) -> Option<Self> {
        let table = Self {
            breakpoints,
            saturation_index,
        };
        table.is_monotonic().then_some(table)
    }

    /// UV index for a raw reading: first breakpoint whose bound exceeds `raw`
    pub fn index_for(&self, raw: u16) -> u8 {
        self.breakpoints
            .iter()
            .find(|step| raw < step.upper)
            .map_or(self.saturation_index, |step| step.index)
    }

    /// Lowest raw value mapping to `saturation_index`
    pub fn saturation_raw(&self) -> u16 {
        self.breakpoints.last().map_or(0, |step| step.upper)
    }

    /// Lowest raw value mapping to a non-zero index
    pub fn dark_threshold(&self) -> u16 {
        self.breakpoints
            .iter()
            .take_while(|step| step.index == 0)
            .last()
            .map_or(0, |step| step.upper)
    }

    /// Breakpoints in ascending order
    pub fn breakpoints(&self) -> &'static [Breakpoint] {
        self.breakpoints
    }

    /// Bounds strictly increase, indices never decrease
    pub fn is_monotonic(&self) -> bool {
        let ordered = self
            .breakpoints
            .windows(2)
            .all(|pair| pair[0].upper < pair[1].upper && pair[0].index <= pair[1].index);
        let capped = self
            .breakpoints
            .iter()
            .all(|step| step.index <= self.saturation_index);
        ordered && capped
    }
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self::VENDOR
    }
}

/// Exposure risk categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum RiskLevel {
    /// UV index 0-2
    Low = 0,
    /// UV index 3-5
    Moderate = 1,
    /// UV index 6-7
    High = 2,
    /// UV index 8-10
    VeryHigh = 3,
    /// UV index 11 and above
    Extreme = 4,
}

impl RiskLevel {
    /// Category for a UV index
    pub const fn from_index(index: u8) -> Self {
        match index {
            0..=2 => RiskLevel::Low,
            3..=5 => RiskLevel::Moderate,
            6..=7 => RiskLevel::High,
            8..=10 => RiskLevel::VeryHigh,
            _ => RiskLevel::Extreme,
        }
    }

    /// Category for a numeric code; codes above 4 saturate at `Extreme`
    pub const fn from_code(code: u8) -> Self {
        match code {
            0 => RiskLevel::Low,
            1 => RiskLevel::Moderate,
            2 => RiskLevel::High,
            3 => RiskLevel::VeryHigh,
            _ => RiskLevel::Extreme,
        }
    }

    /// Numeric code `0..=4`
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Display label
    pub const fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
            RiskLevel::VeryHigh => "Very High",
            RiskLevel::Extreme => "Extreme",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Risk code for a UV index
pub const fn risk_for_index(index: u8) -> u8 {
    RiskLevel::from_index(index).code()
}
