//! Reading history
//!
//! Last value returned to the caller for each quantity, plus the zero-streak
//! counter the hysteresis needs. Only values actually returned are stored;
//! rejected or intermediate candidates never are.

use crate::register::Register;

/// History of one quantity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuantityHistory {
    /// Last value returned, `None` before the first read
    pub last: Option<u16>,
    /// Consecutive zero candidates seen while holding
    pub zero_streak: u8,
}

impl QuantityHistory {
    /// Last value, 0 before the first read
    pub fn previous(&self) -> u16 {
        self.last.unwrap_or(0)
    }

    /// Record the value returned to the caller
    pub fn record(&mut self, value: u16) {
        self.last = Some(value);
    }
}

/// History of all three quantities
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadingHistory {
    /// Raw intensity
    pub raw: QuantityHistory,
    /// UV index
    pub index: QuantityHistory,
    /// Risk category
    pub risk: QuantityHistory,
}

impl ReadingHistory {
    /// Empty history
    pub const fn new() -> Self {
        const EMPTY: QuantityHistory = QuantityHistory {
            last: None,
            zero_streak: 0,
        };
        Self {
            raw: EMPTY,
            index: EMPTY,
            risk: EMPTY,
        }
    }

    /// Value substituted when a register read fails.
    ///
    /// Raw intensity falls back to its last value if positive, otherwise to
    /// `raw_floor` so a failed read never looks like darkness. Index and
    /// risk fall back to their last value or 0.
    pub fn fallback_for(&self, register: Register, raw_floor: u16) -> u16 {
        match register {
            Register::RawIntensity => match self.raw.last {
                Some(value) if value > 0 => value,
                _ => raw_floor,
            },
            Register::UvIndex => self.index.previous(),
            Register::RiskLevel => self.risk.previous(),
            Register::Identity => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_defaults() {
        let history = ReadingHistory::new();
        assert_eq!(history.fallback_for(Register::RawIntensity, 10), 10);
        assert_eq!(history.fallback_for(Register::UvIndex, 10), 0);
        assert_eq!(history.fallback_for(Register::RiskLevel, 10), 0);
    }

    #[test]
    fn fallback_uses_last_value() {
        let mut history = ReadingHistory::new();
        history.raw.record(420);
        history.index.record(4);
        history.risk.record(1);
        assert_eq!(history.fallback_for(Register::RawIntensity, 10), 420);
        assert_eq!(history.fallback_for(Register::UvIndex, 10), 4);
        assert_eq!(history.fallback_for(Register::RiskLevel, 10), 1);

        // A recorded zero raw still falls back to the floor
        history.raw.record(0);
        assert_eq!(history.fallback_for(Register::RawIntensity, 10), 10);

        assert_ne!(history, ReadingHistory::new());
        assert_eq!(ReadingHistory::new(), ReadingHistory::default());
    }
}
