//! Simulation source
//!
//! Produces plausible readings without a transport. A short cyclic list of
//! target UV index levels is walked slowly, one position every
//! `steps_per_level` samples, and each sample adds uniform jitter from a
//! seeded linear congruential generator, so runs are reproducible.

use crate::calibration::risk_for_index;
use crate::config::SimulationConfig;
use crate::constants::registers::UV_INDEX_MAX;
use crate::errors::DriverResult;
use crate::traits::UvSource;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Synthetic UV source
#[derive(Debug, Clone)]
pub struct SimulationSource {
    config: SimulationConfig,
    raw_ceiling: u16,
    samples: u32,
    position: usize,
    state: u32,
    last_index: Option<u8>,
}

impl SimulationSource {
    /// Source walking `config.levels`, raw values capped at `raw_ceiling`
    pub fn new(config: SimulationConfig, raw_ceiling: u16) -> Self {
        let state = config.seed;
        Self {
            config,
            raw_ceiling,
            samples: 0,
            position: 0,
            state,
            last_index: None,
        }
    }

    /// Current target level
    pub fn target(&self) -> u8 {
        self.config.levels.get(self.position).copied().unwrap_or(0)
    }

    /// Samples produced so far
    pub fn samples(&self) -> u32 {
        self.samples
    }

    /// Uniform value in `[-1, 1)`
    fn unit_jitter(&mut self) -> f32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        // Top 24 bits fit an f32 mantissa exactly
        let unit = (self.state >> 8) as f32 / (1u32 << 24) as f32;
        unit * 2.0 - 1.0
    }

    fn sample(&mut self) -> f32 {
        let value = f32::from(self.target()) + self.unit_jitter() * self.config.jitter;

        self.samples = self.samples.wrapping_add(1);
        let steps = self.config.steps_per_level.max(1);
        if self.samples % steps == 0 && !self.config.levels.is_empty() {
            self.position = (self.position + 1) % self.config.levels.len();
        }
        value
    }

    /// Next raw intensity in `0..=raw_ceiling`
    pub fn next_raw(&mut self) -> u16 {
        let scaled = libm::truncf(self.sample() * f32::from(self.config.raw_scale));
        scaled.clamp(0.0, f32::from(self.raw_ceiling)) as u16
    }

    /// Next UV index in `0..=11`
    pub fn next_index(&mut self) -> u8 {
        let index = libm::truncf(self.sample()).clamp(0.0, f32::from(UV_INDEX_MAX)) as u8;
        self.last_index = Some(index);
        index
    }

    /// UV index last handed out by `next_index`
    pub fn last_index(&self) -> Option<u8> {
        self.last_index
    }

    /// Risk category of the last reported UV index; index 0 gives 0.
    ///
    /// Before any index has been reported one is sampled first.
    pub fn next_risk(&mut self) -> u8 {
        let index = match self.last_index {
            Some(index) => index,
            None => self.next_index(),
        };
        match index {
            0 => 0,
            index => risk_for_index(index),
        }
    }
}

impl UvSource for SimulationSource {
    fn read_raw(&mut self) -> DriverResult<u16> {
        Ok(self.next_raw())
    }

    fn read_index(&mut self) -> DriverResult<u8> {
        Ok(self.next_index())
    }

    fn read_risk(&mut self) -> DriverResult<u8> {
        Ok(self.next_risk())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::registers::RAW_CEILING;

    fn source() -> SimulationSource {
        SimulationSource::new(SimulationConfig::default(), RAW_CEILING)
    }

    #[test]
    fn stays_in_range_over_full_cycles() {
        let mut sim = source();
        for _ in 0..1000 {
            assert!(sim.next_raw() <= RAW_CEILING);
            assert!(sim.next_index() <= 11);
            assert!(sim.next_risk() <= 4);
        }
    }

    #[test]
    fn advances_every_ten_samples() {
        let mut sim = source();
        assert_eq!(sim.target(), 0);
        for _ in 0..10 {
            sim.next_index();
        }
        assert_eq!(sim.target(), 1);
        for _ in 0..10 {
            sim.next_raw();
        }
        assert_eq!(sim.target(), 2);
    }

    #[test]
    fn index_tracks_target_within_jitter() {
        let mut sim = source();
        // Skip to level 7
        for _ in 0..50 {
            sim.next_index();
        }
        assert_eq!(sim.target(), 7);
        let index = sim.next_index();
        assert!((6..=7).contains(&index), "index {}", index);
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = source();
        let mut b = source();
        for _ in 0..64 {
            assert_eq!(a.next_raw(), b.next_raw());
        }
    }

    #[test]
    fn risk_follows_index_bands() {
        let mut sim = source();
        // Level 11
        for _ in 0..70 {
            sim.next_index();
        }
        assert_eq!(sim.target(), 11);
        sim.next_index();
        let risk = sim.next_risk();
        assert!(risk == 3 || risk == 4, "risk {}", risk);
    }

    #[test]
    fn risk_maps_last_reported_index() {
        let mut sim = source();
        for _ in 0..260 {
            let index = sim.next_index();
            let samples = sim.samples();
            let expected = if index == 0 { 0 } else { risk_for_index(index) };
            assert_eq!(sim.next_risk(), expected, "index {}", index);
            // Mapping does not draw a sample
            assert_eq!(sim.samples(), samples);
        }
    }

    #[test]
    fn risk_before_any_index_samples_one() {
        let mut sim = source();
        assert_eq!(sim.last_index(), None);
        assert_eq!(sim.next_risk(), 0);
        assert_eq!(sim.samples(), 1);
        assert_eq!(sim.last_index(), Some(0));
    }
}
