//! Value Pipeline
//!
//! Turns provisional register reads into the three values handed to the
//! caller, keeping enough history to smooth out glitches.
//!
//! ## Stages
//!
//! ```text
//! read_raw:   acquire ─> zero gate ─> jump blend ─> store
//! read_index: read_raw ─> calibration ─> zero gate ─> step limit (not for zero) ─> store
//! read_risk:  read_index ─> risk bands ─> step limit (index 0 forces 0) ─> store
//! ```
//!
//! `acquire` is where a failed read is resolved: in strict mode the failure
//! is returned, otherwise the last stored value (or a floor) is substituted
//! and logged. Ceiling correction happens below this layer: the register
//! reader picks whichever byte order is within the ceiling and rejects the
//! word when neither is.
//!
//! ## Ordering
//!
//! Calls share history. `read_index` advances the raw history as well, and
//! `read_risk` advances both, so the result of a call depends on every call
//! before it.

use embedded_hal::delay::DelayNs;

use crate::calibration::{risk_for_index, CalibrationTable};
use crate::config::FilterConfig;
use crate::constants::registers::UV_INDEX_MAX;
use crate::errors::DriverResult;
use crate::filters::{self, ZeroGate};
use crate::history::ReadingHistory;
use crate::reader::RegisterReader;
use crate::register::Register;
use crate::scanner::DeviceHandle;
use crate::traits::{Transport, UvSource};

/// Smoothing pipeline over a register reader
pub struct ValuePipeline<T, D> {
    reader: RegisterReader<T, D>,
    filter: FilterConfig,
    calibration: CalibrationTable,
    history: ReadingHistory,
    strict: bool,
}

impl<T, D> ValuePipeline<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Pipeline using the vendor calibration curve.
    ///
    /// With `strict` set, exhausted reads are returned as errors instead of
    /// being replaced from history.
    pub fn new(reader: RegisterReader<T, D>, filter: FilterConfig, strict: bool) -> Self {
        Self {
            reader,
            filter,
            calibration: CalibrationTable::VENDOR,
            history: ReadingHistory::new(),
            strict,
        }
    }

    /// Replace the calibration curve
    pub fn with_calibration(mut self, calibration: CalibrationTable) -> Self {
        self.calibration = calibration;
        self
    }

    /// Values last returned
    pub fn history(&self) -> &ReadingHistory {
        &self.history
    }

    /// The bound sensor
    pub fn handle(&self) -> DeviceHandle {
        self.reader.handle()
    }

    /// Whether read failures are surfaced
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Give the underlying reader back
    pub fn into_reader(self) -> RegisterReader<T, D> {
        self.reader
    }

    /// Read a register through the retry loop, substituting history on
    /// failure unless strict.
    fn acquire(&mut self, register: Register) -> DriverResult<u16> {
        match self.reader.read16(register) {
            Ok(value) => Ok(value),
            Err(err) if self.strict => Err(err),
            Err(_err) => {
                let floor = self.reader.config().raw_fallback_floor;
                let substitute = self.history.fallback_for(register, floor);
                log_warn!("{}; using {} from history", _err, substitute);
                Ok(substitute)
            }
        }
    }

    /// Read the sensor's own value of `register` without touching history.
    ///
    /// Same retry and fallback rules as the other reads.
    pub fn read_reported(&mut self, register: Register) -> DriverResult<u16> {
        self.acquire(register)
    }

    /// Raw intensity in `0..=raw_ceiling`
    pub fn read_raw(&mut self) -> DriverResult<u16> {
        let ceiling = self.reader.config().raw_ceiling;
        let candidate = self.acquire(Register::RawIntensity)?;

        let f = &self.filter;
        let previous = self.history.raw.previous();
        let gate = filters::gate_zero(
            candidate,
            previous,
            &mut self.history.raw.zero_streak,
            f.zero_glitch_min_raw,
            f.raw_zero_threshold,
        );

        let value = match gate {
            ZeroGate::Hold => {
                let held = filters::decay(previous, f.raw_decay_divisor);
                log_debug!(
                    "raw zero {}/{} held at {}",
                    self.history.raw.zero_streak,
                    f.raw_zero_threshold,
                    held
                );
                held
            }
            ZeroGate::Accept => {
                let (value, blended) = filters::blend_jump(
                    candidate,
                    previous,
                    f.smoothing_floor_raw,
                    f.raw_jump_ratio,
                    f.min_blend_weight,
                );
                if blended {
                    log_debug!("raw jump {} -> {} blended to {}", previous, candidate, value);
                }
                value
            }
        };

        let value = value.min(ceiling);
        self.history.raw.record(value);
        Ok(value)
    }

    /// UV index in `0..=11`
    pub fn read_index(&mut self) -> DriverResult<u8> {
        let raw = self.read_raw()?;
        let candidate = self.calibration.index_for(raw);
        let previous = level(self.history.index.previous());

        let gate = filters::gate_zero(
            u16::from(candidate),
            u16::from(previous),
            &mut self.history.index.zero_streak,
            0,
            self.filter.index_zero_threshold,
        );

        // A zero that survived the gate is taken as is
        let value = match gate {
            ZeroGate::Hold => previous,
            ZeroGate::Accept if candidate == 0 => 0,
            ZeroGate::Accept => {
                filters::step_limit(candidate, previous, self.filter.index_step_limit)
            }
        }
        .min(UV_INDEX_MAX);
        self.history.index.record(u16::from(value));
        Ok(value)
    }

    /// Risk category in `0..=4`
    pub fn read_risk(&mut self) -> DriverResult<u8> {
        let index = self.read_index()?;
        let previous = level(self.history.risk.previous());

        let value = if index == 0 {
            0
        } else {
            filters::step_limit(risk_for_index(index), previous, self.filter.risk_step_limit)
        };

        self.history.risk.record(u16::from(value));
        Ok(value)
    }
}

impl<T, D> UvSource for ValuePipeline<T, D>
where
    T: Transport,
    D: DelayNs,
{
    fn read_raw(&mut self) -> DriverResult<u16> {
        ValuePipeline::read_raw(self)
    }

    fn read_index(&mut self) -> DriverResult<u8> {
        ValuePipeline::read_index(self)
    }

    fn read_risk(&mut self) -> DriverResult<u8> {
        ValuePipeline::read_risk(self)
    }
}

fn level(stored: u16) -> u8 {
    u8::try_from(stored).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReadConfig;
    use crate::errors::{DriverError, TransportError};
    use std::collections::VecDeque;
    use std::vec::Vec;

    /// Serves raw words per register; identity reads always succeed
    #[derive(Default)]
    struct Registers {
        raw: VecDeque<Option<u16>>,
        index: VecDeque<Option<u16>>,
    }

    impl Transport for Registers {
        fn read_block(
            &mut self,
            _bus: u8,
            _address: u8,
            register: u8,
            buf: &mut [u8],
        ) -> Result<usize, TransportError> {
            let queue = match register {
                0x06 => &mut self.raw,
                0x07 => &mut self.index,
                _ => {
                    buf.copy_from_slice(&[0x42, 0x7C]);
                    return Ok(2);
                }
            };
            match queue.pop_front().flatten() {
                Some(word) => {
                    buf.copy_from_slice(&word.to_be_bytes());
                    Ok(2)
                }
                None => Err(TransportError::Timeout),
            }
        }
    }

    struct NoDelay;

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, _ns: u32) {}
    }

    fn pipeline(raw: &[Option<u16>], strict: bool) -> ValuePipeline<Registers, NoDelay> {
        let transport = Registers {
            raw: raw.iter().copied().collect(),
            index: VecDeque::new(),
        };
        let reader = RegisterReader::new(
            transport,
            NoDelay,
            DeviceHandle::fixed(1, 0x23),
            ReadConfig::default(),
        );
        ValuePipeline::new(reader, FilterConfig::default(), strict)
    }

    fn ok(values: &[u16]) -> Vec<Option<u16>> {
        values.iter().map(|&v| Some(v)).collect()
    }

    #[test]
    fn calibration_sequence() {
        let mut pipeline = pipeline(&ok(&[10, 300, 305, 298]), false);
        let indices: Vec<u8> = (0..4).map(|_| pipeline.read_index().unwrap()).collect();
        assert_eq!(indices, [0, 2, 2, 2]);
        assert_eq!(pipeline.history().raw.last, Some(298));
        assert_eq!(pipeline.history().index.last, Some(2));
    }

    #[test]
    fn zeros_are_held_then_accepted() {
        let mut pipeline = pipeline(&ok(&[400, 0, 0, 0]), false);
        let values: Vec<u16> = (0..4).map(|_| pipeline.read_raw().unwrap()).collect();
        assert_eq!(values, [400, 200, 100, 0]);
    }

    #[test]
    fn index_zeros_hold_previous_index() {
        // Raw holds 600 -> 300 -> 150 before zero passes the raw gate, so
        // the index candidates are 5, 2, 1 and then zero from the fourth read.
        let mut pipeline = pipeline(&ok(&[600, 0, 0, 0, 0, 0, 0, 0, 0]), false);
        let falling: Vec<u8> = (0..3).map(|_| pipeline.read_index().unwrap()).collect();
        assert_eq!(falling, [5, 4, 3]);
        assert_eq!(pipeline.history().raw.last, Some(150));

        let held: Vec<u8> = (0..4).map(|_| pipeline.read_index().unwrap()).collect();
        assert_eq!(held, [3, 3, 3, 3]);
        assert_eq!(pipeline.history().raw.last, Some(0));
        assert_eq!(pipeline.history().index.zero_streak, 4);

        // Fifth consecutive zero is trusted and skips the step limit
        assert_eq!(pipeline.read_index().unwrap(), 0);
        assert_eq!(pipeline.history().index.last, Some(0));
        assert_eq!(pipeline.read_index().unwrap(), 0);
    }

    #[test]
    fn large_jump_is_blended() {
        let mut pipeline = pipeline(&ok(&[100, 400]), false);
        assert_eq!(pipeline.read_raw().unwrap(), 100);
        assert_eq!(pipeline.read_raw().unwrap(), 150);
        assert_eq!(pipeline.history().raw.last, Some(150));
    }

    #[test]
    fn byte_swapped_raw_is_recovered() {
        // 300 arrives as 0x2C01
        let mut pipeline = pipeline(&ok(&[0x2C01]), false);
        assert_eq!(pipeline.read_raw().unwrap(), 300);
    }

    #[test]
    fn raw_over_ceiling_in_both_orders_falls_back() {
        // 0x7F7E and 0x7E7F are both above 1200; the word is never clamped
        let mut pipeline = pipeline(&ok(&[420, 0x7F7E, 0x7F7E, 0x7F7E]), false);
        assert_eq!(pipeline.read_raw().unwrap(), 420);
        assert_eq!(pipeline.read_raw().unwrap(), 420);
    }

    #[test]
    fn failed_reads_fall_back_to_history() {
        let mut script = ok(&[420]);
        script.extend([None, None, None]);
        let mut pipeline = pipeline(&script, false);

        assert_eq!(pipeline.read_raw().unwrap(), 420);
        assert_eq!(pipeline.read_raw().unwrap(), 420);
    }

    #[test]
    fn failed_first_read_uses_floor() {
        let mut pipeline = pipeline(&[], false);
        assert_eq!(pipeline.read_raw().unwrap(), 10);
        assert_eq!(pipeline.read_index().unwrap(), 0);
    }

    #[test]
    fn strict_mode_surfaces_failure() {
        let mut pipeline = pipeline(&[], true);
        assert_eq!(
            pipeline.read_raw(),
            Err(DriverError::ReadFailed {
                register: Register::RawIntensity,
                attempts: 3
            })
        );
        assert_eq!(pipeline.history().raw.last, None);
    }

    #[test]
    fn index_and_risk_move_one_level_per_call() {
        // Raw climbs from index 1 territory towards index 9
        let mut pipeline = pipeline(&ok(&[100, 900, 900, 900, 900, 900, 900, 900]), false);
        assert_eq!(pipeline.read_risk().unwrap(), 0);

        let mut last = pipeline.history().index.previous();
        for _ in 0..7 {
            pipeline.read_risk().unwrap();
            let index = pipeline.history().index.previous();
            assert!(index.abs_diff(last) <= 1);
            last = index;
        }
        assert!(pipeline.history().risk.previous() <= 4);
    }

    #[test]
    fn index_zero_forces_risk_zero() {
        let mut pipeline = pipeline(&ok(&[20]), false);
        assert_eq!(pipeline.read_risk().unwrap(), 0);
        assert_eq!(pipeline.history().risk.last, Some(0));
    }

    #[test]
    fn reported_registers_bypass_history() {
        let transport = Registers {
            raw: VecDeque::new(),
            index: [Some(0x0700)].into_iter().collect(),
        };
        let reader = RegisterReader::new(
            transport,
            NoDelay,
            DeviceHandle::fixed(1, 0x23),
            ReadConfig::default(),
        );
        let mut pipeline = ValuePipeline::new(reader, FilterConfig::default(), false);

        assert_eq!(pipeline.read_reported(Register::UvIndex).unwrap(), 7);
        assert_eq!(pipeline.read_reported(Register::Identity).unwrap(), 0x427C);
        assert_eq!(pipeline.history(), &ReadingHistory::new());
    }
}
