//! Robust 16-bit register reads
//!
//! ## Attempt
//!
//! ```text
//! read_block(reg, 2) ──> [b0, b1] ──> normal = b0b1, swapped = b1b0
//!                                       │
//!                     pick the one inside the register's range
//!                                       │
//!                   reject 0xFFFF, reject out of range ──> value
//! ```
//!
//! ## Retry
//!
//! The first read after binding is preceded by throwaway identity reads that
//! absorb start-up glitches. Each retry waits `retry_delay_ms × n` after the
//! n-th failure and re-primes the bus with another throwaway identity read.
//! After the budget is spent the reader reports `ReadFailed`; substitution
//! from history is the pipeline's decision, not the reader's.

use embedded_hal::delay::DelayNs;

use crate::config::ReadConfig;
use crate::errors::{DriverError, DriverResult, TransportError};
use crate::register::{is_sentinel, Register, WordPair};
use crate::scanner::DeviceHandle;
use crate::traits::Transport;

/// Reads registers from one bound sensor
pub struct RegisterReader<T, D> {
    transport: T,
    delay: D,
    handle: DeviceHandle,
    config: ReadConfig,
    warmed_up: bool,
}

impl<T, D> RegisterReader<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Reader bound to `handle`
    pub fn new(transport: T, delay: D, handle: DeviceHandle, config: ReadConfig) -> Self {
        Self {
            transport,
            delay,
            handle,
            config,
            warmed_up: false,
        }
    }

    /// The bound sensor
    pub fn handle(&self) -> DeviceHandle {
        self.handle
    }

    /// Read settings
    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    /// Give the transport and delay back
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }

    /// Read `register`, retrying until a plausible value arrives.
    pub fn read16(&mut self, register: Register) -> DriverResult<u16> {
        if !self.warmed_up {
            self.warm_up();
        }

        let attempts = self.config.attempts.max(1);
        for attempt in 1..=attempts {
            if attempt > 1 {
                let wait = self.config.retry_delay_ms.saturating_mul(u32::from(attempt - 1));
                self.delay.delay_ms(wait);
                self.prime();
            }

            match self.attempt(register) {
                Ok(value) => return Ok(value),
                Err(_err) => {
                    log_debug!("{} attempt {}/{} rejected: {}", register, attempt, attempts, _err);
                }
            }
        }

        Err(DriverError::ReadFailed { register, attempts })
    }

    /// One read with no retry
    pub fn attempt(&mut self, register: Register) -> DriverResult<u16> {
        let word = self.word(register)?;
        let ceiling = self.config.raw_ceiling;
        let value = word.select(register, ceiling);

        if register.rejects_sentinel() && is_sentinel(value) {
            return Err(DriverError::InvalidSentinel { register });
        }
        if let Some(max) = register.valid_max(ceiling) {
            if value > max {
                return Err(DriverError::InvalidRange {
                    register,
                    value,
                    max,
                });
            }
        }
        Ok(value)
    }

    fn word(&mut self, register: Register) -> Result<WordPair, TransportError> {
        let mut buf = [0u8; 2];
        let received = self.transport.read_block(
            self.handle.bus,
            self.handle.address,
            register.offset(),
            &mut buf,
        )?;
        if received != buf.len() {
            return Err(TransportError::ShortRead {
                expected: buf.len(),
                actual: received,
            });
        }
        Ok(WordPair::from_bytes(buf))
    }

    fn prime(&mut self) {
        let _ = self.word(Register::Identity);
    }

    fn warm_up(&mut self) {
        for _ in 0..self.config.warmup_reads {
            self.prime();
        }
        if self.config.warmup_reads > 0 {
            self.delay.delay_ms(self.config.warmup_settle_ms);
        }
        self.warmed_up = true;
    }
}
