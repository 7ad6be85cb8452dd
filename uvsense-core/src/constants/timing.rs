//! Retry, Back-Off and Warm-Up Timing
//!
//! Every delay in the driver is one of these constants (or the matching
//! config field). All of them are small: the worst case for a single read is
//! the sum of the retry delays.

/// Discovery rounds before giving up.
pub const SCAN_ROUNDS: u8 = 3;

/// Pause between discovery rounds (milliseconds).
///
/// Gives a freshly powered sensor time to come up on the bus.
pub const SCAN_BACKOFF_MS: u32 = 1000;

/// Attempts per register read.
pub const READ_ATTEMPTS: u8 = 3;

/// Base delay between attempts (milliseconds).
///
/// Attempt `n` waits `n * RETRY_DELAY_MS` before running.
pub const RETRY_DELAY_MS: u32 = 20;

/// Throwaway identity reads issued before the first real read.
pub const WARMUP_READS: u8 = 1;

/// Pause after warm-up and re-prime reads (milliseconds).
pub const WARMUP_SETTLE_MS: u32 = 10;
