//! Smoothing and Hysteresis Parameters
//!
//! The sensor occasionally reports spurious zeros and the bus occasionally
//! corrupts a word into a plausible but wrong value. These thresholds decide
//! how much temporal consistency a reading needs before it is trusted.

/// Consecutive zero raw readings required before zero is accepted.
pub const RAW_ZERO_THRESHOLD: u8 = 3;

/// Consecutive zero index readings required before zero is accepted.
pub const INDEX_ZERO_THRESHOLD: u8 = 5;

/// Previous raw value above which a zero is treated as a probable glitch.
pub const ZERO_GLITCH_MIN_RAW: u16 = 20;

/// Fraction of the previous value returned while a zero streak is held.
///
/// Expressed as a divisor: the held value is `previous / RAW_DECAY_DIVISOR`.
pub const RAW_DECAY_DIVISOR: u16 = 2;

/// Relative change above which raw readings are blended with history.
pub const RAW_JUMP_RATIO: f32 = 0.5;

/// Smallest weight given to a new raw sample when blending.
pub const MIN_BLEND_WEIGHT: f32 = 0.05;

/// Previous raw value below which blending is skipped.
///
/// Readings under the first calibration breakpoint carry no UV signal, so a
/// jump away from them is a genuine change, not a glitch.
pub const SMOOTHING_FLOOR_RAW: u16 = 50;

/// Largest index change accepted in one call.
pub const INDEX_STEP_LIMIT: u8 = 1;

/// Largest risk change accepted in one call.
pub const RISK_STEP_LIMIT: u8 = 1;

/// Raw value reported when retries fail and there is no usable history.
///
/// Non-zero so a caller never mistakes a bus hiccup for a covered sensor.
pub const RAW_FALLBACK_FLOOR: u16 = 10;
