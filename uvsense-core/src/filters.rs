//! Hysteresis and Smoothing Primitives
//!
//! ## Overview
//!
//! The value pipeline treats every reading as provisional. These functions
//! hold the individual rules; the pipeline decides which ones run for which
//! quantity and owns the state they need.
//!
//! All functions are pure apart from the zero-streak counter passed in by
//! reference, so they are easy to test in isolation and carry no allocation.
//!
//! ## Rules
//!
//! ### Zero Gate
//! A zero following a positive value starts a streak. The zero is only
//! trusted once the streak reaches the threshold; until then the caller
//! returns a held value instead.
//!
//! ### Jump Blending
//! ```text
//! change = |candidate - previous| / previous
//! weight = clamp(ratio / change, min_weight, 1.0)
//! result = previous + weight * (candidate - previous)
//! ```
//! Larger jumps lean harder on history.
//!
//! ### Step Limit
//! Indices and risk categories move at most one level per call once the
//! difference exceeds the configured limit.

/// Outcome of the zero gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroGate {
    /// Use the candidate as is
    Accept,
    /// Zero not yet trusted; return a held value instead
    Hold,
}

/// Decide whether a zero candidate may pass.
///
/// `previous` is the last accepted value (0 when there is none). A zero
/// following a value above `glitch_min` opens a streak; once a streak is
/// open, every further zero extends it regardless of the held value. Any
/// non-zero candidate closes the streak.
pub fn gate_zero(
    candidate: u16,
    previous: u16,
    streak: &mut u8,
    glitch_min: u16,
    threshold: u8,
) -> ZeroGate {
    if candidate != 0 {
        *streak = 0;
        return ZeroGate::Accept;
    }
    if *streak == 0 && previous <= glitch_min {
        return ZeroGate::Accept;
    }
    *streak = streak.saturating_add(1);
    if *streak >= threshold {
        ZeroGate::Accept
    } else {
        ZeroGate::Hold
    }
}

/// Held raw value while a zero streak is open; never zero
pub fn decay(previous: u16, divisor: u16) -> u16 {
    (previous / divisor.max(1)).max(1)
}

/// Relative change of `candidate` against a positive `previous`
pub fn relative_change(candidate: u16, previous: u16) -> f32 {
    if previous == 0 {
        return 0.0;
    }
    let diff = libm::fabsf(candidate as f32 - previous as f32);
    diff / previous as f32
}

/// Blend a large jump with history.
///
/// Skipped when `previous` is below `floor`, when the candidate is zero
/// (zeros reaching here already passed the gate), or when the change does
/// not exceed `ratio`. Returns the value and whether blending happened.
pub fn blend_jump(
    candidate: u16,
    previous: u16,
    floor: u16,
    ratio: f32,
    min_weight: f32,
) -> (u16, bool) {
    if candidate == 0 || previous < floor || previous == 0 {
        return (candidate, false);
    }
    let change = relative_change(candidate, previous);
    if change <= ratio {
        return (candidate, false);
    }

    let weight = (ratio / change).clamp(min_weight, 1.0);
    let blended = previous as f32 + weight * (candidate as f32 - previous as f32);
    let rounded = libm::roundf(blended);
    (rounded.clamp(0.0, u16::MAX as f32) as u16, true)
}

/// Move at most one level towards `candidate` when the gap exceeds `limit`.
///
/// Only applies when there is a positive previous level; the first reading
/// and readings leaving zero are taken as they are.
pub fn step_limit(candidate: u8, previous: u8, limit: u8) -> u8 {
    if previous == 0 || candidate.abs_diff(previous) <= limit {
        return candidate;
    }
    if candidate > previous {
        previous + 1
    } else {
        previous - 1
    }
}
