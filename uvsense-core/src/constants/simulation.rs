//! Synthetic Waveform Parameters

/// Target UV index levels cycled by the simulation.
///
/// Rises to the extreme level and falls back, roughly one day compressed.
pub const SIM_LEVELS: [u8; 13] = [0, 1, 2, 3, 5, 7, 9, 11, 8, 6, 4, 2, 1];

/// Samples spent on each level before moving to the next.
pub const SIM_STEPS_PER_LEVEL: u32 = 10;

/// Uniform jitter added to each sample (± UV index units).
pub const SIM_JITTER: f32 = 0.3;

/// Raw counts per UV index unit.
///
/// Lower than the vendor demo's 400 so the peak level stays under the raw
/// ceiling.
pub const SIM_RAW_SCALE: u16 = 100;

/// Default generator seed.
pub const SIM_SEED: u32 = 42;
