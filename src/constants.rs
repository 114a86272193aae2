/// Offset applied when converting mean square energy into LUFS.
pub const LOUDNESS_OFFSET: f64 = -0.691;

/// Added to block energies before taking a logarithm, so that digital silence
/// still maps to a finite loudness.
pub const ENERGY_EPSILON: f64 = f64::EPSILON;

pub const ABSOLUTE_GATE: f64 = -70.0;
pub const RELATIVE_GATE: f64 = -10.0;

pub const MOMENTARY_MS: u64 = 400;
pub const MOMENTARY_OVERLAP: f64 = 0.75;
pub const MIN_BLOCKS: usize = 1;

pub const DEN_THRESHOLD: f64 = 1.0e-15;

// The ITU-R BS.1770-4 spec provides filter coefficient constants for both
// passes at a sample rate of 48000 Hz.
pub const REFERENCE_SAMPLE_RATE: u32 = 48000;
