use crate::constants::ABSOLUTE_GATE;
use crate::constants::MOMENTARY_MS;
use crate::constants::MOMENTARY_OVERLAP;
use crate::constants::RELATIVE_GATE;
use crate::error::{Error, Result};
use crate::util::Util;

/// The tunable constants of the gated loudness algorithm.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GatingOptions {
    /// Length of a gating block.
    pub block_ms: u64,
    /// Fraction of a block shared with the next one, in `[0.0, 1.0)`.
    pub overlap: f64,
    /// Blocks quieter than this (in LUFS) are treated as silence.
    pub absolute_gate: f64,
    /// Offset (in LU) from the absolute-gated loudness to the relative threshold.
    pub relative_gate: f64,
}

impl GatingOptions {
    /// 400 ms blocks with 75% overlap, gated at -70 LUFS and -10 LU.
    pub const BS1770: Self = Self {
        block_ms: MOMENTARY_MS,
        overlap: MOMENTARY_OVERLAP,
        absolute_gate: ABSOLUTE_GATE,
        relative_gate: RELATIVE_GATE,
    };

    /// Checks that these options yield a usable block layout at `sample_rate`.
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        if self.block_ms == 0 {
            return Err(Error::InvalidGatingOptions("block length must be positive".into()));
        }

        let block_size = Util::checked_ms_to_samples(self.block_ms, sample_rate)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| Error::InvalidGatingOptions(format!("block of {} ms is too long", self.block_ms)))?;

        if block_size == 0 {
            return Err(Error::InvalidGatingOptions(
                format!("block of {} ms holds no samples at {} Hz", self.block_ms, sample_rate)
            ));
        }

        if !(0.0..1.0).contains(&self.overlap) {
            return Err(Error::InvalidGatingOptions(format!("overlap {} is outside [0, 1)", self.overlap)));
        }

        if !self.absolute_gate.is_finite() || !self.relative_gate.is_finite() {
            return Err(Error::InvalidGatingOptions("gates must be finite".into()));
        }

        Ok(())
    }
}

impl Default for GatingOptions {
    fn default() -> Self {
        Self::BS1770
    }
}
