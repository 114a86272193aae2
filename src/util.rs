use crate::constants::DEN_THRESHOLD;
use crate::constants::ENERGY_EPSILON;
use crate::constants::LOUDNESS_OFFSET;

pub struct Util;

impl Util {
    /// Converts a (weighted) mean square energy into LUFS.
    pub fn lufs(x: f64) -> f64 {
        LOUDNESS_OFFSET + 10.0 * x.log10()
    }

    /// Same as [`Util::lufs`], but safe to use on energies that may be zero.
    pub fn lufs_guarded(x: f64) -> f64 {
        Util::lufs(x + ENERGY_EPSILON)
    }

    pub fn den(x: f64) -> f64 {
        if x.abs() < DEN_THRESHOLD { 0.0 }
        else { x }
    }

    /// Using a sample rate, calculates the number of samples in a given number of milliseconds.
    /// Saturates instead of overflowing, see [`Util::checked_ms_to_samples`].
    pub fn ms_to_samples(ms: u64, sample_rate: u32) -> u64 {
        Util::checked_ms_to_samples(ms, sample_rate).unwrap_or(u64::MAX)
    }

    pub fn checked_ms_to_samples(ms: u64, sample_rate: u32) -> Option<u64> {
        let num = ms.checked_mul(sample_rate as u64)?;

        // Always round to the nearest sample.
        Some((num / 1000) + if num % 1000 >= 500 { 1 } else { 0 })
    }

    /// Sums per-channel energies after applying the per-channel weights.
    /// This is the inner sum of equation #4 in the ITU BS.1770 tech spec.
    pub fn weighted_sum(channel_powers: &[f64], channel_weights: &[f64]) -> f64 {
        channel_powers.iter()
            .zip(channel_weights)
            .map(|(p, w)| p * w)
            .sum()
    }
}
