use strum::{Display, EnumString};
use tracing::trace;

use crate::biquad::{Biquad, Coefficients, FilterDesign, FilterKind};
use crate::constants::REFERENCE_SAMPLE_RATE;
use crate::error::{Error, Result};

// Requantization is used to calculate the coefficient constants for sample
// rates other than the reference one.
pub const REFERENCE_SHELF: Coefficients =
    Coefficients::new(
        -1.69065929318241,
         0.73248077421585,
         1.53512485958697,
        -2.69169618940638,
         1.19839281085285,
    )
;
pub const REFERENCE_HIGH_PASS: Coefficients =
    Coefficients::new(
        -1.99004745483398,
         0.99007225036621,
         1.00000000000000,
        -2.00000000000000,
         1.00000000000000,
    )
;

// Analog parameters equivalent to the reference coefficients, for the cookbook designs.
const SHELF_GAIN_DB: f64 = 3.999843853973347;
const SHELF_Q: f64 = 0.7071752369554196;
const SHELF_FREQ: f64 = 1681.974450955533;
const HIGH_PASS_Q: f64 = 0.5003270373238773;
const HIGH_PASS_FREQ: f64 = 38.13547087602444;

pub const REFERENCE_SHELF_DESIGN: FilterDesign = FilterDesign::Reference {
    coefficients: REFERENCE_SHELF,
    reference_rate: REFERENCE_SAMPLE_RATE,
};
pub const REFERENCE_HIGH_PASS_DESIGN: FilterDesign = FilterDesign::Reference {
    coefficients: REFERENCE_HIGH_PASS,
    reference_rate: REFERENCE_SAMPLE_RATE,
};
pub const PARAMETRIC_SHELF_DESIGN: FilterDesign = FilterDesign::Parametric {
    kind: FilterKind::HighShelf,
    gain_db: SHELF_GAIN_DB,
    q: SHELF_Q,
    freq: SHELF_FREQ,
};
pub const PARAMETRIC_HIGH_PASS_DESIGN: FilterDesign = FilterDesign::Parametric {
    kind: FilterKind::HighPass,
    gain_db: 0.0,
    q: HIGH_PASS_Q,
    freq: HIGH_PASS_FREQ,
};

/// Which pair of filter designs to use for the K-weighting cascade.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum KWeightingDesign {
    /// The BS.1770 48 kHz coefficients, requantized to the target rate.
    #[default]
    Reference,
    /// Cookbook shelf and high pass filters.
    Parametric,
}

/// The initial two-pass "K"-filter as described by the ITU-R BS.1770-4 spec.
/// The first pass is a shelving filter, which accounts for the acoustic effects of the listener's (spherical) head.
/// The second pass is a simple high pass filter.
///
/// Only the coefficients are stored; every call to [`KWeighting::apply`] runs
/// on freshly zeroed filter stages.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KWeighting {
    sample_rate: u32,
    shelf: Coefficients,
    high_pass: Coefficients,
}

impl KWeighting {
    pub fn new(sample_rate: u32) -> Result<Self> {
        Self::from_designs(sample_rate, &REFERENCE_SHELF_DESIGN, &REFERENCE_HIGH_PASS_DESIGN)
    }

    pub fn parametric(sample_rate: u32) -> Result<Self> {
        Self::from_designs(sample_rate, &PARAMETRIC_SHELF_DESIGN, &PARAMETRIC_HIGH_PASS_DESIGN)
    }

    pub fn with_design(sample_rate: u32, design: KWeightingDesign) -> Result<Self> {
        match design {
            KWeightingDesign::Reference => Self::new(sample_rate),
            KWeightingDesign::Parametric => Self::parametric(sample_rate),
        }
    }

    pub fn from_designs(sample_rate: u32, shelf: &FilterDesign, high_pass: &FilterDesign) -> Result<Self> {
        let shelf = shelf.coefficients(sample_rate)?;
        let high_pass = high_pass.coefficients(sample_rate)?;

        trace!(sample_rate, ?shelf, ?high_pass, "designed K-weighting cascade");

        Ok(Self { sample_rate, shelf, high_pass, })
    }

    pub fn from_coefficients(sample_rate: u32, shelf: Coefficients, high_pass: Coefficients) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        Ok(Self { sample_rate, shelf, high_pass, })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn shelf(&self) -> &Coefficients {
        &self.shelf
    }

    pub fn high_pass(&self) -> &Coefficients {
        &self.high_pass
    }

    /// Filters one channel through both passes.
    pub fn apply(&self, input: &[f32]) -> Vec<f32> {
        let mut pass_a = Biquad::new(self.shelf);
        let mut pass_b = Biquad::new(self.high_pass);

        pass_b.process(&pass_a.process(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    #[test]
    fn k_weighting_reference_at_48k() {
        let k = KWeighting::new(48000).unwrap();

        assert_eq!(k.sample_rate(), 48000);
        assert_eq!(*k.shelf(), REFERENCE_SHELF);
        assert_eq!(*k.high_pass(), REFERENCE_HIGH_PASS);
    }

    #[test]
    fn k_weighting_requantized_at_44k1() {
        let k = KWeighting::new(44100).unwrap();

        let expected = Coefficients::new(
            -1.6636551132560204,
            0.7125954280732254,
            1.5308412300503476,
            -2.6509799951547293,
            1.1690790799215869,
        );
        assert_abs_diff_eq!(expected, *k.shelf(), epsilon = 1e-10);

        // The high pass keeps its double zero at DC.
        assert_abs_diff_eq!(0.0, k.high_pass().b.iter().sum::<f64>(), epsilon = 1e-9);
    }

    #[test]
    fn k_weighting_parametric_is_close_to_reference() {
        let reference = KWeighting::new(48000).unwrap();
        let parametric = KWeighting::parametric(48000).unwrap();

        // Both high passes are essentially the same filter.
        for (r, p) in reference.high_pass().a.iter().zip(parametric.high_pass().a.iter()) {
            assert_abs_diff_eq!(*r, *p, epsilon = 1e-3);
        }
    }

    #[test]
    fn k_weighting_rejects_zero_rate() {
        assert_eq!(KWeighting::new(0), Err(Error::InvalidSampleRate(0)));
        assert_eq!(KWeighting::parametric(0), Err(Error::InvalidSampleRate(0)));
        assert_eq!(
            KWeighting::from_coefficients(0, Coefficients::IDENTITY, Coefficients::IDENTITY),
            Err(Error::InvalidSampleRate(0)),
        );
    }

    #[test]
    fn k_weighting_design_from_name() {
        assert_eq!("reference".parse::<KWeightingDesign>().unwrap(), KWeightingDesign::Reference);
        assert_eq!("Parametric".parse::<KWeightingDesign>().unwrap(), KWeightingDesign::Parametric);
        assert!("cookbook".parse::<KWeightingDesign>().is_err());
        assert_eq!(KWeightingDesign::default(), KWeightingDesign::Reference);
    }

    #[test]
    fn k_weighting_identity_passthrough() {
        let k = KWeighting::from_coefficients(48000, Coefficients::IDENTITY, Coefficients::IDENTITY).unwrap();
        let input = [0.1f32, 0.2, -0.3];

        assert_eq!(k.apply(&input), input.to_vec());
    }
}
