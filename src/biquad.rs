use std::f64::consts::PI;
use std::str::FromStr;

#[cfg(test)] use approx::AbsDiffEq;
use dasp::Sample;
use strum::{Display, EnumString};

use crate::error::{Error, Result};
use crate::util::Util;

/// The kinds of parametric biquad that can be designed from cookbook formulas.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum FilterKind {
    #[strum(to_string = "HIGH_PASS", serialize = "highpass", serialize = "high-pass")]
    HighPass,
    #[strum(to_string = "HIGH_SHELF", serialize = "highshelf", serialize = "high-shelf")]
    HighShelf,
}

impl FilterKind {
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| Error::InvalidFilterKind(name.to_owned()))
    }
}

/// Coefficients for a biquad digital filter at a particular sample rate.
/// The `a0` coefficient is always normalized to 1.0.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Coefficients {
    pub a: [f64; 3],
    pub b: [f64; 3],
}

// https://github.com/mzuther/K-Meter/blob/master/doc/specifications/ITU-R%20BS.1770-1%20(Filters).pdf
#[derive(Copy, Clone, Debug)]
struct AnalogParams {
    k: f64, // a.k.a. Ω, equal to `tan(pi * Fc / Fs)`
    q: f64, // Q factor
    vb: f64, // band-pass gain factor
    vl: f64, // low-pass gain factor
    vh: f64, // high-pass gain factor
}

impl Coefficients {
    /// Passes samples through unchanged.
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 1.0, 0.0, 0.0);

    pub const fn new(a1: f64, a2: f64, b0: f64, b1: f64, b2: f64) -> Self {
        Self { a: [1.0, a1, a2], b: [b0, b1, b2] }
    }

    /// Builds coefficients from an unnormalized set, dividing everything by `a0`.
    pub fn normalized(a: [f64; 3], b: [f64; 3]) -> Result<Self> {
        let a0 = a[0];

        let coefficients = Self {
            a: [1.0, a[1] / a0, a[2] / a0],
            b: [b[0] / a0, b[1] / a0, b[2] / a0],
        };

        coefficients.check_finite()
    }

    pub fn is_finite(&self) -> bool {
        self.a.iter().chain(self.b.iter()).all(|c| c.is_finite())
    }

    fn check_finite(self) -> Result<Self> {
        if self.is_finite() { Ok(self) }
        else { Err(Error::InvalidFilterDesign(format!("non-finite coefficients: {:?}", self))) }
    }

    /// Designs a filter using the RBJ audio EQ cookbook formulas.
    /// `gain_db` is only meaningful for shelving filters.
    // https://www.w3.org/TR/audio-eq-cookbook/
    pub fn parametric(kind: FilterKind, gain_db: f64, q: f64, freq: f64, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        let nyquist = sample_rate as f64 / 2.0;

        if !(q > 0.0 && q.is_finite()) {
            return Err(Error::InvalidFilterDesign(format!("Q must be positive, got {}", q)));
        }
        if !(freq > 0.0 && freq < nyquist) {
            return Err(Error::InvalidFilterDesign(
                format!("frequency must lie in (0, {}) Hz, got {}", nyquist, freq)
            ));
        }
        if !gain_db.is_finite() {
            return Err(Error::InvalidFilterDesign(format!("gain must be finite, got {}", gain_db)));
        }

        let w0 = 2.0 * PI * freq / sample_rate as f64;
        let (sin_w0, cos_w0) = w0.sin_cos();
        let alpha = sin_w0 / (2.0 * q);

        let (a, b) =
            match kind {
                FilterKind::HighPass => {
                    let b0 = (1.0 + cos_w0) / 2.0;
                    let b1 = -(1.0 + cos_w0);
                    let b2 = (1.0 + cos_w0) / 2.0;

                    let a0 = 1.0 + alpha;
                    let a1 = -2.0 * cos_w0;
                    let a2 = 1.0 - alpha;

                    ([a0, a1, a2], [b0, b1, b2])
                },
                FilterKind::HighShelf => {
                    let amp = 10.0f64.powf(gain_db / 40.0);
                    let two_sqrt_amp_alpha = 2.0 * amp.sqrt() * alpha;

                    let b0 = amp * ((amp + 1.0) + (amp - 1.0) * cos_w0 + two_sqrt_amp_alpha);
                    let b1 = -2.0 * amp * ((amp - 1.0) + (amp + 1.0) * cos_w0);
                    let b2 = amp * ((amp + 1.0) + (amp - 1.0) * cos_w0 - two_sqrt_amp_alpha);

                    let a0 = (amp + 1.0) - (amp - 1.0) * cos_w0 + two_sqrt_amp_alpha;
                    let a1 = 2.0 * ((amp - 1.0) - (amp + 1.0) * cos_w0);
                    let a2 = (amp + 1.0) - (amp - 1.0) * cos_w0 - two_sqrt_amp_alpha;

                    ([a0, a1, a2], [b0, b1, b2])
                },
            }
        ;

        Self::normalized(a, b)
    }

    /// Calculates the analog characteristics/parameters of this biquad filter.
    fn analog_params(&self) -> AnalogParams {
        let [_, a1, a2] = self.a;
        let [b0, b1, b2] = self.b;

        let x11 =  a1 - 2.0;
        let x12 =  a1;
        let x1  = -a1 - 2.0;

        let x21 =  a2 - 1.0;
        let x22 =  a2 + 1.0;
        let x2  = -a2 + 1.0;

        let dx      = (x22 * x11) - (x12 * x21);
        let k_sq    = ((x22 * x1) - (x12 * x2)) / dx;
        let k_by_q  = ((x11 * x2) - (x21 * x1)) / dx;
        let a0      = 1.0 + k_by_q + k_sq;

        let k   = k_sq.sqrt();
        let q   = k / k_by_q;
        let vb  = 0.5 * a0 * (b0 - b2) / k_by_q;
        let vl  = 0.25 * a0 * (b0 + b1 + b2) / k_sq;
        let vh  = 0.25 * a0 * (b0 - b1 + b2);

        AnalogParams {
            k, q, vb, vl, vh
        }
    }

    /// Creates a new set of coefficients for a new target sample rate that keeps the same analog characteristics.
    pub fn requantize(&self, source_sample_rate: u32, target_sample_rate: u32) -> Self {
        if target_sample_rate == source_sample_rate {
            // No work needed, return a copy of the original coefficients.
            return *self
        }

        let ps = self.analog_params();

        let k       = ((source_sample_rate as f64 / target_sample_rate as f64) * ps.k.atan()).tan();
        let k_sq    = k * k;
        let k_by_q  = k / ps.q;
        let a0      = 1.0 + k_by_q + k_sq;

        let a1 = Util::den((2.0 * (k_sq - 1.0)) / a0);
        let a2 = Util::den((1.0 - k_by_q + k_sq) / a0);
        let b0 = Util::den((ps.vh + ps.vb * k_by_q + ps.vl * k_sq) / a0);
        let b1 = Util::den((2.0 * (ps.vl * k_sq - ps.vh)) / a0);
        let b2 = Util::den((ps.vh - ps.vb * k_by_q + ps.vl * k_sq) / a0);

        Self::new(a1, a2, b0, b1, b2)
    }
}

#[cfg(test)]
impl AbsDiffEq for Coefficients {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.a.iter().zip(other.a.iter())
            .chain(self.b.iter().zip(other.b.iter()))
            .all(|(x, y)| f64::abs_diff_eq(x, y, epsilon))
    }
}

/// How to obtain the coefficients of a filter stage for a given sample rate.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FilterDesign {
    /// Cookbook design from corner frequency, Q and (for shelves) gain.
    Parametric {
        kind: FilterKind,
        gain_db: f64,
        q: f64,
        freq: f64,
    },
    /// Known-good coefficients for `reference_rate`, requantized to the
    /// target sample rate when it differs.
    Reference {
        coefficients: Coefficients,
        reference_rate: u32,
    },
}

impl FilterDesign {
    pub fn coefficients(&self, sample_rate: u32) -> Result<Coefficients> {
        match *self {
            Self::Parametric { kind, gain_db, q, freq } => {
                Coefficients::parametric(kind, gain_db, q, freq, sample_rate)
            },
            Self::Reference { coefficients, reference_rate } => {
                if sample_rate == 0 {
                    return Err(Error::InvalidSampleRate(sample_rate));
                }

                coefficients.requantize(reference_rate, sample_rate).check_finite()
            },
        }
    }
}

/// A single second-order IIR filter stage, in direct form I.
#[derive(Clone, Debug)]
pub struct Biquad {
    coefficients: Coefficients,
    x: [f64; 3],
    y: [f64; 3],
}

impl Biquad {
    pub fn new(coefficients: Coefficients) -> Self {
        Self {
            coefficients,
            x: [0.0; 3],
            y: [0.0; 3],
        }
    }

    pub fn from_design(design: &FilterDesign, sample_rate: u32) -> Result<Self> {
        Ok(Self::new(design.coefficients(sample_rate)?))
    }

    pub fn coefficients(&self) -> &Coefficients {
        &self.coefficients
    }

    pub fn process_sample(&mut self, input: f64) -> f64 {
        let Coefficients { a, b } = self.coefficients;

        self.x = [input, self.x[0], self.x[1]];
        self.y = [0.0, self.y[0], self.y[1]];

        self.y[0] =
            b[0] * self.x[0]
            + b[1] * self.x[1]
            + b[2] * self.x[2]
            - a[1] * self.y[1]
            - a[2] * self.y[2]
        ;

        self.y[0]
    }

    /// Filters a whole buffer, carrying state from sample to sample.
    pub fn process(&mut self, input: &[f32]) -> Vec<f32> {
        input.iter()
            .map(|&s| f32::from_sample(self.process_sample(s.to_sample::<f64>())))
            .collect()
    }
}
