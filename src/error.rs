//! Error types for loudness measurement.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A parametric filter was requested with a kind name that is not known.
    #[error("invalid filter kind: {0:?}")]
    InvalidFilterKind(String),

    /// Design parameters outside of the physically meaningful range, or a
    /// design that produced non-finite coefficients.
    #[error("invalid filter design: {0}")]
    InvalidFilterDesign(String),

    #[error("invalid sample rate: {0} Hz")]
    InvalidSampleRate(u32),

    #[error("no channels provided for measurement")]
    NoChannels,

    /// Channel weights must be finite and non-negative.
    #[error("invalid channel weight: {0}")]
    InvalidChannelWeight(f64),

    /// Gating options that cannot produce a usable block layout.
    #[error("invalid gating options: {0}")]
    InvalidGatingOptions(String),

    #[error("channel weight count mismatch: {channels} channels, {weights} weights")]
    WeightCountMismatch { channels: usize, weights: usize },
}
