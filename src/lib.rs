//! Integrated loudness measurement following ITU-R BS.1770 / EBU R128.
//!
//! Complete, decoded programs are passed in as one `f32` buffer per channel.
//! Each channel is run through the two-pass K-weighting filter, cut into
//! overlapping 400 ms blocks, and the block energies are gated twice (absolute
//! and relative) before being averaged into the integrated loudness.
//!
//! ```no_run
//! use lufs_meter::LufsMeter;
//!
//! # fn main() -> lufs_meter::Result<()> {
//! let left = vec![0.0f32; 48000];
//! let right = vec![0.0f32; 48000];
//!
//! let meter = LufsMeter::new(48000)?;
//! let measurement = meter.measure(&[left, right])?;
//!
//! println!("{:.1} LUFS", measurement.integrated());
//! # Ok(())
//! # }
//! ```

pub mod biquad;
pub mod block;
pub mod block_opts;
pub mod channel;
pub mod constants;
pub mod error;
pub mod filter;
pub mod loudness;
pub mod mean_sq;
pub mod util;
#[cfg(test)] pub mod wave;

pub use biquad::{Biquad, Coefficients, FilterDesign, FilterKind};
pub use block::BlockGeometry;
pub use block_opts::GatingOptions;
pub use channel::{Channel, ChannelWeights};
pub use error::{Error, Result};
pub use filter::{KWeighting, KWeightingDesign};
pub use loudness::{LufsMeter, LufsMeterBuilder, Measurement};
