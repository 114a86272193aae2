use tracing::{debug, warn};

use crate::block::BlockGeometry;
use crate::block_opts::GatingOptions;
use crate::channel::ChannelWeights;
use crate::error::{Error, Result};
use crate::filter::{KWeighting, KWeightingDesign};
use crate::mean_sq::{mean_square, MeanPowers};
use crate::util::Util;

/// The outcome of measuring one program.
#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    integrated: f64,
    block_loudness: Vec<f64>,
    relative_threshold: f64,
    max_loudness: f64,
    loud_blocks: usize,
    gated_blocks: usize,
}

impl Measurement {
    /// Integrated loudness of the whole program, in LUFS.
    pub fn integrated(&self) -> f64 {
        self.integrated
    }

    /// Momentary loudness of every block, ungated and in chronological order.
    pub fn block_loudness(&self) -> &[f64] {
        &self.block_loudness
    }

    pub fn relative_threshold(&self) -> f64 {
        self.relative_threshold
    }

    /// Loudest block. NaN if any block is NaN, which happens once a NaN
    /// sample has entered the filter state.
    pub fn max_loudness(&self) -> f64 {
        self.max_loudness
    }

    /// Number of blocks at or above the absolute gate. When this is zero the
    /// relative threshold is pinned to the absolute gate.
    pub fn loud_blocks(&self) -> usize {
        self.loud_blocks
    }

    /// Number of blocks that contributed to the integrated loudness.
    pub fn gated_blocks(&self) -> usize {
        self.gated_blocks
    }
}

/// Gated loudness meter for complete, already decoded programs.
#[derive(Clone, Debug)]
pub struct LufsMeter {
    sample_rate: u32,
    opts: GatingOptions,
    k_filter: KWeighting,

    // Denoted as the `G` weights in the tech doc.
    channel_weights: ChannelWeights,
}

impl LufsMeter {
    pub fn new(sample_rate: u32) -> Result<Self> {
        Self::builder(sample_rate).build()
    }

    pub fn builder(sample_rate: u32) -> LufsMeterBuilder {
        LufsMeterBuilder::new(sample_rate)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn options(&self) -> &GatingOptions {
        &self.opts
    }

    /// Measures a program given as one buffer per channel.
    /// Buffers of differing lengths are truncated to the shortest one.
    pub fn measure<C>(&self, channels: &[C]) -> Result<Measurement>
    where
        C: AsRef<[f32]>,
    {
        if channels.is_empty() {
            return Err(Error::NoChannels);
        }

        let weights = self.channel_weights.resolve(channels.len())?;

        let filtered = channels.iter()
            .map(|ch| self.k_filter.apply(ch.as_ref()))
            .collect::<Vec<_>>();

        let length = filtered.iter().map(Vec::len).min().unwrap_or(0);
        let geometry = BlockGeometry::new(self.sample_rate, length, &self.opts);

        // Mean square energy of every block, indexed by channel then block.
        let channel_powers = filtered.iter()
            .map(|samples| {
                geometry.blocks()
                    .map(|range| mean_square(&samples[range]))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        // This performs the calculation done in equation #4 in the ITU BS.1770 tech spec.
        let block_loudness = (0..geometry.num_blocks)
            .map(|i| {
                let block_power = channel_powers.iter()
                    .zip(&weights)
                    .map(|(powers, w)| powers[i] * w)
                    .sum::<f64>();

                Util::lufs_guarded(block_power)
            })
            .collect::<Vec<_>>();

        let absolute_gate = self.opts.absolute_gate;

        // Blocks that are "not silence".
        let loud_blocks = block_loudness.iter()
            .enumerate()
            .filter(|&(_, &l)| l >= absolute_gate)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        // This performs the calculations done in equations #5 and #6 in the ITU BS.1770 tech spec.
        // The relative loudness threshold is the loudness of the averaged absolutely loud blocks, minus 10.0.
        let relative_threshold = match Self::gated_power(&channel_powers, &weights, &loud_blocks) {
            Some(power) => Util::lufs(power) + self.opts.relative_gate,
            None => {
                warn!(num_blocks = geometry.num_blocks, "no blocks above the absolute gate");
                absolute_gate
            },
        };

        // This performs the calculation done in equation #7 in the ITU BS.1770 tech spec.
        // Only blocks above both thresholds are averaged.
        let gated_blocks = block_loudness.iter()
            .enumerate()
            .filter(|&(_, &l)| l > relative_threshold && l > absolute_gate)
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        let integrated = Self::gated_power(&channel_powers, &weights, &gated_blocks)
            .map(Util::lufs)
            .unwrap_or(absolute_gate);

        let max_loudness = block_loudness.iter()
            .copied()
            .fold(f64::NEG_INFINITY, |m, l| if m.is_nan() || l.is_nan() { f64::NAN } else { m.max(l) });

        debug!(
            num_channels = channels.len(),
            length,
            num_blocks = geometry.num_blocks,
            loud_blocks = loud_blocks.len(),
            gated_blocks = gated_blocks.len(),
            relative_threshold,
            integrated,
            "measured integrated loudness"
        );

        Ok(Measurement {
            integrated,
            block_loudness,
            relative_threshold,
            max_loudness,
            loud_blocks: loud_blocks.len(),
            gated_blocks: gated_blocks.len(),
        })
    }

    /// Weighted sum of the per-channel average powers over the selected blocks,
    /// or `None` if no blocks were selected.
    fn gated_power(channel_powers: &[Vec<f64>], weights: &[f64], blocks: &[usize]) -> Option<f64> {
        let mut averager = MeanPowers::new(channel_powers.len());

        for &i in blocks {
            averager.add(channel_powers.iter().map(|powers| powers[i]));
        }

        if averager.is_empty() {
            return None;
        }

        Some(Util::weighted_sum(averager.means(), weights))
    }
}

pub struct LufsMeterBuilder {
    sample_rate: u32,
    opts: GatingOptions,
    design: Option<KWeightingDesign>,
    k_filter: Option<KWeighting>,
    channel_weights: ChannelWeights,
}

impl LufsMeterBuilder {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            opts: GatingOptions::default(),
            design: None,
            k_filter: None,
            channel_weights: ChannelWeights::default(),
        }
    }

    #[inline]
    pub fn options(&mut self, opts: GatingOptions) -> &mut Self {
        self.opts = opts;
        self
    }

    /// Picks one of the stock filter designs. Cannot be combined with
    /// [`LufsMeterBuilder::k_weighting`].
    #[inline]
    pub fn design(&mut self, design: KWeightingDesign) -> &mut Self {
        self.design = Some(design);
        self
    }

    /// Uses a prebuilt filter cascade instead of one of the stock designs.
    /// Cannot be combined with [`LufsMeterBuilder::design`].
    #[inline]
    pub fn k_weighting(&mut self, k_filter: KWeighting) -> &mut Self {
        self.k_filter = Some(k_filter);
        self
    }

    #[inline]
    pub fn weights<W>(&mut self, channel_weights: W) -> &mut Self
    where
        W: Into<ChannelWeights>,
    {
        self.channel_weights = channel_weights.into();
        self
    }

    pub fn build(&mut self) -> Result<LufsMeter> {
        let sample_rate = self.sample_rate;

        if sample_rate == 0 {
            return Err(Error::InvalidSampleRate(sample_rate));
        }

        self.opts.validate(sample_rate)?;

        let k_filter = match (self.k_filter, self.design) {
            (Some(_), Some(design)) => {
                return Err(Error::InvalidFilterDesign(
                    format!("both a prebuilt cascade and the {} design were given", design)
                ));
            },
            (Some(k_filter), None) if k_filter.sample_rate() == sample_rate => k_filter,
            (Some(k_filter), None) => return Err(Error::InvalidSampleRate(k_filter.sample_rate())),
            (None, design) => KWeighting::with_design(sample_rate, design.unwrap_or_default())?,
        };

        Ok(LufsMeter {
            sample_rate,
            opts: self.opts,
            k_filter,
            channel_weights: self.channel_weights.clone(),
        })
    }
}
