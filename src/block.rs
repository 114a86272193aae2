use std::ops::Range;

use crate::block_opts::GatingOptions;
use crate::constants::MIN_BLOCKS;
use crate::util::Util;

/// The layout of the overlapping gating blocks over a buffer of a given length.
/// Blocks are never stored, only their sample ranges are derived from here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockGeometry {
    pub block_size: usize,
    pub hop_size: usize,
    pub length: usize,
    pub num_blocks: usize,
}

impl BlockGeometry {
    pub fn new(sample_rate: u32, length: usize, opts: &GatingOptions) -> Self {
        let block_size = usize::try_from(Util::ms_to_samples(opts.block_ms, sample_rate))
            .unwrap_or(usize::MAX)
            .max(1);
        let hop_size = ((block_size as f64 * (1.0 - opts.overlap)).round() as usize).max(1);

        // The last block may run past the end of the buffer, in which case it
        // is truncated. Inputs shorter than one block still produce one block.
        let hops = ((length as f64 - block_size as f64) / hop_size as f64).round();
        let num_blocks = (hops + 1.0).max(MIN_BLOCKS as f64) as usize;

        Self {
            block_size,
            hop_size,
            length,
            num_blocks,
        }
    }

    /// The sample range covered by the block at `index`.
    pub fn block(&self, index: usize) -> Range<usize> {
        let start = (index * self.hop_size).min(self.length);
        let end = start.saturating_add(self.block_size).min(self.length);

        start..end
    }

    pub fn blocks(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        (0..self.num_blocks).map(move |i| self.block(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPTS: GatingOptions = GatingOptions::BS1770;

    #[test]
    fn block_geometry_sizes() {
        let g = BlockGeometry::new(48000, 480000, &OPTS);
        assert_eq!(g.block_size, 19200);
        assert_eq!(g.hop_size, 4800);
        assert_eq!(g.num_blocks, 97);
        assert_eq!(g.block(96), 460800..480000);

        let g = BlockGeometry::new(44100, 441000, &OPTS);
        assert_eq!(g.block_size, 17640);
        assert_eq!(g.hop_size, 4410);
        assert_eq!(g.num_blocks, 97);
    }

    #[test]
    fn block_geometry_rounds_partial_hops() {
        // 2.5 hops past the first block rounds up to 3, the last block is truncated.
        let g = BlockGeometry::new(48000, 19200 + 12000, &OPTS);
        assert_eq!(g.num_blocks, 4);
        assert_eq!(g.block(3), 14400..31200);

        // 2.4 hops rounds down.
        let g = BlockGeometry::new(48000, 19200 + 11520, &OPTS);
        assert_eq!(g.num_blocks, 3);
    }

    #[test]
    fn block_geometry_short_input() {
        let g = BlockGeometry::new(48000, 100, &OPTS);
        assert_eq!(g.num_blocks, 1);
        assert_eq!(g.blocks().collect::<Vec<_>>(), vec![0..100]);

        let g = BlockGeometry::new(48000, 0, &OPTS);
        assert_eq!(g.num_blocks, 1);
        assert_eq!(g.blocks().collect::<Vec<_>>(), vec![0..0]);

        let g = BlockGeometry::new(48000, 19199, &OPTS);
        assert_eq!(g.num_blocks, 1);
    }

    #[test]
    fn block_geometry_tiny_rate() {
        let g = BlockGeometry::new(1, 10, &OPTS);
        assert_eq!(g.block_size, 1);
        assert_eq!(g.hop_size, 1);
        assert_eq!(g.num_blocks, 10);
        assert_eq!(g.block(9), 9..10);
    }

    #[test]
    fn block_geometry_custom_options() {
        let opts = GatingOptions { block_ms: 3000, overlap: 2.0 / 3.0, ..GatingOptions::BS1770 };
        let g = BlockGeometry::new(48000, 48000 * 10, &opts);

        assert_eq!(g.block_size, 144000);
        assert_eq!(g.hop_size, 48000);
        assert_eq!(g.num_blocks, 8);
    }

    #[test]
    fn block_geometry_huge_block() {
        let opts = GatingOptions { block_ms: u64::MAX / 2, ..GatingOptions::BS1770 };
        let g = BlockGeometry::new(48000, 1000, &opts);

        assert_eq!(g.num_blocks, 1);
        assert_eq!(g.blocks().collect::<Vec<_>>(), vec![0..1000]);
    }
}
