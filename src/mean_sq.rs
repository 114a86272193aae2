use dasp::Sample;

/// Mean of the squared samples in a block. An empty block carries no energy.
pub fn mean_square(samples: &[f32]) -> f64 {
    if samples.is_empty() { return 0.0 }

    let summed_sqs = samples.iter()
        .map(|s| {
            let x = s.to_sample::<f64>();
            x * x
        })
        .sum::<f64>();

    summed_sqs / samples.len() as f64
}

/// Running per-channel average of block powers.
#[derive(Clone, Debug)]
pub struct MeanPowers {
    curr: Vec<f64>,
    num: usize,
}

impl MeanPowers {
    pub fn new(num_channels: usize) -> Self {
        Self {
            curr: vec![0.0; num_channels],
            num: 0,
        }
    }

    pub fn means(&self) -> &[f64] {
        &self.curr
    }

    pub fn count(&self) -> usize {
        self.num
    }

    pub fn is_empty(&self) -> bool {
        self.num == 0
    }

    /// Adds the per-channel powers of one block.
    pub fn add<I>(&mut self, channel_powers: I)
    where
        I: IntoIterator<Item = f64>,
    {
        let n = self.num as f64;
        let n_p_1 = n + 1.0;

        // These calculations are for a running incremental average.
        for (curr, power) in self.curr.iter_mut().zip(channel_powers) {
            *curr = (n * *curr + power) / n_p_1;
        }

        self.num += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_abs_diff_eq;

    #[test]
    fn block_mean_square() {
        assert_abs_diff_eq!(0.0, mean_square(&[]));
        assert_abs_diff_eq!(1.0, mean_square(&[1.0, -1.0, 1.0, -1.0]));
        assert_abs_diff_eq!(0.171875, mean_square(&[0.5, -0.25, 0.0, -0.75, 0.5, 0.5, 0.0, 0.0]));
    }

    #[test]
    fn mean_powers() {
        let mut mean_powers = MeanPowers::new(3);
        assert!(mean_powers.is_empty());
        assert_eq!(mean_powers.means(), &[0.0, 0.0, 0.0]);

        mean_powers.add(vec![1.0, 1.0, 1.0]);
        assert_eq!(mean_powers.count(), 1);
        assert_eq!(mean_powers.means(), &[1.0, 1.0, 1.0]);

        mean_powers.add(vec![0.0, 0.5, 1.0]);
        assert_eq!(mean_powers.count(), 2);

        let expected = [0.5, 0.75, 1.0];
        for (e, p) in expected.iter().zip(mean_powers.means()) {
            assert_abs_diff_eq!(*e, *p);
        }

        mean_powers.add(vec![0.2, 0.4, 0.6]);

        let expected = [0.4, 0.6333333333333333, 0.8666666666666667];
        for (e, p) in expected.iter().zip(mean_powers.means()) {
            assert_abs_diff_eq!(*e, *p, epsilon = 1e-12);
        }
    }
}
