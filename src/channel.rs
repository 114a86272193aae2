use strum::{EnumCount, EnumIter};

use crate::error::{Error, Result};

/// Speaker positions with a defined weight in the ITU BS.1770 tech spec.
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumCount, EnumIter)]
pub enum Channel {
    Left,
    Right,
    Center,
    LeftSurround,
    RightSurround,
}

impl Channel {
    /// Denoted as the `G` weight in the tech doc.
    pub fn weight(&self) -> f64 {
        match self {
            &Channel::Left | &Channel::Right | &Channel::Center => 1.0,
            &Channel::LeftSurround | &Channel::RightSurround => 1.41,
        }
    }
}

/// Per-channel weights applied to block energies before they are summed.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ChannelWeights {
    /// Every channel counts with a weight of 1.0.
    #[default]
    Unit,
    Custom(Vec<f64>),
}

impl ChannelWeights {
    pub fn from_layout(layout: &[Channel]) -> Self {
        Self::Custom(layout.iter().map(Channel::weight).collect())
    }

    /// Resolves the weight table for a given number of channels.
    pub fn resolve(&self, num_channels: usize) -> Result<Vec<f64>> {
        match self {
            Self::Unit => Ok(vec![1.0; num_channels]),
            Self::Custom(weights) if weights.len() < num_channels => {
                Err(Error::WeightCountMismatch { channels: num_channels, weights: weights.len() })
            },
            Self::Custom(weights) => {
                let weights = &weights[..num_channels];

                match weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
                    Some(&w) => Err(Error::InvalidChannelWeight(w)),
                    None => Ok(weights.to_vec()),
                }
            },
        }
    }
}

impl From<Vec<f64>> for ChannelWeights {
    fn from(weights: Vec<f64>) -> Self {
        Self::Custom(weights)
    }
}
