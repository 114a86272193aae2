use std::path::Path;

use anyhow::{bail, Context};
use hound::{SampleFormat, WavReader};
use tracing::debug;

/// A decoded program, one buffer per channel.
pub struct Decoded {
    pub sample_rate: u32,
    pub channels: Vec<Vec<f32>>,
}

pub fn load_wav(path: &Path) -> anyhow::Result<Decoded> {
    let reader = WavReader::open(path)
        .with_context(|| format!("could not read WAV data from {}", path.display()))?;

    // Get stream info.
    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let num_channels = spec.channels as usize;
    let bits_per_sample = spec.bits_per_sample;

    debug!(sample_rate, num_channels, bits_per_sample, sample_format = ?spec.sample_format, "decoding WAV");

    // Smooth over integer and float sample types.
    let interleaved = match spec.sample_format {
        SampleFormat::Int => {
            // Since the samples are signed integers (one of 8/16/24/32-bit),
            // need to normalize them to the range [-1.0, 1.0).
            let amplitude = match bits_per_sample {
                1..=32 => (1u64 << (bits_per_sample - 1)) as f64,
                b => bail!("unsupported bits per sample (max 32): {}", b),
            };

            reader.into_samples::<i32>()
                .map(|res| res.map(|x| (x as f64 / amplitude) as f32))
                .collect::<Result<Vec<_>, _>>()
                .context("error while reading WAV data")?
        },
        SampleFormat::Float => {
            reader.into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .context("error while reading WAV data")?
        },
    };

    let channels = deinterleave(&interleaved, num_channels)?;

    Ok(Decoded { sample_rate, channels })
}

/// Splits interleaved frames into one buffer per channel.
pub fn deinterleave(samples: &[f32], num_channels: usize) -> anyhow::Result<Vec<Vec<f32>>> {
    if num_channels == 0 {
        bail!("stream has no channels");
    }
    if samples.len() % num_channels != 0 {
        bail!("incomplete frame at end of stream");
    }

    let num_frames = samples.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(num_frames); num_channels];

    for frame in samples.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    use hound::{WavSpec, WavWriter};
    use tempfile::Builder;

    #[test]
    fn deinterleave_frames() {
        let samples = [0.1f32, -0.1, 0.2, -0.2, 0.3, -0.3];

        let channels = deinterleave(&samples, 2).unwrap();
        assert_eq!(channels, vec![vec![0.1, 0.2, 0.3], vec![-0.1, -0.2, -0.3]]);

        let channels = deinterleave(&samples, 3).unwrap();
        assert_eq!(channels, vec![vec![0.1, -0.2], vec![-0.1, 0.3], vec![0.2, -0.3]]);

        assert!(deinterleave(&samples, 4).is_err());
        assert!(deinterleave(&samples, 0).is_err());
        assert_eq!(deinterleave(&[], 2).unwrap(), vec![Vec::<f32>::new(), Vec::new()]);
    }

    #[test]
    fn load_int_wav() {
        let temp_dir = Builder::new().tempdir().unwrap();
        let path = temp_dir.path().join("stereo.wav");

        let spec = WavSpec {
            channels: 2,
            sample_rate: 44100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &(l, r) in &[(16384i16, -16384i16), (0, 32767), (-32768, 0)] {
            writer.write_sample(l).unwrap();
            writer.write_sample(r).unwrap();
        }
        writer.finalize().unwrap();

        let decoded = load_wav(&path).unwrap();
        assert_eq!(decoded.sample_rate, 44100);
        assert_eq!(decoded.channels.len(), 2);
        assert_eq!(decoded.channels[0], vec![0.5, 0.0, -1.0]);
        assert_eq!(decoded.channels[1][0], -0.5);
        assert_eq!(decoded.channels[1][1], (32767.0f64 / 32768.0) as f32);
    }

    #[test]
    fn load_float_wav() {
        let temp_dir = Builder::new().tempdir().unwrap();
        let path = temp_dir.path().join("mono.wav");

        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &s in &[0.25f32, -0.75, 1.0] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let decoded = load_wav(&path).unwrap();
        assert_eq!(decoded.sample_rate, 48000);
        assert_eq!(decoded.channels, vec![vec![0.25, -0.75, 1.0]]);
    }

    #[test]
    fn load_missing_file() {
        let temp_dir = Builder::new().tempdir().unwrap();
        assert!(load_wav(&temp_dir.path().join("missing.wav")).is_err());
    }
}
