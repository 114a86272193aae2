#![cfg(test)]

use dasp::signal::{self, Signal};

#[derive(Clone, Copy)]
pub enum WaveKind {
    Sine,
    Square,
    Sawtooth,
}

/// Generates one channel of a periodic test signal.
pub fn generate(kind: WaveKind, sample_rate: u32, frequency: f64, amplitude: f64, num_samples: usize) -> Vec<f32> {
    let hz = signal::rate(sample_rate as f64).const_hz(frequency);

    match kind {
        WaveKind::Sine => collect(hz.sine(), amplitude, num_samples),
        WaveKind::Square => collect(hz.square(), amplitude, num_samples),
        WaveKind::Sawtooth => collect(hz.saw(), amplitude, num_samples),
    }
}

pub fn sine(sample_rate: u32, frequency: f64, amplitude: f64, num_samples: usize) -> Vec<f32> {
    generate(WaveKind::Sine, sample_rate, frequency, amplitude, num_samples)
}

fn collect<S>(mut wave: S, amplitude: f64, num_samples: usize) -> Vec<f32>
where
    S: Signal<Frame = f64>,
{
    (0..num_samples).map(|_| (wave.next() * amplitude) as f32).collect()
}
