use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lufs_meter::{KWeightingDesign, LufsMeter};

mod decode;

#[derive(Parser, Debug)]
#[command(name = "lufs-meter")]
#[command(about = "Measure the integrated loudness of WAV files (ITU-R BS.1770)", long_about = None)]
struct Cli {
    /// WAV files to measure
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// K-weighting filter design (reference or parametric)
    #[arg(long, default_value_t = KWeightingDesign::Reference)]
    design: KWeightingDesign,

    /// Comma separated per-channel weights, e.g. 1,1,1,1.41,1.41
    #[arg(long, value_delimiter = ',')]
    weights: Option<Vec<f64>>,

    /// Also print the momentary loudness of every block
    #[arg(long)]
    blocks: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lufs_meter=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    for path in &cli.files {
        measure_file(&cli, path)
            .with_context(|| format!("failed to measure {}", path.display()))?;
    }

    Ok(())
}

fn measure_file(cli: &Cli, path: &Path) -> anyhow::Result<()> {
    let decoded = decode::load_wav(path)?;

    info!(
        path = %path.display(),
        sample_rate = decoded.sample_rate,
        num_channels = decoded.channels.len(),
        "measuring"
    );

    let mut builder = LufsMeter::builder(decoded.sample_rate);
    builder.design(cli.design);
    if let Some(weights) = &cli.weights {
        builder.weights(weights.clone());
    }

    let meter = builder.build()?;
    let measurement = meter.measure(&decoded.channels)?;

    println!("{}", path.display());
    println!("  Integrated loudness: {:>7.2} LUFS", measurement.integrated());
    println!("  Relative threshold:  {:>7.2} LUFS", measurement.relative_threshold());
    println!("  Max momentary:       {:>7.2} LUFS", measurement.max_loudness());
    println!(
        "  Blocks:              {} ({} above absolute gate, {} gated)",
        measurement.block_loudness().len(),
        measurement.loud_blocks(),
        measurement.gated_blocks(),
    );

    if cli.blocks {
        let hop_secs = {
            let opts = meter.options();
            opts.block_ms as f64 * (1.0 - opts.overlap) / 1000.0
        };

        for (i, loudness) in measurement.block_loudness().iter().enumerate() {
            println!("  {:>8.2}s {:>8.2}", i as f64 * hop_secs, loudness);
        }
    }

    Ok(())
}
