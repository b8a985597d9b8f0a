//! ABP Features CLI
//!
//! Extracts windowed blood-pressure features from staged waveform records.

use abp_features::{
    config::PipelineConfig,
    core::{add_lookback, aggregate, flag_usable},
    export::SnapshotBuilder,
    waveform::{SyntheticWaveform, WaveformFrame, WaveformRecord},
    VERSION,
};
use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "abp-features")]
#[command(version = VERSION)]
#[command(about = "Windowed blood-pressure feature extraction", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract window features from a staged waveform record
    Extract {
        /// Path to a waveform record JSON file
        #[arg(long, short)]
        input: PathBuf,

        /// Where to write the model-ready snapshot (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Window length in seconds
        #[arg(long)]
        chunk_duration: Option<u64>,

        /// Window stride in seconds
        #[arg(long)]
        step_duration: Option<u64>,

        /// Waveform channel to analyze
        #[arg(long)]
        channel: Option<String>,

        /// Lookback horizon in minutes
        #[arg(long)]
        lookback: Option<f64>,
    },

    /// Generate a synthetic sinusoidal waveform record
    Synth {
        /// Where to write the record JSON
        #[arg(long, short)]
        output: PathBuf,

        /// Waveform id for the generated record
        #[arg(long, default_value = "w-synth")]
        wave_id: String,

        /// Recording length in seconds
        #[arg(long, default_value = "120")]
        duration: u64,

        /// Cardiac cycle length in seconds
        #[arg(long, default_value = "1.0")]
        period: f64,

        /// Diastolic trough in mmHg
        #[arg(long, default_value = "60.0")]
        low: f64,

        /// Systolic crest in mmHg
        #[arg(long, default_value = "140.0")]
        high: f64,
    },

    /// Show the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract {
            input,
            output,
            chunk_duration,
            step_duration,
            channel,
            lookback,
        } => cmd_extract(input, output, chunk_duration, step_duration, channel, lookback),
        Commands::Synth {
            output,
            wave_id,
            duration,
            period,
            low,
            high,
        } => cmd_synth(output, &wave_id, duration, period, low, high),
        Commands::Config => cmd_config(),
    }
}

fn cmd_extract(
    input: PathBuf,
    output: Option<PathBuf>,
    chunk_duration: Option<u64>,
    step_duration: Option<u64>,
    channel: Option<String>,
    lookback: Option<f64>,
) -> anyhow::Result<()> {
    let mut config = PipelineConfig::load().unwrap_or_default();
    if let Some(chunk) = chunk_duration {
        config.chunk_duration_secs = chunk;
    }
    if let Some(step) = step_duration {
        config.step_duration_secs = step;
    }
    if let Some(channel) = channel {
        config.channel_name = channel;
    }
    if let Some(lookback) = lookback {
        config.lookback_minutes = lookback;
    }

    let content = std::fs::read_to_string(&input)
        .with_context(|| format!("reading record from {}", input.display()))?;
    let record: WaveformRecord =
        serde_json::from_str(&content).with_context(|| "parsing waveform record JSON")?;

    let frame = WaveformFrame::from_record(&record, &config.channel_name)?;
    let table = aggregate(&frame, &config)?;
    let table = add_lookback(table, config.lookback_minutes)?;
    let table = flag_usable(table);

    let builder = SnapshotBuilder::new();
    let json = builder.build_json(&table, &config, record.metadata.as_ref());

    match output {
        Some(path) => {
            std::fs::write(&path, json)
                .with_context(|| format!("writing snapshot to {}", path.display()))?;
            println!(
                "Wrote {} windows ({} usable) for {} to {}",
                table.len(),
                table.usable_rows(),
                table.wave_id,
                path.display()
            );
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn cmd_synth(
    output: PathBuf,
    wave_id: &str,
    duration: u64,
    period: f64,
    low: f64,
    high: f64,
) -> anyhow::Result<()> {
    let synth = SyntheticWaveform {
        duration_secs: duration,
        period_secs: period,
        low_mmhg: low,
        high_mmhg: high,
        base_time: Utc::now(),
        ..SyntheticWaveform::default()
    };
    let record = synth.record(wave_id);

    let json = serde_json::to_string_pretty(&record)?;
    std::fs::write(&output, json)
        .with_context(|| format!("writing record to {}", output.display()))?;

    println!(
        "Wrote {} s synthetic waveform ({} samples) to {}",
        duration,
        record.channels[0].values.len(),
        output.display()
    );
    Ok(())
}

fn cmd_config() -> anyhow::Result<()> {
    let config = PipelineConfig::load()?;
    println!("Configuration file: {}", PipelineConfig::config_path().display());
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
