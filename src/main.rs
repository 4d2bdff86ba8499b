mod audio;
mod cli;
mod config;
mod encode;
mod error;
mod signal;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

use audio::analysis::AnalysisParams;
use audio::matrix::BinMatrix;
use audio::spectrum::Estimator;
use cli::Cli;
use config::Config;
use encode::wav::WavEncoder;
use encode::OutputFormat;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Explicit --config path, or auto-detect spectrobin.toml / global config
    let config_path = cli.config.clone().or_else(config::find_config);
    if let Some(ref path) = config_path {
        if let Some(cfg) = config::load_config(path) {
            log::info!("Loaded config from {}", path.display());
            merge_config(&mut cli, cfg);
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    // Sine fixture mode
    if let Some(freq) = cli.sine {
        return write_sine(&cli, freq);
    }

    let input = cli.input.as_ref().context("Input WAV file is required")?;
    if !cli.min_density.is_finite() {
        anyhow::bail!("--min-density must be a finite number");
    }

    let estimator = cli.algorithm.unwrap_or(Estimator::Welch);
    let params = AnalysisParams {
        fps: cli.fps,
        bins: cli.number_of_bins,
        estimator,
    };
    let output = cli.output.clone().unwrap_or_else(|| {
        encode::derive_output_path(
            input,
            params.bins,
            estimator.name(),
            cli.output_format.extension(),
        )
    });

    log::info!("spectrobin - WAV to frequency bins");
    log::info!("Input: {}", input.display());
    log::info!("Output: {} ({:?})", output.display(), cli.output_format);
    log::info!(
        "{} bins @ {}fps, estimator={}, min_density={}",
        params.bins, params.fps, estimator, cli.min_density
    );

    // 1. Decode audio
    log::info!("Decoding audio...");
    let audio_data = audio::decode::decode_wav(input)?;

    // 2. Per-frame spectra folded into bins
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")?
            .progress_chars("=>-"),
    );
    let bins = audio::analysis::analyze(&audio_data, &params, &pb)?;
    pb.finish_and_clear();
    log::info!("Bin matrix: {} frames x {} bins", bins.frames(), bins.columns());

    // 3. Normalize, then drop quiet bins
    let normalized = bins.normalized()?;
    let (pruned, report) = normalized.pruned(cli.min_density);
    println!("Pruned {} bins down to {}", report.before, report.after);
    print_matrix(&pruned);

    // 4. Write
    println!("Saving to {}", output.display());
    encode::write_matrix(&output, &pruned, cli.output_format, params.fps)?;

    log::info!("Done! Output: {}", output.display());
    Ok(())
}

/// Config values apply only where the CLI is still at its default.
fn merge_config(cli: &mut Cli, cfg: Config) {
    if cli.fps == 30 { cli.fps = cfg.analysis.fps; }
    if cli.number_of_bins == 3 { cli.number_of_bins = cfg.analysis.number_of_bins; }
    if cli.algorithm.is_none() { cli.algorithm = Some(cfg.analysis.algorithm); }
    if cli.min_density == 0.0 { cli.min_density = cfg.analysis.min_density; }
    if cli.output_format == OutputFormat::Wav { cli.output_format = cfg.output.format; }
}

fn write_sine(cli: &Cli, freq: f64) -> Result<()> {
    let samples = signal::sine::generate_sine_wave(
        freq,
        cli.duration,
        cli.gain,
        cli.phase_offset,
        cli.sample_rate,
    )?;
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("sine_{freq}hz.wav")));

    let mut encoder = WavEncoder::new(&output, 1, cli.sample_rate)?;
    for &sample in &samples {
        encoder.write_frame(&[sample as f64])?;
    }
    encoder.finish()?;

    log::info!(
        "Wrote {} samples of {}Hz sine ({:.2}s @ {}Hz) to {}",
        samples.len(),
        freq,
        cli.duration,
        cli.sample_rate,
        output.display()
    );
    Ok(())
}

fn print_matrix(matrix: &BinMatrix) {
    for row in matrix.rows() {
        let line: Vec<String> = row.iter().map(|v| format!("{v:.6}")).collect();
        println!("[{}]", line.join(", "));
    }
}
