use clap::Parser;
use std::path::PathBuf;

use crate::audio::spectrum::Estimator;
use crate::encode::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "spectrobin",
    about = "Convert a WAV file into per-frame frequency bin energies"
)]
pub struct Cli {
    /// Input WAV file
    pub input: Option<PathBuf>,

    /// Output file (default: <input>_freq_arrays_<N>-bins_<algorithm>.<ext> next to the input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Frames per second, i.e. how many bin vectors per second of audio
    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Number of frequency bins per vector
    #[arg(short, long, default_value_t = 3)]
    pub number_of_bins: usize,

    /// Spectral estimator [default: welch]
    #[arg(short, long, value_enum)]
    pub algorithm: Option<Estimator>,

    /// Output format
    #[arg(short = 'f', long, value_enum, ignore_case = true, default_value = "WAV")]
    pub output_format: OutputFormat,

    /// Lowest permissible peak density for a bin after normalization; bins below are dropped
    #[arg(short, long, default_value_t = 0.0)]
    pub min_density: f64,

    /// Config file (default: ./spectrobin.toml or ~/.config/spectrobin/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Write a test sine wave of this frequency (Hz) instead of analyzing
    #[arg(long, value_name = "HZ")]
    pub sine: Option<f64>,

    /// Sine duration in seconds
    #[arg(long, default_value_t = 1.0, requires = "sine")]
    pub duration: f64,

    /// Sine amplitude
    #[arg(long, default_value_t = 0.5, requires = "sine")]
    pub gain: f64,

    /// Sine start/end phase as a fraction of a cycle (0.0-1.0)
    #[arg(long, default_value_t = 0.0, requires = "sine")]
    pub phase_offset: f64,

    /// Sine sample rate
    #[arg(long, default_value_t = 44100, requires = "sine")]
    pub sample_rate: u32,
}
