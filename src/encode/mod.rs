pub mod npy;
pub mod wav;

use clap::ValueEnum;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::matrix::BinMatrix;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
pub enum OutputFormat {
    /// Float WAV, one channel per bin, sample rate = fps
    #[value(name = "WAV")]
    #[serde(rename = "WAV", alias = "wav")]
    Wav,
    /// NumPy array file, rows = frames, columns = bins
    #[value(name = "NPY")]
    #[serde(rename = "NPY", alias = "npy")]
    Npy,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Npy => "npy",
        }
    }
}

/// `<dir>/<stem>_freq_arrays_<bins>-bins_<algorithm>.<extension>` next to `input`.
pub fn derive_output_path(input: &Path, bins: usize, algorithm: &str, extension: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}_freq_arrays_{bins}-bins_{algorithm}.{extension}");
    match input.parent() {
        Some(dir) => dir.join(name),
        None => PathBuf::from(name),
    }
}

pub fn write_matrix(path: &Path, matrix: &BinMatrix, format: OutputFormat, fps: u32) -> Result<()> {
    match format {
        OutputFormat::Npy => npy::write_npy(path, matrix),
        OutputFormat::Wav => {
            let mut encoder = wav::WavEncoder::new(path, matrix.columns(), fps)?;
            for row in matrix.rows() {
                encoder.write_frame(row)?;
            }
            encoder.finish()
        }
    }
}
