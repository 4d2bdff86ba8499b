use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::audio::spectrum::Estimator;
use crate::encode::OutputFormat;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_bins")]
    pub number_of_bins: usize,
    #[serde(default = "default_algorithm")]
    pub algorithm: Estimator,
    #[serde(default)]
    pub min_density: f64,
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_format")]
    pub format: OutputFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            fps: default_fps(),
            number_of_bins: default_bins(),
            algorithm: default_algorithm(),
            min_density: 0.0,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

fn default_fps() -> u32 { 30 }
fn default_bins() -> usize { 3 }
fn default_algorithm() -> Estimator { Estimator::Welch }
fn default_format() -> OutputFormat { OutputFormat::Wav }

/// `./spectrobin.toml`, then the per-user config locations.
pub fn find_config() -> Option<PathBuf> {
    let local = PathBuf::from("spectrobin.toml");
    if local.exists() {
        return Some(local);
    }
    if let Some(home) = dirs::home_dir() {
        let xdg = home.join(".config").join("spectrobin").join("config.toml");
        if xdg.exists() {
            return Some(xdg);
        }
    }
    if let Some(config_dir) = dirs::config_dir() {
        let platform = config_dir.join("spectrobin").join("config.toml");
        if platform.exists() {
            return Some(platform);
        }
    }
    None
}

pub fn load_config(path: &Path) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            log::warn!("Invalid config {}: {}", path.display(), err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis.fps, 30);
        assert_eq!(cfg.analysis.number_of_bins, 3);
        assert_eq!(cfg.analysis.algorithm, Estimator::Welch);
        assert_eq!(cfg.analysis.min_density, 0.0);
        assert_eq!(cfg.output.format, OutputFormat::Wav);
    }

    #[test]
    fn reads_all_sections() {
        let cfg: Config = toml::from_str(
            r#"
            [analysis]
            fps = 60
            number_of_bins = 8
            algorithm = "fft"
            min_density = 0.05

            [output]
            format = "npy"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.analysis.fps, 60);
        assert_eq!(cfg.analysis.number_of_bins, 8);
        assert_eq!(cfg.analysis.algorithm, Estimator::RawFft);
        assert_eq!(cfg.analysis.min_density, 0.05);
        assert_eq!(cfg.output.format, OutputFormat::Npy);
    }

    #[test]
    fn load_config_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spectrobin.toml");
        std::fs::write(&path, "[analysis]\nalgorithm = \"mfcc\"\n").unwrap();
        assert!(load_config(&path).is_none());

        std::fs::write(&path, "[analysis]\nalgorithm = \"periodogram\"\n").unwrap();
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.analysis.algorithm, Estimator::Periodogram);
    }
}
