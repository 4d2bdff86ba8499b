use clap::ValueEnum;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Deserialize;

use crate::error::{Result, SpectroError};

/// How a frame is turned into a spectral array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Deserialize)]
pub enum Estimator {
    /// FFT magnitude with the negative half folded onto the positive half
    #[value(name = "fft", alias = "raw-fft")]
    #[serde(rename = "fft", alias = "raw-fft")]
    RawFft,
    /// One-sided periodogram over the whole frame
    #[value(name = "simple", alias = "periodogram")]
    #[serde(rename = "simple", alias = "periodogram")]
    Periodogram,
    /// One-sided Welch PSD with frame_len / bins long segments
    #[value(name = "welch")]
    #[serde(rename = "welch")]
    Welch,
}

impl Estimator {
    /// Name used on the command line and in derived output file names.
    pub fn name(self) -> &'static str {
        match self {
            Estimator::RawFft => "fft",
            Estimator::Periodogram => "simple",
            Estimator::Welch => "welch",
        }
    }
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Runs one [`Estimator`] over successive frames, reusing FFT plans.
pub struct SpectralAnalyzer {
    estimator: Estimator,
    bins: usize,
    planner: FftPlanner<f64>,
}

impl SpectralAnalyzer {
    pub fn new(estimator: Estimator, bins: usize) -> Self {
        Self {
            estimator,
            bins,
            planner: FftPlanner::new(),
        }
    }

    /// Spectral array of `frame`; every value is non-negative.
    pub fn estimate(&mut self, frame: &[f32], sample_rate: u32) -> Result<Vec<f64>> {
        if self.bins == 0 {
            return Err(SpectroError::InvalidBinCount {
                bins: 0,
                len: frame.len(),
            });
        }
        if frame.len() < self.bins {
            return Err(SpectroError::InsufficientSamples {
                needed: self.bins,
                available: frame.len(),
                context: "frame is shorter than the bin count",
            });
        }

        let fs = sample_rate as f64;
        let spectrum = match self.estimator {
            Estimator::RawFft => self.folded_magnitude(frame),
            Estimator::Periodogram => self.periodogram(frame, fs),
            Estimator::Welch => {
                let segment_len = frame.len() / self.bins;
                self.welch(frame, fs, segment_len)
            }
        };
        Ok(spectrum)
    }

    fn folded_magnitude(&mut self, frame: &[f32]) -> Vec<f64> {
        let n = frame.len();
        let mut buffer: Vec<Complex<f64>> = frame
            .iter()
            .map(|&s| Complex::new(s as f64, 0.0))
            .collect();
        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        let magnitudes: Vec<f64> = buffer.iter().map(|c| c.norm()).collect();
        (0..n / 2)
            .map(|i| magnitudes[i] + magnitudes[n - 1 - i])
            .collect()
    }

    fn periodogram(&mut self, frame: &[f32], fs: f64) -> Vec<f64> {
        let window = vec![1.0; frame.len()];
        let power = self.segment_power(frame, &window);
        one_sided_density(power, frame.len(), fs, &window)
    }

    fn welch(&mut self, frame: &[f32], fs: f64, segment_len: usize) -> Vec<f64> {
        let overlap = segment_len / 2;
        let step = segment_len - overlap;
        let segments = (frame.len() - overlap) / step;
        let window = hann_periodic(segment_len);

        let mut averaged = vec![0.0f64; segment_len / 2 + 1];
        for seg in 0..segments {
            let start = seg * step;
            let power = self.segment_power(&frame[start..start + segment_len], &window);
            for (acc, p) in averaged.iter_mut().zip(power) {
                *acc += p;
            }
        }
        for acc in averaged.iter_mut() {
            *acc /= segments as f64;
        }

        log::trace!("welch: {} segments of {} samples", segments, segment_len);
        one_sided_density(averaged, segment_len, fs, &window)
    }

    /// |X_k|^2 for k in 0..=n/2 of the mean-removed, windowed segment.
    fn segment_power(&mut self, segment: &[f32], window: &[f64]) -> Vec<f64> {
        let n = segment.len();
        let mean = segment.iter().map(|&s| s as f64).sum::<f64>() / n as f64;
        let mut buffer: Vec<Complex<f64>> = segment
            .iter()
            .zip(window)
            .map(|(&s, &w)| Complex::new((s as f64 - mean) * w, 0.0))
            .collect();
        let fft = self.planner.plan_fft_forward(n);
        fft.process(&mut buffer);

        buffer[..=n / 2].iter().map(|c| c.norm_sqr()).collect()
    }
}

/// Density scaling plus doubling of every bin that has a negative-frequency twin.
fn one_sided_density(mut power: Vec<f64>, nfft: usize, fs: f64, window: &[f64]) -> Vec<f64> {
    let window_energy: f64 = window.iter().map(|w| w * w).sum();
    let scale = 1.0 / (fs * window_energy);
    let nyquist = if nfft % 2 == 0 { Some(nfft / 2) } else { None };

    for (k, p) in power.iter_mut().enumerate() {
        *p *= scale;
        if k != 0 && Some(k) != nyquist {
            *p *= 2.0;
        }
    }
    power
}

fn hann_periodic(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    fn argmax(values: &[f64]) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn folded_fft_of_constant_is_dc_only() {
        let mut analyzer = SpectralAnalyzer::new(Estimator::RawFft, 2);
        let spectrum = analyzer.estimate(&[1.0; 8], 8).unwrap();
        assert_eq!(spectrum.len(), 4);
        assert!((spectrum[0] - 8.0).abs() < 1e-9);
        assert!(spectrum[1..].iter().all(|&v| v.abs() < 1e-9));
    }

    #[test]
    fn folded_fft_odd_length_is_half() {
        let mut analyzer = SpectralAnalyzer::new(Estimator::RawFft, 1);
        let spectrum = analyzer.estimate(&sine(3.0, 21, 21), 21).unwrap();
        assert_eq!(spectrum.len(), 10);
    }

    #[test]
    fn periodogram_peaks_at_tone_and_obeys_parseval() {
        let samples = sine(100.0, 1000, 1000);
        let mut analyzer = SpectralAnalyzer::new(Estimator::Periodogram, 3);
        let psd = analyzer.estimate(&samples, 1000).unwrap();

        assert_eq!(psd.len(), 501);
        assert_eq!(argmax(&psd), 100);
        assert!(psd.iter().all(|&v| v >= 0.0));

        let mean = samples.iter().map(|&s| s as f64).sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|&s| (s as f64 - mean).powi(2)).sum::<f64>() / samples.len() as f64;
        let df = 1000.0 / samples.len() as f64;
        let integrated: f64 = psd.iter().sum::<f64>() * df;
        assert!((integrated - variance).abs() < 1e-6);
    }

    #[test]
    fn periodogram_removes_dc_offset() {
        let samples: Vec<f32> = sine(50.0, 1000, 1000).iter().map(|s| s + 3.0).collect();
        let mut analyzer = SpectralAnalyzer::new(Estimator::Periodogram, 3);
        let psd = analyzer.estimate(&samples, 1000).unwrap();
        assert!(psd[0] < 1e-9);
    }

    #[test]
    fn welch_segment_length_follows_bin_count() {
        let samples = sine(300.0, 44100, 1470);
        let mut analyzer = SpectralAnalyzer::new(Estimator::Welch, 3);
        let psd = analyzer.estimate(&samples, 44100).unwrap();
        // 1470 / 3 = 490 sample segments
        assert_eq!(psd.len(), 246);
        assert!(psd.iter().all(|&v| v >= 0.0));

        let resolution = 44100.0 / 490.0;
        let peak_hz = argmax(&psd) as f64 * resolution;
        assert!((peak_hz - 300.0).abs() <= resolution);
    }

    #[test]
    fn welch_single_sample_segments() {
        let mut analyzer = SpectralAnalyzer::new(Estimator::Welch, 4);
        let psd = analyzer.estimate(&[0.1, 0.2, 0.3, 0.4], 4).unwrap();
        assert_eq!(psd.len(), 1);
        assert!(psd[0].abs() < 1e-12);
    }

    #[test]
    fn frame_shorter_than_bins_is_insufficient() {
        for estimator in [Estimator::RawFft, Estimator::Periodogram, Estimator::Welch] {
            let mut analyzer = SpectralAnalyzer::new(estimator, 5);
            let err = analyzer.estimate(&[0.0; 4], 100).err();
            assert!(matches!(err, Some(SpectroError::InsufficientSamples { .. })));
        }
    }

    #[test]
    fn zero_bins_is_invalid() {
        let mut analyzer = SpectralAnalyzer::new(Estimator::Periodogram, 0);
        let err = analyzer.estimate(&[0.0; 4], 100).err();
        assert!(matches!(err, Some(SpectroError::InvalidBinCount { bins: 0, .. })));
    }

    #[test]
    fn names_match_cli_values() {
        for estimator in [Estimator::RawFft, Estimator::Periodogram, Estimator::Welch] {
            let parsed = Estimator::from_str(estimator.name(), true).unwrap();
            assert_eq!(parsed, estimator);
        }
    }
}
