use indicatif::ProgressBar;

use super::binning::bin_spectrum;
use super::decode::AudioData;
use super::frames::Frames;
use super::matrix::BinMatrix;
use super::spectrum::{Estimator, SpectralAnalyzer};
use crate::error::{Result, SpectroError};

#[derive(Clone, Copy, Debug)]
pub struct AnalysisParams {
    pub fps: u32,
    pub bins: usize,
    pub estimator: Estimator,
}

/// Builds the raw (unnormalized) bin matrix, one row per frame.
///
/// Every frame has the same length, so a frame that is too short for the
/// estimator aborts the whole run rather than being skipped.
pub fn analyze(audio: &AudioData, params: &AnalysisParams, pb: &ProgressBar) -> Result<BinMatrix> {
    if params.bins == 0 {
        return Err(SpectroError::InvalidArgument(
            "number of bins must be at least 1".into(),
        ));
    }

    let frames = Frames::new(&audio.samples, audio.sample_rate, params.fps)?;
    let frame_len = frames.frame_len();
    let total_frames = frames.len();
    if total_frames == 0 {
        return Err(SpectroError::InsufficientSamples {
            needed: frame_len,
            available: audio.samples.len(),
            context: "buffer is shorter than one frame",
        });
    }

    log::info!(
        "Analyzing {} frames of {} samples ({} estimator, {} bins)...",
        total_frames,
        frame_len,
        params.estimator,
        params.bins
    );

    let mut analyzer = SpectralAnalyzer::new(params.estimator, params.bins);
    let mut matrix = BinMatrix::new(params.bins);
    pb.set_length(total_frames as u64);

    for (frame_idx, frame) in frames.enumerate() {
        let spectrum = analyzer.estimate(frame, audio.sample_rate)?;
        let bins = bin_spectrum(&spectrum, params.bins)?;
        log::debug!(
            "frame {}: {} spectral values -> {:?}",
            frame_idx,
            spectrum.len(),
            bins
        );
        matrix.push_row(bins)?;
        pb.set_position(frame_idx as u64 + 1);
    }

    Ok(matrix)
}
