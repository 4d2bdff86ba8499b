use crate::error::{Result, SpectroError};

/// `gain * sin(2π·freq·t)` sampled at `sample_rate`, trimmed so the buffer
/// starts and ends at `phase_offset` (fraction of a cycle) rather than on an
/// arbitrary sample.
///
/// One extra cycle is synthesized, then `phase_offset` cycles are cut from the
/// front and `1 - phase_offset` cycles from the back. For an offset strictly
/// between 0 and 1 the front cut takes one extra sample.
pub fn generate_sine_wave(
    freq: f64,
    duration: f64,
    gain: f64,
    phase_offset: f64,
    sample_rate: u32,
) -> Result<Vec<f32>> {
    if !(freq > 0.0 && freq.is_finite()) {
        return Err(SpectroError::InvalidArgument(format!(
            "frequency must be positive, got {freq}"
        )));
    }
    if !(duration >= 0.0 && duration.is_finite()) {
        return Err(SpectroError::InvalidArgument(format!(
            "duration must be non-negative, got {duration}"
        )));
    }
    if !(0.0..=1.0).contains(&phase_offset) {
        return Err(SpectroError::InvalidArgument(format!(
            "phase offset must be within [0, 1], got {phase_offset}"
        )));
    }
    if sample_rate == 0 {
        return Err(SpectroError::InvalidArgument("sample rate must be positive".into()));
    }

    let sr = sample_rate as f64;
    let samples_per_cycle = sr / freq;
    let total = (sr * duration + samples_per_cycle).ceil() as usize;

    let mut front = (samples_per_cycle * phase_offset) as usize;
    if phase_offset > 0.0 && phase_offset < 1.0 {
        front += 1;
    }
    let back = (samples_per_cycle * (1.0 - phase_offset)) as usize;

    let end = total.saturating_sub(back);
    if front >= end {
        return Ok(Vec::new());
    }

    let step = 2.0 * std::f64::consts::PI * freq / sr;
    Ok((front..end)
        .map(|i| (gain * (step * i as f64).sin()) as f32)
        .collect())
}
