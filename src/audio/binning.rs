use crate::error::{Result, SpectroError};

/// Folds a spectral array into `bins` contiguous, equal-width groups and sums
/// each group. The trailing `len % bins` values are dropped.
pub fn bin_spectrum(spectrum: &[f64], bins: usize) -> Result<Vec<f64>> {
    if bins == 0 || bins > spectrum.len() {
        return Err(SpectroError::InvalidBinCount {
            bins,
            len: spectrum.len(),
        });
    }

    let width = spectrum.len() / bins;
    Ok(spectrum[..width * bins]
        .chunks_exact(width)
        .map(|group| group.iter().sum())
        .collect())
}
