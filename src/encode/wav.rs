use hound::{SampleFormat, WavSpec, WavWriter};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpectroError};

/// Streams rows into a 32-bit float WAV, one sample per channel per row.
///
/// Bin matrices are written with one channel per bin and `sample_rate = fps`.
pub struct WavEncoder {
    writer: WavWriter<BufWriter<File>>,
    path: PathBuf,
    channels: usize,
}

impl WavEncoder {
    pub fn new(path: &Path, channels: usize, sample_rate: u32) -> Result<Self> {
        let fail = |reason: String| SpectroError::OutputWrite {
            path: path.to_path_buf(),
            reason,
        };

        if channels == 0 {
            return Err(fail("no columns left to write as WAV channels".into()));
        }
        let channel_count = u16::try_from(channels)
            .map_err(|_| fail(format!("{channels} columns exceed the WAV channel limit")))?;

        let spec = WavSpec {
            channels: channel_count,
            sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let writer = WavWriter::create(path, spec).map_err(|e| fail(e.to_string()))?;

        log::debug!("WAV encoder started: {} channel(s) @ {}Hz", channels, sample_rate);

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            channels,
        })
    }

    pub fn write_frame(&mut self, row: &[f64]) -> Result<()> {
        if row.len() != self.channels {
            return Err(self.fail(format!(
                "row has {} values, expected {}",
                row.len(),
                self.channels
            )));
        }
        for &value in row {
            if let Err(e) = self.writer.write_sample(value as f32) {
                return Err(self.fail(e.to_string()));
            }
        }
        Ok(())
    }

    pub fn finish(self) -> Result<()> {
        let path = self.path;
        self.writer.finalize().map_err(|e| SpectroError::OutputWrite {
            path,
            reason: e.to_string(),
        })
    }

    fn fail(&self, reason: String) -> SpectroError {
        SpectroError::OutputWrite {
            path: self.path.clone(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    #[test]
    fn rows_become_interleaved_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bins.wav");

        let mut encoder = WavEncoder::new(&path, 3, 30).unwrap();
        encoder.write_frame(&[1.0, 0.5, 0.0]).unwrap();
        encoder.write_frame(&[0.25, 0.75, 0.125]).unwrap();
        encoder.finish().unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 3);
        assert_eq!(spec.sample_rate, 30);
        assert_eq!(spec.sample_format, SampleFormat::Float);
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![1.0, 0.5, 0.0, 0.25, 0.75, 0.125]);
    }

    #[test]
    fn zero_channels_is_a_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let err = WavEncoder::new(&dir.path().join("empty.wav"), 0, 30).err();
        assert!(matches!(err, Some(SpectroError::OutputWrite { .. })));
    }

    #[test]
    fn ragged_row_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = WavEncoder::new(&dir.path().join("r.wav"), 2, 30).unwrap();
        assert!(encoder.write_frame(&[1.0]).is_err());
    }

    #[test]
    fn unwritable_destination_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.wav");
        let err = WavEncoder::new(&path, 1, 30).err();
        assert!(matches!(err, Some(SpectroError::OutputWrite { .. })));
    }
}
