use std::slice::ChunksExact;

use crate::error::{Result, SpectroError};

/// Non-overlapping, fixed-length frames over a sample buffer.
///
/// The trailing remainder that does not fill a whole frame is never yielded.
/// Clone before iterating to walk the buffer a second time.
#[derive(Clone, Debug)]
pub struct Frames<'a> {
    chunks: ChunksExact<'a, f32>,
    frame_len: usize,
}

impl<'a> Frames<'a> {
    pub fn new(samples: &'a [f32], sample_rate: u32, fps: u32) -> Result<Self> {
        let frame_len = frame_length(sample_rate, fps)?;
        Ok(Self {
            chunks: samples.chunks_exact(frame_len),
            frame_len,
        })
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }
}

impl<'a> Iterator for Frames<'a> {
    type Item = &'a [f32];

    fn next(&mut self) -> Option<Self::Item> {
        self.chunks.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Samples per frame, `floor(sample_rate / fps)`.
pub fn frame_length(sample_rate: u32, fps: u32) -> Result<usize> {
    if fps == 0 {
        return Err(SpectroError::InvalidArgument("fps must be at least 1".into()));
    }
    let frame_len = (sample_rate / fps) as usize;
    if frame_len == 0 {
        return Err(SpectroError::InsufficientSamples {
            needed: fps as usize,
            available: sample_rate as usize,
            context: "sample rate is lower than the requested fps",
        });
    }
    Ok(frame_len)
}
