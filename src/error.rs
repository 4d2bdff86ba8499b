use std::path::PathBuf;
use thiserror::Error;

/// Failures of the frame-to-bin pipeline.
#[derive(Error, Debug)]
pub enum SpectroError {
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Unable to read audio from {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("Insufficient samples: {needed} required, {available} available ({context})")]
    InsufficientSamples {
        needed: usize,
        available: usize,
        context: &'static str,
    },

    #[error("Invalid bin count {bins} for a spectrum of length {len}")]
    InvalidBinCount { bins: usize, len: usize },

    /// Global maximum of the bin matrix is zero, normalization is undefined.
    #[error("Input is empty or silent; nothing to normalize")]
    EmptyOrSilentInput,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to write {}: {reason}", .path.display())]
    OutputWrite { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, SpectroError>;
