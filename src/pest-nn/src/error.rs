use std::{io, path::PathBuf};

use thiserror::Error;

/// Failures of the classification pipeline.
#[derive(Error, Debug)]
pub enum ClassifyError {
    /// The input image could not be opened or decoded.
    #[error("cannot read image {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error(transparent)]
    Io(#[from] io::Error),

    /// No weight file on disk, even after trying to fetch one.
    #[error("weights file not found at {}", .0.display())]
    WeightsMissing(PathBuf),

    #[error("weights download from {url} failed: {reason}")]
    Download { url: String, reason: String },

    /// The checkpoint matched none of the supported layouts.
    #[error("unsupported weights format in {}: {reason}", path.display())]
    WeightFormat { path: PathBuf, reason: String },

    /// Anything else that goes wrong while running the network.
    #[error("tensor error: {0}")]
    Tensor(String),
}

pub type Result<T> = std::result::Result<T, ClassifyError>;
