//! ConvNeXt-Tiny pest classifier.
//!
//! One operation: an image path goes in, the top-k of 132 pest labels with
//! softmax confidences comes out. Weights are a PyTorch checkpoint fetched on
//! first use and loaded once per [`InferenceRunner`].

pub mod common;
pub mod data;
pub mod error;
pub mod model;
pub mod runner;
pub mod utils;

pub use error::{ClassifyError, Result};
pub use model::inference::Prediction;
pub use runner::{InferenceRunner, canned_predictions};
pub use utils::app_paths::AppPaths;
