use crate::{
    error::{ClassifyError, Result},
    model::convnext::{ConvNext, ConvNextConfig, ConvNextRecord},
};

use burn::{
    prelude::*,
    record::{FullPrecisionSettings, Recorder},
};
use burn_import::pytorch::{LoadArgs, PyTorchFileRecorder};
use log::{debug, info};
use std::{fmt, path::Path};

/// Where the parameter mapping sits inside a `torch.save` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckpointLayout {
    /// A training checkpoint dictionary holding the mapping under this key.
    Nested(&'static str),
    /// The file is the parameter mapping itself.
    Root,
}

impl fmt::Display for CheckpointLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckpointLayout::Nested(key) => write!(f, "'{key}' entry"),
            CheckpointLayout::Root => f.write_str("plain state dict"),
        }
    }
}

/// Tried in order; the first that deserializes into the network wins.
pub const LAYOUTS: [CheckpointLayout; 4] = [
    CheckpointLayout::Nested("state_dict"),
    CheckpointLayout::Nested("model_state_dict"),
    CheckpointLayout::Nested("model"),
    CheckpointLayout::Root,
];

fn load_args(path: &Path, layout: CheckpointLayout) -> LoadArgs {
    let args = LoadArgs::new(path.to_path_buf())
        // Strip DataParallel prefix
        .with_key_remap(r"^module\.(.+)$", "$1")
        // Map stem Sequential(conv, norm)
        .with_key_remap(r"^stem\.0\.(.+)$", "stem.conv.$1")
        .with_key_remap(r"^stem\.1\.(.+)$", "stem.norm.$1")
        // Map downsample Sequential(norm, conv) of stages 1..=3
        .with_key_remap(
            r"^stages\.(\d+)\.downsample\.0\.(.+)$",
            "stages.$1.downsample.norm.$2",
        )
        .with_key_remap(
            r"^stages\.(\d+)\.downsample\.1\.(.+)$",
            "stages.$1.downsample.conv.$2",
        );

    match layout {
        CheckpointLayout::Nested(key) => args.with_top_level_key(key),
        CheckpointLayout::Root => args,
    }
}

/// Reads a PyTorch checkpoint of a timm ConvNeXt into a freshly built network.
pub fn load_convnext<B: Backend>(
    config: &ConvNextConfig,
    path: &Path,
    device: &Device<B>,
) -> Result<ConvNext<B>> {
    if !path.exists() {
        return Err(ClassifyError::WeightsMissing(path.to_path_buf()));
    }

    let recorder = PyTorchFileRecorder::<FullPrecisionSettings>::default();
    let mut failures = Vec::with_capacity(LAYOUTS.len());

    for layout in LAYOUTS {
        let loaded: std::result::Result<ConvNextRecord<B>, _> =
            recorder.load(load_args(path, layout), device);
        match loaded {
            Ok(record) => {
                info!("Loaded {} from {}", layout, path.display());
                return Ok(config.init::<B>(device).load_record(record));
            }
            Err(err) => {
                debug!("{} not usable: {:?}", layout, err);
                failures.push(format!("{layout}: {err:?}"));
            }
        }
    }

    Err(ClassifyError::WeightFormat {
        path: path.to_path_buf(),
        reason: failures.join("; "),
    })
}
