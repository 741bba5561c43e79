use crate::{
    common::NUM_CLASSES,
    data,
    error::Result,
    model::{
        convnext::{ConvNext, ConvNextConfig},
        inference::{Prediction, infer, predictions_from_probabilities},
        weights::load_convnext,
    },
    utils::{app_paths::AppPaths, download::ensure_weights},
};

use burn::prelude::*;
use log::{debug, info};
use std::{cell::OnceCell, num::NonZeroUsize, path::Path};

/// Fixed answer for `DUMMY_PREDICT=1`, used to exercise callers without a model.
pub fn canned_predictions() -> Vec<Prediction> {
    vec![
        Prediction::new("aphids", 0.85),
        Prediction::new("whitefly", 0.08),
        Prediction::new("thrips", 0.02),
    ]
}

/// Classifies images with a network that is built and loaded on first use and
/// then kept for the lifetime of the runner.
pub struct InferenceRunner<B: Backend> {
    paths: AppPaths,
    config: ConvNextConfig,
    device: B::Device,
    model: OnceCell<ConvNext<B>>,
}

impl<B: Backend> InferenceRunner<B> {
    pub fn new(paths: AppPaths, device: B::Device) -> Self {
        Self::with_config(paths, ConvNextConfig::tiny(NUM_CLASSES), device)
    }

    pub fn with_config(paths: AppPaths, config: ConvNextConfig, device: B::Device) -> Self {
        Self {
            paths,
            config,
            device,
            model: OnceCell::new(),
        }
    }

    /// Runner around an already loaded network; weights are never fetched.
    pub fn with_model(paths: AppPaths, model: ConvNext<B>, device: B::Device) -> Self {
        Self {
            paths,
            config: ConvNextConfig::tiny(NUM_CLASSES),
            device,
            model: OnceCell::from(model),
        }
    }

    pub fn from_env(device: B::Device) -> Self {
        Self::new(AppPaths::from_env(), device)
    }

    pub fn paths(&self) -> &AppPaths {
        &self.paths
    }

    pub fn is_loaded(&self) -> bool {
        self.model.get().is_some()
    }

    /// The cached network, fetching and loading weights on the first call.
    /// A failed load leaves the cell empty so a later call tries again.
    pub fn model(&self) -> Result<&ConvNext<B>> {
        if let Some(model) = self.model.get() {
            return Ok(model);
        }

        ensure_weights(&self.paths.weights_path, &self.paths.weights_url)?;
        let model = load_convnext::<B>(&self.config, &self.paths.weights_path, &self.device)?;
        info!("Model ready");
        Ok(self.model.get_or_init(|| model))
    }

    pub fn classify(&self, path: &Path, topk: NonZeroUsize) -> Result<Vec<Prediction>> {
        if self.paths.dummy_predict {
            debug!("Dummy mode, skipping {}", path.display());
            return Ok(canned_predictions());
        }

        // Decode first: a bad upload should not cost a weights download.
        let images = data::preprocess::<B>(path, &self.device)?;
        let model = self.model()?;
        let probabilities = infer(model, images)?;
        Ok(predictions_from_probabilities(&probabilities, topk.get()))
    }
}
