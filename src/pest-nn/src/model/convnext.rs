use crate::model::blocks::{Stage, Stem};
use burn::{
    nn::{LayerNorm, LayerNormConfig, Linear, LinearConfig},
    prelude::*,
};

/// Architecture hyper-parameters. Defaults are ConvNeXt-Tiny.
#[derive(Config, Debug)]
pub struct ConvNextConfig {
    pub num_classes: usize,
    #[config(default = "vec![3, 3, 9, 3]")]
    pub depths: Vec<usize>,
    #[config(default = "vec![96, 192, 384, 768]")]
    pub dims: Vec<usize>,
    #[config(default = 3)]
    pub in_channels: usize,
    #[config(default = 1e-6)]
    pub norm_eps: f64,
    #[config(default = 1e-6)]
    pub layer_scale_init: f64,
}

impl ConvNextConfig {
    pub fn tiny(num_classes: usize) -> Self {
        Self::new(num_classes)
    }

    pub fn init<B: Backend>(&self, device: &Device<B>) -> ConvNext<B> {
        ConvNext::new(self, device)
    }
}

#[derive(Module, Debug)]
pub struct Head<B: Backend> {
    norm: LayerNorm<B>,
    fc: Linear<B>,
}

impl<B: Backend> Head<B> {
    /// Global average pool, LayerNorm, linear classifier.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = input.mean_dim(3).mean_dim(2);
        let x = x.flatten::<2>(1, 3);
        let x = self.norm.forward(x);
        self.fc.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct ConvNext<B: Backend> {
    stem: Stem<B>,
    stages: Vec<Stage<B>>,
    head: Head<B>,
}

impl<B: Backend> ConvNext<B> {
    pub fn new(config: &ConvNextConfig, device: &Device<B>) -> Self {
        let dims = &config.dims;
        let stem = Stem::new(config.in_channels, dims[0], config.norm_eps, device);

        let stages = config
            .depths
            .iter()
            .zip(dims.iter())
            .enumerate()
            .map(|(i, (&depth, &out_channels))| {
                let in_channels = if i == 0 { dims[0] } else { dims[i - 1] };
                Stage::new(
                    depth,
                    in_channels,
                    out_channels,
                    i > 0,
                    config.norm_eps,
                    config.layer_scale_init,
                    device,
                )
            })
            .collect();

        let features = dims[dims.len() - 1];
        let head = Head {
            norm: LayerNormConfig::new(features)
                .with_epsilon(config.norm_eps)
                .init(device),
            fc: LinearConfig::new(features, config.num_classes).init(device),
        };

        ConvNext { stem, stages, head }
    }

    /// `[batch, 3, H, W]` images to `[batch, num_classes]` logits.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = self.stem.forward(input);

        for stage in &self.stages {
            x = stage.forward(x);
        }

        self.head.forward(x)
    }
}
