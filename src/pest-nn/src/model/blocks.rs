use burn::{
    module::Param,
    nn::{
        Gelu, LayerNorm, LayerNormConfig, Linear, LinearConfig, PaddingConfig2d,
        conv::{Conv2d, Conv2dConfig},
    },
    prelude::*,
};

/// LayerNorm over the channel axis of an NCHW tensor.
pub fn channel_norm<B: Backend>(norm: &LayerNorm<B>, input: Tensor<B, 4>) -> Tensor<B, 4> {
    let x = input.permute([0, 2, 3, 1]);
    let x = norm.forward(x);
    x.permute([0, 3, 1, 2])
}

/// Patchify stem: 4x4 stride-4 conv, then channel LayerNorm.
#[derive(Module, Debug)]
pub struct Stem<B: Backend> {
    conv: Conv2d<B>,
    norm: LayerNorm<B>,
}

impl<B: Backend> Stem<B> {
    pub fn new(in_channels: usize, out_channels: usize, eps: f64, device: &Device<B>) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [4, 4])
            .with_stride([4, 4])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);
        let norm = LayerNormConfig::new(out_channels)
            .with_epsilon(eps)
            .init(device);

        Stem { conv, norm }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(input);
        channel_norm(&self.norm, x)
    }
}

/// Between stages: channel LayerNorm, then 2x2 stride-2 conv.
#[derive(Module, Debug)]
pub struct Downsample<B: Backend> {
    norm: LayerNorm<B>,
    conv: Conv2d<B>,
}

impl<B: Backend> Downsample<B> {
    pub fn new(in_channels: usize, out_channels: usize, eps: f64, device: &Device<B>) -> Self {
        let norm = LayerNormConfig::new(in_channels)
            .with_epsilon(eps)
            .init(device);
        let conv = Conv2dConfig::new([in_channels, out_channels], [2, 2])
            .with_stride([2, 2])
            .with_padding(PaddingConfig2d::Valid)
            .init(device);

        Downsample { norm, conv }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = channel_norm(&self.norm, input);
        self.conv.forward(x)
    }
}

#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    fc1: Linear<B>,
    act: Gelu,
    fc2: Linear<B>,
}

impl<B: Backend> Mlp<B> {
    pub fn new(dim: usize, hidden: usize, device: &Device<B>) -> Self {
        Mlp {
            fc1: LinearConfig::new(dim, hidden).init(device),
            act: Gelu::new(),
            fc2: LinearConfig::new(hidden, dim).init(device),
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.fc1.forward(input);
        let x = self.act.forward(x);
        self.fc2.forward(x)
    }
}

/// Depthwise 7x7 conv, channels-last LayerNorm, 4x MLP, layer scale, residual.
#[derive(Module, Debug)]
pub struct ConvNextBlock<B: Backend> {
    conv_dw: Conv2d<B>,
    norm: LayerNorm<B>,
    mlp: Mlp<B>,
    gamma: Param<Tensor<B, 1>>,
}

impl<B: Backend> ConvNextBlock<B> {
    pub fn init(dim: usize, eps: f64, layer_scale: f64, device: &Device<B>) -> Self {
        let conv_dw = Conv2dConfig::new([dim, dim], [7, 7])
            .with_groups(dim)
            .with_padding(PaddingConfig2d::Explicit(3, 3))
            .init(device);
        let norm = LayerNormConfig::new(dim).with_epsilon(eps).init(device);
        let mlp = Mlp::new(dim, 4 * dim, device);
        let gamma = Param::from_tensor(Tensor::full([dim], layer_scale, device));

        ConvNextBlock {
            conv_dw,
            norm,
            mlp,
            gamma,
        }
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let identity = input.clone();

        let x = self.conv_dw.forward(input);
        let x = x.permute([0, 2, 3, 1]);
        let x = self.norm.forward(x);
        let x = self.mlp.forward(x);
        let x = x * self.gamma.val().unsqueeze::<4>();
        let x = x.permute([0, 3, 1, 2]);

        // Skip connection
        identity + x
    }
}

#[derive(Module, Debug)]
pub struct Stage<B: Backend> {
    downsample: Option<Downsample<B>>,
    blocks: Vec<ConvNextBlock<B>>,
}

impl<B: Backend> Stage<B> {
    pub fn new(
        num_blocks: usize,
        in_channels: usize,
        out_channels: usize,
        downsample: bool,
        eps: f64,
        layer_scale: f64,
        device: &Device<B>,
    ) -> Self {
        let downsample = {
            if downsample {
                Some(Downsample::new(in_channels, out_channels, eps, device))
            } else {
                None
            }
        };
        let blocks = (0..num_blocks)
            .map(|_| ConvNextBlock::init(out_channels, eps, layer_scale, device))
            .collect();

        Stage { downsample, blocks }
    }

    pub fn has_downsample(&self) -> bool {
        self.downsample.is_some()
    }

    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 4> {
        let mut x = match &self.downsample {
            Some(downsample) => downsample.forward(input),
            None => input,
        };

        for block in &self.blocks {
            x = block.forward(x);
        }

        x
    }
}
