pub mod conversion;

use crate::{
    common::{CHANNELS, PIXEL_MEAN, PIXEL_STD},
    error::Result,
};

use burn::{prelude::*, tensor::Tensor};
use std::path::Path;

/// Full input transform: decode, RGB, resize, scale to [0, 1], standardize.
/// Returns a batch of one, `[1, 3, 224, 224]`.
pub fn preprocess<B: Backend>(path: &Path, device: &B::Device) -> Result<Tensor<B, 4>> {
    let img = conversion::load_image(path)?;
    let pixels = conversion::convert_image_to_tensor::<B>(&img, device);
    Ok(standardize(pixels))
}

/// `(x - mean) / std` per channel, broadcast over batch and spatial dims.
fn standardize<B: Backend>(pixels: Tensor<B, 4>) -> Tensor<B, 4> {
    let device = pixels.device();
    let per_channel = |stats: [f32; CHANNELS]| {
        Tensor::<B, 1>::from_floats(stats, &device).reshape([1, CHANNELS, 1, 1])
    };

    (pixels - per_channel(PIXEL_MEAN)) / per_channel(PIXEL_STD)
}
