use crate::{
    common::{CHANNELS, HEIGHT, WIDTH},
    error::{ClassifyError, Result},
};

use burn::{prelude::*, tensor::Tensor};
use image::{DynamicImage, ImageError, ImageReader, RgbImage, imageops::FilterType};
use std::path::Path;

/// Format comes from the leading bytes, not the extension: uploads are
/// stored under random extensionless names.
fn decode(path: &Path) -> std::result::Result<DynamicImage, ImageError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    reader.decode()
}

/// Decodes `path`, drops any alpha/palette/grayscale encoding and resizes to the
/// network input resolution. Aspect ratio is not preserved.
pub fn load_image(path: &Path) -> Result<RgbImage> {
    let img = decode(path).map_err(|source| ClassifyError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let img = img.to_rgb8();
    if img.width() as usize == WIDTH && img.height() as usize == HEIGHT {
        return Ok(img);
    }
    Ok(image::imageops::resize(
        &img,
        WIDTH as u32,
        HEIGHT as u32,
        FilterType::Triangle,
    ))
}

/// HWC bytes to a `[1, C, H, W]` float tensor in [0, 1].
pub fn convert_image_to_tensor<B: Backend>(img: &RgbImage, device: &B::Device) -> Tensor<B, 4> {
    let height = img.height() as usize;
    let width = img.width() as usize;

    let hw = height * width;
    let mut buf = vec![0f32; CHANNELS * hw];
    for (x, y, pixel) in img.enumerate_pixels() {
        let p = pixel.0;
        let idx = y as usize * width + x as usize;
        buf[idx] = p[0] as f32 / 255.0;
        buf[hw + idx] = p[1] as f32 / 255.0;
        buf[2 * hw + idx] = p[2] as f32 / 255.0;
    }
    Tensor::<B, 3>::from_data(
        TensorData::new(buf, [CHANNELS, height, width]).convert::<B::FloatElem>(),
        device,
    )
    .reshape([1, CHANNELS, height, width])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use image::{GrayAlphaImage, LumaA, Rgb};

    type B = NdArray<f32>;

    #[test]
    fn resizes_to_network_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.png");
        RgbImage::from_pixel(640, 120, Rgb([10, 20, 30]))
            .save(&path)
            .unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.dimensions(), (WIDTH as u32, HEIGHT as u32));
        assert_eq!(img.get_pixel(100, 100).0, [10, 20, 30]);
    }

    #[test]
    fn grayscale_with_alpha_becomes_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayAlphaImage::from_pixel(32, 32, LumaA([200, 17]))
            .save(&path)
            .unwrap();

        let img = load_image(&path).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [200, 200, 200]);
    }

    #[test]
    fn format_is_sniffed_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("leaf.png");
        RgbImage::from_pixel(16, 16, Rgb([40, 90, 10]))
            .save(&png)
            .unwrap();
        let upload = dir.path().join("3f2a9c1e8b7d");
        let misnamed = dir.path().join("photo.jpg");
        std::fs::copy(&png, &upload).unwrap();
        std::fs::copy(&png, &misnamed).unwrap();

        for path in [upload, misnamed] {
            let img = load_image(&path).unwrap();
            assert_eq!(img.get_pixel(0, 0).0, [40, 90, 10], "{}", path.display());
        }
    }

    #[test]
    fn missing_file_is_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(err, ClassifyError::Image { .. }));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();
        let err = load_image(&path).unwrap_err();
        assert!(matches!(err, ClassifyError::Image { .. }));
    }

    #[test]
    fn tensor_is_channel_major() {
        let mut img = RgbImage::from_pixel(2, 2, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([255, 51, 0]));
        let device = Default::default();

        let tensor = convert_image_to_tensor::<B>(&img, &device);
        assert_eq!(tensor.dims(), [1, 3, 2, 2]);

        let values = tensor.into_data().to_vec::<f32>().unwrap();
        // red plane, then green, then blue; pixel (x=1, y=0) is index 1 in each plane
        assert_eq!(values[1], 1.0);
        assert!((values[4 + 1] - 0.2).abs() < 1e-6);
        assert_eq!(values[8 + 1], 0.0);
        assert_eq!(values[0], 0.0);
    }
}
