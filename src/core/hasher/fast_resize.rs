//! Greyscale downscaling for the gradient hash, on fast_image_resize's SIMD
//! convolution.

use crate::error::HashError;
use fast_image_resize::{images::Image, FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GrayImage};

/// Greyscale `image`, then bilinear-resize it to exactly `width` x `height`.
pub fn resize_to_grayscale(
    image: &DynamicImage,
    width: u32,
    height: u32,
) -> Result<GrayImage, HashError> {
    if width == 0 || height == 0 {
        return Err(HashError::ComputationFailed(format!(
            "cannot resize to {}x{}",
            width, height
        )));
    }

    // One channel is cheaper to resize than three
    let gray = image.to_luma8();
    let (src_width, src_height) = gray.dimensions();
    let source = Image::from_vec_u8(src_width, src_height, gray.into_raw(), PixelType::U8)
        .map_err(|e| HashError::ComputationFailed(format!("bad source image: {}", e)))?;

    let mut target = Image::new(width, height, PixelType::U8);
    let options = ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Bilinear));
    Resizer::new()
        .resize(&source, &mut target, &options)
        .map_err(|e| HashError::ComputationFailed(format!("resize failed: {}", e)))?;

    GrayImage::from_raw(width, height, target.into_vec())
        .ok_or_else(|| HashError::ComputationFailed("resized buffer has the wrong size".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, RgbImage, Rgb};

    fn colour_ramp(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 255 / width) as u8, (y * 255 / height) as u8, 64])
        }))
    }

    #[test]
    fn output_has_requested_shape() {
        let resized = resize_to_grayscale(&colour_ramp(100, 100), 9, 8).unwrap();
        assert_eq!(resized.dimensions(), (9, 8));
    }

    #[test]
    fn tiny_images_are_upscaled() {
        let resized = resize_to_grayscale(&colour_ramp(2, 2), 9, 8).unwrap();
        assert_eq!(resized.dimensions(), (9, 8));
    }

    #[test]
    fn flat_input_stays_flat() {
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 40, Luma([90])));
        let resized = resize_to_grayscale(&flat, 9, 8).unwrap();
        assert!(resized.pixels().all(|p| p[0].abs_diff(90) <= 1));
    }

    #[test]
    fn zero_target_is_rejected() {
        let result = resize_to_grayscale(&colour_ramp(10, 10), 0, 8);
        assert!(matches!(result, Err(HashError::ComputationFailed(_))));
    }
}
