//! Difference Hash (dHash) implementation.
//!
//! dHash works by:
//! 1. Resizing the image to (hash_size+1) x hash_size
//! 2. Converting to grayscale
//! 3. Comparing each pixel to the one to its right
//! 4. If the right pixel is brighter, set bit to 1, else 0
//!
//! This captures the relative gradient of brightness changes.
//!
//! Uses SIMD-accelerated resizing via fast_image_resize for 5-14x speedup.

use super::super::fast_resize::resize_to_grayscale;
use super::super::traits::{pack_bits, HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use crate::error::HashError;
use image::DynamicImage;

/// Difference Hash (dHash) implementation
pub struct DifferenceHasher {
    /// Size of the hash (width and height of comparison grid)
    hash_size: u32,
}

impl DifferenceHasher {
    /// Create a new dHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for DifferenceHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        // One extra column to compute differences
        let resized = resize_to_grayscale(image, self.hash_size + 1, self.hash_size)?;
        let gray = &resized;

        let size = self.hash_size;
        let bits = (0..size).flat_map(move |y| {
            (0..size).map(move |x| gray.get_pixel(x + 1, y)[0] > gray.get_pixel(x, y)[0])
        });

        Ok(ImageHashValue::new(pack_bits(bits), HashAlgorithmKind::Difference))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Difference
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::super::traits::PerceptualHash;
    use image::{ImageBuffer, Rgb};

    fn create_solid_image(r: u8, g: u8, b: u8) -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |_, _| Rgb([r, g, b]));
        DynamicImage::ImageRgb8(img)
    }

    fn create_left_to_right_gradient() -> DynamicImage {
        // Gradient: left is dark, right is bright (left < right)
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            let brightness = (x * 255 / 99) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    fn create_right_to_left_gradient() -> DynamicImage {
        let img = ImageBuffer::from_fn(100, 100, |x, _| {
            let brightness = ((99 - x) * 255 / 99) as u8;
            Rgb([brightness, brightness, brightness])
        });
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn identical_images_produce_identical_hash() {
        let hasher = DifferenceHasher::new(8);
        let image = create_solid_image(128, 128, 128);

        let hash1 = hasher.hash_image(&image).unwrap();
        let hash2 = hasher.hash_image(&image).unwrap();

        assert_eq!(hash1.distance(&hash2), 0);
    }

    #[test]
    fn solid_image_has_no_gradient_bits() {
        let hasher = DifferenceHasher::new(8);
        let hash = hasher.hash_image(&create_solid_image(40, 90, 200)).unwrap();

        assert!(hash.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn opposite_gradients_produce_different_hashes() {
        let hasher = DifferenceHasher::new(8);

        let hash1 = hasher.hash_image(&create_left_to_right_gradient()).unwrap();
        let hash2 = hasher.hash_image(&create_right_to_left_gradient()).unwrap();

        let distance = hash1.distance(&hash2);
        assert!(
            distance > 0,
            "Expected opposite gradients to produce different hashes, got distance {}",
            distance
        );
    }

    #[test]
    fn hash_size_affects_output_length() {
        let image = create_solid_image(128, 128, 128);

        let hash_8 = DifferenceHasher::new(8).hash_image(&image).unwrap();
        let hash_16 = DifferenceHasher::new(16).hash_image(&image).unwrap();

        // 8x8 = 64 bits = 8 bytes
        assert_eq!(hash_8.as_bytes().len(), 8);
        // 16x16 = 256 bits = 32 bytes
        assert_eq!(hash_16.as_bytes().len(), 32);
    }

    #[test]
    fn kind_returns_difference() {
        let hasher = DifferenceHasher::new(8);
        assert_eq!(hasher.kind(), HashAlgorithmKind::Difference);
    }
}
