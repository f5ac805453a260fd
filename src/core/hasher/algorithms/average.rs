//! Average Hash (aHash) implementation.
//!
//! aHash works by:
//! 1. Resizing the image to hash_size x hash_size
//! 2. Converting to grayscale
//! 3. Computing the mean brightness
//! 4. For each pixel: if brighter than the mean, set bit to 1, else 0
//!
//! This is the fastest hash but less robust to edits.

use super::super::traits::{pack_bits, HashAlgorithm, HashAlgorithmKind, ImageHashValue};
use crate::error::HashError;
use image::DynamicImage;

/// Average Hash (aHash) implementation
pub struct AverageHasher {
    /// Size of the hash (width and height)
    hash_size: u32,
}

impl AverageHasher {
    /// Create a new aHash hasher
    pub fn new(hash_size: u32) -> Self {
        Self { hash_size }
    }
}

impl HashAlgorithm for AverageHasher {
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError> {
        let gray = image
            .resize_exact(
                self.hash_size,
                self.hash_size,
                image::imageops::FilterType::Lanczos3,
            )
            .to_luma8();

        let count = (self.hash_size * self.hash_size) as f64;
        let mean = gray.pixels().map(|p| p[0] as f64).sum::<f64>() / count;

        let hash_bytes = pack_bits(gray.pixels().map(|p| p[0] as f64 > mean));

        Ok(ImageHashValue::new(hash_bytes, HashAlgorithmKind::Average))
    }

    fn kind(&self) -> HashAlgorithmKind {
        HashAlgorithmKind::Average
    }
}
