//! # Similarity Module
//!
//! Scores how alike two images are, as a float where 1.0 means identical.
//!
//! ## Scores
//! | Source | Formula |
//! |--------|---------|
//! | Hashes | `1 - hamming_distance / bit_count` |
//! | Pixels | mean structural similarity index (SSIM) |

mod ssim;

pub use ssim::{structural_similarity, to_gray_array, SsimConfig};

use crate::core::hasher::fast_decode::FastDecoder;
use crate::core::hasher::{ImageHashValue, PerceptualHash};
use crate::error::CompareError;
use std::path::Path;
use tracing::debug;

/// Similarity of two hashes in `[0, 1]`.
///
/// The distance is normalized by the hashes' own bit width, so 64-bit and
/// 256-bit hashes both map onto the same scale. Hashes of different widths
/// cannot be compared.
pub fn compare_hash(h1: &ImageHashValue, h2: &ImageHashValue) -> Result<f64, CompareError> {
    let (left, right) = (h1.bit_count(), h2.bit_count());
    if left != right {
        return Err(CompareError::BitWidthMismatch { left, right });
    }

    let score = h1.similarity(h2);
    debug!(distance = h1.distance(h2), bits = left, score, "compared hashes");
    Ok(score)
}

/// Mean SSIM of the images at two paths, compared as greyscale.
///
/// The images are not resized: different dimensions are an error.
pub fn compare_ssim(path_a: &Path, path_b: &Path) -> Result<f64, CompareError> {
    compare_ssim_with(path_a, path_b, &SsimConfig::default())
}

/// [`compare_ssim`] with explicit SSIM parameters.
pub fn compare_ssim_with(
    path_a: &Path,
    path_b: &Path,
    config: &SsimConfig,
) -> Result<f64, CompareError> {
    let a = to_gray_array(&FastDecoder::decode(path_a)?);
    let b = to_gray_array(&FastDecoder::decode(path_b)?);

    let score = structural_similarity(a.view(), b.view(), config)?;
    debug!(
        a = %path_a.display(),
        b = %path_b.display(),
        score,
        "computed structural similarity"
    );
    Ok(score)
}
