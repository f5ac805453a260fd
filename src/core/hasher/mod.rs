//! # Hasher Module
//!
//! Computes perceptual hashes for images and parses them back from hex.
//!
//! ## Supported Algorithms
//! - **dHash (Difference Hash)** - Default, best balance of speed and accuracy
//! - **aHash (Average Hash)** - Fastest, good for exact duplicates
//! - **pHash (Perceptual Hash)** - Most robust, handles edits well
//!
//! ## How It Works
//! 1. Resize image to small size (8x8 by default)
//! 2. Convert to grayscale
//! 3. Compute hash based on pixel relationships
//! 4. Compare hashes using Hamming distance
//!
//! ## Example
//! ```rust,ignore
//! use tero::core::hasher::{make_hash, load_hash, HashAlgorithmKind};
//!
//! let hash = make_hash(&path, HashAlgorithmKind::Difference)?;
//! let restored = load_hash(&hash.to_string())?;
//! assert_eq!(hash, restored);
//! ```

mod algorithms;
pub mod fast_decode;
pub mod fast_resize;
mod traits;

pub use algorithms::{AverageHasher, DifferenceHasher, PerceptualHasher};
pub use traits::{HashAlgorithm, HashAlgorithmKind, ImageHashValue, PerceptualHash};

use crate::error::HashError;
use std::path::Path;
use tracing::debug;

/// Hash size used by [`make_hash`], giving 64-bit hashes
pub const DEFAULT_HASH_SIZE: u32 = 8;

/// Configuration builder for hashers
#[derive(Debug, Clone)]
pub struct HasherConfig {
    /// Hash size (side of the square bit grid)
    hash_size: u32,
    /// Algorithm to use
    algorithm: HashAlgorithmKind,
}

impl HasherConfig {
    /// Create a new hasher configuration with defaults
    pub fn new() -> Self {
        Self {
            hash_size: DEFAULT_HASH_SIZE,
            algorithm: HashAlgorithmKind::Difference,
        }
    }

    /// Set the hash size
    ///
    /// The hash has `size * size` bits:
    /// - 8: 64 bits, fast, good for most uses
    /// - 16: 256 bits, more accurate
    /// - 32: 1024 bits, very accurate, slower
    pub fn hash_size(mut self, size: u32) -> Self {
        self.hash_size = size;
        self
    }

    /// Set the hash algorithm
    pub fn algorithm(mut self, algorithm: HashAlgorithmKind) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the hasher
    pub fn build(self) -> Result<Box<dyn HashAlgorithm>, HashError> {
        validate_hash_size(self.hash_size)?;

        match self.algorithm {
            HashAlgorithmKind::Average => Ok(Box::new(AverageHasher::new(self.hash_size))),
            HashAlgorithmKind::Difference => Ok(Box::new(DifferenceHasher::new(self.hash_size))),
            HashAlgorithmKind::Perceptual => Ok(Box::new(PerceptualHasher::new(self.hash_size))),
        }
    }
}

impl Default for HasherConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sizes must pack into whole bytes and whole hex digits
pub(crate) fn validate_hash_size(size: u32) -> Result<(), HashError> {
    if size == 0 || size > 64 || size % 4 != 0 {
        return Err(HashError::InvalidHashSize { size });
    }
    Ok(())
}

/// Hash the image at `path` with `algorithm` at the default size.
pub fn make_hash(path: &Path, algorithm: HashAlgorithmKind) -> Result<ImageHashValue, HashError> {
    make_hash_with(path, &HasherConfig::new().algorithm(algorithm))
}

/// Hash the image at `path` with an explicit configuration.
pub fn make_hash_with(path: &Path, config: &HasherConfig) -> Result<ImageHashValue, HashError> {
    let hasher = config.clone().build()?;
    let hash = hasher.hash_file(path)?;

    debug!(
        path = %path.display(),
        algorithm = %hasher.kind(),
        hash = %hash,
        "computed image hash"
    );
    Ok(hash)
}

/// Parse a hash from the hex string produced by its `Display` form.
pub fn load_hash(hex: &str) -> Result<ImageHashValue, HashError> {
    ImageHashValue::from_hex(hex)
}
