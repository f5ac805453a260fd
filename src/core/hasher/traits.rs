//! Trait definitions for perceptual hashing.

use super::fast_decode::FastDecoder;
use crate::error::HashError;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A computed perceptual hash that can be compared
pub trait PerceptualHash: Clone + Send + Sync {
    /// Compute the Hamming distance to another hash
    ///
    /// Returns the number of bits that differ between the two hashes.
    /// Lower distance = more similar images.
    fn distance(&self, other: &Self) -> u32;

    /// Get the raw hash bytes
    fn as_bytes(&self) -> &[u8];

    /// Get the hash as a lowercase hexadecimal string
    fn to_hex(&self) -> String {
        self.as_bytes()
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    /// Get the total number of bits in this hash
    fn bit_count(&self) -> u32 {
        (self.as_bytes().len() * 8) as u32
    }

    /// Similarity in `[0, 1]`, normalized by this hash's bit width
    ///
    /// Callers are expected to compare hashes of equal width.
    fn similarity(&self, other: &Self) -> f64 {
        let max_distance = self.bit_count();
        if max_distance == 0 {
            return 1.0;
        }
        1.0 - self.distance(other) as f64 / max_distance as f64
    }
}

/// Available hash algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithmKind {
    /// Average Hash (aHash) - Fast, good for exact duplicates
    Average,
    /// Difference Hash (dHash) - Good balance of speed and accuracy
    Difference,
    /// Perceptual Hash (pHash) - Most robust, handles edits well
    Perceptual,
}

impl HashAlgorithmKind {
    /// Get a human-readable description of the algorithm
    pub fn description(&self) -> &'static str {
        match self {
            HashAlgorithmKind::Average => {
                "Average Hash (aHash) - Fast comparison based on average brightness"
            }
            HashAlgorithmKind::Difference => {
                "Difference Hash (dHash) - Compares brightness gradients between pixels"
            }
            HashAlgorithmKind::Perceptual => {
                "Perceptual Hash (pHash) - DCT-based, robust to edits and transformations"
            }
        }
    }
}

impl Default for HashAlgorithmKind {
    fn default() -> Self {
        HashAlgorithmKind::Difference
    }
}

impl fmt::Display for HashAlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashAlgorithmKind::Average => write!(f, "aHash"),
            HashAlgorithmKind::Difference => write!(f, "dHash"),
            HashAlgorithmKind::Perceptual => write!(f, "pHash"),
        }
    }
}

/// Trait for hash algorithm implementations
pub trait HashAlgorithm: Send + Sync {
    /// Compute a hash from an already-loaded image
    fn hash_image(&self, image: &DynamicImage) -> Result<ImageHashValue, HashError>;

    /// Compute a hash directly from a file path.
    ///
    /// JPEGs go through zune-jpeg, other formats through the image crate.
    fn hash_file(&self, path: &Path) -> Result<ImageHashValue, HashError> {
        let image = FastDecoder::decode(path)?;
        self.hash_image(&image)
    }

    /// Get the algorithm kind
    fn kind(&self) -> HashAlgorithmKind;
}

/// Concrete hash value type
///
/// Equality looks at the bits only: a hash parsed back from its hex form
/// equals the hash it was printed from even though the algorithm is lost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageHashValue {
    /// The raw hash bytes, row-major, most significant bit first
    bytes: Vec<u8>,
    /// The algorithm that produced this hash, when known
    algorithm: Option<HashAlgorithmKind>,
}

impl ImageHashValue {
    /// Create a new hash value produced by `algorithm`
    pub fn new(bytes: Vec<u8>, algorithm: HashAlgorithmKind) -> Self {
        Self {
            bytes,
            algorithm: Some(algorithm),
        }
    }

    /// Create from raw bytes of unknown origin
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
            algorithm: None,
        }
    }

    /// Parse a hash from its hexadecimal form
    ///
    /// The bit length must be the square of a valid hash size, so the
    /// default 64-bit hash is 16 hex digits.
    pub fn from_hex(input: &str) -> Result<Self, HashError> {
        let invalid = |reason: String| HashError::InvalidHex {
            input: input.to_string(),
            reason,
        };

        if input.is_empty() {
            return Err(invalid("empty string".to_string()));
        }
        if let Some(c) = input.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(invalid(format!("'{}' is not a hexadecimal digit", c)));
        }

        let bits = input.len() as u32 * 4;
        let side = (bits as f64).sqrt().round() as u32;
        if side * side != bits || super::validate_hash_size(side).is_err() {
            return Err(invalid(format!(
                "{} bits is not the size of a square hash",
                bits
            )));
        }

        let nibbles: Vec<u8> = input
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();

        // Valid sizes are multiples of 4, so the digit count is always even
        let bytes: Vec<u8> = nibbles
            .chunks(2)
            .map(|pair| (pair[0] << 4) | pair.get(1).copied().unwrap_or(0))
            .collect();

        Ok(Self::from_bytes(&bytes))
    }

    /// Get the algorithm that produced this hash, if known
    pub fn algorithm(&self) -> Option<HashAlgorithmKind> {
        self.algorithm
    }
}

impl PartialEq for ImageHashValue {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for ImageHashValue {}

impl fmt::Display for ImageHashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ImageHashValue {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl PerceptualHash for ImageHashValue {
    fn distance(&self, other: &Self) -> u32 {
        // Hamming distance: count differing bits
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .map(|(a, b)| (a ^ b).count_ones())
            .sum()
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Pack a row-major sequence of bits into bytes, most significant bit first
pub(crate) fn pack_bits(bits: impl IntoIterator<Item = bool>) -> Vec<u8> {
    let mut hash_bytes = Vec::new();
    let mut current_byte: u8 = 0;
    let mut bit_position = 0;

    for bit in bits {
        if bit {
            current_byte |= 1 << (7 - bit_position);
        }

        bit_position += 1;

        if bit_position == 8 {
            hash_bytes.push(current_byte);
            current_byte = 0;
            bit_position = 0;
        }
    }

    if bit_position > 0 {
        hash_bytes.push(current_byte);
    }

    hash_bytes
}
