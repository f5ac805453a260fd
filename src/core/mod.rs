//! # Core Module
//!
//! Stateless image helpers. Every call takes its inputs, runs one capability
//! and returns a plain result; nothing is cached or persisted.
//!
//! ## Modules
//! - `hasher` - Computes and parses perceptual hashes
//! - `similarity` - Scores hash pairs and image pairs (SSIM)
//! - `labels` - Detects labels through a remote vision service

pub mod hasher;
pub mod labels;
pub mod similarity;

// Re-export commonly used types
pub use hasher::{load_hash, make_hash, HashAlgorithmKind, ImageHashValue, PerceptualHash};
pub use labels::{detect_labels, ImageReference, Label, LabelDetector, LabelRequest};
pub use similarity::{compare_hash, compare_ssim};
