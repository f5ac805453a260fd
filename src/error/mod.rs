//! # Error Module
//!
//! Error types for the image helpers, the settings bootstrap and the web entry point.
//!
//! ## Design Principles
//! - **Never panic** on user data - return errors instead
//! - **Include context** - paths, values, what went wrong
//! - **One enum per area** - folded into [`TeroError`] with `#[from]`

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum TeroError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Hashing error: {0}")]
    Hash(#[from] HashError),

    #[error("Comparison error: {0}")]
    Compare(#[from] CompareError),

    #[error("Label detection error: {0}")]
    Label(#[from] LabelError),

    #[error("Server error: {0}")]
    Server(#[source] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Errors that occur while loading the settings file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid listen address '{value}'")]
    InvalidAddress { value: String },
}

/// Errors that occur while opening and decoding an image
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("Failed to decode image {path}: {reason}")]
    DecodeError { path: PathBuf, reason: String },

    #[error("Image is empty or corrupted: {path}")]
    EmptyImage { path: PathBuf },

    #[error("Failed to open image file {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that occur during image hashing
#[derive(Error, Debug)]
pub enum HashError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Invalid hash string '{input}': {reason}")]
    InvalidHex { input: String, reason: String },

    #[error("Invalid hash size {size} (must be a multiple of 4 between 4 and 64)")]
    InvalidHashSize { size: u32 },

    #[error("Hash computation failed: {0}")]
    ComputationFailed(String),
}

/// Errors that occur while comparing images or hashes
#[derive(Error, Debug)]
pub enum CompareError {
    #[error(transparent)]
    Image(#[from] ImageError),

    #[error("Image dimensions differ: {left_width}x{left_height} vs {right_width}x{right_height}")]
    DimensionMismatch {
        left_width: u32,
        left_height: u32,
        right_width: u32,
        right_height: u32,
    },

    #[error("Image {width}x{height} is smaller than the {window}x{window} comparison window")]
    ImageTooSmall { width: u32, height: u32, window: usize },

    #[error("Hash widths differ: {left} bits vs {right} bits")]
    BitWidthMismatch { left: u32, right: u32 },
}

/// Errors that occur during label detection
#[derive(Error, Debug)]
pub enum LabelError {
    #[error("Label detection needs an S3 object, got local file {path}")]
    UnsupportedReference { path: PathBuf },

    #[error("Invalid label request: {0}")]
    InvalidRequest(String),

    #[error("Failed to start the vision client runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Vision service call failed: {0}")]
    Service(String),
}

/// Convenience Result type alias
pub type Result<T> = std::result::Result<T, TeroError>;
