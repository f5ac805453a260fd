//! # tero
//!
//! Image analysis helpers with a minimal web bootstrap.
//!
//! ## Architecture
//! Two independent pieces:
//! - `core` - Stateless image helpers: label detection, SSIM, perceptual hashes
//! - `config` + `web` - Settings loaded from YAML and a single-route web server
//! - `error` - Error types shared by both

pub mod config;
pub mod core;
pub mod error;
pub mod web;

// Re-export commonly used types at the crate root
pub use error::{Result, TeroError};

/// Initialize tracing for the application
///
/// `RUST_LOG` decides the filter unless `verbose` forces debug output.
/// Called once by the binary entry point.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    // A subscriber may already be installed (e.g. by an embedding application)
    let _ = tracing::subscriber::set_global_default(subscriber);
}
