//! # CLI Module
//!
//! Command-line interface for tero.
//!
//! ## Usage
//! ```bash
//! # Serve the web entry point
//! tero runserver 127.0.0.1:8000
//!
//! # Validate the settings file
//! tero --settings app/settings.yaml check
//!
//! # Image helpers
//! tero labels s3://tero-test/1.jpg --max-labels 2
//! tero ssim a.jpg b.jpg
//! tero hash photo.jpg --algorithm perceptual
//! tero compare-hash 8f373714acfcf4d0 8f373714acfcf4d1
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tero::config::{Settings, DEFAULT_SETTINGS_FILE};
use tero::core::hasher::{load_hash, make_hash_with, HashAlgorithmKind, HasherConfig, DEFAULT_HASH_SIZE};
use tero::core::labels::{detect_labels, ImageReference, Label, LabelRequest, RekognitionDetector};
use tero::core::similarity::{compare_hash, compare_ssim};
use tero::error::{ConfigError, Result, TeroError};
use tero::web::{self, AppState};

/// tero - image analysis helpers
#[derive(Parser, Debug)]
#[command(name = "tero")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file
    #[arg(long, global = true, env = "TERO_SETTINGS", default_value = DEFAULT_SETTINGS_FILE)]
    settings: PathBuf,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the web server
    Runserver {
        /// Address and port to listen on
        #[arg(default_value = "127.0.0.1:8000")]
        addrport: String,
    },

    /// Load the settings file and print a summary
    Check,

    /// Detect labels on an S3 image (s3://bucket/key)
    Labels {
        /// Image reference
        image: ImageReference,

        /// How many labels to return
        #[arg(long, default_value = "5")]
        max_labels: u32,

        /// Only return labels with at least this confidence (0-100)
        #[arg(long, default_value = "80")]
        min_confidence: f32,

        /// AWS region (defaults to the settings file, then the AWS environment)
        #[arg(long)]
        region: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Structural similarity of two images (1.0 = identical)
    Ssim {
        a: PathBuf,
        b: PathBuf,
    },

    /// Compute the perceptual hash of an image
    Hash {
        path: PathBuf,

        /// Hash algorithm to use
        #[arg(short, long, default_value = "difference")]
        algorithm: Algorithm,

        /// Hash size (the hash has size*size bits)
        #[arg(long, default_value_t = DEFAULT_HASH_SIZE)]
        hash_size: u32,
    },

    /// Similarity of two hex hashes (1.0 = identical)
    CompareHash {
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Average Hash - Fast, good for exact duplicates
    Average,
    /// Difference Hash - Good balance (default)
    Difference,
    /// Perceptual Hash - Most robust to edits
    Perceptual,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    tero::init_tracing(cli.verbose);

    match cli.command {
        Commands::Runserver { addrport } => run_server(&cli.settings, &addrport),
        Commands::Check => run_check(&cli.settings),
        Commands::Labels {
            image,
            max_labels,
            min_confidence,
            region,
            output,
        } => run_labels(
            &cli.settings,
            &image,
            LabelRequest::new(max_labels, min_confidence),
            region,
            output,
        ),
        Commands::Ssim { a, b } => {
            let score = compare_ssim(&a, &b)?;
            println!("{}", score);
            Ok(())
        }
        Commands::Hash {
            path,
            algorithm,
            hash_size,
        } => {
            let config = HasherConfig::new()
                .algorithm(algorithm.into())
                .hash_size(hash_size);
            let hash = make_hash_with(&path, &config)?;
            println!("{}", hash);
            Ok(())
        }
        Commands::CompareHash { first, second } => {
            let score = compare_hash(&load_hash(&first)?, &load_hash(&second)?)?;
            println!("{}", score);
            Ok(())
        }
    }
}

fn run_server(settings_path: &Path, addrport: &str) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let addr: SocketAddr = addrport.parse().map_err(|_| ConfigError::InvalidAddress {
        value: addrport.to_string(),
    })?;

    let state = Arc::new(AppState { settings });
    let runtime = tokio::runtime::Runtime::new().map_err(TeroError::Server)?;
    runtime.block_on(web::serve(state, addr))
}

fn run_check(settings_path: &Path) -> Result<()> {
    let settings = Settings::load(settings_path)?;
    let term = Term::stdout();

    term.write_line(&format!(
        "{} {}",
        style("✓").green().bold(),
        style(settings_path.display()).bold()
    ))
    .ok();
    term.write_line(&format!("  debug:          {}", settings.debug)).ok();
    term.write_line(&format!(
        "  database:       {} ({})",
        settings.database.name.display(),
        settings.database.engine
    ))
    .ok();
    term.write_line(&format!(
        "  installed apps: {}",
        settings.installed_apps.join(", ")
    ))
    .ok();
    term.write_line(&format!(
        "  ftpd:           {}:{}",
        settings.ftpd.host, settings.ftpd.port
    ))
    .ok();
    term.write_line(&format!(
        "  telegram token: {}",
        style(redact(&settings.telegram_bot.token)).dim()
    ))
    .ok();
    term.write_line(&format!(
        "  aws region:     {}",
        settings.aws.region.as_deref().unwrap_or("(from environment)")
    ))
    .ok();

    Ok(())
}

fn run_labels(
    settings_path: &Path,
    image: &ImageReference,
    request: LabelRequest,
    region: Option<String>,
    output: OutputFormat,
) -> Result<()> {
    let region = match region {
        Some(region) => Some(region),
        None => settings_region(settings_path)?,
    };

    let detector = RekognitionDetector::from_env(region.as_deref())?;
    let labels = detect_labels(&detector, image, &request)?;

    match output {
        OutputFormat::Pretty => print_pretty_labels(&Term::stdout(), image, &labels),
        OutputFormat::Json => print_json_labels(&labels)?,
    }

    Ok(())
}

/// Region from the settings file. A missing file means "no region"; a broken
/// one is still an error.
fn settings_region(settings_path: &Path) -> std::result::Result<Option<String>, ConfigError> {
    match Settings::load(settings_path) {
        Ok(settings) => Ok(settings.aws.region),
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

fn print_pretty_labels(term: &Term, image: &ImageReference, labels: &[Label]) {
    term.write_line(&format!("{}", style(image).bold())).ok();

    if labels.is_empty() {
        term.write_line(&format!("  {}", style("No labels detected").dim()))
            .ok();
        return;
    }

    for label in labels {
        term.write_line(&format!(
            "  {:<24} {}",
            label.name,
            style(format!("{:.1}%", label.confidence)).cyan()
        ))
        .ok();
    }
}

fn print_json_labels(labels: &[Label]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(labels)?);
    Ok(())
}

/// Keep the first few characters of a secret
fn redact(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}…", visible)
}
