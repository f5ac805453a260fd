//! Settings bootstrap.
//!
//! A YAML file supplies the deployment-specific values; everything else is
//! fixed here. The result is an immutable [`Settings`] built once at startup
//! and handed to whatever needs it.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// File name looked up when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "settings.yaml";

const SECRET_KEY: &str = "A-random-secret-key!";
const DATABASE_FILE: &str = "db.sqlite3";
const INSTALLED_APPS: [&str; 5] = ["auth", "contenttypes", "ftpd", "core", "plugins"];

/// The settings file as written on disk
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SettingsFile {
    #[serde(rename = "FTPD")]
    pub ftpd: FtpdSettings,

    #[serde(rename = "TELEGRAM_BOT")]
    pub telegram_bot: TelegramBotSettings,

    #[serde(rename = "AWS", default)]
    pub aws: AwsSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FtpdSettings {
    #[serde(rename = "HOST")]
    pub host: String,
    #[serde(rename = "PORT")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TelegramBotSettings {
    #[serde(rename = "TOKEN")]
    pub token: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct AwsSettings {
    /// Region for the vision client; the AWS environment decides when unset
    #[serde(rename = "REGION", default)]
    pub region: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DatabaseSettings {
    pub engine: String,
    pub name: PathBuf,
}

/// Resolved application settings
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Settings {
    pub debug: bool,
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub database: DatabaseSettings,
    pub installed_apps: Vec<String>,
    pub ftpd: FtpdSettings,
    #[serde(skip_serializing)]
    pub telegram_bot: TelegramBotSettings,
    pub aws: AwsSettings,
    /// Directory holding the settings file
    pub base_dir: PathBuf,
}

impl Settings {
    /// Load settings from the YAML file at `path`.
    ///
    /// Paths derived from the file (the database) are placed next to it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let file: SettingsFile =
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        info!(path = %path.display(), "loaded settings");
        Ok(Self::from_file(file, base_dir))
    }

    /// Combine a parsed settings file with the fixed settings
    pub fn from_file(file: SettingsFile, base_dir: PathBuf) -> Self {
        Self {
            debug: true,
            secret_key: SECRET_KEY.to_string(),
            database: DatabaseSettings {
                engine: "sqlite3".to_string(),
                name: base_dir.join(DATABASE_FILE),
            },
            installed_apps: INSTALLED_APPS.iter().map(|s| s.to_string()).collect(),
            ftpd: file.ftpd,
            telegram_bot: file.telegram_bot,
            aws: file.aws,
            base_dir,
        }
    }
}
