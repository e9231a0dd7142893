//! TOML configuration file loading
//!
//! Supports `~/.config/leadchat/config.toml` as a persistent config source.
//! All fields are optional: the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{Error, Result};

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerFileConfig,

    /// Lead storage configuration
    #[serde(default)]
    pub leads: LeadsFileConfig,

    /// Text-to-speech configuration
    #[serde(default)]
    pub speech: SpeechFileConfig,
}

/// Server configuration
#[derive(Debug, Default, Deserialize)]
pub struct ServerFileConfig {
    /// Port to listen on
    pub port: Option<u16>,

    /// Directory holding `index.html` and widget assets
    pub static_dir: Option<PathBuf>,
}

/// Lead storage configuration
#[derive(Debug, Default, Deserialize)]
pub struct LeadsFileConfig {
    /// Service account JSON path
    pub credentials: Option<PathBuf>,

    /// Spreadsheet URL or ID
    pub spreadsheet: Option<String>,

    /// Worksheet title
    pub worksheet: Option<String>,

    /// Local CSV file path
    pub file: Option<PathBuf>,

    /// Timeout for token and spreadsheet requests, in seconds
    pub timeout_secs: Option<u64>,
}

/// Text-to-speech configuration
#[derive(Debug, Default, Deserialize)]
pub struct SpeechFileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub voice: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Parse a config file at an explicit path
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed
pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
    let config = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConfigFile {
    let Some(path) = config_file_path() else {
        return ConfigFile::default();
    };

    if !path.exists() {
        return ConfigFile::default();
    }

    match read_config_file(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            ConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/leadchat/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("leadchat").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_partial_file() {
        let config: ConfigFile = toml::from_str(
            r#"
            [server]
            port = 8080

            [leads]
            spreadsheet = "https://docs.google.com/spreadsheets/d/abc/edit"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, Some(8080));
        assert!(config.server.static_dir.is_none());
        assert_eq!(
            config.leads.spreadsheet.as_deref(),
            Some("https://docs.google.com/spreadsheets/d/abc/edit")
        );
        assert!(config.speech.model.is_none());
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<ConfigFile>("[database]\nurl = \"x\"").is_err());
    }

    #[test]
    fn unreadable_explicit_path_is_config_error() {
        let err = read_config_file(Path::new("/nonexistent/leadchat.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
