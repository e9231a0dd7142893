//! Configuration management for the leadchat gateway
//!
//! Precedence, highest first: command-line flags, environment variables, the
//! TOML config file, built-in defaults.

pub mod file;

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::Result;
use file::ConfigFile;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Default service account file, relative to the working directory
pub const DEFAULT_CREDENTIALS: &str = "creds.json";

/// Default worksheet title
pub const DEFAULT_WORKSHEET: &str = "Sheet1";

/// Default CSV fallback file, relative to the working directory
pub const DEFAULT_LEADS_FILE: &str = "leads.csv";

/// Default timeout for token and spreadsheet requests
pub const DEFAULT_LEADS_TIMEOUT: Duration = Duration::from_secs(15);

/// Default timeout for speech synthesis requests
pub const DEFAULT_SPEECH_TIMEOUT: Duration = Duration::from_secs(60);

/// Gateway configuration
#[derive(Debug)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Lead storage configuration
    pub leads: LeadsConfig,

    /// Text-to-speech configuration
    pub speech: SpeechConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to listen on
    pub port: u16,

    /// Directory with `index.html` and widget assets; `None` serves the built-in page
    pub static_dir: Option<PathBuf>,
}

/// Lead storage configuration
#[derive(Debug, Clone)]
pub struct LeadsConfig {
    /// Service account JSON used for the spreadsheet
    pub credentials: PathBuf,

    /// Spreadsheet URL or ID; `None` disables the remote backend
    pub spreadsheet: Option<String>,

    /// Worksheet title inside the spreadsheet
    pub worksheet: String,

    /// CSV file used when the spreadsheet is unavailable
    pub file: PathBuf,

    /// Bound on each token and spreadsheet request
    pub timeout: Duration,
}

/// Text-to-speech configuration
#[derive(Debug)]
pub struct SpeechConfig {
    /// API key (from `GOOGLE_API_KEY`); `None` disables synthesis
    pub api_key: Option<SecretString>,

    /// Model identifier
    pub model: String,

    /// Prebuilt voice name; `None` uses the model default
    pub voice: Option<String>,

    /// Bound on each synthesis request
    pub timeout: Duration,
}

/// Overrides supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Port override
    pub port: Option<u16>,

    /// Static directory override
    pub static_dir: Option<PathBuf>,

    /// Explicit config file; errors in it are fatal
    pub config_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the environment and config file
    ///
    /// # Errors
    ///
    /// Returns error if an explicitly requested config file cannot be loaded
    pub fn load(options: &LoadOptions) -> Result<Self> {
        let explicit = options
            .config_path
            .clone()
            .or_else(|| std::env::var("LEADCHAT_CONFIG").ok().map(PathBuf::from));

        let file = match explicit {
            Some(path) => file::read_config_file(&path)?,
            None => file::load_config_file(),
        };

        Ok(Self::from_sources(options, file, |key| std::env::var(key).ok()))
    }

    /// Merge already-loaded sources; `env` looks up environment variables
    pub fn from_sources(
        options: &LoadOptions,
        file: ConfigFile,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let env_port = env("LEADCHAT_PORT")
            .or_else(|| env("PORT"))
            .and_then(|s| s.parse().ok());

        let server = ServerConfig {
            port: options
                .port
                .or(env_port)
                .or(file.server.port)
                .unwrap_or(DEFAULT_PORT),
            static_dir: options
                .static_dir
                .clone()
                .or_else(|| env("LEADCHAT_STATIC_DIR").map(PathBuf::from))
                .or(file.server.static_dir),
        };

        let leads = LeadsConfig {
            credentials: env("LEADCHAT_CREDENTIALS")
                .map(PathBuf::from)
                .or(file.leads.credentials)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIALS)),
            spreadsheet: env("LEADCHAT_SPREADSHEET")
                .or(file.leads.spreadsheet)
                .filter(|s| !s.trim().is_empty()),
            worksheet: env("LEADCHAT_WORKSHEET")
                .or(file.leads.worksheet)
                .unwrap_or_else(|| DEFAULT_WORKSHEET.to_string()),
            file: env("LEADCHAT_LEADS_FILE")
                .map(PathBuf::from)
                .or(file.leads.file)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEADS_FILE)),
            timeout: timeout_from(
                env("LEADCHAT_LEADS_TIMEOUT_SECS"),
                file.leads.timeout_secs,
                DEFAULT_LEADS_TIMEOUT,
            ),
        };

        let speech = SpeechConfig {
            api_key: env("GOOGLE_API_KEY")
                .or(file.speech.api_key)
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
            model: env("LEADCHAT_TTS_MODEL")
                .or(file.speech.model)
                .unwrap_or_else(|| crate::speech::DEFAULT_MODEL.to_string()),
            voice: env("LEADCHAT_TTS_VOICE").or(file.speech.voice),
            timeout: timeout_from(
                env("LEADCHAT_TTS_TIMEOUT_SECS"),
                file.speech.timeout_secs,
                DEFAULT_SPEECH_TIMEOUT,
            ),
        };

        Self {
            server,
            leads,
            speech,
        }
    }
}

/// Seconds from the environment, then the file; zero or unparsable values are ignored
fn timeout_from(env: Option<String>, file: Option<u64>, default: Duration) -> Duration {
    env.and_then(|s| s.trim().parse().ok())
        .filter(|&secs: &u64| secs > 0)
        .or(file.filter(|&secs| secs > 0))
        .map_or(default, Duration::from_secs)
}
