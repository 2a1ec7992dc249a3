//! Trolley CLI configuration

use std::path::PathBuf;

use clap::{Args, Parser};

/// Log output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "warn")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Trolley configuration
#[derive(Debug, Parser)]
#[command(
    name = "trolley",
    about = "Replay a cart session against a menu and print the payment summary",
    long_about = None
)]
pub struct Config {
    /// Directory holding `menus/`, `policies/` and `sessions/`
    #[arg(long, env = "TROLLEY_FIXTURES", default_value = "./fixtures")]
    pub fixtures: PathBuf,

    /// Menu fixture name
    #[arg(long, env = "TROLLEY_MENU", default_value = "demo")]
    pub menu: String,

    /// Session fixture name; defaults to the menu name
    #[arg(long, env = "TROLLEY_SESSION")]
    pub session: Option<String>,

    /// Pricing policy fixture name; the built-in policy is used when absent
    #[arg(long, env = "TROLLEY_POLICY")]
    pub policy: Option<String>,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Session fixture to replay.
    pub fn session_name(&self) -> &str {
        self.session.as_deref().unwrap_or(&self.menu)
    }
}
