//! Logging setup
//!
//! Console output is filtered by the configured `EnvFilter` directives. When a
//! message log file is configured, raw payloads of failed messages (the
//! [`MESSAGE_LOG_TARGET`] target) are also appended to that file, one per line.

use std::{fs::OpenOptions, path::PathBuf, str::FromStr, sync::Mutex};

use anyhow::Context;
use tracing::Level;
use tracing_subscriber::{
    filter::Targets, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::audit::MESSAGE_LOG_TARGET;
use crate::config::DEFAULT_LOG_FILTER;

/// Console log format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err("expected 'text' or 'json'".to_string()),
        }
    }
}

/// Logging configuration, installed once per process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// `EnvFilter` directives for console output
    pub filter: String,
    /// Console output format
    pub format: LogFormat,
    /// File receiving raw payloads of failed messages
    pub message_log: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_LOG_FILTER.to_string(),
            format: LogFormat::Text,
            message_log: None,
        }
    }
}

impl LoggingConfig {
    /// Installs the global tracing subscriber
    ///
    /// # Errors
    ///
    /// Returns an error if the filter is invalid, the message log cannot be
    /// opened, or a global subscriber is already installed
    pub fn init(&self) -> anyhow::Result<()> {
        let filter = EnvFilter::try_new(&self.filter)
            .with_context(|| format!("Invalid log filter '{}'", self.filter))?;

        let console = match self.format {
            LogFormat::Text => fmt::layer().boxed(),
            LogFormat::Json => fmt::layer().json().boxed(),
        };

        let message_log = match &self.message_log {
            Some(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open message log {}", path.display()))?;

                Some(
                    fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false)
                        .with_level(false)
                        .with_filter(Targets::new().with_target(MESSAGE_LOG_TARGET, Level::INFO)),
                )
            }
            None => None,
        };

        tracing_subscriber::registry()
            .with(console.with_filter(filter))
            .with(message_log)
            .try_init()
            .context("Failed to install tracing subscriber")?;

        Ok(())
    }
}
