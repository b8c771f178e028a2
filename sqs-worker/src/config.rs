//! Worker configuration file
//!
//! An INI file with a required `[container]` section describing the queue, the
//! handler and logging, and an optional `[worker]` section whose pairs are
//! handed to the handler factory untouched:
//!
//! ```ini
//! [container]
//! queue = jobs
//! region = us-east-1
//! worker = myapp.jobs:greeter
//! loggers = info,sqs_worker=debug
//!
//! [worker]
//! greeting = hello
//! ```

use std::{collections::BTreeMap, path::Path, path::PathBuf, str::FromStr, time::Duration};

use ini::{Ini, Properties};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::logging::{LogFormat, LoggingConfig};

/// Section describing the queue, handler and logging
pub const CONTAINER_SECTION: &str = "container";
/// Section passed through to the handler factory
pub const WORKER_SECTION: &str = "worker";

/// Region used when `region` is not set
pub const DEFAULT_REGION: &str = "us-east-1";
/// Long-poll wait used when `wait` is not set
pub const DEFAULT_WAIT_TIME_SECONDS: i32 = 20;
/// Longest long-poll wait SQS accepts
pub const MAX_WAIT_TIME_SECONDS: i32 = 20;
/// Log filter used when `loggers` is not set
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Options handed to the handler factory
pub type WorkerOptions = BTreeMap<String, String>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read or parsed
    #[error("Failed to read configuration file {path}")]
    Read {
        /// Path of the configuration file
        path: String,
        /// Underlying error
        #[source]
        source: ini::Error,
    },

    /// The configuration text could not be parsed
    #[error("Failed to parse configuration")]
    Parse(#[from] ini::ParseError),

    /// A required section is absent
    #[error("Missing [{0}] section")]
    MissingSection(&'static str),

    /// A required option is absent or empty
    #[error("Missing required option '{0}' in [container]")]
    MissingOption(&'static str),

    /// An option has a value that cannot be used
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        /// Option name
        key: &'static str,
        /// Offending value
        value: String,
        /// Why the value was refused
        reason: String,
    },
}

/// Settings for one sequential worker process
#[derive(Debug, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Name of the queue to consume
    pub queue: String,
    /// AWS region hosting the queue
    pub region: String,
    /// Handler locator, `module:expression`
    pub worker: String,
    /// Long-poll wait per receive, in seconds
    pub wait_time_seconds: i32,
    /// Pause after a receive that returned nothing
    pub poll_interval: Duration,
    /// Queue receiving payloads of failed messages
    pub dead_letter_queue: Option<String>,
    /// Logging setup
    pub logging: LoggingConfig,
    /// `[worker]` section, passed to the handler factory
    pub worker_options: WorkerOptions,
    /// `[container]` options that were not recognised
    pub unexpected_options: Vec<String>,
}

impl WorkerConfig {
    /// Loads the configuration from an INI file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value is missing or invalid
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut container = ini
            .section(Some(CONTAINER_SECTION))
            .map(lowercase_keys)
            .ok_or(ConfigError::MissingSection(CONTAINER_SECTION))?;

        let queue = take_required(&mut container, "queue")?;
        let region = container
            .remove("region")
            .filter(|region| !region.is_empty())
            .unwrap_or_else(|| DEFAULT_REGION.to_string());
        let worker = take_required(&mut container, "worker")?;

        let wait_time_seconds = container
            .remove("wait")
            .map_or(Ok(DEFAULT_WAIT_TIME_SECONDS), |value| parse_wait(&value))?;
        let poll_interval = container
            .remove("poll")
            .map_or(Ok(Duration::ZERO), |value| parse_poll(&value))?;
        let dead_letter_queue = container
            .remove("dead_letter_queue")
            .filter(|name| !name.is_empty());

        let logging = LoggingConfig {
            filter: container
                .remove("loggers")
                .map_or(Ok(DEFAULT_LOG_FILTER.to_string()), |value| {
                    parse_filter(value)
                })?,
            format: container
                .remove("log_format")
                .map_or(Ok(LogFormat::Text), |value| {
                    value.parse::<LogFormat>().map_err(|reason| ConfigError::InvalidValue {
                        key: "log_format",
                        value,
                        reason,
                    })
                })?,
            message_log: container
                .remove("message_log")
                .filter(|path| !path.is_empty())
                .map(PathBuf::from),
        };

        let worker_options = ini
            .section(Some(WORKER_SECTION))
            .map(lowercase_keys)
            .unwrap_or_default();

        Ok(Self {
            queue,
            region,
            worker,
            wait_time_seconds,
            poll_interval,
            dead_letter_queue,
            logging,
            worker_options,
            unexpected_options: container.into_keys().collect(),
        })
    }
}

impl FromStr for WorkerConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_ini(&Ini::load_from_str(s)?)
    }
}

fn lowercase_keys(section: &Properties) -> BTreeMap<String, String> {
    section
        .iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value.trim().to_string()))
        .collect()
}

fn take_required(
    section: &mut BTreeMap<String, String>,
    key: &'static str,
) -> Result<String, ConfigError> {
    section
        .remove(key)
        .filter(|value| !value.is_empty())
        .ok_or(ConfigError::MissingOption(key))
}

fn parse_wait(value: &str) -> Result<i32, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: "wait",
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let wait: i32 = value
        .parse()
        .map_err(|_| invalid("expected a whole number of seconds"))?;
    if !(0..=MAX_WAIT_TIME_SECONDS).contains(&wait) {
        return Err(invalid("must be between 0 and 20 seconds"));
    }

    Ok(wait)
}

fn parse_poll(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidValue {
        key: "poll",
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let seconds: f64 = value.parse().map_err(|_| invalid("expected seconds"))?;
    Duration::try_from_secs_f64(seconds).map_err(|_| invalid("must be a non-negative duration"))
}

fn parse_filter(value: String) -> Result<String, ConfigError> {
    match EnvFilter::try_new(&value) {
        Ok(_) => Ok(value),
        Err(e) => Err(ConfigError::InvalidValue {
            key: "loggers",
            value,
            reason: e.to_string(),
        }),
    }
}
