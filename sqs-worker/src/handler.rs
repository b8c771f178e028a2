//! Handler contract and registry
//!
//! A handler performs the work for one message. Handlers are built once at
//! startup by a factory looked up in a [`HandlerRegistry`] under the locator
//! named in the configuration, and receive the `[worker]` options.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::info;

use crate::{
    config::WorkerOptions,
    types::{WorkerError, WorkerResult},
};

/// Why a handler did not complete
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Transient failure; the message is kept and delivered again later
    #[error("transient failure: {0:#}")]
    Retryable(anyhow::Error),

    /// Any other failure; the message is logged and deleted
    #[error("{0:#}")]
    Fatal(anyhow::Error),
}

impl HandlerError {
    /// Wraps an error as transient
    pub fn retryable(err: impl Into<anyhow::Error>) -> Self {
        Self::Retryable(err.into())
    }

    /// Wraps an error as fatal
    pub fn fatal(err: impl Into<anyhow::Error>) -> Self {
        Self::Fatal(err.into())
    }

    /// Whether the message should be left for redelivery
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Retryable(_))
    }
}

impl From<anyhow::Error> for HandlerError {
    fn from(err: anyhow::Error) -> Self {
        Self::Fatal(err)
    }
}

/// Result of handling one message
pub type HandlerResult = Result<(), HandlerError>;

/// Performs the work carried by one message
#[async_trait]
pub trait Handler: Send + Sync {
    /// Handles one call
    ///
    /// # Errors
    ///
    /// Returns `HandlerError::Retryable` to keep the message for redelivery, or
    /// `HandlerError::Fatal` to log and drop it
    async fn handle(&self, args: Vec<Value>, kwargs: Map<String, Value>) -> HandlerResult;
}

/// Builds a handler from the `[worker]` options
pub type HandlerFactory =
    Box<dyn Fn(&WorkerOptions) -> anyhow::Result<Arc<dyn Handler>> + Send + Sync>;

/// Locator of the built-in [`LogHandler`]
pub const LOG_HANDLER: &str = "sqs_worker.handlers:log";

/// Named handler factories
#[derive(Default)]
pub struct HandlerRegistry {
    factories: BTreeMap<String, HandlerFactory>,
}

impl HandlerRegistry {
    /// Creates an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in handlers
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(LOG_HANDLER, |options| {
            Ok(Arc::new(LogHandler::new(options)) as Arc<dyn Handler>)
        });
        registry
    }

    /// Registers a factory under `locator`, replacing any previous one
    pub fn register<F>(&mut self, locator: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&WorkerOptions) -> anyhow::Result<Arc<dyn Handler>> + Send + Sync + 'static,
    {
        self.factories.insert(locator.into(), Box::new(factory));
        self
    }

    /// Whether a factory is registered under `locator`
    #[must_use]
    pub fn contains(&self, locator: &str) -> bool {
        self.factories.contains_key(locator)
    }

    /// Builds the handler registered under `locator`
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::InvalidLocator` if the locator is malformed,
    /// `WorkerError::UnknownHandler` if nothing is registered under it, or
    /// `WorkerError::HandlerFactory` if the factory fails
    pub fn resolve(
        &self,
        locator: &str,
        options: &WorkerOptions,
    ) -> WorkerResult<Arc<dyn Handler>> {
        match locator.split_once(':') {
            Some((module, expression)) if !module.is_empty() && !expression.is_empty() => {}
            _ => return Err(WorkerError::InvalidLocator(locator.to_string())),
        }

        let factory = self
            .factories
            .get(locator)
            .ok_or_else(|| WorkerError::UnknownHandler(locator.to_string()))?;

        factory(options).map_err(|e| WorkerError::HandlerFactory {
            locator: locator.to_string(),
            source: e.into(),
        })
    }
}

/// Logs every call it receives
#[derive(Debug, Clone)]
pub struct LogHandler {
    label: String,
}

impl LogHandler {
    /// Creates the handler; the optional `label` option prefixes each line
    #[must_use]
    pub fn new(options: &WorkerOptions) -> Self {
        Self {
            label: options
                .get("label")
                .cloned()
                .unwrap_or_else(|| "message".to_string()),
        }
    }
}

#[async_trait]
impl Handler for LogHandler {
    async fn handle(&self, args: Vec<Value>, kwargs: Map<String, Value>) -> HandlerResult {
        let args = Value::Array(args);
        let kwargs = Value::Object(kwargs);
        info!("{}: args={} kwargs={}", self.label, args, kwargs);
        Ok(())
    }
}
