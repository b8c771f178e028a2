//! Error types for worker construction and polling

use message_queue::QueueError;
use thiserror::Error;

/// Result type alias for worker operations
pub type WorkerResult<T> = Result<T, WorkerError>;

/// Errors raised while building or running the worker
#[derive(Error, Debug)]
pub enum WorkerError {
    /// Queue operation failed
    #[error(transparent)]
    Queue(#[from] QueueError),

    /// Handler locator is not of the form `module:expression`
    #[error("Invalid handler locator '{0}', expected 'module:expression'")]
    InvalidLocator(String),

    /// No factory is registered under the locator
    #[error("No handler registered for '{0}'")]
    UnknownHandler(String),

    /// The handler factory refused the worker options
    #[error("Failed to construct handler '{locator}'")]
    HandlerFactory {
        /// Locator of the failing factory
        locator: String,
        /// Factory error
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
