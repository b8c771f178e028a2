//! Sequential worker
//!
//! Receives one message at a time, dispatches it to the handler and decides its
//! fate from the result:
//!
//! - success: the message is deleted;
//! - [`HandlerError::Retryable`]: the message is left alone and the queue
//!   delivers it again once its visibility timeout expires;
//! - [`HandlerError::Fatal`], a handler panic or an undecodable body: the error
//!   is logged, the raw payload goes to the message log (and the dead-letter
//!   queue, if configured), then the message is deleted.

mod outcome;

pub use outcome::Outcome;

use std::{any::Any, panic::AssertUnwindSafe, sync::Arc, time::Duration};

use futures::FutureExt;
use message_queue::{Envelope, Producer, QueueBackend, QueueMessage, SqsQueue};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::{
    audit::{MessageLog, TracingMessageLog},
    config::WorkerConfig,
    handler::{Handler, HandlerError, HandlerRegistry},
    types::{Environment, WorkerResult},
};

/// Pause after a failed receive or delete
const ERROR_DELAY: Duration = Duration::from_secs(1);

/// Receive settings for the polling loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Long-poll wait per receive, in seconds
    pub wait_time_seconds: i32,
    /// Pause after a receive that returned nothing
    pub poll_interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            wait_time_seconds: crate::config::DEFAULT_WAIT_TIME_SECONDS,
            poll_interval: Duration::ZERO,
        }
    }
}

/// Single-consumer worker with at most one message in flight
pub struct SequentialWorker {
    queue: Arc<dyn QueueBackend>,
    handler: Arc<dyn Handler>,
    message_log: Arc<dyn MessageLog>,
    dead_letter_queue: Option<Producer>,
    settings: PollSettings,
    shutdown_token: CancellationToken,
}

impl SequentialWorker {
    /// Creates a worker consuming `queue` with `handler`
    #[must_use]
    pub fn new(
        queue: Arc<dyn QueueBackend>,
        handler: Arc<dyn Handler>,
        settings: PollSettings,
    ) -> Self {
        Self {
            queue,
            handler,
            message_log: Arc::new(TracingMessageLog),
            dead_letter_queue: None,
            settings,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Replaces the destination of failed payloads
    #[must_use]
    pub fn with_message_log(mut self, message_log: Arc<dyn MessageLog>) -> Self {
        self.message_log = message_log;
        self
    }

    /// Forwards failed payloads to `dead_letter_queue` before deleting them
    #[must_use]
    pub fn with_dead_letter_queue(mut self, dead_letter_queue: Producer) -> Self {
        self.dead_letter_queue = Some(dead_letter_queue);
        self
    }

    /// Builds a worker from its configuration
    ///
    /// The handler is resolved before any queue is contacted.
    ///
    /// # Errors
    ///
    /// Returns `WorkerError` if the handler cannot be resolved or a queue does not exist
    pub async fn from_config(
        config: &WorkerConfig,
        env: &Environment,
        registry: &HandlerRegistry,
    ) -> WorkerResult<Self> {
        let handler = registry.resolve(&config.worker, &config.worker_options)?;
        info!("✅ Resolved handler {}", config.worker);

        let sqs_client = Arc::new(env.sqs_client(&config.region).await);
        let queue = SqsQueue::connect(Arc::clone(&sqs_client), &config.queue).await?;
        info!("✅ Connected to queue {} in {}", config.queue, config.region);

        let settings = PollSettings {
            wait_time_seconds: config.wait_time_seconds,
            poll_interval: config.poll_interval,
        };
        let mut worker = Self::new(Arc::new(queue), handler, settings);

        if let Some(name) = &config.dead_letter_queue {
            let dead_letters = SqsQueue::connect(sqs_client, name).await?;
            info!("✅ Connected to dead-letter queue {}", name);
            worker = worker.with_dead_letter_queue(Producer::new(Arc::new(dead_letters)));
        }

        Ok(worker)
    }

    /// Returns a clone of the shutdown token for external control
    #[must_use]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Polls until the shutdown token is cancelled
    ///
    /// A message being handled when the token fires is abandoned undeleted and
    /// will be delivered again.
    pub async fn run(&self) {
        info!("Starting sequential worker on queue {}", self.queue.name());

        while !self.shutdown_token.is_cancelled() {
            tokio::select! {
                result = self.poll_once() => match result {
                    Ok(Outcome::Empty) => self.pause(self.settings.poll_interval).await,
                    Ok(_) => {}
                    Err(e) => {
                        error!("Failed to poll queue {}: {}", self.queue.name(), e);
                        self.pause(ERROR_DELAY).await;
                    }
                },
                () = self.shutdown_token.cancelled() => {
                    info!("Sequential worker shutting down");
                    break;
                }
            }
        }

        info!("Sequential worker stopped");
    }

    /// Receives at most one message and handles it
    ///
    /// # Errors
    ///
    /// Returns `WorkerError::Queue` if receiving, deleting or dead-lettering
    /// fails; the message, if any, is then left for redelivery
    pub async fn poll_once(&self) -> WorkerResult<Outcome> {
        let mut messages = self
            .queue
            .receive(1, self.settings.wait_time_seconds)
            .await?;

        let Some(message) = messages.pop() else {
            return Ok(Outcome::Empty);
        };

        let outcome = self.process(message).await?;
        outcome.record();

        Ok(outcome)
    }

    async fn process(&self, message: QueueMessage) -> WorkerResult<Outcome> {
        debug!("Handling message {}", message.message_id);

        match self.dispatch(&message.body).await {
            Ok(()) => {}
            Err(HandlerError::Retryable(e)) => {
                warn!("Message {} will be retried: {:#}", message.message_id, e);
                return Ok(Outcome::Retried);
            }
            Err(HandlerError::Fatal(e)) => {
                error!("Handling message {} failed: {:?}", message.message_id, e);
                self.message_log.record(&message.body);

                if let Some(dead_letters) = &self.dead_letter_queue {
                    dead_letters.forward_raw(&message.body).await?;
                    info!(
                        "Forwarded message {} to {}",
                        message.message_id,
                        dead_letters.queue_name()
                    );
                }

                self.queue.delete(&message.receipt_handle).await?;
                return Ok(Outcome::Failed);
            }
        }

        self.queue.delete(&message.receipt_handle).await?;
        Ok(Outcome::Handled)
    }

    async fn dispatch(&self, body: &str) -> Result<(), HandlerError> {
        let envelope = Envelope::from_body(body).map_err(HandlerError::fatal)?;

        AssertUnwindSafe(self.handler.handle(envelope.args, envelope.kwargs))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| {
                Err(HandlerError::Fatal(anyhow::anyhow!(
                    "Handler panicked: {}",
                    panic_message(&*panic)
                )))
            })
    }

    async fn pause(&self, duration: Duration) {
        if duration.is_zero() {
            // Backends that answer without waiting would otherwise starve the runtime
            tokio::task::yield_now().await;
            return;
        }

        tokio::select! {
            () = sleep(duration) => {}
            () = self.shutdown_token.cancelled() => {}
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
