//! Producer for enqueueing calls
//!
//! Each call is encoded as one [`Envelope`] and submitted as one message.
//! There is no batching and no retry beyond what the SQS client does itself.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::{
    backend::QueueBackend,
    client::sqs_client,
    envelope::Envelope,
    error::QueueResult,
    sqs_queue::SqsQueue,
};

/// Enqueues calls on a single queue
#[derive(Clone)]
pub struct Producer {
    queue: Arc<dyn QueueBackend>,
}

impl Producer {
    /// Creates a producer writing to the given queue backend
    #[must_use]
    pub fn new(queue: Arc<dyn QueueBackend>) -> Self {
        Self { queue }
    }

    /// Connects to the named SQS queue in `region`
    ///
    /// # Arguments
    ///
    /// * `name` - Queue name
    /// * `region` - AWS region hosting the queue
    /// * `endpoint_url` - Optional endpoint override, e.g. `LocalStack`
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` if the queue does not exist
    pub async fn connect(
        name: &str,
        region: &str,
        endpoint_url: Option<&str>,
    ) -> QueueResult<Self> {
        let client = Arc::new(sqs_client(region, endpoint_url).await);
        let queue = SqsQueue::connect(client, name).await?;

        Ok(Self::new(Arc::new(queue)))
    }

    /// Name of the target queue
    #[must_use]
    pub fn queue_name(&self) -> &str {
        self.queue.name()
    }

    /// Sends one envelope as one message
    ///
    /// # Returns
    ///
    /// The message ID assigned by the queue
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if encoding fails or the queue rejects the message
    pub async fn enqueue(&self, envelope: &Envelope) -> QueueResult<String> {
        let body = envelope.to_body()?;
        let message_id = self.queue.send_body(body).await?;

        tracing::debug!(
            "Enqueued message {} on '{}' ({} args, {} kwargs)",
            message_id,
            self.queue.name(),
            envelope.args.len(),
            envelope.kwargs.len()
        );

        Ok(message_id)
    }

    /// Sends a call with the given positional and keyword arguments
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if encoding fails or the queue rejects the message
    pub async fn call(
        &self,
        args: Vec<Value>,
        kwargs: Map<String, Value>,
    ) -> QueueResult<String> {
        self.enqueue(&Envelope { args, kwargs }).await
    }

    /// Forwards an already-encoded body unchanged
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the queue rejects the message
    pub async fn forward_raw(&self, body: &str) -> QueueResult<String> {
        self.queue.send_body(body.to_string()).await
    }
}
