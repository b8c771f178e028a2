use async_trait::async_trait;

use crate::error::QueueResult;

/// A message as received from the queue, body left undecoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// The raw message body
    pub body: String,
    /// Receipt handle for acknowledging the message
    pub receipt_handle: String,
    /// Message ID
    pub message_id: String,
}

/// Operations the worker and producer need from a queue service
#[async_trait]
pub trait QueueBackend: Send + Sync {
    /// Name of the queue this backend is bound to
    fn name(&self) -> &str;

    /// Sends one message with the given body
    ///
    /// # Returns
    ///
    /// The message ID assigned by the queue
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the queue does not accept the message
    async fn send_body(&self, body: String) -> QueueResult<String>;

    /// Receives up to `max_messages` messages, waiting up to `wait_time_seconds`
    /// for one to arrive
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the receive operation fails
    async fn receive(
        &self,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> QueueResult<Vec<QueueMessage>>;

    /// Deletes a received message so it is not delivered again
    ///
    /// # Errors
    ///
    /// Returns `QueueError` if the delete operation fails
    async fn delete(&self, receipt_handle: &str) -> QueueResult<()>;
}
