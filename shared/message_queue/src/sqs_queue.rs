//! SQS queue backend
//!
//! Binds to a standard SQS queue by name. The queue URL is resolved once, when
//! the backend is constructed, so a missing queue is reported before any
//! message operation is attempted.

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_sqs::operation::get_queue_url::GetQueueUrlError;
use aws_sdk_sqs::Client as SqsClient;
use tracing::{debug, warn};

use crate::{
    backend::{QueueBackend, QueueMessage},
    error::{QueueError, QueueResult},
};

/// SQS queue resolved by name
pub struct SqsQueue {
    sqs_client: Arc<SqsClient>,
    name: String,
    queue_url: String,
}

impl SqsQueue {
    /// Resolves the named queue
    ///
    /// # Arguments
    ///
    /// * `sqs_client` - Pre-configured SQS client, bound to the queue's region
    /// * `name` - Queue name
    ///
    /// # Errors
    ///
    /// Returns `QueueError::QueueNotFound` if no queue with that name exists, or
    /// `QueueError::GetQueueUrl` if the lookup itself fails
    pub async fn connect(sqs_client: Arc<SqsClient>, name: &str) -> QueueResult<Self> {
        let result = match sqs_client.get_queue_url().queue_name(name).send().await {
            Ok(result) => result,
            Err(e) => {
                let missing = e
                    .as_service_error()
                    .is_some_and(GetQueueUrlError::is_queue_does_not_exist);
                if missing {
                    return Err(QueueError::QueueNotFound(name.to_string()));
                }
                return Err(e.into());
            }
        };

        let queue_url = result
            .queue_url()
            .ok_or_else(|| QueueError::QueueNotFound(name.to_string()))?
            .to_string();

        debug!("Resolved queue '{}' to {}", name, queue_url);

        Ok(Self {
            sqs_client,
            name: name.to_string(),
            queue_url,
        })
    }

    /// Returns the resolved queue URL
    #[must_use]
    pub fn queue_url(&self) -> &str {
        &self.queue_url
    }
}

#[async_trait]
impl QueueBackend for SqsQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_body(&self, body: String) -> QueueResult<String> {
        let result = self
            .sqs_client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await?;

        result
            .message_id()
            .map(std::string::ToString::to_string)
            .ok_or_else(|| QueueError::SendRejected("no message ID returned".to_string()))
    }

    async fn receive(
        &self,
        max_messages: i32,
        wait_time_seconds: i32,
    ) -> QueueResult<Vec<QueueMessage>> {
        let result = self
            .sqs_client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(max_messages)
            .wait_time_seconds(wait_time_seconds)
            .send()
            .await?;

        let messages = result
            .messages()
            .iter()
            .filter_map(|msg| {
                let message_id = msg.message_id().unwrap_or_default().to_string();
                let Some(receipt_handle) = msg.receipt_handle() else {
                    warn!("Skipping message {} without receipt handle", message_id);
                    return None;
                };

                Some(QueueMessage {
                    body: msg.body().unwrap_or_default().to_string(),
                    receipt_handle: receipt_handle.to_string(),
                    message_id,
                })
            })
            .collect();

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> QueueResult<()> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await?;

        Ok(())
    }
}
