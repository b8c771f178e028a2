//! In-memory queue backend
//!
//! Stands in for SQS in tests. Received messages stay in flight until they are
//! deleted or [`MemoryQueue::expire_in_flight`] returns them to the queue, which
//! plays the part of the visibility timeout. Receives never block.

use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::{
    backend::{QueueBackend, QueueMessage},
    error::{QueueError, QueueResult},
};

#[derive(Default)]
struct State {
    next_id: u64,
    pending: VecDeque<(String, String)>,
    in_flight: BTreeMap<String, (String, String)>,
    deleted: Vec<String>,
    receives: usize,
    reject_sends: bool,
}

/// Queue held in process memory
#[derive(Default)]
pub struct MemoryQueue {
    name: String,
    state: Mutex<State>,
}

impl MemoryQueue {
    /// Creates an empty queue with the given name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes subsequent sends fail as if the queue refused the write
    pub fn reject_sends(&self, reject: bool) {
        self.state().reject_sends = reject;
    }

    /// Returns every in-flight message to the front of the queue, in receive order
    pub fn expire_in_flight(&self) {
        let mut state = self.state();
        let expired = std::mem::take(&mut state.in_flight);
        for (_, message) in expired.into_iter().rev() {
            state.pending.push_front(message);
        }
    }

    /// Number of messages waiting to be received
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.state().pending.len()
    }

    /// Bodies of messages waiting to be received, oldest first
    #[must_use]
    pub fn pending_bodies(&self) -> Vec<String> {
        self.state()
            .pending
            .iter()
            .map(|(_, body)| body.clone())
            .collect()
    }

    /// Number of messages received but neither deleted nor expired
    #[must_use]
    pub fn in_flight_len(&self) -> usize {
        self.state().in_flight.len()
    }

    /// Bodies of deleted messages, in deletion order
    #[must_use]
    pub fn deleted_bodies(&self) -> Vec<String> {
        self.state().deleted.clone()
    }

    /// Number of receive calls made so far
    #[must_use]
    pub fn receive_count(&self) -> usize {
        self.state().receives
    }
}

#[async_trait]
impl QueueBackend for MemoryQueue {
    fn name(&self) -> &str {
        &self.name
    }

    async fn send_body(&self, body: String) -> QueueResult<String> {
        let mut state = self.state();
        if state.reject_sends {
            return Err(QueueError::SendRejected(format!(
                "queue '{}' refused the write",
                self.name
            )));
        }

        state.next_id += 1;
        let message_id = format!("msg-{}", state.next_id);
        state.pending.push_back((message_id.clone(), body));

        Ok(message_id)
    }

    async fn receive(
        &self,
        max_messages: i32,
        _wait_time_seconds: i32,
    ) -> QueueResult<Vec<QueueMessage>> {
        let mut state = self.state();
        state.receives += 1;

        let mut messages = Vec::new();
        while messages.len() < usize::try_from(max_messages).unwrap_or(0) {
            let Some((message_id, body)) = state.pending.pop_front() else {
                break;
            };

            state.next_id += 1;
            // Zero-padded so in-flight order follows receive order
            let receipt_handle = format!("receipt-{:020}", state.next_id);
            state
                .in_flight
                .insert(receipt_handle.clone(), (message_id.clone(), body.clone()));

            messages.push(QueueMessage {
                body,
                receipt_handle,
                message_id,
            });
        }

        Ok(messages)
    }

    async fn delete(&self, receipt_handle: &str) -> QueueResult<()> {
        let mut state = self.state();
        let (_, body) = state
            .in_flight
            .remove(receipt_handle)
            .ok_or_else(|| QueueError::UnknownReceiptHandle(receipt_handle.to_string()))?;
        state.deleted.push(body);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_receive_moves_message_in_flight() {
        let queue = MemoryQueue::new("jobs");
        queue.send_body("a".to_string()).await.unwrap();
        queue.send_body("b".to_string()).await.unwrap();

        let received = queue.receive(1, 20).await.unwrap();

        assert_eq!(received.len(), 1);
        assert_eq!(received[0].body, "a");
        assert_eq!(queue.pending_len(), 1);
        assert_eq!(queue.in_flight_len(), 1);
    }

    #[tokio::test]
    async fn test_empty_receive_returns_nothing() {
        let queue = MemoryQueue::new("jobs");

        assert!(queue.receive(1, 20).await.unwrap().is_empty());
        assert_eq!(queue.receive_count(), 1);
    }

    #[tokio::test]
    async fn test_delete_is_single_use() {
        let queue = MemoryQueue::new("jobs");
        queue.send_body("a".to_string()).await.unwrap();
        let received = queue.receive(1, 0).await.unwrap();

        queue.delete(&received[0].receipt_handle).await.unwrap();
        let second = queue.delete(&received[0].receipt_handle).await;

        assert!(matches!(second, Err(QueueError::UnknownReceiptHandle(_))));
        assert_eq!(queue.deleted_bodies(), vec!["a".to_string()]);
    }

    #[tokio::test]
    async fn test_expired_messages_are_redelivered_first() {
        let queue = MemoryQueue::new("jobs");
        for body in ["a", "b", "c"] {
            queue.send_body(body.to_string()).await.unwrap();
        }
        let first = queue.receive(2, 0).await.unwrap();

        queue.expire_in_flight();
        let again = queue.receive(3, 0).await.unwrap();

        let bodies: Vec<_> = again.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["a", "b", "c"]);
        assert_eq!(again[0].message_id, first[0].message_id);
        assert_ne!(again[0].receipt_handle, first[0].receipt_handle);
    }
}
