//! Integration tests for `SqsQueue` and `Producer` against `LocalStack`
//!
//! Run with `cargo test -- --ignored` while `LocalStack` listens on port 4566.

mod common;

use std::sync::Arc;

use crate::common::{queue_utils::localstack_client, QueueTestContext};
use message_queue::{Envelope, Producer, QueueBackend, QueueError, SqsQueue};
use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_connect_to_missing_queue_fails() {
    let client = Arc::new(localstack_client().await);
    let name = format!("missing-{}", Uuid::new_v4());

    let result = SqsQueue::connect(client, &name).await;

    match result {
        Err(QueueError::QueueNotFound(missing)) => assert_eq!(missing, name),
        Err(e) => panic!("Expected QueueNotFound, got {e:?}"),
        Ok(_) => panic!("Expected QueueNotFound, got a queue"),
    }
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_connect_resolves_queue_url() {
    let ctx = QueueTestContext::new("resolve").await;

    let queue = SqsQueue::connect(ctx.sqs_client.clone(), &ctx.queue_name)
        .await
        .expect("Failed to connect");

    assert_eq!(queue.name(), ctx.queue_name);
    assert_eq!(queue.queue_url(), ctx.queue_url);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_enqueue_receive_delete_happy_path() {
    let ctx = QueueTestContext::new("happy-path").await;
    let queue = Arc::new(
        SqsQueue::connect(ctx.sqs_client.clone(), &ctx.queue_name)
            .await
            .expect("Failed to connect"),
    );
    let producer = Producer::new(queue.clone());

    let envelope = Envelope::new(vec![json!("alice")]).kwarg("greeting", "hi");
    let message_id = producer
        .enqueue(&envelope)
        .await
        .expect("Failed to enqueue");
    assert!(!message_id.is_empty(), "Message ID should not be empty");

    let messages = queue.receive(1, 1).await.expect("Failed to receive");
    assert_eq!(messages.len(), 1, "Should receive exactly one message");
    assert_eq!(messages[0].message_id, message_id);
    assert_eq!(Envelope::from_body(&messages[0].body).unwrap(), envelope);

    queue
        .delete(&messages[0].receipt_handle)
        .await
        .expect("Failed to delete message");

    let messages = queue.receive(1, 0).await.expect("Failed to receive");
    assert!(messages.is_empty(), "Queue should be empty after delete");
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_producer_connect_by_name() {
    let ctx = QueueTestContext::new("producer-connect").await;

    let producer = Producer::connect(
        &ctx.queue_name,
        "us-east-1",
        Some(common::queue_utils::LOCALSTACK_ENDPOINT),
    )
    .await
    .expect("Failed to connect producer");

    assert_eq!(producer.queue_name(), ctx.queue_name);
}
