//! Message queue primitives for the sequential SQS worker
//!
//! This crate provides the call envelope carried in each message body, the queue
//! backend abstraction with its SQS implementation, and the producer used to
//! enqueue calls.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Queue backend abstraction
pub mod backend;
/// SQS client construction
pub mod client;
/// Call envelope carried in message bodies
pub mod envelope;
/// Error types for queue operations
pub mod error;
/// In-memory queue backend for tests
#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
/// Producer for enqueueing calls
pub mod producer;
/// SQS queue backend
pub mod sqs_queue;

pub use backend::{QueueBackend, QueueMessage};
pub use client::sqs_client;
pub use envelope::Envelope;
pub use error::{QueueError, QueueResult};
#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryQueue;
pub use producer::Producer;
pub use sqs_queue::SqsQueue;
