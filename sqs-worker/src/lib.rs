//! Sequential SQS worker
//!
//! Consumes one queue one message at a time: each body is decoded as a call
//! envelope and handed to the handler named in the configuration file, and the
//! handler's result decides whether the message is deleted, kept for
//! redelivery, or logged and dropped.

#![deny(clippy::all, clippy::pedantic, clippy::nursery, dead_code)]

/// Raw payload log for failed messages
pub mod audit;
/// INI configuration file
pub mod config;
/// Handler contract and registry
pub mod handler;
/// Tracing subscriber setup
pub mod logging;
/// Environment and error types
pub mod types;
/// Polling loop
pub mod worker;
