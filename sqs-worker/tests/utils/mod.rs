//! Shared test doubles for worker tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use message_queue::{MemoryQueue, Producer};
use serde_json::{Map, Value};
use sqs_worker::audit::MessageLog;
use sqs_worker::handler::{Handler, HandlerError, HandlerResult};
use sqs_worker::worker::{PollSettings, SequentialWorker};

/// What the recording handler does with each call
#[derive(Debug, Clone, Copy)]
pub enum Behavior {
    Succeed,
    Retry,
    Fail,
    /// Reads the first positional argument without checking it exists
    Panic,
}

/// Handler that records every call and answers with a fixed behavior
pub struct RecordingHandler {
    behavior: Behavior,
    calls: Mutex<Vec<(Vec<Value>, Map<String, Value>)>>,
}

impl RecordingHandler {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(Vec<Value>, Map<String, Value>)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Handler for RecordingHandler {
    async fn handle(&self, args: Vec<Value>, kwargs: Map<String, Value>) -> HandlerResult {
        self.calls.lock().unwrap().push((args.clone(), kwargs));

        match self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Retry => Err(HandlerError::retryable(anyhow::anyhow!("try later"))),
            Behavior::Fail => Err(HandlerError::fatal(anyhow::anyhow!("boom"))),
            Behavior::Panic => {
                let first = &args[0];
                Err(HandlerError::fatal(anyhow::anyhow!("unreachable: {first}")))
            }
        }
    }
}

/// Message log that keeps payloads in memory
#[derive(Default)]
pub struct RecordingMessageLog {
    payloads: Mutex<Vec<String>>,
}

impl RecordingMessageLog {
    pub fn payloads(&self) -> Vec<String> {
        self.payloads.lock().unwrap().clone()
    }
}

impl MessageLog for RecordingMessageLog {
    fn record(&self, payload: &str) {
        self.payloads.lock().unwrap().push(payload.to_string());
    }
}

/// Worker wired to an in-memory queue with recording doubles
pub struct WorkerHarness {
    pub queue: Arc<MemoryQueue>,
    pub producer: Producer,
    pub handler: Arc<RecordingHandler>,
    pub message_log: Arc<RecordingMessageLog>,
    pub worker: SequentialWorker,
}

impl WorkerHarness {
    pub fn new(behavior: Behavior) -> Self {
        let queue = Arc::new(MemoryQueue::new("jobs"));
        let handler = RecordingHandler::new(behavior);
        let message_log = Arc::new(RecordingMessageLog::default());

        let worker = SequentialWorker::new(
            queue.clone(),
            handler.clone(),
            PollSettings {
                wait_time_seconds: 0,
                ..PollSettings::default()
            },
        )
        .with_message_log(message_log.clone());

        Self {
            producer: Producer::new(queue.clone()),
            queue,
            handler,
            message_log,
            worker,
        }
    }
}
