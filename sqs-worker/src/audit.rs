//! Audit log of failed message payloads

/// Tracing target carrying raw payloads of messages whose handling failed
pub const MESSAGE_LOG_TARGET: &str = "sqs_worker::messages";

/// Destination for raw payloads of messages that failed and were deleted
pub trait MessageLog: Send + Sync {
    /// Records one payload
    fn record(&self, payload: &str);
}

/// Writes payloads as INFO events on [`MESSAGE_LOG_TARGET`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingMessageLog;

impl MessageLog for TracingMessageLog {
    fn record(&self, payload: &str) {
        tracing::info!(target: MESSAGE_LOG_TARGET, "{}", payload);
    }
}
