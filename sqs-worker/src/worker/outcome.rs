use metrics::counter;

/// What one poll cycle did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No message arrived within the long-poll wait
    Empty,
    /// The handler succeeded and the message was deleted
    Handled,
    /// The handler asked for a retry; the message was kept
    Retried,
    /// The handler failed; the payload was logged and the message deleted
    Failed,
}

impl Outcome {
    /// Metric label for this outcome
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Handled => "handled",
            Self::Retried => "retried",
            Self::Failed => "failed",
        }
    }

    /// Whether the message was removed from the queue
    #[must_use]
    pub const fn deleted(self) -> bool {
        matches!(self, Self::Handled | Self::Failed)
    }

    pub(crate) fn record(self) {
        counter!("sqs_worker.messages", "outcome" => self.as_str()).increment(1);
    }
}
