//! Call envelope
//!
//! A message body carries one call: its positional arguments and its keyword
//! arguments, encoded as the JSON array `[args, kwargs]`.

use serde_json::{Map, Value};

use crate::error::{QueueError, QueueResult};

/// Positional and keyword arguments of a single call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Envelope {
    /// Positional arguments, in order
    pub args: Vec<Value>,
    /// Keyword arguments by name
    pub kwargs: Map<String, Value>,
}

impl Envelope {
    /// Creates an envelope with the given positional arguments and no keyword arguments
    #[must_use]
    pub fn new(args: Vec<Value>) -> Self {
        Self {
            args,
            kwargs: Map::new(),
        }
    }

    /// Adds a keyword argument, replacing any previous value under the same name
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.kwargs.insert(name.into(), value.into());
        self
    }

    /// Encodes the envelope as a message body
    ///
    /// # Errors
    ///
    /// Returns `QueueError::SerializationError` if the arguments cannot be encoded
    pub fn to_body(&self) -> QueueResult<String> {
        Ok(serde_json::to_string(&(&self.args, &self.kwargs))?)
    }

    /// Decodes a message body into an envelope
    ///
    /// # Errors
    ///
    /// Returns `QueueError::InvalidMessage` unless the body is a JSON array holding
    /// exactly a positional array followed by a keyword object
    pub fn from_body(body: &str) -> QueueResult<Self> {
        let (args, kwargs) = serde_json::from_str::<(Vec<Value>, Map<String, Value>)>(body)
            .map_err(|e| QueueError::InvalidMessage(e.to_string()))?;

        Ok(Self { args, kwargs })
    }
}
