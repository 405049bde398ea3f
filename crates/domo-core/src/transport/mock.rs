//! Scripted in-memory transport for unit tests.

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::VecDeque;

use super::{ResponseEnvelope, Transport, TransportError, TransportRequest};

/// Replays queued outcomes in order and records every request.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ResponseEnvelope, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: Value) -> Self {
        self.responses.lock().push_back(Ok(ResponseEnvelope::from_json(status, body)));
        self
    }

    /// Queue a failure that never reached an HTTP status.
    pub(crate) fn fail(self, error: TransportError) -> Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<ResponseEnvelope, TransportError> {
        self.requests.lock().push(request);
        // An exhausted script answers 599 so a missing expectation surfaces as a failed call.
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(ResponseEnvelope::from_json(599, Value::Null)))
    }
}
