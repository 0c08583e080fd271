// SPDX-License-Identifier: GPL-3.0-only

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use volumes_contracts::{RequestHandler, RequestId, VolumeError};

#[derive(Debug, Clone, PartialEq)]
pub enum HandlerCall {
    Data(RequestId, Value),
    Success(RequestId),
    Failed(RequestId, VolumeError),
}

/// [`RequestHandler`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingHandler {
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl RecordingHandler {
    pub fn calls(&self) -> Vec<HandlerCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of `success` and `failed` calls.
    pub fn terminal_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| !matches!(call, HandlerCall::Data(..)))
            .count()
    }
}

#[async_trait]
impl RequestHandler for RecordingHandler {
    async fn send_data(&self, request: RequestId, payload: Value) {
        self.calls
            .lock()
            .unwrap()
            .push(HandlerCall::Data(request, payload));
    }

    async fn success(&self, request: RequestId) {
        self.calls.lock().unwrap().push(HandlerCall::Success(request));
    }

    async fn failed(&self, request: RequestId, error: VolumeError) {
        self.calls
            .lock()
            .unwrap()
            .push(HandlerCall::Failed(request, error));
    }
}
