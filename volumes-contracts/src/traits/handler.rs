// SPDX-License-Identifier: GPL-3.0-only

use async_trait::async_trait;
use serde_json::Value;

use crate::{RequestId, VolumeError};

/// Host side of a request: receives data and exactly one terminal outcome.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    async fn send_data(&self, request: RequestId, payload: Value);

    async fn success(&self, request: RequestId);

    async fn failed(&self, request: RequestId, error: VolumeError);
}
