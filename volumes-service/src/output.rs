// SPDX-License-Identifier: GPL-3.0-only

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use volumes_contracts::{RequestHandler, RequestId, VolumeError};
use volumes_types::DeviceEvent;

/// Prints each handler call as one JSON line.
#[derive(Default)]
pub struct StdoutHandler {
    failed: AtomicBool,
}

impl StdoutHandler {
    pub fn has_failed(&self) -> bool {
        self.failed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RequestHandler for StdoutHandler {
    async fn send_data(&self, request: RequestId, payload: Value) {
        println!("{}", json!({ "request": request, "data": payload }));
    }

    async fn success(&self, request: RequestId) {
        println!("{}", json!({ "request": request, "result": "success" }));
    }

    async fn failed(&self, request: RequestId, error: VolumeError) {
        self.failed.store(true, Ordering::SeqCst);
        println!(
            "{}",
            json!({
                "request": request,
                "result": "failed",
                "code": error.kind.code(),
                "error": error,
            })
        );
    }
}

pub fn print_event(event: &DeviceEvent) -> serde_json::Result<()> {
    let line = serde_json::to_string(&json!({
        "event": event.name(),
        "data": event.payload(),
    }))?;
    println!("{line}");
    Ok(())
}
