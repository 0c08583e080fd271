// SPDX-License-Identifier: GPL-3.0-only

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::future::BoxFuture;
use tokio::sync::mpsc;

use volumes_contracts::{DeviceSignalStream, StorageBackend, VolumeError};
use volumes_types::{DeviceId, DeviceProperties, DeviceSignal};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Enumerate,
    GetProperties(DeviceId),
    Mount {
        id: DeviceId,
        filesystem_type: String,
        options: Vec<String>,
    },
    Unmount(DeviceId),
    Eject(DeviceId),
    Subscribe,
}

struct State {
    devices: Vec<DeviceId>,
    properties: HashMap<DeviceId, Result<DeviceProperties, VolumeError>>,
    enumerate_error: Option<VolumeError>,
    signals_error: Option<VolumeError>,
    mount_result: Result<String, VolumeError>,
    unmount_result: Result<(), VolumeError>,
    eject_result: Result<(), VolumeError>,
    signal_sender: Option<mpsc::Sender<DeviceSignal>>,
    calls: Vec<Call>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            devices: Vec::new(),
            properties: HashMap::new(),
            enumerate_error: None,
            signals_error: None,
            mount_result: Ok("/media/volume".to_string()),
            unmount_result: Ok(()),
            eject_result: Ok(()),
            signal_sender: None,
            calls: Vec::new(),
        }
    }
}

/// Scripted [`StorageBackend`]. Clones share state.
///
/// Devices are enumerated in insertion order; unknown devices fail their
/// property fetch with a transport error.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_device(self, id: DeviceId, props: DeviceProperties) -> Self {
        self.insert_device(id, props);
        self
    }

    pub fn insert_device(&self, id: DeviceId, props: DeviceProperties) {
        self.set_properties(id, Ok(props));
    }

    /// Enumerate `id` but fail every property fetch for it.
    pub fn fail_properties(&self, id: DeviceId, error: VolumeError) {
        self.set_properties(id, Err(error));
    }

    fn set_properties(&self, id: DeviceId, result: Result<DeviceProperties, VolumeError>) {
        let mut state = self.state.lock().unwrap();
        if !state.devices.contains(&id) {
            state.devices.push(id.clone());
        }
        state.properties.insert(id, result);
    }

    pub fn fail_enumeration(&self, error: VolumeError) {
        self.state.lock().unwrap().enumerate_error = Some(error);
    }

    pub fn fail_signals(&self, error: VolumeError) {
        self.state.lock().unwrap().signals_error = Some(error);
    }

    pub fn set_mount_result(&self, result: Result<String, VolumeError>) {
        self.state.lock().unwrap().mount_result = result;
    }

    pub fn set_unmount_result(&self, result: Result<(), VolumeError>) {
        self.state.lock().unwrap().unmount_result = result;
    }

    pub fn set_eject_result(&self, result: Result<(), VolumeError>) {
        self.state.lock().unwrap().eject_result = result;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.state.lock().unwrap().calls)
    }

    /// Deliver a signal to the stream handed out by `device_signals`.
    ///
    /// Panics if nobody subscribed.
    pub async fn send_signal(&self, signal: DeviceSignal) {
        let sender = self
            .state
            .lock()
            .unwrap()
            .signal_sender
            .clone()
            .expect("device_signals was not called");
        sender.send(signal).await.expect("signal stream dropped");
    }

    /// End the signal stream.
    pub fn close_signals(&self) {
        self.state.lock().unwrap().signal_sender = None;
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

impl StorageBackend for FakeBackend {
    fn enumerate_devices(&self) -> BoxFuture<'_, Result<Vec<DeviceId>, VolumeError>> {
        self.record(Call::Enumerate);
        let state = self.state.lock().unwrap();
        let res = match &state.enumerate_error {
            Some(error) => Err(error.clone()),
            None => Ok(state.devices.clone()),
        };
        Box::pin(async move { res })
    }

    fn get_properties(
        &self,
        id: DeviceId,
    ) -> BoxFuture<'_, Result<DeviceProperties, VolumeError>> {
        self.record(Call::GetProperties(id.clone()));
        let res = self
            .state
            .lock()
            .unwrap()
            .properties
            .get(&id)
            .cloned()
            .unwrap_or_else(|| Err(VolumeError::transport(format!("No such device: {id}"))));
        Box::pin(async move { res })
    }

    fn filesystem_mount(
        &self,
        id: DeviceId,
        filesystem_type: String,
        options: Vec<String>,
    ) -> BoxFuture<'_, Result<String, VolumeError>> {
        self.record(Call::Mount {
            id,
            filesystem_type,
            options,
        });
        let res = self.state.lock().unwrap().mount_result.clone();
        Box::pin(async move { res })
    }

    fn filesystem_unmount(
        &self,
        id: DeviceId,
        _options: Vec<String>,
    ) -> BoxFuture<'_, Result<(), VolumeError>> {
        self.record(Call::Unmount(id));
        let res = self.state.lock().unwrap().unmount_result.clone();
        Box::pin(async move { res })
    }

    fn drive_eject(
        &self,
        id: DeviceId,
        _options: Vec<String>,
    ) -> BoxFuture<'_, Result<(), VolumeError>> {
        self.record(Call::Eject(id));
        let res = self.state.lock().unwrap().eject_result.clone();
        Box::pin(async move { res })
    }

    fn device_signals(&self) -> BoxFuture<'_, Result<DeviceSignalStream, VolumeError>> {
        self.record(Call::Subscribe);
        let mut state = self.state.lock().unwrap();
        let res = match &state.signals_error {
            Some(error) => Err(error.clone()),
            None => {
                let (sender, stream) = DeviceSignalStream::channel(16);
                state.signal_sender = Some(sender);
                Ok(stream)
            }
        };
        Box::pin(async move { res })
    }
}
