// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scripted session and recording host for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use parking_lot::Mutex;
use serde_json::Value;

use crate::device::AdapterContext;
use crate::error::{ProtocolError, Result};
use crate::host::{AccessoryRegistration, Host};
use crate::model::{AccessoryId, Device, Event, Snapshot};
use crate::protocol::{Request, Session};
use crate::state::StateChange;

/// Parses a device row.
pub(crate) fn device(value: Value) -> Device {
    serde_json::from_value(value).expect("valid device row")
}

/// Parses an event.
pub(crate) fn event(value: Value) -> Event {
    serde_json::from_value(value).expect("valid event")
}

/// Builds a context over fresh mocks.
pub(crate) fn context() -> (Arc<MockSession>, Arc<RecordingHost>, AdapterContext<MockSession, RecordingHost>) {
    let session = Arc::new(MockSession::new());
    let host = Arc::new(RecordingHost::default());
    let ctx = AdapterContext::new(Arc::clone(&session), Arc::clone(&host));
    (session, host, ctx)
}

// ============================================================================
// MockSession
// ============================================================================

/// Session answering from scripted values.
///
/// Status polls return the current snapshot unless failing. Event batches
/// are consumed in order; once the script runs out the long-poll never
/// completes.
pub(crate) struct MockSession {
    pin: String,
    snapshot: Mutex<Snapshot>,
    fail_status: AtomicBool,
    fail_requests: AtomicBool,
    status_calls: AtomicUsize,
    requests: Mutex<Vec<Request>>,
    batches: Mutex<VecDeque<Option<Vec<Event>>>>,
    subscribe_calls: Mutex<Vec<tokio::time::Instant>>,
}

impl MockSession {
    pub(crate) fn new() -> Self {
        Self {
            pin: "1234".to_string(),
            snapshot: Mutex::new(Snapshot::default()),
            fail_status: AtomicBool::new(false),
            fail_requests: AtomicBool::new(false),
            status_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            batches: Mutex::new(VecDeque::new()),
            subscribe_calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn set_devices(&self, devices: Vec<Device>) {
        *self.snapshot.lock() = Snapshot::new(devices);
    }

    pub(crate) fn fail_status(&self, fail: bool) {
        self.fail_status.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_requests(&self, fail: bool) {
        self.fail_requests.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn push_batch(&self, events: Vec<Event>) {
        self.batches.lock().push_back(Some(events));
    }

    pub(crate) fn push_failure(&self) {
        self.batches.lock().push_back(None);
    }

    pub(crate) fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub(crate) fn subscribe_calls(&self) -> Vec<tokio::time::Instant> {
        self.subscribe_calls.lock().clone()
    }
}

impl Session for MockSession {
    async fn current_status(&self) -> Result<Snapshot> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_status.load(Ordering::SeqCst) {
            return Err(ProtocolError::ConnectionFailed("status unavailable".into()).into());
        }
        Ok(self.snapshot.lock().clone())
    }

    async fn authenticated_request(&self, request: Request) -> Result<Value> {
        self.requests.lock().push(request);
        if self.fail_requests.load(Ordering::SeqCst) {
            return Err(ProtocolError::UnexpectedStatus(500).into());
        }
        Ok(Value::Null)
    }

    async fn subscribe_events(&self) -> Result<Vec<Event>> {
        self.subscribe_calls.lock().push(tokio::time::Instant::now());
        let next = self.batches.lock().pop_front();
        match next {
            Some(Some(events)) => Ok(events),
            Some(None) => Err(ProtocolError::ConnectionFailed("stream dropped".into()).into()),
            None => std::future::pending().await,
        }
    }

    fn pin_code(&self) -> &str {
        &self.pin
    }
}

// ============================================================================
// RecordingHost
// ============================================================================

/// Host recording every call.
#[derive(Default)]
pub(crate) struct RecordingHost {
    registrations: Mutex<Vec<AccessoryRegistration>>,
    unregistrations: Mutex<Vec<AccessoryId>>,
    updates: Mutex<Vec<(AccessoryId, StateChange)>>,
}

impl RecordingHost {
    pub(crate) fn registrations(&self) -> Vec<AccessoryRegistration> {
        self.registrations.lock().clone()
    }

    pub(crate) fn unregistrations(&self) -> Vec<AccessoryId> {
        self.unregistrations.lock().clone()
    }

    /// Updates published for one accessory, oldest first.
    pub(crate) fn updates_for(&self, id: AccessoryId) -> Vec<StateChange> {
        self.updates
            .lock()
            .iter()
            .filter(|(target, _)| *target == id)
            .map(|(_, change)| *change)
            .collect()
    }

    pub(crate) fn update_count(&self) -> usize {
        self.updates.lock().len()
    }
}

impl Host for RecordingHost {
    fn register_accessory(&self, registration: &AccessoryRegistration) {
        self.registrations.lock().push(registration.clone());
    }

    fn unregister_accessory(&self, id: AccessoryId) {
        self.unregistrations.lock().push(id);
    }

    fn update_characteristic(&self, id: AccessoryId, change: StateChange) {
        self.updates.lock().push((id, change));
    }
}
