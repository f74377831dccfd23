// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared doubles for integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use icontrol_bridge::host::{AccessoryRegistration, Host};
use icontrol_bridge::model::{AccessoryId, Device, Event, Snapshot};
use icontrol_bridge::state::StateChange;
use icontrol_bridge::{ProtocolError, Request, Result, Session};
use parking_lot::Mutex;
use serde_json::Value;

pub fn device(value: Value) -> Device {
    serde_json::from_value(value).expect("valid device row")
}

pub fn event(value: Value) -> Event {
    serde_json::from_value(value).expect("valid event")
}

/// Session serving a fixed snapshot and a script of event batches.
pub struct ScriptedSession {
    snapshot: Mutex<Option<Snapshot>>,
    batches: Mutex<VecDeque<Option<Vec<Event>>>>,
    requests: Mutex<Vec<Request>>,
    status_calls: AtomicUsize,
    subscribe_calls: Mutex<Vec<tokio::time::Instant>>,
}

impl ScriptedSession {
    pub fn new(devices: Vec<Device>) -> Self {
        Self {
            snapshot: Mutex::new(Some(Snapshot::new(devices))),
            batches: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            status_calls: AtomicUsize::new(0),
            subscribe_calls: Mutex::new(Vec::new()),
        }
    }

    /// A session whose status endpoint always fails.
    pub fn unavailable() -> Self {
        let session = Self::new(Vec::new());
        *session.snapshot.lock() = None;
        session
    }

    pub fn set_devices(&self, devices: Vec<Device>) {
        *self.snapshot.lock() = Some(Snapshot::new(devices));
    }

    pub fn push_batch(&self, events: Vec<Event>) {
        self.batches.lock().push_back(Some(events));
    }

    pub fn push_failure(&self) {
        self.batches.lock().push_back(None);
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn subscribe_calls(&self) -> Vec<tokio::time::Instant> {
        self.subscribe_calls.lock().clone()
    }
}

impl Session for ScriptedSession {
    async fn current_status(&self) -> Result<Snapshot> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let snapshot = self.snapshot.lock().clone();
        snapshot.ok_or_else(|| ProtocolError::ConnectionFailed("offline".into()).into())
    }

    async fn authenticated_request(&self, request: Request) -> Result<Value> {
        self.requests.lock().push(request);
        Ok(Value::Null)
    }

    async fn subscribe_events(&self) -> Result<Vec<Event>> {
        self.subscribe_calls.lock().push(tokio::time::Instant::now());
        let next = self.batches.lock().pop_front();
        match next {
            Some(Some(events)) => Ok(events),
            Some(None) => Err(ProtocolError::ConnectionFailed("dropped".into()).into()),
            None => std::future::pending().await,
        }
    }

    fn pin_code(&self) -> &str {
        "1234"
    }
}

/// Host recording every call.
#[derive(Default)]
pub struct RecordingHost {
    registrations: Mutex<Vec<AccessoryRegistration>>,
    unregistrations: Mutex<Vec<AccessoryId>>,
    updates: Mutex<Vec<(AccessoryId, StateChange)>>,
}

impl RecordingHost {
    pub fn registrations(&self) -> Vec<AccessoryRegistration> {
        self.registrations.lock().clone()
    }

    pub fn unregistrations(&self) -> Vec<AccessoryId> {
        self.unregistrations.lock().clone()
    }

    pub fn updates_for(&self, id: AccessoryId) -> Vec<StateChange> {
        self.updates
            .lock()
            .iter()
            .filter(|(target, _)| *target == id)
            .map(|(_, change)| *change)
            .collect()
    }

    pub fn last_update(&self, id: AccessoryId) -> Option<StateChange> {
        self.updates_for(id).last().copied()
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
