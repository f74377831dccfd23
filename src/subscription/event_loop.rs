// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Long-poll loop delivering server events to adapters.

use std::sync::Arc;

use tokio::task::JoinHandle;

use super::BackoffPolicy;
use crate::device::EventSink;
use crate::host::Host;
use crate::manager::Registry;
use crate::model::Event;
use crate::protocol::Session;

/// Where the loop is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionState {
    /// Waiting on (or about to issue) a long-poll.
    Subscribed,
    /// Waiting out the delay after a failed long-poll.
    BackingOff,
}

/// Receives event batches and fans them out to every registered adapter.
///
/// A successful batch leads straight into the next subscribe call. A failed
/// one waits out the backoff delay first. The loop has no terminal state.
///
/// Events of a batch are delivered in order, each to every adapter; an
/// adapter that fails on an event is logged and skipped without affecting
/// the others.
pub struct EventSubscriptionLoop<S: Session, H: Host> {
    session: Arc<S>,
    registry: Arc<Registry<S, H>>,
    backoff: BackoffPolicy,
    state: SubscriptionState,
    failures: u32,
}

impl<S: Session, H: Host> EventSubscriptionLoop<S, H> {
    /// Creates a loop in the [`SubscriptionState::Subscribed`] state.
    #[must_use]
    pub fn new(session: Arc<S>, registry: Arc<Registry<S, H>>, backoff: BackoffPolicy) -> Self {
        Self {
            session,
            registry,
            backoff,
            state: SubscriptionState::Subscribed,
            failures: 0,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> SubscriptionState {
        self.state
    }

    /// Returns the number of failures since the last successful batch.
    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.failures
    }

    /// Performs one transition and returns the new state.
    ///
    /// In `Subscribed` this awaits one long-poll and dispatches its batch.
    /// In `BackingOff` it sleeps for the backoff delay.
    pub async fn step(&mut self) -> SubscriptionState {
        match self.state {
            SubscriptionState::Subscribed => match self.session.subscribe_events().await {
                Ok(events) => {
                    self.failures = 0;
                    tracing::trace!(count = events.len(), "Received event batch");
                    self.dispatch(&events);
                }
                Err(e) => {
                    self.failures = self.failures.saturating_add(1);
                    tracing::warn!(
                        error = %e,
                        failures = self.failures,
                        delay_ms = self.current_delay().as_millis(),
                        "Backing off live updates"
                    );
                    self.state = SubscriptionState::BackingOff;
                }
            },
            SubscriptionState::BackingOff => {
                tokio::time::sleep(self.current_delay()).await;
                self.state = SubscriptionState::Subscribed;
            }
        }
        self.state
    }

    fn current_delay(&self) -> std::time::Duration {
        self.backoff.delay_for_attempt(self.failures.saturating_sub(1))
    }

    /// Offers every event to every registered adapter.
    ///
    /// Returns the number of adapter failures.
    pub fn dispatch(&self, events: &[Event]) -> usize {
        let adapters = self.registry.all();
        let mut faults = 0;

        for event in events {
            for adapter in &adapters {
                if let Err(e) = adapter.on_event(event) {
                    faults += 1;
                    tracing::warn!(
                        accessory = %adapter.display_name(),
                        device_id = ?event.device_id,
                        error = %e,
                        "Failed to apply event"
                    );
                }
            }
        }

        faults
    }

    /// Runs the loop forever.
    pub async fn run(mut self) {
        tracing::debug!(adapters = self.registry.len(), "Starting event subscription loop");
        loop {
            self.step().await;
        }
    }

    /// Runs the loop on a new task.
    ///
    /// Abort the handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

impl<S: Session, H: Host> std::fmt::Debug for EventSubscriptionLoop<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSubscriptionLoop")
            .field("state", &self.state)
            .field("failures", &self.failures)
            .field("backoff", &self.backoff)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::device::{Adapter, LightAdapter, SensorAdapter};
    use crate::state::StateChange;
    use crate::testing::{self, MockSession, RecordingHost};
    use crate::types::{Brightness, ContactState};
    use serde_json::json;

    struct Fixture {
        session: Arc<MockSession>,
        host: Arc<RecordingHost>,
        registry: Arc<Registry<MockSession, RecordingHost>>,
        sensor: Arc<SensorAdapter<MockSession, RecordingHost>>,
        light: Arc<LightAdapter<MockSession, RecordingHost>>,
    }

    fn fixture() -> Fixture {
        let (session, host, ctx) = testing::context();
        let registry = Arc::new(Registry::new());

        let sensor = Arc::new(
            SensorAdapter::new(
                testing::device(json!({ "id": "s1", "name": "Door", "serialNumber": "S1" })),
                ctx.clone(),
            )
            .unwrap(),
        );
        registry.upsert(Adapter::Sensor(Arc::clone(&sensor)));

        let light = Arc::new(
            LightAdapter::new(
                testing::device(json!({ "id": "l1", "name": "Porch", "hardwareId": "HW1" })),
                ctx,
            )
            .unwrap(),
        );
        registry.upsert(Adapter::Light(Arc::clone(&light)));

        Fixture {
            session,
            host,
            registry,
            sensor,
            light,
        }
    }

    fn event_loop(fixture: &Fixture) -> EventSubscriptionLoop<MockSession, RecordingHost> {
        EventSubscriptionLoop::new(
            Arc::clone(&fixture.session),
            Arc::clone(&fixture.registry),
            BackoffPolicy::default(),
        )
    }

    #[tokio::test]
    async fn batch_events_apply_in_order() {
        let fixture = fixture();
        fixture.session.push_batch(vec![
            testing::event(json!({ "deviceId": "s1", "name": "isFaulted", "value": true })),
            testing::event(json!({ "deviceId": "s1", "name": "isFaulted", "value": false })),
        ]);
        let mut subscription = event_loop(&fixture);

        assert_eq!(subscription.step().await, SubscriptionState::Subscribed);

        assert_eq!(fixture.sensor.state().contact(), ContactState::Detected);
        assert_eq!(
            fixture.host.updates_for(fixture.sensor.accessory_id()),
            vec![
                StateChange::Contact(ContactState::NotDetected),
                StateChange::Contact(ContactState::Detected),
            ]
        );
    }

    #[tokio::test]
    async fn adapter_fault_does_not_stop_others() {
        let fixture = fixture();
        let subscription = event_loop(&fixture);

        let faults = subscription.dispatch(&[
            testing::event(json!({ "deviceId": "l1", "metadata": { "level": 400 } })),
            testing::event(json!({ "deviceId": "s1", "name": "isFaulted", "value": true })),
        ]);

        assert_eq!(faults, 1);
        assert_eq!(fixture.sensor.state().contact(), ContactState::NotDetected);
    }

    #[tokio::test(start_paused = true)]
    async fn failure_backs_off_then_resubscribes() {
        let fixture = fixture();
        fixture.session.push_failure();
        let mut subscription = event_loop(&fixture);

        assert_eq!(subscription.step().await, SubscriptionState::BackingOff);
        assert_eq!(subscription.consecutive_failures(), 1);

        let start = tokio::time::Instant::now();
        assert_eq!(subscription.step().await, SubscriptionState::Subscribed);
        assert_eq!(start.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn success_failure_success_has_one_delay() {
        let fixture = fixture();
        fixture.session.push_batch(vec![
            testing::event(json!({ "deviceId": "s1", "name": "isFaulted", "value": true })),
            testing::event(json!({ "deviceId": "l1", "metadata": { "level": 40 } })),
        ]);
        fixture.session.push_failure();
        fixture.session.push_batch(vec![
            testing::event(json!({ "deviceId": "l1", "metadata": { "level": 70 } })),
            testing::event(json!({ "deviceId": "s1", "name": "isFaulted", "value": false })),
        ]);

        let handle = event_loop(&fixture).spawn();
        tokio::time::sleep(Duration::from_secs(60)).await;
        handle.abort();

        // Three scripted calls plus the one left pending
        let calls = fixture.session.subscribe_calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls[1] - calls[0], Duration::ZERO);
        assert_eq!(calls[2] - calls[1], Duration::from_secs(5));
        assert_eq!(calls[3] - calls[2], Duration::ZERO);

        assert_eq!(
            fixture.host.updates_for(fixture.sensor.accessory_id()),
            vec![
                StateChange::Contact(ContactState::NotDetected),
                StateChange::Contact(ContactState::Detected),
            ]
        );
        assert_eq!(
            fixture.host.updates_for(fixture.light.accessory_id()),
            vec![
                StateChange::Brightness(Brightness::new(40).unwrap()),
                StateChange::Brightness(Brightness::new(70).unwrap()),
            ]
        );
    }

    #[tokio::test]
    async fn empty_batch_is_a_success() {
        let fixture = fixture();
        fixture.session.push_batch(Vec::new());
        let mut subscription = event_loop(&fixture);

        assert_eq!(subscription.step().await, SubscriptionState::Subscribed);
        assert_eq!(subscription.consecutive_failures(), 0);
        assert_eq!(fixture.host.update_count(), 0);
    }
}
