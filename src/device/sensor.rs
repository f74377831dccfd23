// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dry-contact sensor adapter.

use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;

use super::{AccessoryBinding, AdapterContext, EventSink, publish};
use crate::error::Result;
use crate::gate::DoorSensor;
use crate::host::{AccessoryKind, Host};
use crate::model::{AccessoryId, Device, Event, IdentityKey};
use crate::protocol::Session;
use crate::state::{SensorState, StateChange};
use crate::translate::{self, SENSOR_TAMPER};
use crate::types::{ContactState, TamperState};

/// Event name carrying a new faulted flag.
const IS_FAULTED: &str = "isFaulted";

/// Event name carrying a trouble transition.
const TROUBLE: &str = "trouble";

/// Adapter exposing a dry-contact sensor as a contact sensor accessory.
///
/// The contact characteristic follows the sensor's `isFaulted` property. A
/// `senTamp` trouble drives the tamper, fault and battery characteristics
/// together; the cloud reports no separate battery or fault condition.
pub struct SensorAdapter<S: Session, H: Host> {
    binding: AccessoryBinding,
    ctx: AdapterContext<S, H>,
    state: RwLock<SensorState>,
}

impl<S: Session, H: Host> SensorAdapter<S, H> {
    /// Creates an adapter for a sensor row.
    ///
    /// Returns `None` if the row has no identity key.
    #[must_use]
    pub fn new(device: Device, ctx: AdapterContext<S, H>) -> Option<Self> {
        let binding = AccessoryBinding::new(device, AccessoryKind::ContactSensor)?;
        Some(Self {
            binding,
            ctx,
            state: RwLock::new(SensorState::default()),
        })
    }

    pub(crate) fn binding(&self) -> &AccessoryBinding {
        &self.binding
    }

    /// Returns the identity key.
    #[must_use]
    pub fn identity_key(&self) -> &IdentityKey {
        &self.binding.key
    }

    /// Returns the accessory id.
    #[must_use]
    pub fn accessory_id(&self) -> AccessoryId {
        self.binding.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.binding.name
    }

    /// Returns the cached state without polling.
    #[must_use]
    pub fn state(&self) -> SensorState {
        *self.state.read()
    }

    // ========================================================================
    // Host reads
    // ========================================================================

    /// Returns the cached contact state and refreshes it in the background.
    pub fn get_contact_state(self: &Arc<Self>) -> ContactState {
        let cached = self.state.read().contact();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.refresh_contact_state().await {
                tracing::warn!(accessory = %this.binding.name, error = %e, "Failed to poll contact state");
            }
        });

        cached
    }

    /// Polls the cloud and publishes the contact state.
    ///
    /// Returns `Ok(None)` when no row of the snapshot matches this sensor or
    /// the row carries no `isFaulted` flag; the cache is left untouched.
    ///
    /// # Errors
    ///
    /// Returns error if the status poll fails.
    pub async fn refresh_contact_state(&self) -> Result<Option<ContactState>> {
        let snapshot = self.ctx.session().current_status().await?;
        let Some(row) = snapshot.find_by_identity(&self.binding.key) else {
            tracing::debug!(accessory = %self.binding.name, "Sensor missing from status snapshot");
            return Ok(None);
        };
        let Some(raw) = row.properties().is_faulted() else {
            return Ok(None);
        };

        let contact = translate::faulted_to_contact_state(raw);
        self.apply(StateChange::Contact(contact));
        Ok(Some(contact))
    }

    /// Returns the cached tamper state and refreshes the tamper, fault and
    /// battery characteristics in the background.
    pub fn get_tamper_fault_battery_state(self: &Arc<Self>) -> TamperState {
        let cached = self.state.read().tamper();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.refresh_trouble_state().await {
                tracing::warn!(accessory = %this.binding.name, error = %e, "Failed to poll trouble state");
            }
        });

        cached
    }

    /// Polls the cloud and publishes tamper, fault and battery together.
    ///
    /// # Errors
    ///
    /// Returns error if the status poll fails.
    pub async fn refresh_trouble_state(&self) -> Result<Option<TamperState>> {
        let snapshot = self.ctx.session().current_status().await?;
        let Some(row) = snapshot.find_by_identity(&self.binding.key) else {
            tracing::debug!(accessory = %self.binding.name, "Sensor missing from status snapshot");
            return Ok(None);
        };

        let tampered = Value::Bool(row.has_trouble(SENSOR_TAMPER));
        for change in StateChange::from_trouble(&tampered) {
            self.apply(change);
        }
        Ok(Some(translate::trouble_to_tamper_state(&tampered)))
    }

    fn apply(&self, change: StateChange) {
        self.state.write().apply(&change);
        publish(self.ctx.host().as_ref(), self.binding.id, change);
    }
}

impl<S: Session, H: Host> EventSink for SensorAdapter<S, H> {
    fn on_event(&self, event: &Event) -> Result<()> {
        if !event.is_for(&self.binding.device.id) {
            return Ok(());
        }

        match (event.name.as_deref(), event.value.as_ref()) {
            (Some(IS_FAULTED), Some(value)) => {
                self.apply(StateChange::Contact(translate::faulted_to_contact_state(value)));
            }
            (Some(TROUBLE), Some(value)) if translate::is_tamper_token(value) => {
                for change in StateChange::from_trouble(value) {
                    self.apply(change);
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl<S: Session, H: Host> EventSink for Arc<SensorAdapter<S, H>> {
    fn on_event(&self, event: &Event) -> Result<()> {
        (**self).on_event(event)
    }
}

impl<S: Session, H: Host> DoorSensor for SensorAdapter<S, H> {
    fn door_name(&self) -> &str {
        &self.binding.name
    }

    fn contact_state(&self) -> ContactState {
        self.state.read().contact()
    }
}
