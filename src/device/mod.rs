// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device adapters.
//!
//! An adapter pairs one cloud device with one host accessory. It keeps the
//! accessory's canonical state, answers host reads from that cache while
//! refreshing it in the background, turns host writes into cloud commands,
//! and applies pushed events.
//!
//! # Adapter Kinds
//!
//! - [`PanelAdapter`] - Security panel, exposed as a security system
//! - [`SensorAdapter`] - Dry-contact sensor, exposed as a contact sensor
//! - [`LightAdapter`] - Light switch or dimmer, exposed as a lightbulb
//!
//! # Concurrency
//!
//! State lives behind a `parking_lot::RwLock` and is never held across an
//! `.await`. Host reads return immediately; the refresh they trigger runs on
//! a detached task. Two overlapping reconciliations resolve last-write-wins.

mod light;
mod panel;
mod sensor;

use std::sync::Arc;

pub use light::LightAdapter;
pub use panel::{ArmOutcome, PanelAdapter};
pub use sensor::SensorAdapter;

use crate::error::Result;
use crate::host::{AccessoryInfo, AccessoryKind, AccessoryRegistration, Host};
use crate::model::{AccessoryId, Device, Event, IdentityKey};
use crate::protocol::Session;
use crate::state::StateChange;

// ============================================================================
// AdapterContext - Shared session and host handles
// ============================================================================

/// The session and host every adapter talks to.
pub struct AdapterContext<S, H> {
    session: Arc<S>,
    host: Arc<H>,
}

impl<S: Session, H: Host> AdapterContext<S, H> {
    /// Creates a context from shared handles.
    #[must_use]
    pub fn new(session: Arc<S>, host: Arc<H>) -> Self {
        Self { session, host }
    }

    /// Returns the cloud session.
    #[must_use]
    pub fn session(&self) -> &Arc<S> {
        &self.session
    }

    /// Returns the accessory host.
    #[must_use]
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }
}

impl<S, H> Clone for AdapterContext<S, H> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            host: Arc::clone(&self.host),
        }
    }
}

impl<S, H> std::fmt::Debug for AdapterContext<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterContext").finish_non_exhaustive()
    }
}

// ============================================================================
// AccessoryBinding - Fixed identity of an adapter
// ============================================================================

/// Identity fields shared by every adapter kind.
///
/// Fixed at construction; the device row kept here is the one the adapter
/// was created from and is only used for its id, links and descriptors.
#[derive(Debug, Clone)]
pub(crate) struct AccessoryBinding {
    pub(crate) device: Device,
    pub(crate) key: IdentityKey,
    pub(crate) id: AccessoryId,
    pub(crate) name: String,
    pub(crate) kind: AccessoryKind,
}

impl AccessoryBinding {
    /// Binds a device row to an accessory.
    ///
    /// Returns `None` when the row has neither serial number nor hardware id.
    pub(crate) fn new(device: Device, kind: AccessoryKind) -> Option<Self> {
        let key = device.identity_key()?;
        let name = if device.name.trim().is_empty() {
            kind.default_name().to_string()
        } else {
            device.name.clone()
        };
        Some(Self {
            id: AccessoryId::for_key(&key),
            device,
            key,
            name,
            kind,
        })
    }

    pub(crate) fn registration(&self) -> AccessoryRegistration {
        AccessoryRegistration {
            id: self.id,
            kind: self.kind,
            display_name: self.name.clone(),
            info: AccessoryInfo::from_device(&self.device, self.kind),
        }
    }
}

// ============================================================================
// EventSink - Event fan-out target
// ============================================================================

/// Receives every event of a subscription batch.
///
/// Implementations ignore events that do not concern them. An `Err` is
/// confined to the one adapter and event that produced it.
pub trait EventSink {
    /// Handles one pushed event.
    ///
    /// # Errors
    ///
    /// Returns error if the event concerns this adapter but carries a value
    /// that cannot be applied.
    fn on_event(&self, event: &Event) -> Result<()>;
}

// ============================================================================
// Adapter - Tagged union over adapter kinds
// ============================================================================

/// Any registered adapter.
pub enum Adapter<S: Session, H: Host> {
    /// Security panel.
    Panel(Arc<PanelAdapter<S, H>>),
    /// Contact sensor.
    Sensor(Arc<SensorAdapter<S, H>>),
    /// Light.
    Light(Arc<LightAdapter<S, H>>),
}

impl<S: Session, H: Host> Adapter<S, H> {
    fn binding(&self) -> &AccessoryBinding {
        match self {
            Self::Panel(panel) => panel.binding(),
            Self::Sensor(sensor) => sensor.binding(),
            Self::Light(light) => light.binding(),
        }
    }

    /// Returns the identity key.
    #[must_use]
    pub fn identity_key(&self) -> &IdentityKey {
        &self.binding().key
    }

    /// Returns the accessory id.
    #[must_use]
    pub fn accessory_id(&self) -> AccessoryId {
        self.binding().id
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.binding().name
    }

    /// Returns the accessory kind.
    #[must_use]
    pub fn kind(&self) -> AccessoryKind {
        self.binding().kind
    }

    /// Returns the registration the host was (or would be) given.
    #[must_use]
    pub fn registration(&self) -> AccessoryRegistration {
        self.binding().registration()
    }

    /// Returns the sensor adapter, if this is one.
    #[must_use]
    pub fn as_sensor(&self) -> Option<&Arc<SensorAdapter<S, H>>> {
        match self {
            Self::Sensor(sensor) => Some(sensor),
            _ => None,
        }
    }

    /// Returns the panel adapter, if this is one.
    #[must_use]
    pub fn as_panel(&self) -> Option<&Arc<PanelAdapter<S, H>>> {
        match self {
            Self::Panel(panel) => Some(panel),
            _ => None,
        }
    }

    /// Returns the light adapter, if this is one.
    #[must_use]
    pub fn as_light(&self) -> Option<&Arc<LightAdapter<S, H>>> {
        match self {
            Self::Light(light) => Some(light),
            _ => None,
        }
    }
}

impl<S: Session, H: Host> Clone for Adapter<S, H> {
    fn clone(&self) -> Self {
        match self {
            Self::Panel(panel) => Self::Panel(Arc::clone(panel)),
            Self::Sensor(sensor) => Self::Sensor(Arc::clone(sensor)),
            Self::Light(light) => Self::Light(Arc::clone(light)),
        }
    }
}

impl<S: Session, H: Host> std::fmt::Debug for Adapter<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Adapter")
            .field("kind", &self.kind())
            .field("name", &self.display_name())
            .field("key", self.identity_key())
            .finish()
    }
}

impl<S: Session, H: Host> EventSink for Adapter<S, H> {
    fn on_event(&self, event: &Event) -> Result<()> {
        match self {
            Self::Panel(panel) => panel.on_event(event),
            Self::Sensor(sensor) => sensor.on_event(event),
            Self::Light(light) => light.on_event(event),
        }
    }
}

/// Pushes a change to the host for the given accessory.
fn publish<H: Host>(host: &H, id: AccessoryId, change: StateChange) {
    tracing::trace!(accessory = %id, ?change, "Publishing characteristic");
    host.update_characteristic(id, change);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(value: serde_json::Value) -> Device {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn binding_requires_identity() {
        let row = device(json!({ "id": "d1", "name": "Front" }));
        assert!(AccessoryBinding::new(row, AccessoryKind::ContactSensor).is_none());
    }

    #[test]
    fn binding_falls_back_to_default_name() {
        let row = device(json!({ "id": "d1", "name": "  ", "serialNumber": "SN1" }));
        let binding = AccessoryBinding::new(row, AccessoryKind::ContactSensor).unwrap();

        assert_eq!(binding.name, "Dry Contact");
        assert_eq!(binding.key.as_str(), "SN1");
        assert_eq!(binding.id, AccessoryId::for_key(&binding.key));
    }

    #[test]
    fn registration_carries_info() {
        let row = device(json!({ "name": "Hall", "hardwareId": "HW4", "model": "LS" }));
        let binding =
            AccessoryBinding::new(row, AccessoryKind::Lightbulb { dimmable: true }).unwrap();
        let registration = binding.registration();

        assert_eq!(registration.display_name, "Hall");
        assert_eq!(registration.info.model, "LS");
        assert_eq!(registration.info.serial_number, "HW4");
        assert_eq!(registration.kind, AccessoryKind::Lightbulb { dimmable: true });
    }
}
