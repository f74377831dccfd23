// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Snapshot-to-accessory orchestration.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::{BridgeConfig, Registry};
use crate::device::{Adapter, AdapterContext, LightAdapter, PanelAdapter, SensorAdapter};
use crate::error::Result;
use crate::host::Host;
use crate::model::{AccessoryId, Device, DeviceType, IdentityKey};
use crate::protocol::Session;
use crate::subscription::EventSubscriptionLoop;

/// Sensor type exposed as a contact sensor; other sensors are skipped.
const DRY_CONTACT: &str = "dryContact";

/// Connects one cloud session to one accessory host.
///
/// The host hands back accessories it persisted from an earlier run through
/// [`restore_cached_accessory`](Self::restore_cached_accessory) before
/// [`start`](Self::start). Devices whose accessory id was restored get an
/// adapter but are not registered a second time.
pub struct Bridge<S: Session, H: Host> {
    ctx: AdapterContext<S, H>,
    config: BridgeConfig,
    registry: Arc<Registry<S, H>>,
    restored: Mutex<HashSet<AccessoryId>>,
}

impl<S: Session, H: Host> Bridge<S, H> {
    /// Creates a bridge. Nothing is fetched until [`start`](Self::start).
    #[must_use]
    pub fn new(session: Arc<S>, host: Arc<H>, config: BridgeConfig) -> Self {
        Self {
            ctx: AdapterContext::new(session, host),
            config,
            registry: Arc::new(Registry::new()),
            restored: Mutex::new(HashSet::new()),
        }
    }

    /// Returns the adapter registry.
    #[must_use]
    pub fn registry(&self) -> &Arc<Registry<S, H>> {
        &self.registry
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Records an accessory the host restored from its cache.
    pub fn restore_cached_accessory(&self, id: AccessoryId) {
        tracing::debug!(accessory = %id, "Restoring cached accessory");
        self.restored.lock().insert(id);
    }

    /// Fetches the device list, creates adapters and starts live updates.
    ///
    /// Returns the handle of the subscription task.
    ///
    /// # Errors
    ///
    /// Returns error if the initial status poll fails. No adapter is
    /// created and no loop is started in that case.
    pub async fn start(&self) -> Result<JoinHandle<()>> {
        let snapshot = self.ctx.session().current_status().await.inspect_err(|e| {
            tracing::error!(error = %e, "Failed to fetch device list");
        })?;

        let added = self.add_devices(&snapshot.devices);
        tracing::info!(added, total = self.registry.len(), "Finished loading devices");

        Ok(self.event_loop().spawn())
    }

    /// Creates an event loop over this bridge's registry.
    #[must_use]
    pub fn event_loop(&self) -> EventSubscriptionLoop<S, H> {
        EventSubscriptionLoop::new(
            Arc::clone(self.ctx.session()),
            Arc::clone(&self.registry),
            self.config.backoff.clone(),
        )
    }

    /// Adds every supported device of a snapshot.
    ///
    /// Returns the number of adapters created.
    pub fn add_devices(&self, devices: &[Device]) -> usize {
        devices
            .iter()
            .filter(|device| self.add_device(device).is_some())
            .count()
    }

    /// Creates the adapter for one device and registers its accessory.
    ///
    /// Panels, dry-contact sensors and lights are supported; anything else,
    /// and any row without serial number or hardware id, is skipped. An
    /// existing adapter with the same identity key is replaced without
    /// registering the accessory again.
    pub fn add_device(&self, device: &Device) -> Option<Adapter<S, H>> {
        let adapter = self.build_adapter(device)?;
        let registration = adapter.registration();

        let known = self.registry.contains(adapter.identity_key())
            || self.restored.lock().contains(&registration.id);
        if known {
            tracing::debug!(accessory = %registration.display_name, "Rebinding known accessory");
        } else {
            tracing::info!(
                accessory = %registration.display_name,
                kind = ?registration.kind,
                "Registering accessory"
            );
            self.ctx.host().register_accessory(&registration);
        }

        self.registry.upsert(adapter.clone());
        Some(adapter)
    }

    fn build_adapter(&self, device: &Device) -> Option<Adapter<S, H>> {
        let adapter = match device.device_type {
            DeviceType::Panel => PanelAdapter::new(
                device.clone(),
                self.ctx.clone(),
                Arc::downgrade(&self.registry),
                &self.config,
            )
            .map(|panel| Adapter::Panel(Arc::new(panel))),
            DeviceType::Sensor if device.properties().sensor_type() == Some(DRY_CONTACT) => {
                SensorAdapter::new(device.clone(), self.ctx.clone())
                    .map(|sensor| Adapter::Sensor(Arc::new(sensor)))
            }
            kind if kind.is_light() => LightAdapter::new(device.clone(), self.ctx.clone())
                .map(|light| Adapter::Light(Arc::new(light))),
            _ => {
                tracing::debug!(device = %device.id, kind = ?device.device_type, "Skipping unsupported device");
                return None;
            }
        };

        if adapter.is_none() {
            tracing::warn!(device = %device.id, "Skipping device without serial number or hardware id");
        }
        adapter
    }

    /// Removes an accessory and its adapter.
    ///
    /// Returns `false` if no adapter was registered for `key`.
    pub fn remove_accessory(&self, key: &IdentityKey) -> bool {
        let Some(adapter) = self.registry.remove(key) else {
            return false;
        };

        let id = adapter.accessory_id();
        self.restored.lock().remove(&id);
        self.ctx.host().unregister_accessory(id);
        tracing::info!(accessory = %adapter.display_name(), "Removed accessory");
        true
    }
}

impl<S: Session, H: Host> std::fmt::Debug for Bridge<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bridge")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
