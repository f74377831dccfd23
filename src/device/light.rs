// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light adapter.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::{AccessoryBinding, AdapterContext, EventSink, publish};
use crate::error::{DeviceError, Result, ValueError};
use crate::host::{AccessoryKind, Host};
use crate::model::{AccessoryId, Device, Event, IdentityKey, Snapshot};
use crate::protocol::{Request, Session};
use crate::state::{LightState, StateChange};
use crate::translate;
use crate::types::Brightness;

/// Command path for property updates.
const UPDATE_PATH: &str = "client/icontrol/update/device";

/// Link relation of the on/off property.
const IS_ON_LINK: &str = "isOn";

/// Link relation of the level property.
const LEVEL_LINK: &str = "level";

/// Adapter exposing a light switch or dimmer as a lightbulb accessory.
///
/// Lights are matched against status snapshots by hardware id alone.
pub struct LightAdapter<S: Session, H: Host> {
    binding: AccessoryBinding,
    ctx: AdapterContext<S, H>,
    state: RwLock<LightState>,
}

impl<S: Session, H: Host> LightAdapter<S, H> {
    /// Creates an adapter for a light row.
    ///
    /// The brightness characteristic is exposed when the row allows
    /// dimming. Returns `None` if the row has no identity key.
    #[must_use]
    pub fn new(device: Device, ctx: AdapterContext<S, H>) -> Option<Self> {
        let dimmable = device.properties().dim_allowed();
        let binding = AccessoryBinding::new(device, AccessoryKind::Lightbulb { dimmable })?;
        Some(Self {
            binding,
            ctx,
            state: RwLock::new(LightState::default()),
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

    /// Returns `true` if the brightness characteristic is exposed.
    #[must_use]
    pub fn is_dimmable(&self) -> bool {
        matches!(self.binding.kind, AccessoryKind::Lightbulb { dimmable: true })
    }

    /// Returns the cached state without polling.
    #[must_use]
    pub fn state(&self) -> LightState {
        *self.state.read()
    }

    fn matching_row<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a Device> {
        snapshot.find_by_hardware_id(self.binding.device.hardware_id.as_deref()?)
    }

    // ========================================================================
    // Host reads
    // ========================================================================

    /// Returns the cached on state and refreshes it in the background.
    pub fn get_on_state(self: &Arc<Self>) -> bool {
        let cached = self.state.read().is_on();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.refresh_on_state().await {
                tracing::warn!(accessory = %this.binding.name, error = %e, "Failed to poll light state");
            }
        });

        cached
    }

    /// Polls the cloud and publishes the on state.
    ///
    /// A row without a readable `isOn` republishes the cached value.
    ///
    /// # Errors
    ///
    /// Returns error if the status poll fails.
    pub async fn refresh_on_state(&self) -> Result<Option<bool>> {
        let snapshot = self.ctx.session().current_status().await?;
        let Some(row) = self.matching_row(&snapshot) else {
            tracing::debug!(accessory = %self.binding.name, "Light missing from status snapshot");
            return Ok(None);
        };

        let on = row
            .properties()
            .is_on()
            .and_then(translate::as_flag)
            .unwrap_or_else(|| self.state.read().is_on());
        self.apply(StateChange::On(on));
        Ok(Some(on))
    }

    /// Returns the cached brightness and refreshes it in the background.
    pub fn get_brightness(self: &Arc<Self>) -> Brightness {
        let cached = self.state.read().brightness();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.refresh_brightness().await {
                tracing::warn!(accessory = %this.binding.name, error = %e, "Failed to poll brightness");
            }
        });

        cached
    }

    /// Polls the cloud and publishes the brightness.
    ///
    /// Levels outside 0-100 are clamped. A row without a numeric `level`
    /// republishes the cached value.
    ///
    /// # Errors
    ///
    /// Returns error if the status poll fails.
    pub async fn refresh_brightness(&self) -> Result<Option<Brightness>> {
        let snapshot = self.ctx.session().current_status().await?;
        let Some(row) = self.matching_row(&snapshot) else {
            tracing::debug!(accessory = %self.binding.name, "Light missing from status snapshot");
            return Ok(None);
        };

        let level = row
            .properties()
            .level()
            .and_then(level_as_i64)
            .map_or_else(|| self.state.read().brightness(), Brightness::saturating_from_i64);
        self.apply(StateChange::Brightness(level));
        Ok(Some(level))
    }

    // ========================================================================
    // Host writes
    // ========================================================================

    /// Switches the light on a detached task.
    pub fn set_on_state(self: &Arc<Self>, on: bool) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.change_on_state(on).await {
                tracing::warn!(accessory = %this.binding.name, on, error = %e, "Failed to switch light");
            }
        })
    }

    /// Switches the light and waits for the cloud to accept.
    ///
    /// # Errors
    ///
    /// Returns error if the row has no `isOn` link or the command fails.
    pub async fn change_on_state(&self, on: bool) -> Result<()> {
        self.send_update(IS_ON_LINK, on.to_string()).await?;
        self.apply(StateChange::On(on));
        Ok(())
    }

    /// Sets the level on a detached task.
    pub fn set_brightness(self: &Arc<Self>, level: Brightness) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.change_brightness(level).await {
                tracing::warn!(accessory = %this.binding.name, %level, error = %e, "Failed to set brightness");
            }
        })
    }

    /// Sets the level and waits for the cloud to accept.
    ///
    /// # Errors
    ///
    /// Returns error if the row has no `level` link or the command fails.
    pub async fn change_brightness(&self, level: Brightness) -> Result<()> {
        self.send_update(LEVEL_LINK, level.value().to_string()).await?;
        self.apply(StateChange::Brightness(level));
        Ok(())
    }

    async fn send_update(&self, relation: &'static str, value: String) -> Result<()> {
        self.state.write().mark_set(Utc::now());

        let href = self
            .binding
            .device
            .link(relation)
            .ok_or_else(|| DeviceError::MissingLink {
                device: self.binding.name.clone(),
                link: relation,
            })?;
        let request = Request::post(UPDATE_PATH)
            .with_field("path", href)
            .with_field("value", value);

        tracing::debug!(accessory = %self.binding.name, property = relation, "Updating light");
        self.ctx.session().authenticated_request(request).await?;
        Ok(())
    }

    fn apply(&self, change: StateChange) {
        self.state.write().apply(&change);
        publish(self.ctx.host().as_ref(), self.binding.id, change);
    }
}

/// Reads a level that may arrive as number or numeric string.
fn level_as_i64(raw: &Value) -> Option<i64> {
    match raw {
        // Safe: levels are small; out-of-range floats saturate
        #[allow(clippy::cast_possible_truncation)]
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses a pushed level, which must already be within 0-100.
fn event_level(raw: Option<&Value>) -> Result<Brightness> {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return Ok(Brightness::clamped(0));
    };

    let level = level_as_i64(raw).ok_or_else(|| ValueError::WrongType {
        field: "level".to_string(),
        expected: "integer",
    })?;

    match u8::try_from(level) {
        Ok(value) => Ok(Brightness::new(value)?),
        Err(_) => Err(ValueError::OutOfRange {
            min: u16::from(Brightness::MIN.value()),
            max: u16::from(Brightness::MAX.value()),
            actual: u16::try_from(level.max(0)).unwrap_or(u16::MAX),
        }
        .into()),
    }
}

impl<S: Session, H: Host> LightAdapter<S, H> {
    fn handle_event(self: &Arc<Self>, event: &Event) -> Result<()> {
        if event.is_for(&self.binding.device.id) {
            let level = event_level(event.metadata.level.as_ref())?;
            self.apply(StateChange::Brightness(level));
        } else if event.is_lighting_update() {
            // The broadcast does not say which light changed
            self.get_on_state();
        }
        Ok(())
    }
}

impl<S: Session, H: Host> EventSink for Arc<LightAdapter<S, H>> {
    fn on_event(&self, event: &Event) -> Result<()> {
        self.handle_event(event)
    }
}
