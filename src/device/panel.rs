// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Security panel adapter.

use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::RwLock;
use tokio::task::JoinHandle;

use super::{AccessoryBinding, AdapterContext, EventSink, SensorAdapter, publish};
use crate::error::{DeviceError, Result};
use crate::gate::SecurityGate;
use crate::host::{AccessoryKind, Host};
use crate::manager::{BridgeConfig, Registry};
use crate::model::{AccessoryId, Device, Event, IdentityKey};
use crate::protocol::{Request, Session};
use crate::state::{PanelState, StateChange};
use crate::translate::{self, STATUS_ARMING};
use crate::types::ArmState;

/// Command path for arming.
const ARM_PATH: &str = "client/icontrol/panel/arm";

/// Command path for disarming.
const DISARM_PATH: &str = "client/icontrol/panel/disarm";

/// Link relation of the arm resource.
const ARM_LINK: &str = "panel/arm";

/// Link relation of the disarm resource.
const DISARM_LINK: &str = "panel/disarm";

/// Result of a target state change that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArmOutcome {
    /// The cloud accepted the command.
    Applied,
    /// A security door was open; no command was sent and the target was
    /// reverted.
    Refused {
        /// Names of the open doors.
        open_doors: Vec<String>,
    },
}

/// Adapter exposing the alarm panel as a security system accessory.
///
/// Away and night requests are checked against the configured security
/// doors first. The doors are looked up by display name in the registry the
/// panel belongs to, so sensors added later are picked up.
pub struct PanelAdapter<S: Session, H: Host> {
    binding: AccessoryBinding,
    ctx: AdapterContext<S, H>,
    state: RwLock<PanelState>,
    registry: Weak<Registry<S, H>>,
    security_doors: Vec<String>,
    revert_delay: Duration,
}

impl<S: Session, H: Host> PanelAdapter<S, H> {
    /// Creates an adapter for a panel row.
    ///
    /// Returns `None` if the row has no identity key.
    #[must_use]
    pub fn new(
        device: Device,
        ctx: AdapterContext<S, H>,
        registry: Weak<Registry<S, H>>,
        config: &BridgeConfig,
    ) -> Option<Self> {
        let binding = AccessoryBinding::new(device, AccessoryKind::SecuritySystem)?;
        Some(Self {
            binding,
            ctx,
            state: RwLock::new(PanelState::default()),
            registry,
            security_doors: config.security_doors.clone(),
            revert_delay: config.arm_revert_delay,
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
    pub fn state(&self) -> PanelState {
        *self.state.read()
    }

    // ========================================================================
    // Host reads
    // ========================================================================

    /// Returns the cached target state and refreshes it in the background.
    pub fn get_target_state(self: &Arc<Self>) -> ArmState {
        let cached = self.state.read().target();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.refresh_target_state().await {
                tracing::warn!(accessory = %this.binding.name, error = %e, "Failed to poll target state");
            }
        });

        cached
    }

    /// Polls the cloud and publishes the target state.
    ///
    /// # Errors
    ///
    /// Returns error if the status poll fails.
    pub async fn refresh_target_state(&self) -> Result<Option<ArmState>> {
        let snapshot = self.ctx.session().current_status().await?;
        let Some(row) = snapshot.find_by_identity(&self.binding.key) else {
            tracing::debug!(accessory = %self.binding.name, "Panel missing from status snapshot");
            return Ok(None);
        };

        let target = translate::arm_state_to_canonical(row.properties().arm_type());
        self.apply(StateChange::TargetArmState(target));
        Ok(Some(target))
    }

    /// Returns the cached current state and refreshes it in the background.
    pub fn get_current_state(self: &Arc<Self>) -> ArmState {
        let cached = self.state.read().current();

        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.refresh_current_state().await {
                tracing::warn!(accessory = %this.binding.name, error = %e, "Failed to poll current state");
            }
        });

        cached
    }

    /// Polls the cloud and publishes the current state.
    ///
    /// A panel that is still arming reads as disarmed.
    ///
    /// # Errors
    ///
    /// Returns error if the status poll fails.
    pub async fn refresh_current_state(&self) -> Result<Option<ArmState>> {
        let snapshot = self.ctx.session().current_status().await?;
        let Some(row) = snapshot.find_by_identity(&self.binding.key) else {
            tracing::debug!(accessory = %self.binding.name, "Panel missing from status snapshot");
            return Ok(None);
        };

        let properties = row.properties();
        let current = translate::polled_current_arm_state(properties.arm_type(), properties.status());
        self.apply(StateChange::CurrentArmState(current));
        Ok(Some(current))
    }

    // ========================================================================
    // Host writes
    // ========================================================================

    /// Requests a new mode on a detached task.
    ///
    /// The handle resolves once the command (or the refusal and its revert)
    /// has completed; failures are logged.
    pub fn set_target_state(self: &Arc<Self>, requested: ArmState) -> JoinHandle<()> {
        let this = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = this.change_target_state(requested).await {
                tracing::warn!(
                    accessory = %this.binding.name,
                    requested = %requested,
                    error = %e,
                    "Failed to set target state"
                );
            }
        })
    }

    /// Requests a new mode and waits for the outcome.
    ///
    /// Away and night are refused while a security door is open. A refusal
    /// sends nothing; after the revert delay the previous target is
    /// published again so the host drops the rejected request.
    ///
    /// On success the target is updated. Disarming also updates the current
    /// state, since the cloud pushes no event for it.
    ///
    /// # Errors
    ///
    /// Returns error if the panel row lacks the needed link or the command
    /// fails. The cached state is left unchanged.
    pub async fn change_target_state(&self, requested: ArmState) -> Result<ArmOutcome> {
        if requested.requires_closed_doors() {
            let doors = self.security_door_sensors();
            if !doors.is_empty() {
                tracing::debug!(accessory = %self.binding.name, count = doors.len(), "Checking security doors");
            }

            let decision = SecurityGate::can_arm(requested, &doors);
            if !decision.allowed {
                tracing::info!(
                    accessory = %self.binding.name,
                    requested = %requested,
                    open_doors = ?decision.open_doors,
                    "Refusing to arm with security doors open"
                );

                let previous = self.state.read().target();
                tokio::time::sleep(self.revert_delay).await;
                publish(self.ctx.host().as_ref(), self.binding.id, StateChange::TargetArmState(previous));

                return Ok(ArmOutcome::Refused {
                    open_doors: decision.open_doors,
                });
            }
        }

        let request = self.arm_request(requested)?;
        tracing::info!(accessory = %self.binding.name, requested = %requested, "Setting target state");

        self.ctx.session().authenticated_request(request).await?;

        self.apply(StateChange::TargetArmState(requested));
        if requested == ArmState::Disarmed {
            self.apply(StateChange::CurrentArmState(ArmState::Disarmed));
        }
        Ok(ArmOutcome::Applied)
    }

    fn arm_request(&self, requested: ArmState) -> Result<Request> {
        let (path, relation) = if requested == ArmState::Disarmed {
            (DISARM_PATH, DISARM_LINK)
        } else {
            (ARM_PATH, ARM_LINK)
        };

        let href = self
            .binding
            .device
            .link(relation)
            .ok_or_else(|| DeviceError::MissingLink {
                device: self.binding.name.clone(),
                link: relation,
            })?;

        let request = Request::post(path)
            .with_field("code", self.ctx.session().pin_code())
            .with_field("path", href);

        Ok(if requested == ArmState::Disarmed {
            request
        } else {
            request.with_field("armType", translate::canonical_to_arm_state(requested))
        })
    }

    /// Resolves the configured door names to registered sensors.
    ///
    /// Names that match nothing, or match something other than a sensor,
    /// are skipped.
    fn security_door_sensors(&self) -> Vec<Arc<SensorAdapter<S, H>>> {
        let Some(registry) = self.registry.upgrade() else {
            return Vec::new();
        };

        self.security_doors
            .iter()
            .filter_map(|name| {
                let found = registry.by_display_name(name);
                if found.is_none() {
                    tracing::debug!(door = %name, "Security door not registered");
                }
                found
            })
            .filter_map(|adapter| adapter.as_sensor().cloned())
            .collect()
    }

    fn apply(&self, change: StateChange) {
        self.state.write().apply(&change);
        publish(self.ctx.host().as_ref(), self.binding.id, change);
    }
}

impl<S: Session, H: Host> EventSink for PanelAdapter<S, H> {
    fn on_event(&self, event: &Event) -> Result<()> {
        if !event.is_security_state_change() {
            return Ok(());
        }
        if event
            .device_id
            .as_deref()
            .is_some_and(|id| id != self.binding.device.id)
        {
            return Ok(());
        }

        let state = translate::arm_state_to_canonical(event.metadata.arm_type.as_deref());
        self.apply(StateChange::TargetArmState(state));
        if event.metadata.status.as_deref() != Some(STATUS_ARMING) {
            self.apply(StateChange::CurrentArmState(state));
        }
        Ok(())
    }
}

impl<S: Session, H: Host> EventSink for Arc<PanelAdapter<S, H>> {
    fn on_event(&self, event: &Event) -> Result<()> {
        (**self).on_event(event)
    }
}
