// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server-pushed events.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::null_as_default;

/// Media type of panel arm/disarm notifications.
pub const SECURITY_STATE_CHANGE: &str = "event/securityStateChange";

/// Command type of the "some light changed" broadcast.
pub const LIGHTING_UPDATE: &str = "lightingUpdate";

/// An event from the subscription stream.
///
/// Events are transient. Each one is offered to every registered adapter,
/// which decides from the `device_id` (or the event kind) whether it cares.
///
/// # Examples
///
/// ```
/// use icontrol_bridge::model::Event;
///
/// let event: Event = serde_json::from_str(
///     r#"{"deviceId":"d1","name":"isFaulted","value":"true"}"#,
/// ).unwrap();
///
/// assert!(event.is_for("d1"));
/// assert_eq!(event.name.as_deref(), Some("isFaulted"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Device the event concerns; absent for broadcasts.
    #[serde(default)]
    pub device_id: Option<String>,
    /// Property or condition name, e.g. `isFaulted` or `trouble`.
    #[serde(default)]
    pub name: Option<String>,
    /// New raw value.
    #[serde(default)]
    pub value: Option<Value>,
    /// Event kind, e.g. `event/securityStateChange`.
    #[serde(default)]
    pub media_type: Option<String>,
    /// Kind-specific details.
    #[serde(default, deserialize_with = "null_as_default")]
    pub metadata: EventMetadata,
}

impl Event {
    /// Converts a raw batch into events, one at a time.
    ///
    /// Items that do not parse are logged and dropped; the rest keep their
    /// order.
    #[must_use]
    pub fn from_batch(batch: Vec<Value>) -> Vec<Self> {
        batch
            .into_iter()
            .enumerate()
            .filter_map(|(index, raw)| {
                serde_json::from_value(raw)
                    .inspect_err(|e| tracing::warn!(item = index, error = %e, "Skipping malformed event"))
                    .ok()
            })
            .collect()
    }

    /// Returns `true` if the event names the given device.
    #[must_use]
    pub fn is_for(&self, device_id: &str) -> bool {
        self.device_id.as_deref() == Some(device_id)
    }

    /// Returns `true` for panel arm-state notifications.
    #[must_use]
    pub fn is_security_state_change(&self) -> bool {
        self.media_type.as_deref() == Some(SECURITY_STATE_CHANGE)
    }

    /// Returns `true` for the light broadcast that does not say which light
    /// changed.
    #[must_use]
    pub fn is_lighting_update(&self) -> bool {
        self.metadata.command_type.as_deref() == Some(LIGHTING_UPDATE)
            || self
                .media_type
                .as_deref()
                .is_some_and(|media| media.ends_with(LIGHTING_UPDATE))
    }
}

/// Event metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    /// Arm type of a security state change.
    #[serde(default)]
    pub arm_type: Option<String>,
    /// Panel status, `arming` while an arm sequence runs.
    #[serde(default)]
    pub status: Option<String>,
    /// Light level.
    #[serde(default)]
    pub level: Option<Value>,
    /// Command type, e.g. `lightingUpdate`.
    #[serde(default)]
    pub command_type: Option<String>,
    /// Anything else the server sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
