// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device rows as returned by the status endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::{IdentityKey, null_as_default};

/// Result of a status poll.
///
/// Rows that cannot be read are logged and left out, so one bad row never
/// hides the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Every readable device row known to the account.
    #[serde(default, deserialize_with = "readable_rows")]
    pub devices: Vec<Device>,
}

impl Snapshot {
    /// Creates a snapshot from a list of devices.
    #[must_use]
    pub fn new(devices: Vec<Device>) -> Self {
        Self { devices }
    }

    /// Returns the first row whose identity key equals `key`.
    ///
    /// Later rows resolving to the same key are ignored.
    #[must_use]
    pub fn find_by_identity(&self, key: &IdentityKey) -> Option<&Device> {
        self.devices
            .iter()
            .find(|device| device.identity_key().as_ref() == Some(key))
    }

    /// Returns the first row with the given hardware id.
    #[must_use]
    pub fn find_by_hardware_id(&self, hardware_id: &str) -> Option<&Device> {
        self.devices
            .iter()
            .find(|device| device.hardware_id.as_deref() == Some(hardware_id))
    }
}

/// Kind of device reported by the cloud API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceType {
    /// Security panel.
    Panel,
    /// Sensor (dry contact, motion, ...).
    Sensor,
    /// On/off light switch.
    LightSwitch,
    /// Dimmable light.
    LightDimmer,
    /// Anything else (peripherals, cameras, ...).
    #[default]
    #[serde(other)]
    Other,
}

impl DeviceType {
    /// Returns `true` for either light kind.
    #[must_use]
    pub const fn is_light(&self) -> bool {
        matches!(self, Self::LightSwitch | Self::LightDimmer)
    }
}

/// A device as described by the cloud API.
///
/// Identity fields are fixed for the life of the device; `properties` and
/// `trouble` arrive fresh on every poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Opaque device id, used to route pushed events.
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    /// User-assigned name, possibly empty.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Device kind.
    #[serde(default, deserialize_with = "null_as_default")]
    pub device_type: DeviceType,
    /// Serial number, when the device has one.
    #[serde(default, deserialize_with = "string_like")]
    pub serial_number: Option<String>,
    /// Hardware id, the identity fallback.
    #[serde(default, deserialize_with = "string_like")]
    pub hardware_id: Option<String>,
    /// Manufacturer name.
    #[serde(default, deserialize_with = "string_like")]
    pub manufacturer: Option<String>,
    /// Model name.
    #[serde(default, deserialize_with = "string_like")]
    pub model: Option<String>,
    /// Firmware revision.
    #[serde(default, deserialize_with = "string_like")]
    pub firmware_version: Option<String>,
    /// Live properties.
    #[serde(default)]
    pub properties: Option<DeviceProperties>,
    /// Active trouble conditions.
    #[serde(default, deserialize_with = "null_as_default")]
    pub trouble: Vec<Trouble>,
    /// Control links, keyed by relation name (`panel/arm`, `isOn`, ...).
    #[serde(default, rename = "_links", deserialize_with = "null_as_default")]
    pub links: HashMap<String, Link>,
}

impl Device {
    /// Resolves this device's identity key.
    #[must_use]
    pub fn identity_key(&self) -> Option<IdentityKey> {
        IdentityKey::resolve(self.serial_number.as_deref(), self.hardware_id.as_deref())
    }

    /// Returns the href of the named link, if present.
    #[must_use]
    pub fn link(&self, relation: &str) -> Option<&str> {
        self.links.get(relation).map(|link| link.href.as_str())
    }

    /// Returns `true` if any active trouble carries the given code.
    #[must_use]
    pub fn has_trouble(&self, code: &str) -> bool {
        self.trouble.iter().any(|t| t.name == code)
    }

    /// Returns the live properties, or an empty set when the row has none.
    #[must_use]
    pub fn properties(&self) -> &DeviceProperties {
        static EMPTY: std::sync::OnceLock<DeviceProperties> = std::sync::OnceLock::new();
        self.properties
            .as_ref()
            .unwrap_or_else(|| EMPTY.get_or_init(DeviceProperties::default))
    }
}

/// Free-form device properties.
///
/// Only a handful of keys matter to the bridge; accessors return `None` when
/// a key is absent or has an unusable type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceProperties(Map<String, Value>);

impl DeviceProperties {
    /// Creates properties from a JSON map.
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Returns a raw property value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Panel arm type: `away`, `night`, `stay`, `disarmed` or absent.
    #[must_use]
    pub fn arm_type(&self) -> Option<&str> {
        self.str("armType")
    }

    /// Panel status, e.g. `arming`.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.str("status")
    }

    /// Raw faulted flag of a sensor (boolean or string).
    #[must_use]
    pub fn is_faulted(&self) -> Option<&Value> {
        self.0.get("isFaulted")
    }

    /// Sensor kind, e.g. `dryContact`.
    #[must_use]
    pub fn sensor_type(&self) -> Option<&str> {
        self.str("sensorType")
    }

    /// Raw on flag of a light (boolean or string).
    #[must_use]
    pub fn is_on(&self) -> Option<&Value> {
        self.0.get("isOn")
    }

    /// Raw level of a dimmable light.
    #[must_use]
    pub fn level(&self) -> Option<&Value> {
        self.0.get("level")
    }

    /// Whether the light accepts level changes.
    #[must_use]
    pub fn dim_allowed(&self) -> bool {
        self.0
            .get("dimAllowed")
            .is_some_and(|v| v.as_bool() == Some(true) || v.as_str() == Some("true"))
    }
}

/// An active trouble condition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trouble {
    /// Trouble code, e.g. `senTamp`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// A control link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Resource path to post commands against.
    pub href: String,
}

/// Reads the device list row by row, dropping rows that do not parse.
fn readable_rows<'de, D>(deserializer: D) -> Result<Vec<Device>, D::Error>
where
    D: Deserializer<'de>,
{
    let rows = Option::<Vec<Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(rows
        .into_iter()
        .enumerate()
        .filter_map(|(index, row)| {
            serde_json::from_value(row)
                .inspect_err(|e| tracing::warn!(row = index, error = %e, "Skipping malformed device row"))
                .ok()
        })
        .collect())
}

/// Accepts strings and numbers, rendering numbers as strings.
fn string_like<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}
