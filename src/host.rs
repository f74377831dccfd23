// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The accessory host the bridge publishes into.
//!
//! How the host persists accessories or speaks to its own clients is its
//! business. The bridge only registers accessories, removes them, and pushes
//! characteristic updates through the [`Host`] trait.

use crate::model::{AccessoryId, Device, IdentityKey};
use crate::state::StateChange;

/// Kind of accessory exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessoryKind {
    /// Security system with target and current state.
    SecuritySystem,
    /// Contact sensor with tamper/fault flags and a non-chargeable battery
    /// service.
    ContactSensor,
    /// Lightbulb; brightness is only exposed for dimmable lights.
    Lightbulb {
        /// Whether the brightness characteristic is exposed.
        dimmable: bool,
    },
}

impl AccessoryKind {
    /// Display name used when the cloud name is empty.
    #[must_use]
    pub const fn default_name(&self) -> &'static str {
        match self {
            Self::SecuritySystem => "Security System",
            Self::ContactSensor => "Dry Contact",
            Self::Lightbulb { .. } => "Light",
        }
    }

    /// Model reported when the device carries none.
    #[must_use]
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::SecuritySystem => "Panel",
            Self::ContactSensor => "Sensor",
            Self::Lightbulb { .. } => "Light",
        }
    }
}

/// Descriptive information shown by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryInfo {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
    /// Serial number shown to users.
    pub serial_number: String,
    /// Firmware revision.
    pub firmware_revision: String,
}

impl AccessoryInfo {
    /// Builds the information block for a device, filling gaps with
    /// defaults.
    #[must_use]
    pub fn from_device(device: &Device, kind: AccessoryKind) -> Self {
        fn or_default(value: Option<&str>, default: &str) -> String {
            value
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
                .to_string()
        }

        let serial = device.identity_key();
        Self {
            manufacturer: or_default(device.manufacturer.as_deref(), "iControl"),
            model: or_default(device.model.as_deref(), kind.default_model()),
            serial_number: or_default(serial.as_ref().map(IdentityKey::as_str), "000000"),
            firmware_revision: or_default(device.firmware_version.as_deref(), "1.0"),
        }
    }
}

/// Everything the host needs to create an accessory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessoryRegistration {
    /// Stable accessory id.
    pub id: AccessoryId,
    /// Accessory kind.
    pub kind: AccessoryKind,
    /// Display name.
    pub display_name: String,
    /// Descriptive information.
    pub info: AccessoryInfo,
}

/// The accessory host.
///
/// Calls are notifications and must not block; the bridge invokes them from
/// async tasks.
pub trait Host: Send + Sync + 'static {
    /// Creates a new accessory.
    fn register_accessory(&self, registration: &AccessoryRegistration);

    /// Removes an accessory.
    fn unregister_accessory(&self, id: AccessoryId);

    /// Publishes a new characteristic value.
    fn update_characteristic(&self, id: AccessoryId, change: StateChange);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn info_defaults() {
        let device: Device = serde_json::from_value(json!({ "hardwareId": "HW1" })).unwrap();
        let info = AccessoryInfo::from_device(&device, AccessoryKind::SecuritySystem);

        assert_eq!(info.manufacturer, "iControl");
        assert_eq!(info.model, "Panel");
        assert_eq!(info.serial_number, "HW1");
        assert_eq!(info.firmware_revision, "1.0");
    }

    #[test]
    fn info_prefers_device_values() {
        let device: Device = serde_json::from_value(json!({
            "serialNumber": "SN7",
            "manufacturer": "Acme",
            "model": "DW-2",
            "firmwareVersion": "2.1"
        }))
        .unwrap();
        let info = AccessoryInfo::from_device(&device, AccessoryKind::ContactSensor);

        assert_eq!(info.manufacturer, "Acme");
        assert_eq!(info.model, "DW-2");
        assert_eq!(info.serial_number, "SN7");
        assert_eq!(info.firmware_revision, "2.1");
    }

    #[test]
    fn default_names() {
        assert_eq!(AccessoryKind::ContactSensor.default_name(), "Dry Contact");
        assert_eq!(
            AccessoryKind::Lightbulb { dimmable: false }.default_name(),
            "Light"
        );
    }
}
