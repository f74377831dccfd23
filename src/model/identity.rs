// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device identity.
//!
//! A device's identity key is its serial number when it has one, else its
//! hardware id. Two devices are the same entity iff their keys are equal.
//! The key is used both to derive the host accessory id and to match polled
//! snapshot rows back to adapters, so it is computed in exactly one place:
//! [`IdentityKey::resolve`].

use std::fmt;

use uuid::Uuid;

/// Namespace for deriving accessory ids from identity keys.
const ACCESSORY_NAMESPACE: Uuid = Uuid::from_u128(0x6c1f_3a2e_9d4b_5e07_8a61_c2f4_0b9e_d713);

/// Stable identity of a device: serial number, else hardware id.
///
/// # Examples
///
/// ```
/// use icontrol_bridge::model::IdentityKey;
///
/// let key = IdentityKey::resolve(Some("SN-1"), Some("HW-1")).unwrap();
/// assert_eq!(key.as_str(), "SN-1");
///
/// let key = IdentityKey::resolve(None, Some("HW-1")).unwrap();
/// assert_eq!(key.as_str(), "HW-1");
///
/// assert!(IdentityKey::resolve(None, None).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Resolves the identity key from a serial number and a hardware id.
    ///
    /// Empty strings count as absent. Returns `None` when neither is usable.
    #[must_use]
    pub fn resolve(serial_number: Option<&str>, hardware_id: Option<&str>) -> Option<Self> {
        serial_number
            .filter(|s| !s.is_empty())
            .or(hardware_id.filter(|h| !h.is_empty()))
            .map(|key| Self(key.to_string()))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Host accessory identifier.
///
/// Derived deterministically from an [`IdentityKey`] so that the same device
/// maps to the same accessory across restarts, which is what lets the host
/// hand persisted accessories back to the bridge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccessoryId(Uuid);

impl AccessoryId {
    /// Derives the accessory id for an identity key.
    #[must_use]
    pub fn for_key(key: &IdentityKey) -> Self {
        Self(Uuid::new_v5(&ACCESSORY_NAMESPACE, key.as_str().as_bytes()))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Debug for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // First 8 characters are enough to tell accessories apart in logs
        let short = &self.0.to_string()[..8];
        write!(f, "AccessoryId({short}...)")
    }
}

impl fmt::Display for AccessoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AccessoryId> for Uuid {
    fn from(id: AccessoryId) -> Self {
        id.0
    }
}
