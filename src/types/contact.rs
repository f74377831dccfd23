// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contact sensor state.

/// Reading of a dry-contact sensor.
///
/// `NotDetected` means the magnet is away from the reed switch: the door or
/// window is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum ContactState {
    /// Contact made, door closed.
    #[default]
    Detected,
    /// Contact broken, door open.
    NotDetected,
}

impl ContactState {
    /// Returns the numeric value of the host characteristic.
    #[must_use]
    pub const fn hap_value(&self) -> u8 {
        match self {
            Self::Detected => 0,
            Self::NotDetected => 1,
        }
    }

    /// Returns `true` when the sensor reports the door as open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::NotDetected)
    }
}
