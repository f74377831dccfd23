// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Sensor trouble flags.
//!
//! A single trouble code (`senTamp`) drives all three flags together, so they
//! tend to move as a group.

/// Tamper status of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum TamperState {
    /// Enclosure intact.
    #[default]
    NotTampered,
    /// Enclosure opened or removed.
    Tampered,
}

impl TamperState {
    /// Returns the numeric value of the host characteristic.
    #[must_use]
    pub const fn hap_value(&self) -> u8 {
        match self {
            Self::NotTampered => 0,
            Self::Tampered => 1,
        }
    }
}

/// General fault status of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum FaultState {
    /// No fault.
    #[default]
    NoFault,
    /// Some fault is active.
    GeneralFault,
}

impl FaultState {
    /// Returns the numeric value of the host characteristic.
    #[must_use]
    pub const fn hap_value(&self) -> u8 {
        match self {
            Self::NoFault => 0,
            Self::GeneralFault => 1,
        }
    }
}

/// Battery level status of a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum BatteryState {
    /// Battery level normal.
    #[default]
    Normal,
    /// Battery level low.
    Low,
}

impl BatteryState {
    /// Returns the numeric value of the host characteristic.
    #[must_use]
    pub const fn hap_value(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Low => 1,
        }
    }
}
