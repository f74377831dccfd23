// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A state change names one host characteristic and its new value. Adapters
//! apply changes to their own canonical state and publish the same values to
//! the host.
//!
//! # Change Types
//!
//! - [`StateChange::TargetArmState`] / [`StateChange::CurrentArmState`] - Panel
//! - [`StateChange::Contact`], [`StateChange::Tamper`], [`StateChange::Fault`],
//!   [`StateChange::Battery`] - Contact sensor
//! - [`StateChange::On`] / [`StateChange::Brightness`] - Light

use crate::translate;
use crate::types::{ArmState, BatteryState, Brightness, ContactState, FaultState, TamperState};

/// A change to one host-facing characteristic.
///
/// # Examples
///
/// ```
/// use icontrol_bridge::state::StateChange;
/// use icontrol_bridge::types::TamperState;
/// use serde_json::json;
///
/// let changes = StateChange::from_trouble(&json!("senTamp"));
/// assert_eq!(changes[0], StateChange::Tamper(TamperState::Tampered));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Requested panel mode.
    TargetArmState(ArmState),
    /// Mode the panel is actually in.
    CurrentArmState(ArmState),
    /// Contact sensor reading.
    Contact(ContactState),
    /// Sensor tamper status.
    Tamper(TamperState),
    /// Sensor fault status.
    Fault(FaultState),
    /// Sensor battery status.
    Battery(BatteryState),
    /// Light on/off.
    On(bool),
    /// Light level.
    Brightness(Brightness),
}

impl StateChange {
    /// Builds the tamper, fault and battery changes for a trouble token or
    /// flag.
    #[must_use]
    pub fn from_trouble(raw: &serde_json::Value) -> [Self; 3] {
        [
            Self::Tamper(translate::trouble_to_tamper_state(raw)),
            Self::Fault(translate::trouble_to_fault_state(raw)),
            Self::Battery(translate::trouble_to_battery_state(raw)),
        ]
    }

    /// Returns `true` if this is a panel change.
    #[must_use]
    pub fn is_panel(&self) -> bool {
        matches!(self, Self::TargetArmState(_) | Self::CurrentArmState(_))
    }

    /// Returns `true` if this is a sensor change.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        matches!(
            self,
            Self::Contact(_) | Self::Tamper(_) | Self::Fault(_) | Self::Battery(_)
        )
    }

    /// Returns `true` if this is a light change.
    #[must_use]
    pub fn is_light(&self) -> bool {
        matches!(self, Self::On(_) | Self::Brightness(_))
    }

    /// Returns the numeric characteristic value the host expects.
    #[must_use]
    pub fn hap_value(&self) -> u8 {
        match self {
            Self::TargetArmState(state) | Self::CurrentArmState(state) => state.hap_value(),
            Self::Contact(state) => state.hap_value(),
            Self::Tamper(state) => state.hap_value(),
            Self::Fault(state) => state.hap_value(),
            Self::Battery(state) => state.hap_value(),
            Self::On(on) => u8::from(*on),
            Self::Brightness(level) => level.value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trouble_restore_clears_all_flags() {
        assert_eq!(
            StateChange::from_trouble(&json!("senTampRes")),
            [
                StateChange::Tamper(TamperState::NotTampered),
                StateChange::Fault(FaultState::NoFault),
                StateChange::Battery(BatteryState::Normal),
            ]
        );
    }

    #[test]
    fn categories() {
        assert!(StateChange::TargetArmState(ArmState::Away).is_panel());
        assert!(StateChange::Contact(ContactState::Detected).is_sensor());
        assert!(StateChange::On(true).is_light());
        assert!(!StateChange::On(true).is_panel());
    }

    #[test]
    fn hap_values() {
        assert_eq!(StateChange::CurrentArmState(ArmState::Disarmed).hap_value(), 3);
        assert_eq!(StateChange::On(true).hap_value(), 1);
        assert_eq!(StateChange::Brightness(Brightness::clamped(40)).hap_value(), 40);
    }
}
