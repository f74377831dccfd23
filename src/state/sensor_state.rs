// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Contact sensor state.

use crate::types::{BatteryState, ContactState, FaultState, TamperState};

use super::StateChange;

/// Contact reading and trouble flags of a dry-contact sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorState {
    contact: ContactState,
    tamper: TamperState,
    fault: FaultState,
    battery: BatteryState,
}

impl SensorState {
    /// Returns the contact reading.
    #[must_use]
    pub fn contact(&self) -> ContactState {
        self.contact
    }

    /// Returns the tamper status.
    #[must_use]
    pub fn tamper(&self) -> TamperState {
        self.tamper
    }

    /// Returns the fault status.
    #[must_use]
    pub fn fault(&self) -> FaultState {
        self.fault
    }

    /// Returns the battery status.
    #[must_use]
    pub fn battery(&self) -> BatteryState {
        self.battery
    }

    /// Applies a change, ignoring changes for other device kinds.
    ///
    /// Returns `true` if the state changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let before = *self;
        match *change {
            StateChange::Contact(state) => self.contact = state,
            StateChange::Tamper(state) => self.tamper = state,
            StateChange::Fault(state) => self.fault = state,
            StateChange::Battery(state) => self.battery = state,
            _ => return false,
        }
        before != *self
    }
}
