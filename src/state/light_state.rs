// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light state.

use chrono::{DateTime, Utc};

use crate::types::Brightness;

use super::StateChange;

/// On/off and brightness of a light.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LightState {
    on: bool,
    brightness: Brightness,
    /// Time of the last command issued through the bridge.
    last_set: Option<DateTime<Utc>>,
}

impl LightState {
    /// Returns whether the light is on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.on
    }

    /// Returns the brightness.
    #[must_use]
    pub fn brightness(&self) -> Brightness {
        self.brightness
    }

    /// Returns when a command was last issued through the bridge.
    ///
    /// Informational only; polls and events do not consult it.
    #[must_use]
    pub fn last_set(&self) -> Option<DateTime<Utc>> {
        self.last_set
    }

    /// Records a user-issued command.
    pub fn mark_set(&mut self, at: DateTime<Utc>) {
        self.last_set = Some(at);
    }

    /// Applies a change, ignoring changes for other device kinds.
    ///
    /// Returns `true` if the state changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match *change {
            StateChange::On(on) => {
                let changed = self.on != on;
                self.on = on;
                changed
            }
            StateChange::Brightness(level) => {
                let changed = self.brightness != level;
                self.brightness = level;
                changed
            }
            _ => false,
        }
    }
}
