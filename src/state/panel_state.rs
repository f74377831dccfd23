// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Security panel state.

use crate::types::ArmState;

use super::StateChange;

/// Target and current arm state of a panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PanelState {
    target: ArmState,
    current: ArmState,
}

impl PanelState {
    /// Returns the requested mode.
    #[must_use]
    pub fn target(&self) -> ArmState {
        self.target
    }

    /// Returns the mode the panel is actually in.
    #[must_use]
    pub fn current(&self) -> ArmState {
        self.current
    }

    /// Applies a change, ignoring changes for other device kinds.
    ///
    /// Returns `true` if the state changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        let (slot, value) = match change {
            StateChange::TargetArmState(state) => (&mut self.target, *state),
            StateChange::CurrentArmState(state) => (&mut self.current, *state),
            _ => return false,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }
}
