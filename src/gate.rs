// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arm-time door check.
//!
//! Away and night modes may only be armed while every configured security
//! door reads closed. The check uses the cached contact states; it never
//! polls.

use std::sync::Arc;

use crate::types::{ArmState, ContactState};

/// A door the gate can inspect.
pub trait DoorSensor {
    /// Name used in log lines.
    fn door_name(&self) -> &str;

    /// Cached contact reading.
    fn contact_state(&self) -> ContactState;
}

impl<T: DoorSensor + ?Sized> DoorSensor for Arc<T> {
    fn door_name(&self) -> &str {
        (**self).door_name()
    }

    fn contact_state(&self) -> ContactState {
        (**self).contact_state()
    }
}

/// Outcome of [`SecurityGate::can_arm`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GateDecision {
    /// Whether the requested mode may be armed.
    pub allowed: bool,
    /// Names of the doors that read open.
    pub open_doors: Vec<String>,
}

/// Decides whether a mode may be armed given the security doors.
///
/// # Examples
///
/// ```
/// use icontrol_bridge::gate::{DoorSensor, SecurityGate};
/// use icontrol_bridge::types::{ArmState, ContactState};
///
/// struct Door(&'static str, ContactState);
///
/// impl DoorSensor for Door {
///     fn door_name(&self) -> &str { self.0 }
///     fn contact_state(&self) -> ContactState { self.1 }
/// }
///
/// let doors = [Door("Front", ContactState::NotDetected)];
///
/// assert!(!SecurityGate::can_arm(ArmState::Away, &doors).allowed);
/// assert!(SecurityGate::can_arm(ArmState::Stay, &doors).allowed);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SecurityGate;

impl SecurityGate {
    /// Checks `doors` for a request to enter `requested`.
    ///
    /// Modes other than away and night are always allowed. With no doors
    /// configured every mode is allowed.
    #[must_use]
    pub fn can_arm<D: DoorSensor>(requested: ArmState, doors: &[D]) -> GateDecision {
        if !requested.requires_closed_doors() {
            return GateDecision {
                allowed: true,
                open_doors: Vec::new(),
            };
        }

        let open_doors: Vec<String> = doors
            .iter()
            .filter(|door| door.contact_state().is_open())
            .map(|door| door.door_name().to_string())
            .collect();

        GateDecision {
            allowed: open_doors.is_empty(),
            open_doors,
        }
    }
}
