// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Translation of raw cloud values into canonical states.
//!
//! Every function here is total: unknown or absent input maps to the safe
//! default (disarmed, contact detected, no trouble). The cloud mixes booleans
//! and their string spellings freely, so inputs are taken as raw
//! [`serde_json::Value`]s.
//!
//! # Examples
//!
//! ```
//! use icontrol_bridge::translate;
//! use icontrol_bridge::types::{ArmState, ContactState};
//! use serde_json::json;
//!
//! assert_eq!(translate::arm_state_to_canonical(Some("night")), ArmState::Night);
//! assert_eq!(translate::arm_state_to_canonical(Some("bogus")), ArmState::Disarmed);
//!
//! // A faulted contact is an open door
//! assert_eq!(translate::faulted_to_contact_state(&json!("true")), ContactState::NotDetected);
//! ```

use serde_json::Value;

use crate::types::{ArmState, BatteryState, ContactState, FaultState, TamperState};

/// Trouble code raised when a sensor is tampered with.
pub const SENSOR_TAMPER: &str = "senTamp";

/// Trouble code raised when a sensor tamper is restored.
pub const SENSOR_TAMPER_RESTORED: &str = "senTampRes";

/// Panel status while an arm sequence is still counting down.
pub const STATUS_ARMING: &str = "arming";

/// Maps a raw arm type onto an [`ArmState`].
#[must_use]
pub fn arm_state_to_canonical(raw: Option<&str>) -> ArmState {
    match raw {
        Some("away") => ArmState::Away,
        Some("night") => ArmState::Night,
        Some("stay") => ArmState::Stay,
        _ => ArmState::Disarmed,
    }
}

/// Maps an [`ArmState`] back onto the raw arm type used in commands.
#[must_use]
pub const fn canonical_to_arm_state(state: ArmState) -> &'static str {
    match state {
        ArmState::Disarmed => "disarmed",
        ArmState::Away => "away",
        ArmState::Night => "night",
        ArmState::Stay => "stay",
    }
}

/// Derives a panel's current state from a polled row.
///
/// While the panel is still arming the current state stays disarmed; only
/// the target reflects the requested mode.
#[must_use]
pub fn polled_current_arm_state(arm_type: Option<&str>, status: Option<&str>) -> ArmState {
    match arm_state_to_canonical(arm_type) {
        state if state.is_armed() && status == Some(STATUS_ARMING) => ArmState::Disarmed,
        state => state,
    }
}

/// Maps a raw `isFaulted` flag onto a [`ContactState`].
///
/// A faulted contact is an open door, so `true` means contact *not*
/// detected. Anything other than `true`/`"true"` reads as detected.
#[must_use]
pub fn faulted_to_contact_state(raw: &Value) -> ContactState {
    if is_truthy(raw) {
        ContactState::NotDetected
    } else {
        ContactState::Detected
    }
}

/// Maps a trouble token or flag onto a [`TamperState`].
#[must_use]
pub fn trouble_to_tamper_state(raw: &Value) -> TamperState {
    if is_tamper_active(raw) {
        TamperState::Tampered
    } else {
        TamperState::NotTampered
    }
}

/// Maps a trouble token or flag onto a [`FaultState`].
#[must_use]
pub fn trouble_to_fault_state(raw: &Value) -> FaultState {
    if is_tamper_active(raw) {
        FaultState::GeneralFault
    } else {
        FaultState::NoFault
    }
}

/// Maps a trouble token or flag onto a [`BatteryState`].
#[must_use]
pub fn trouble_to_battery_state(raw: &Value) -> BatteryState {
    if is_tamper_active(raw) {
        BatteryState::Low
    } else {
        BatteryState::Normal
    }
}

/// Returns `true` if the token names a tamper transition this bridge tracks.
#[must_use]
pub fn is_tamper_token(raw: &Value) -> bool {
    matches!(raw.as_str(), Some(SENSOR_TAMPER | SENSOR_TAMPER_RESTORED))
}

/// Reads a boolean that may be spelled as a string.
///
/// Returns `None` for anything that is neither.
#[must_use]
pub fn as_flag(raw: &Value) -> Option<bool> {
    match raw {
        Value::Bool(b) => Some(*b),
        Value::String(s) if s == "true" => Some(true),
        Value::String(s) if s == "false" => Some(false),
        _ => None,
    }
}

fn is_truthy(raw: &Value) -> bool {
    as_flag(raw) == Some(true)
}

fn is_tamper_active(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::String(s) => s == SENSOR_TAMPER,
        _ => false,
    }
}
