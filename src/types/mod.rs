// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical value types exposed to the accessory host.
//!
//! These are the host-facing representations of device conditions. Raw cloud
//! values are mapped onto them by [`crate::translate`].
//!
//! # Types
//!
//! - [`ArmState`] - Security panel mode (Disarmed/Away/Night/Stay)
//! - [`ContactState`] - Dry-contact sensor reading
//! - [`TamperState`], [`FaultState`], [`BatteryState`] - Sensor trouble flags
//! - [`Brightness`] - Light level (0-100%)

mod arm_state;
mod brightness;
mod contact;
mod trouble;

pub use arm_state::ArmState;
pub use brightness::Brightness;
pub use contact::ContactState;
pub use trouble::{BatteryState, FaultState, TamperState};
