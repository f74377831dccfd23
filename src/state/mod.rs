// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Canonical state held by device adapters.
//!
//! Each adapter owns one small state struct ([`PanelState`], [`SensorState`],
//! [`LightState`]) whose fields are updated independently by applying
//! [`StateChange`]s. The same changes are what the adapters publish to the
//! accessory host.
//!
//! Updates are last-write-wins. A poll response that lands after a newer
//! pushed event overwrites it; there is no timestamp comparison.
//!
//! # Examples
//!
//! ```
//! use icontrol_bridge::state::{PanelState, StateChange};
//! use icontrol_bridge::types::ArmState;
//!
//! let mut state = PanelState::default();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::TargetArmState(ArmState::Away)));
//! assert!(!state.apply(&StateChange::TargetArmState(ArmState::Away)));
//!
//! assert_eq!(state.target(), ArmState::Away);
//! assert_eq!(state.current(), ArmState::Disarmed);
//! ```

mod light_state;
mod panel_state;
mod sensor_state;
mod state_change;

pub use light_state::LightState;
pub use panel_state::PanelState;
pub use sensor_state::SensorState;
pub use state_change::StateChange;
