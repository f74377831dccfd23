// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Security panel arm state.

use std::fmt;

/// Mode of a security panel.
///
/// The same enum drives both the target and the current projection of a
/// panel. The two may diverge while the panel is arming: the target already
/// carries the requested mode while the current state stays [`Disarmed`]
/// until the server reports that arming completed.
///
/// [`Disarmed`]: ArmState::Disarmed
///
/// # Examples
///
/// ```
/// use icontrol_bridge::types::ArmState;
///
/// assert_eq!(ArmState::default(), ArmState::Disarmed);
/// assert_eq!(ArmState::Away.hap_value(), 1);
/// assert!(ArmState::Night.requires_closed_doors());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum ArmState {
    /// Armed while occupants are home.
    Stay,
    /// Armed with nobody home.
    Away,
    /// Armed for the night.
    Night,
    /// Not armed.
    #[default]
    Disarmed,
}

impl ArmState {
    /// All arm states, in host characteristic order.
    pub const ALL: [Self; 4] = [Self::Stay, Self::Away, Self::Night, Self::Disarmed];

    /// Returns the numeric value of the host security-system characteristic.
    #[must_use]
    pub const fn hap_value(&self) -> u8 {
        match self {
            Self::Stay => 0,
            Self::Away => 1,
            Self::Night => 2,
            Self::Disarmed => 3,
        }
    }

    /// Looks up an arm state by host characteristic value.
    #[must_use]
    pub const fn from_hap_value(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Stay),
            1 => Some(Self::Away),
            2 => Some(Self::Night),
            3 => Some(Self::Disarmed),
            _ => None,
        }
    }

    /// Returns `true` for modes that may only be entered with every security
    /// door closed.
    #[must_use]
    pub const fn requires_closed_doors(&self) -> bool {
        matches!(self, Self::Away | Self::Night)
    }

    /// Returns `true` if this is any armed mode.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        !matches!(self, Self::Disarmed)
    }
}

impl fmt::Display for ArmState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Stay => "STAY",
            Self::Away => "AWAY",
            Self::Night => "NIGHT",
            Self::Disarmed => "DISARMED",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hap_values_round_trip() {
        for state in ArmState::ALL {
            assert_eq!(ArmState::from_hap_value(state.hap_value()), Some(state));
        }
        assert_eq!(ArmState::from_hap_value(4), None);
    }

    #[test]
    fn only_away_and_night_need_closed_doors() {
        assert!(ArmState::Away.requires_closed_doors());
        assert!(ArmState::Night.requires_closed_doors());
        assert!(!ArmState::Stay.requires_closed_doors());
        assert!(!ArmState::Disarmed.requires_closed_doors());
    }

    #[test]
    fn display() {
        assert_eq!(ArmState::Away.to_string(), "AWAY");
        assert_eq!(ArmState::Disarmed.to_string(), "DISARMED");
    }
}
