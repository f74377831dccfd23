// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge configuration.

use std::time::Duration;

use crate::subscription::BackoffPolicy;

/// Configuration for a [`Bridge`](super::Bridge).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use icontrol_bridge::manager::BridgeConfig;
///
/// let config = BridgeConfig::new()
///     .with_security_doors(["Front Door", "Back Door"])
///     .with_arm_revert_delay(Duration::from_secs(1));
///
/// assert_eq!(config.security_doors.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Display names of the sensors that must read closed before arming
    /// away or night.
    pub security_doors: Vec<String>,
    /// Delay before the live-update loop resubscribes after a failure.
    pub backoff: BackoffPolicy,
    /// Delay before a refused target state is reverted.
    pub arm_revert_delay: Duration,
}

impl BridgeConfig {
    /// Default revert delay for refused arm requests.
    pub const DEFAULT_ARM_REVERT_DELAY: Duration = Duration::from_millis(500);

    /// Creates a configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the security door list.
    #[must_use]
    pub fn with_security_doors<I, N>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.security_doors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds one security door.
    #[must_use]
    pub fn with_security_door(mut self, name: impl Into<String>) -> Self {
        self.security_doors.push(name.into());
        self
    }

    /// Sets the resubscription policy.
    #[must_use]
    pub fn with_backoff(mut self, policy: BackoffPolicy) -> Self {
        self.backoff = policy;
        self
    }

    /// Sets the revert delay for refused arm requests.
    #[must_use]
    pub fn with_arm_revert_delay(mut self, delay: Duration) -> Self {
        self.arm_revert_delay = delay;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            security_doors: Vec::new(),
            backoff: BackoffPolicy::default(),
            arm_revert_delay: Self::DEFAULT_ARM_REVERT_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BridgeConfig::default();

        assert!(config.security_doors.is_empty());
        assert_eq!(config.arm_revert_delay, Duration::from_millis(500));
        assert_eq!(config.backoff.initial_delay, Duration::from_secs(5));
    }

    #[test]
    fn door_builders_compose() {
        let config = BridgeConfig::new()
            .with_security_doors(vec!["Front".to_string()])
            .with_security_door("Back");

        assert_eq!(config.security_doors, vec!["Front", "Back"]);
    }
}
