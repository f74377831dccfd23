// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Resubscription delay policy.

use std::time::Duration;

/// Delay before the subscription loop resubscribes after a failure.
///
/// The loop never gives up, so there is no retry limit. The default is a
/// flat five seconds; a multiplier above 1.0 turns it into exponential
/// backoff capped at `max_delay`.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use icontrol_bridge::subscription::BackoffPolicy;
///
/// // Flat five second delay
/// let policy = BackoffPolicy::default();
/// assert_eq!(policy.delay_for_attempt(0), Duration::from_secs(5));
/// assert_eq!(policy.delay_for_attempt(7), Duration::from_secs(5));
///
/// // Exponential, capped
/// let policy = BackoffPolicy::new()
///     .with_initial_delay(Duration::from_secs(1))
///     .with_multiplier(2.0)
///     .with_max_delay(Duration::from_secs(30));
/// assert_eq!(policy.delay_for_attempt(3), Duration::from_secs(8));
/// assert_eq!(policy.delay_for_attempt(10), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    /// Delay after the first failure.
    pub initial_delay: Duration,
    /// Upper bound on the delay.
    pub max_delay: Duration,
    /// Growth factor per consecutive failure.
    pub multiplier: f32,
}

impl BackoffPolicy {
    /// Default delay between resubscription attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(5);

    /// Creates a policy with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a flat policy with the given delay.
    #[must_use]
    pub fn fixed(delay: Duration) -> Self {
        Self {
            initial_delay: delay,
            max_delay: delay,
            multiplier: 1.0,
        }
    }

    /// Sets the delay after the first failure.
    #[must_use]
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the upper bound on the delay.
    #[must_use]
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Sets the growth factor.
    #[must_use]
    pub fn with_multiplier(mut self, multiplier: f32) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Calculates the delay for the given consecutive failure (0-based).
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return self.initial_delay.min(self.max_delay);
        }

        let multiplier = self
            .multiplier
            .powi(i32::try_from(attempt).unwrap_or(i32::MAX));

        // Safe: initial_delay is seconds, not near u128 max
        #[allow(clippy::cast_precision_loss)]
        let delay_ms = self.initial_delay.as_millis() as f32 * multiplier;

        // Safe: delay_ms is positive and saturates on overflow
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let delay = Duration::from_millis(delay_ms as u64);

        delay.min(self.max_delay)
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::fixed(Self::DEFAULT_DELAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_flat_five_seconds() {
        let policy = BackoffPolicy::default();

        for attempt in [0, 1, 2, 50, u32::MAX] {
            assert_eq!(policy.delay_for_attempt(attempt), Duration::from_secs(5));
        }
    }

    #[test]
    fn exponential_growth() {
        let policy = BackoffPolicy::new()
            .with_initial_delay(Duration::from_millis(500))
            .with_multiplier(2.0)
            .with_max_delay(Duration::from_secs(60));

        assert_eq!(policy.delay_for_attempt(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(1));
        assert_eq!(policy.delay_for_attempt(2), Duration::from_secs(2));
    }

    #[test]
    fn delay_is_capped() {
        let policy = BackoffPolicy::new()
            .with_initial_delay(Duration::from_secs(10))
            .with_multiplier(3.0)
            .with_max_delay(Duration::from_secs(20));

        assert_eq!(policy.delay_for_attempt(1), Duration::from_secs(20));
        assert_eq!(policy.delay_for_attempt(40), Duration::from_secs(20));
    }
}
