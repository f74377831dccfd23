// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Live updates from the cloud event stream.
//!
//! - [`EventSubscriptionLoop`] - Long-polls for event batches and fans them
//!   out to the registered adapters
//! - [`BackoffPolicy`] - Delay before resubscribing after a failure
//!
//! # Usage
//!
//! The [`Bridge`](crate::Bridge) starts the loop itself. A loop can also be
//! driven one transition at a time:
//!
//! ```no_run
//! use std::sync::Arc;
//! use icontrol_bridge::host::Host;
//! use icontrol_bridge::manager::Registry;
//! use icontrol_bridge::protocol::Session;
//! use icontrol_bridge::subscription::{BackoffPolicy, EventSubscriptionLoop};
//!
//! # async fn example<S: Session, H: Host>(session: Arc<S>, registry: Arc<Registry<S, H>>) {
//! let mut subscription = EventSubscriptionLoop::new(session, registry, BackoffPolicy::default());
//! let state = subscription.step().await;
//! println!("{state:?}");
//! # }
//! ```

mod backoff;
mod event_loop;

pub use backoff::BackoffPolicy;
pub use event_loop::{EventSubscriptionLoop, SubscriptionState};
