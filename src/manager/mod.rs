// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bridge orchestration.
//!
//! The [`Bridge`] turns the devices of a status snapshot into adapters,
//! registers their accessories with the host, keeps them in a [`Registry`],
//! and starts the live-update loop.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use icontrol_bridge::Bridge;
//! use icontrol_bridge::host::Host;
//! use icontrol_bridge::manager::BridgeConfig;
//! use icontrol_bridge::protocol::HttpConfig;
//!
//! # async fn example<H: Host>(host: Arc<H>) -> icontrol_bridge::Result<()> {
//! let session = HttpConfig::new("https://portal.example.com")
//!     .with_access_token("token")
//!     .with_pin_code("1234")
//!     .into_session()?;
//!
//! let config = BridgeConfig::new().with_security_door("Front Door");
//! let bridge = Bridge::new(Arc::new(session), host, config);
//!
//! let events = bridge.start().await?;
//! println!("{} accessories", bridge.registry().len());
//! events.await.ok();
//! # Ok(())
//! # }
//! ```

mod bridge;
mod config;
mod registry;

pub use bridge::Bridge;
pub use config::BridgeConfig;
pub use registry::Registry;
