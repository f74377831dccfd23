// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `icontrol_bridge` - Bridge an iControl home-security cloud into an
//! accessory host.
//!
//! The crate polls and subscribes to the cloud API, translates what it sees
//! into canonical states, and publishes those states as characteristics of
//! host accessories. Host writes go the other way as cloud commands.
//!
//! # Supported Devices
//!
//! - **Security panel**: Target and current arm state, with a door check
//!   before arming away or night
//! - **Dry-contact sensors**: Contact state plus tamper, fault and battery
//! - **Lights**: On/off, and brightness for dimmable lights
//!
//! # Architecture
//!
//! - [`protocol::Session`] - The authenticated cloud connection
//!   ([`protocol::HttpSession`] over HTTPS)
//! - [`host::Host`] - Where accessories are registered and updated
//! - [`device`] - One adapter per device, owning its cached state
//! - [`Bridge`] - Builds adapters from the device list and starts the
//!   [`subscription::EventSubscriptionLoop`]
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use icontrol_bridge::{Bridge, BridgeConfig, HttpConfig};
//! use icontrol_bridge::host::{AccessoryRegistration, Host};
//! use icontrol_bridge::model::AccessoryId;
//! use icontrol_bridge::state::StateChange;
//!
//! struct LogHost;
//!
//! impl Host for LogHost {
//!     fn register_accessory(&self, registration: &AccessoryRegistration) {
//!         println!("new accessory {}", registration.display_name);
//!     }
//!     fn unregister_accessory(&self, id: AccessoryId) {
//!         println!("removed {id}");
//!     }
//!     fn update_characteristic(&self, id: AccessoryId, change: StateChange) {
//!         println!("{id}: {change:?}");
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> icontrol_bridge::Result<()> {
//!     let session = HttpConfig::new("https://portal.example.com")
//!         .with_access_token("token")
//!         .with_pin_code("1234")
//!         .into_session()?;
//!
//!     let config = BridgeConfig::new().with_security_doors(["Front Door"]);
//!     let bridge = Bridge::new(Arc::new(session), Arc::new(LogHost), config);
//!
//!     let events = bridge.start().await?;
//!     events.await.ok();
//!     Ok(())
//! }
//! ```

pub mod device;
pub mod error;
pub mod gate;
pub mod host;
pub mod manager;
pub mod model;
pub mod protocol;
pub mod state;
pub mod subscription;
pub mod translate;
pub mod types;

#[cfg(test)]
mod testing;

pub use error::{DeviceError, Error, ParseError, ProtocolError, Result, ValueError};
pub use manager::{Bridge, BridgeConfig};
#[cfg(feature = "http")]
pub use protocol::{HttpConfig, HttpSession};
pub use protocol::{Request, Session};
pub use types::{ArmState, BatteryState, Brightness, ContactState, FaultState, TamperState};
