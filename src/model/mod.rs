// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Data model of the cloud API.
//!
//! - [`Device`] - One row of a polled snapshot, or a discovered device
//! - [`Snapshot`] - The result of a status poll
//! - [`Event`] - A server-pushed event from the subscription stream
//! - [`IdentityKey`] / [`AccessoryId`] - Stable identity of a device
//!
//! Every section of a payload that the engine reads is optional. A row that
//! lacks what an adapter needs simply does not match that adapter for the
//! current cycle.

mod device;
mod event;
mod identity;

pub use device::{Device, DeviceProperties, DeviceType, Link, Snapshot, Trouble};
pub use event::{Event, EventMetadata};
pub use identity::{AccessoryId, IdentityKey};

use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` as the type's default.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
