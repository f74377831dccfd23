// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of live adapters.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use crate::device::Adapter;
use crate::host::Host;
use crate::model::{AccessoryId, IdentityKey};
use crate::protocol::Session;

/// Adapters keyed by identity key.
///
/// Adding an adapter whose key is already present replaces the old one, so
/// a key never maps to two adapters. Iteration follows key order.
///
/// Lookups clone the adapter handles out; the lock is never held while an
/// adapter runs.
pub struct Registry<S: Session, H: Host> {
    adapters: RwLock<BTreeMap<IdentityKey, Adapter<S, H>>>,
}

impl<S: Session, H: Host> Registry<S, H> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            adapters: RwLock::new(BTreeMap::new()),
        }
    }

    /// Inserts an adapter, returning the one it replaced.
    pub fn upsert(&self, adapter: Adapter<S, H>) -> Option<Adapter<S, H>> {
        let key = adapter.identity_key().clone();
        self.adapters.write().insert(key, adapter)
    }

    /// Removes the adapter for `key`.
    pub fn remove(&self, key: &IdentityKey) -> Option<Adapter<S, H>> {
        self.adapters.write().remove(key)
    }

    /// Returns the adapter for `key`.
    #[must_use]
    pub fn get(&self, key: &IdentityKey) -> Option<Adapter<S, H>> {
        self.adapters.read().get(key).cloned()
    }

    /// Returns `true` if an adapter is registered for `key`.
    #[must_use]
    pub fn contains(&self, key: &IdentityKey) -> bool {
        self.adapters.read().contains_key(key)
    }

    /// Returns the first adapter with the given display name.
    #[must_use]
    pub fn by_display_name(&self, name: &str) -> Option<Adapter<S, H>> {
        self.adapters
            .read()
            .values()
            .find(|adapter| adapter.display_name() == name)
            .cloned()
    }

    /// Returns the adapter bound to an accessory id.
    #[must_use]
    pub fn by_accessory_id(&self, id: AccessoryId) -> Option<Adapter<S, H>> {
        self.adapters
            .read()
            .values()
            .find(|adapter| adapter.accessory_id() == id)
            .cloned()
    }

    /// Returns every adapter.
    #[must_use]
    pub fn all(&self) -> Vec<Adapter<S, H>> {
        self.adapters.read().values().cloned().collect()
    }

    /// Returns the number of adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.adapters.read().len()
    }

    /// Returns `true` if no adapter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.adapters.read().is_empty()
    }
}

impl<S: Session, H: Host> Default for Registry<S, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Session, H: Host> std::fmt::Debug for Registry<S, H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("adapters", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::device::{LightAdapter, SensorAdapter};
    use crate::testing::{self, MockSession, RecordingHost};
    use serde_json::json;

    type TestRegistry = Registry<MockSession, RecordingHost>;

    fn sensor(name: &str, serial: &str) -> Adapter<MockSession, RecordingHost> {
        let (_session, _host, ctx) = testing::context();
        let row = testing::device(json!({ "id": serial, "name": name, "serialNumber": serial }));
        Adapter::Sensor(Arc::new(SensorAdapter::new(row, ctx).unwrap()))
    }

    #[test]
    fn upsert_replaces_same_key() {
        let registry = TestRegistry::new();

        assert!(registry.upsert(sensor("Old", "S1")).is_none());
        let replaced = registry.upsert(sensor("New", "S1")).unwrap();

        assert_eq!(replaced.display_name(), "Old");
        assert_eq!(registry.len(), 1);
        assert!(registry.by_display_name("New").is_some());
        assert!(registry.by_display_name("Old").is_none());
    }

    #[test]
    fn lookups() {
        let registry = TestRegistry::new();
        let adapter = sensor("Front Door", "S1");
        let key = adapter.identity_key().clone();
        let id = adapter.accessory_id();
        registry.upsert(adapter);

        assert!(registry.contains(&key));
        assert!(registry.get(&key).is_some());
        assert_eq!(
            registry.by_accessory_id(id).unwrap().display_name(),
            "Front Door"
        );
        assert!(registry.by_display_name("Back Door").is_none());
    }

    #[test]
    fn remove_and_iterate() {
        let registry = TestRegistry::new();
        let (_session, _host, ctx) = testing::context();
        let light = testing::device(json!({ "name": "Porch", "hardwareId": "HW1" }));
        registry.upsert(Adapter::Light(Arc::new(LightAdapter::new(light, ctx).unwrap())));
        let door = sensor("Front Door", "S1");
        let key = door.identity_key().clone();
        registry.upsert(door);

        assert_eq!(registry.all().len(), 2);
        assert!(registry.remove(&key).is_some());
        assert!(registry.remove(&key).is_none());
        assert_eq!(registry.len(), 1);
        assert!(!registry.is_empty());
    }
}
