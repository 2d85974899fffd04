//! Identity continuity between discovery passes
//!
//! The reconciler owns the node table (UDN -> [`WemoNode`]) and is the only
//! way to read or change it. It also serialises unit allocation so that two
//! new DeviceIDs can never be handed the same unit.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::model::{DeviceKind, DeviceStatus, Unit, WemoNode};
use crate::registry::DeviceRegistry;
use crate::{Result, StateError};

pub struct Reconciler {
    nodes: Mutex<HashMap<String, WemoNode>>,
    registry: Arc<dyn DeviceRegistry>,
    /// Held across lookup + allocate + create
    allocation: Mutex<()>,
}

impl Reconciler {
    pub fn new(registry: Arc<dyn DeviceRegistry>) -> Self {
        Self {
            nodes: Mutex::new(HashMap::new()),
            registry,
            allocation: Mutex::new(()),
        }
    }

    pub fn registry(&self) -> &Arc<dyn DeviceRegistry> {
        &self.registry
    }

    /// Record a discovery sighting. Returns `true` for a UDN seen for the first time.
    pub fn upsert_location(&self, udn: &str, location: &str) -> bool {
        let mut nodes = self.nodes.lock();
        match nodes.get_mut(udn) {
            Some(node) => {
                if node.location != location {
                    info!("{} moved from {} to {}", udn, node.location, location);
                    node.location = location.to_string();
                }
                false
            }
            None => {
                debug!("New WEMO node {} at {}", udn, location);
                nodes.insert(udn.to_string(), WemoNode::new(udn, location));
                true
            }
        }
    }

    /// Snapshot of one node
    pub fn node(&self, udn: &str) -> Option<WemoNode> {
        self.nodes.lock().get(udn).cloned()
    }

    /// Snapshot of every node, ordered by UDN
    pub fn nodes(&self) -> Vec<WemoNode> {
        let mut nodes: Vec<WemoNode> = self.nodes.lock().values().cloned().collect();
        nodes.sort_by(|a, b| a.udn.cmp(&b.udn));
        nodes
    }

    pub fn udns(&self) -> Vec<String> {
        let mut udns: Vec<String> = self.nodes.lock().keys().cloned().collect();
        udns.sort();
        udns
    }

    /// Node whose device set contains `device_id`
    pub fn node_for_device(&self, device_id: &str) -> Option<WemoNode> {
        self.nodes
            .lock()
            .values()
            .find(|node| node.contains_device(device_id))
            .cloned()
    }

    /// Apply `update` to the stored node and return the result.
    ///
    /// The closure runs under the table lock; keep it free of I/O.
    pub fn update_node<F>(&self, udn: &str, update: F) -> Option<WemoNode>
    where
        F: FnOnce(&mut WemoNode),
    {
        let mut nodes = self.nodes.lock();
        let node = nodes.get_mut(udn)?;
        update(node);
        Some(node.clone())
    }

    pub fn unit_for(&self, device_id: &str) -> Option<Unit> {
        self.registry.find_unit_by_device_id(device_id)
    }

    /// Resolve `device_id` to its unit, registering it if new
    pub fn ensure_unit(&self, device_id: &str, name: &str, kind: DeviceKind) -> Result<Unit> {
        self.ensure_unit_with(device_id, kind, || name.to_string())
    }

    /// Like [`Reconciler::ensure_unit`], but the name is only computed when
    /// the device is actually new (it may cost a network round trip)
    ///
    /// The name is fetched outside the allocation lock. If another caller
    /// registers the device meanwhile, its unit wins and the name is unused.
    pub fn ensure_unit_with<F>(&self, device_id: &str, kind: DeviceKind, name: F) -> Result<Unit>
    where
        F: FnOnce() -> String,
    {
        if let Some(unit) = self.registry.find_unit_by_device_id(device_id) {
            return Ok(unit);
        }
        let name = name();

        let _guard = self.allocation.lock();
        if let Some(unit) = self.registry.find_unit_by_device_id(device_id) {
            return Ok(unit);
        }

        let unit = self
            .registry
            .allocate_next_unit()
            .ok_or_else(|| StateError::RegistryFull(device_id.to_string()))?;

        self.registry.create_device(unit, &name, device_id, kind)?;
        info!("Created {:?} '{}' for DeviceID={} as unit {}", kind, name, device_id, unit);

        Ok(unit)
    }

    /// Push a status to the registry; logs and returns `true` on change
    pub fn update_status(&self, unit: Unit, status: DeviceStatus) -> bool {
        let changed = self.registry.update_device_state(unit, status);
        if changed {
            info!("Update unit {} -> {}", unit, status);
        }
        changed
    }

    /// Mark every registered unit unreachable until it is rediscovered
    pub fn mark_all_unreachable(&self) -> usize {
        self.registry
            .list_existing_units()
            .into_iter()
            .filter(|unit| self.update_status(*unit, DeviceStatus::unreachable()))
            .count()
    }
}
