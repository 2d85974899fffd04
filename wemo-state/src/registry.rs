//! Host device registry collaborator
//!
//! The hub owns unit numbers, names and persisted device state. The engine
//! only looks units up, asks for new ones and pushes status changes through
//! [`DeviceRegistry`]. [`MemoryRegistry`] is a complete in-process
//! implementation for hosts without their own store and for tests.

use std::collections::{BTreeMap, BTreeSet};

use parking_lot::Mutex;

use crate::model::{DeviceKind, DeviceStatus, Unit};
use crate::{Result, StateError};

/// Device registry owned by the host automation hub
///
/// Implementations use interior mutability: the poll worker and command
/// dispatch call in concurrently.
pub trait DeviceRegistry: Send + Sync {
    /// Unit registered for a WEMO DeviceID
    fn find_unit_by_device_id(&self, device_id: &str) -> Option<Unit>;

    /// Every unit currently registered
    fn list_existing_units(&self) -> Vec<Unit>;

    /// Smallest unused unit in 1..=254
    fn allocate_next_unit(&self) -> Option<Unit> {
        let used: BTreeSet<Unit> = self.list_existing_units().into_iter().collect();
        Unit::all().find(|unit| !used.contains(unit))
    }

    /// Register a new device under `unit`
    fn create_device(
        &self,
        unit: Unit,
        name: &str,
        device_id: &str,
        kind: DeviceKind,
    ) -> Result<()>;

    /// Store `status` for `unit`.
    ///
    /// Returns `false` without writing when nothing changed or the unit no
    /// longer exists.
    fn update_device_state(&self, unit: Unit, status: DeviceStatus) -> bool;

    /// DeviceID registered under `unit`
    fn device_id(&self, unit: Unit) -> Option<String>;

    /// Last status stored for `unit`
    fn status(&self, unit: Unit) -> Option<DeviceStatus>;
}

/// A device as held by [`MemoryRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredDevice {
    pub name: String,
    pub device_id: String,
    pub kind: DeviceKind,
    pub status: DeviceStatus,
}

/// In-memory [`DeviceRegistry`]
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    devices: Mutex<BTreeMap<Unit, RegisteredDevice>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every registered device
    pub fn devices(&self) -> BTreeMap<Unit, RegisteredDevice> {
        self.devices.lock().clone()
    }

    pub fn device(&self, unit: Unit) -> Option<RegisteredDevice> {
        self.devices.lock().get(&unit).cloned()
    }

    /// Remove a device, as a user deleting it in the hub would
    pub fn remove(&self, unit: Unit) -> Option<RegisteredDevice> {
        self.devices.lock().remove(&unit)
    }

    pub fn len(&self) -> usize {
        self.devices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.lock().is_empty()
    }
}

impl DeviceRegistry for MemoryRegistry {
    fn find_unit_by_device_id(&self, device_id: &str) -> Option<Unit> {
        self.devices
            .lock()
            .iter()
            .find(|(_, device)| device.device_id == device_id)
            .map(|(unit, _)| *unit)
    }

    fn list_existing_units(&self) -> Vec<Unit> {
        self.devices.lock().keys().copied().collect()
    }

    fn create_device(
        &self,
        unit: Unit,
        name: &str,
        device_id: &str,
        kind: DeviceKind,
    ) -> Result<()> {
        let mut devices = self.devices.lock();
        if devices.contains_key(&unit) {
            return Err(StateError::Registry(format!("unit {} already in use", unit)));
        }
        devices.insert(
            unit,
            RegisteredDevice {
                name: name.to_string(),
                device_id: device_id.to_string(),
                kind,
                status: DeviceStatus::default(),
            },
        );
        Ok(())
    }

    fn update_device_state(&self, unit: Unit, status: DeviceStatus) -> bool {
        match self.devices.lock().get_mut(&unit) {
            Some(device) if device.status != status => {
                device.status = status;
                true
            }
            _ => false,
        }
    }

    fn device_id(&self, unit: Unit) -> Option<String> {
        self.devices.lock().get(&unit).map(|device| device.device_id.clone())
    }

    fn status(&self, unit: Unit) -> Option<DeviceStatus> {
        self.devices.lock().get(&unit).map(|device| device.status)
    }
}
