//! WEMO root devices as seen on the network

use std::collections::HashMap;

/// UDN prefix of WEMO Link bridges
pub const BRIDGE_UDN_PREFIX: &str = "uuid:Bridge-";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// WEMO Link: many LEDs and groups behind one UDN
    Bridge,
    /// Single on/off device
    Switch,
}

impl NodeKind {
    pub fn from_udn(udn: &str) -> Self {
        if udn.starts_with(BRIDGE_UDN_PREFIX) {
            NodeKind::Bridge
        } else {
            NodeKind::Switch
        }
    }
}

/// One UPnP root device
///
/// Keyed by `udn`. `location` follows the device around the network;
/// `device_ids` only ever grows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WemoNode {
    pub udn: String,
    /// Base URL of the control endpoints, e.g. `http://10.0.0.5:49153`
    pub location: String,
    pub kind: NodeKind,
    /// DeviceIDs behind this node, in first-seen order. Bridge status
    /// queries are positional, so this order is the request order.
    pub device_ids: Vec<String>,
    /// DeviceIDs that are bridge groups
    pub group_ids: Vec<String>,
    /// Group ID -> member DeviceIDs, from the most recent successful scan
    pub group_members: HashMap<String, Vec<String>>,
}

impl WemoNode {
    pub fn new(udn: impl Into<String>, location: impl Into<String>) -> Self {
        let udn = udn.into();
        Self {
            kind: NodeKind::from_udn(&udn),
            udn,
            location: location.into(),
            device_ids: Vec::new(),
            group_ids: Vec::new(),
            group_members: HashMap::new(),
        }
    }

    pub fn is_bridge(&self) -> bool {
        self.kind == NodeKind::Bridge
    }

    pub fn contains_device(&self, device_id: &str) -> bool {
        self.device_ids.iter().any(|id| id == device_id)
    }

    pub fn is_group(&self, device_id: &str) -> bool {
        self.group_ids.iter().any(|id| id == device_id)
    }

    /// Group containing `device_id`, first in group order
    pub fn group_of(&self, device_id: &str) -> Option<&str> {
        self.group_ids
            .iter()
            .find(|group| {
                self.group_members
                    .get(group.as_str())
                    .is_some_and(|members| members.iter().any(|m| m == device_id))
            })
            .map(String::as_str)
    }

    /// Add unseen IDs to `device_ids`, keeping existing order
    pub fn merge_device_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a String>) {
        for id in ids {
            if !self.contains_device(id) {
                self.device_ids.push(id.clone());
            }
        }
    }
}

/// DeviceID of a plain switch: the part of the UDN after its last `-`
pub(crate) fn switch_device_id(udn: &str) -> &str {
    udn.rsplit('-').next().unwrap_or(udn)
}
