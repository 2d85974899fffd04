//! WEMO Link bridge topology
//!
//! A bridge multiplexes LEDs and groups behind one UDN. Each pass asks the
//! bridge for its `SCAN_LIST`, registers a unit for every group and every
//! LED that is not a group member, then folds the IDs into the node.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};
use wemo_api::WemoClient;
use wemo_parser::{EndDevices, GroupEntry, LedEntry};

use crate::model::{DeviceKind, WemoNode};
use crate::reconciler::Reconciler;

/// Groups and standalone LEDs of one scan
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Partition<'a> {
    pub groups: &'a [GroupEntry],
    /// LEDs not claimed by any group, in payload order
    pub standalone: Vec<&'a LedEntry>,
}

/// Split a scan into groups and standalone LEDs.
///
/// Membership is taken from every group of the scan at once, so an LED
/// listed both inside a group and on its own is never standalone.
pub(crate) fn partition(scan: &EndDevices) -> Partition<'_> {
    let members = scan.group_members();
    let group_ids: HashSet<&str> = scan.groups.iter().map(|group| group.id.as_str()).collect();

    Partition {
        groups: &scan.groups,
        standalone: scan
            .leds
            .iter()
            .filter(|led| {
                !members.contains(led.id.as_str()) && !group_ids.contains(led.id.as_str())
            })
            .collect(),
    }
}

/// Refresh a bridge's topology and return the committed node.
///
/// An empty scan (bridge silent or unparsable) leaves the cached topology
/// alone. Registry failures for one device are logged and do not stop the
/// others.
pub(crate) fn resolve_bridge(
    client: &WemoClient,
    reconciler: &Reconciler,
    node: &WemoNode,
) -> WemoNode {
    let scan = client.get_end_devices(&node.location, &node.udn);

    if scan.groups.is_empty() && scan.leds.is_empty() {
        debug!("Bridge {} returned no end devices, keeping cached topology", node.udn);
        return node.clone();
    }

    let parts = partition(&scan);

    for group in parts.groups {
        debug!("grp={} id={} members={:?}", group.name, group.id, group.members);
        if let Err(e) = reconciler.ensure_unit(&group.id, &group.name, DeviceKind::Dimmer) {
            warn!("Could not register group {} on {}: {}", group.id, node.udn, e);
        }
    }

    for led in &parts.standalone {
        debug!("led={} id={}", led.name, led.id);
        if let Err(e) = reconciler.ensure_unit(&led.id, &led.name, DeviceKind::Dimmer) {
            warn!("Could not register LED {} on {}: {}", led.id, node.udn, e);
        }
    }

    let group_ids = scan.group_ids();
    let group_members: HashMap<String, Vec<String>> = scan
        .groups
        .iter()
        .map(|group| (group.id.clone(), group.members.clone()))
        .collect();
    let led_ids: Vec<String> = scan.leds.iter().map(|led| led.id.clone()).collect();

    reconciler
        .update_node(&node.udn, |stored| {
            stored.merge_device_ids(&group_ids);
            stored.merge_device_ids(&led_ids);
            stored.group_ids = group_ids;
            stored.group_members = group_members;
        })
        .unwrap_or_else(|| node.clone())
}
