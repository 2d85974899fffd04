//! Per-node state polling
//!
//! Bridges are polled in bulk with one `GetDeviceStatus` covering every
//! known DeviceID; switches with `GetBinaryState`. Results are normalised
//! to [`DeviceStatus`] and pushed to the registry only when they change.

use std::collections::HashSet;

use tracing::{debug, warn};
use wemo_api::WemoClient;
use wemo_parser::{raw_to_group_percent, raw_to_percent, BinaryState, CapabilityRecord};

use crate::model::{switch_device_id, DeviceKind, DeviceStatus, WemoNode};
use crate::reconciler::Reconciler;
use crate::StateError;

/// Name used when a switch does not report one
const DEFAULT_SWITCH_NAME: &str = "Switch";

/// Result of polling one node
#[derive(Debug)]
pub enum PollOutcome {
    /// The node answered; `updates` registry writes were made
    Polled { updates: usize },
    /// The node did not answer; its units were marked timed out
    TimedOut,
    /// Processing stopped early
    Failed(StateError),
}

impl PollOutcome {
    pub fn is_polled(&self) -> bool {
        matches!(self, PollOutcome::Polled { .. })
    }

    pub fn is_timed_out(&self) -> bool {
        matches!(self, PollOutcome::TimedOut)
    }
}

/// Status of a standalone LED from its record
fn led_status(record: Option<&CapabilityRecord>) -> DeviceStatus {
    match record.and_then(|r| r.raw_level.map(|raw| (r.on, raw))) {
        Some((on, raw)) => DeviceStatus::dimmer(on, raw_to_percent(raw), false),
        None => DeviceStatus::unreachable_dimmer(),
    }
}

/// Status of a group from its own record and its members' reachability
fn group_status(record: Option<&CapabilityRecord>, member_timed_out: bool) -> DeviceStatus {
    match record.and_then(|r| r.raw_level.map(|raw| (r.on, raw))) {
        Some((on, raw)) => DeviceStatus::dimmer(on, raw_to_group_percent(raw), member_timed_out),
        None => DeviceStatus::unreachable_dimmer(),
    }
}

/// Poll every device behind a bridge in one request.
///
/// Records are matched to DeviceIDs by position. Group members never get
/// their own update: an unreachable member times out its group instead.
pub(crate) fn poll_bridge(
    client: &WemoClient,
    reconciler: &Reconciler,
    node: &WemoNode,
) -> PollOutcome {
    if node.device_ids.is_empty() {
        debug!("Bridge {} has no known devices yet", node.udn);
        return PollOutcome::Polled { updates: 0 };
    }

    debug!("ids={}", node.device_ids.join(","));
    let statuses = client.get_device_status(&node.location, &node.device_ids);

    if statuses.is_empty() {
        warn!("Bridge {} did not answer GetDeviceStatus", node.udn);
        for id in &node.device_ids {
            if node.group_of(id).is_some() {
                continue;
            }
            if let Some(unit) = reconciler.unit_for(id) {
                reconciler.update_status(unit, DeviceStatus::unreachable_dimmer());
            }
        }
        return PollOutcome::TimedOut;
    }

    if statuses.len() != node.device_ids.len() {
        debug!(
            "Bridge {} returned {} records for {} devices",
            node.udn,
            statuses.len(),
            node.device_ids.len()
        );
    }

    let mut updates = 0;
    let mut timed_out_groups: HashSet<&str> = HashSet::new();

    for (index, id) in node.device_ids.iter().enumerate() {
        if node.is_group(id) {
            continue;
        }
        let record = statuses.records.get(index);

        if let Some(group) = node.group_of(id) {
            if !record.is_some_and(CapabilityRecord::is_reachable) {
                debug!("Member {} of group {} is unreachable", id, group);
                timed_out_groups.insert(group);
            }
            continue;
        }

        if let Some(unit) = reconciler.unit_for(id) {
            updates += usize::from(reconciler.update_status(unit, led_status(record)));
        }
    }

    for (index, id) in node.device_ids.iter().enumerate() {
        if !node.is_group(id) {
            continue;
        }
        let timed_out = timed_out_groups.contains(id.as_str());
        let status = group_status(statuses.records.get(index), timed_out);
        if let Some(unit) = reconciler.unit_for(id) {
            updates += usize::from(reconciler.update_status(unit, status));
        }
    }

    PollOutcome::Polled { updates }
}

/// Register (on first sight) and poll a plain switch
pub(crate) fn poll_switch(
    client: &WemoClient,
    reconciler: &Reconciler,
    node: &WemoNode,
) -> PollOutcome {
    let device_id = switch_device_id(&node.udn).to_string();

    let unit = match reconciler.ensure_unit_with(&device_id, DeviceKind::Switch, || {
        client
            .get_friendly_name(&node.location)
            .unwrap_or_else(|| DEFAULT_SWITCH_NAME.to_string())
    }) {
        Ok(unit) => unit,
        Err(e) => return PollOutcome::Failed(e),
    };

    reconciler.update_node(&node.udn, |stored| {
        stored.merge_device_ids([&device_id]);
    });

    let (status, outcome) = match client.get_binary_state(&node.location) {
        BinaryState::On => (DeviceStatus::switch(true, false), None),
        BinaryState::Off => (DeviceStatus::switch(false, false), None),
        BinaryState::Missing => (DeviceStatus::switch(false, true), Some(PollOutcome::TimedOut)),
        BinaryState::Unknown(value) => {
            warn!("Switch {} reported unexpected BinaryState '{}'", node.udn, value);
            return PollOutcome::Polled { updates: 0 };
        }
    };

    let changed = reconciler.update_status(unit, status);
    outcome.unwrap_or(PollOutcome::Polled {
        updates: usize::from(changed),
    })
}
