//! Hub command dispatch
//!
//! Maps `(unit, command, level)` to the node that owns the unit's DeviceID
//! and sends the matching SOAP action. On a confirmed command the registry
//! is updated right away; the next poll corrects it if the device disagrees.

use tracing::{debug, info, warn};
use wemo_api::{DeviceStatusCommand, WemoClient};
use wemo_parser::BinaryState;

use crate::model::{Command, DeviceStatus, PowerState, Unit, WemoNode};
use crate::reconciler::Reconciler;
use crate::{Result, StateError};

/// What happened to a dispatched command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The device confirmed; the registry now holds this status
    Applied(DeviceStatus),
    /// The device did not answer; the unit was marked timed out
    TimedOut,
    /// The device answered but did not confirm; state left for the next poll
    Unconfirmed,
}

/// Send `command` at `level` (0-100) to the device registered under `unit`.
///
/// Fails without any network traffic when the unit is unknown or its
/// DeviceID is not behind any discovered node.
pub(crate) fn dispatch(
    client: &WemoClient,
    reconciler: &Reconciler,
    unit: Unit,
    command: Command,
    level: u8,
) -> Result<DispatchOutcome> {
    let device_id = reconciler
        .registry()
        .device_id(unit)
        .ok_or(StateError::UnknownUnit(unit))?;

    let node = reconciler.node_for_device(&device_id).ok_or_else(|| {
        warn!("Command for DeviceID={} but device is not available", device_id);
        StateError::DeviceUnavailable {
            device_id: device_id.clone(),
        }
    })?;

    info!("Sending {:?} for DeviceID={} udn={}", command, device_id, node.udn);

    let outcome = if node.is_bridge() {
        dispatch_to_bridge(client, reconciler, &node, unit, &device_id, command, level.min(100))
    } else {
        dispatch_to_switch(client, reconciler, &node, unit, command)
    };

    debug!("Command outcome for unit {}: {:?}", unit, outcome);
    Ok(outcome)
}

fn dispatch_to_bridge(
    client: &WemoClient,
    reconciler: &Reconciler,
    node: &WemoNode,
    unit: Unit,
    device_id: &str,
    command: Command,
    level: u8,
) -> DispatchOutcome {
    let request =
        DeviceStatusCommand::new(device_id, command.is_on(), level, node.is_group(device_id));
    let response = client.set_device_status(&node.location, &request);

    // Bridges report stale state to the first status read after a set
    client.get_device_status(&node.location, &node.device_ids);

    if !response.responded {
        warn!("Bridge {} did not answer SetDeviceStatus for {}", node.udn, device_id);
        return DispatchOutcome::Unconfirmed;
    }
    if !response.error_device_ids.is_empty() {
        warn!(
            "Bridge {} rejected SetDeviceStatus for {:?}",
            node.udn, response.error_device_ids
        );
        return DispatchOutcome::Unconfirmed;
    }

    let timed_out = reconciler
        .registry()
        .status(unit)
        .map(|status| status.timed_out)
        .unwrap_or_default();
    let status = DeviceStatus {
        power: PowerState::from_on(command.is_on()),
        level: Some(level),
        timed_out,
    };
    reconciler.update_status(unit, status);

    DispatchOutcome::Applied(status)
}

fn dispatch_to_switch(
    client: &WemoClient,
    reconciler: &Reconciler,
    node: &WemoNode,
    unit: Unit,
    command: Command,
) -> DispatchOutcome {
    let status = match client.set_binary_state(&node.location, command.is_on()) {
        BinaryState::On => DeviceStatus::switch(true, false),
        BinaryState::Off => DeviceStatus::switch(false, false),
        BinaryState::Missing => {
            reconciler.update_status(unit, DeviceStatus::switch(false, true));
            return DispatchOutcome::TimedOut;
        }
        BinaryState::Unknown(value) => {
            warn!("Switch {} answered SetBinaryState with '{}'", node.udn, value);
            return DispatchOutcome::Unconfirmed;
        }
    };

    reconciler.update_status(unit, status);
    DispatchOutcome::Applied(status)
}
