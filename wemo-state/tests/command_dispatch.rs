//! Hub commands routed to bridges and switches

mod common;

use std::sync::Arc;

use common::*;
use wemo_parser::unescape;
use wemo_state::{
    Command, DeviceKind, DeviceRegistry, DeviceStatus, DispatchOutcome, PowerState, StateError, WemoEngine,
};

fn started_home() -> (Arc<FakeTransport>, Arc<RecordingRegistry>, WemoEngine) {
    let transport = FakeTransport::new();
    let registry = RecordingRegistry::new();
    let engine = WemoEngine::builder(registry.clone())
        .transport(transport.clone())
        .discoverer(StaticDiscoverer::new(&[
            (BRIDGE_UDN, BRIDGE_LOCATION),
            (SWITCH_UDN, SWITCH_LOCATION),
        ]))
        .build();

    living_room_bridge(&transport);
    transport.respond(
        BRIDGE_LOCATION,
        "GetDeviceStatus",
        device_status(&["1,255:0", "0,127:0", "1,127:0", "1,200:0", "1,200:0", "1,100:0"]),
    );
    transport.respond(BRIDGE_LOCATION, "SetDeviceStatus", set_device_status_ok());
    coffee_switch(&transport, "0");

    engine.run_cycle();
    transport.clear_requests();
    (transport, registry, engine)
}

#[test]
fn group_command_sets_level_with_group_action() {
    let (transport, registry, engine) = started_home();
    let living = registry.unit("G-LIVING");

    let outcome = engine.dispatch_command(living, Command::On, 50).unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].action, "SetDeviceStatus");
    assert!(requests[0].url.ends_with("/upnp/control/bridge1"));

    let body = unescape(&requests[0].body);
    assert!(body.contains("<DeviceID>G-LIVING</DeviceID>"));
    assert!(body.contains("<CapabilityID>10008</CapabilityID>"));
    assert!(body.contains("CapabilityValue>128:0"));
    assert!(body.contains("IsGroupAction>YES"));

    assert_eq!(outcome, DispatchOutcome::Applied(DeviceStatus::dimmer(true, 50, false)));
    assert_eq!(registry.status_of("G-LIVING"), DeviceStatus::dimmer(true, 50, false));
}

#[test]
fn bridge_command_is_followed_by_a_status_read() {
    let (transport, registry, engine) = started_home();

    engine
        .dispatch_command(registry.unit("LED-DESK"), Command::On, 20)
        .unwrap();

    let actions: Vec<String> = transport.requests().into_iter().map(|r| r.action).collect();
    assert_eq!(actions, vec!["SetDeviceStatus", "GetDeviceStatus"]);
    assert!(transport.requests()[1]
        .body
        .contains("<DeviceIDs>G-LIVING,G-HALL,LED-DESK,LED-SOFA,LED-TV,LED-HALL</DeviceIDs>"));
}

#[test]
fn led_off_command_is_not_a_group_action() {
    let (transport, registry, engine) = started_home();

    let outcome = engine
        .dispatch_command(registry.unit("LED-DESK"), Command::Off, 80)
        .unwrap();

    let body = unescape(&transport.requests_for("SetDeviceStatus")[0].body);
    assert!(body.contains("CapabilityValue>0:0"));
    assert!(body.contains("IsGroupAction>NO"));

    // Off keeps the slider position the hub sent
    let applied = DeviceStatus {
        power: PowerState::Off,
        level: Some(80),
        timed_out: false,
    };
    assert_eq!(outcome, DispatchOutcome::Applied(applied));
    assert_eq!(registry.status_of("LED-DESK"), applied);
}

#[test]
fn optimistic_update_keeps_timeout_flag() {
    let (transport, registry, engine) = started_home();
    transport.respond(
        BRIDGE_LOCATION,
        "GetDeviceStatus",
        device_status(&["1,255:0", "0,127:0", "1,127:0", "1,200:0", ",,,,", "1,100:0"]),
    );
    engine.run_cycle();
    assert!(registry.status_of("G-LIVING").timed_out);

    let outcome = engine
        .dispatch_command(registry.unit("G-LIVING"), Command::On, 30)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied(DeviceStatus::dimmer(true, 30, true)));
}

#[test]
fn rejected_bridge_command_leaves_state_to_the_next_poll() {
    let (transport, registry, engine) = started_home();
    transport.respond(
        BRIDGE_LOCATION,
        "SetDeviceStatus",
        set_device_status_rejecting("LED-DESK"),
    );
    let before = registry.status_of("LED-DESK");

    let outcome = engine
        .dispatch_command(registry.unit("LED-DESK"), Command::On, 100)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Unconfirmed);
    assert_eq!(registry.status_of("LED-DESK"), before);
}

#[test]
fn silent_bridge_does_not_confirm() {
    let (transport, registry, engine) = started_home();
    transport.silence(BRIDGE_LOCATION, "SetDeviceStatus");

    let outcome = engine
        .dispatch_command(registry.unit("G-HALL"), Command::On, 60)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::Unconfirmed);
    assert_eq!(registry.status_of("G-HALL"), DeviceStatus::dimmer(false, 49, false));
}

#[test]
fn switch_command_uses_device_echo() {
    let (transport, registry, engine) = started_home();
    transport.respond(SWITCH_LOCATION, "SetBinaryState", binary_state("1"));

    let outcome = engine
        .dispatch_command(registry.unit(SWITCH_DEVICE_ID), Command::On, 0)
        .unwrap();

    let request = &transport.requests()[0];
    assert_eq!(request.action, "SetBinaryState");
    assert!(request.url.ends_with("/upnp/control/basicevent1"));
    assert!(request.body.contains("<BinaryState>1</BinaryState>"));

    assert_eq!(outcome, DispatchOutcome::Applied(DeviceStatus::switch(true, false)));
    assert_eq!(registry.status_of(SWITCH_DEVICE_ID), DeviceStatus::switch(true, false));
}

#[test]
fn silent_switch_times_out() {
    let (_transport, registry, engine) = started_home();

    let outcome = engine
        .dispatch_command(registry.unit(SWITCH_DEVICE_ID), Command::Off, 0)
        .unwrap();

    assert_eq!(outcome, DispatchOutcome::TimedOut);
    assert_eq!(registry.status_of(SWITCH_DEVICE_ID), DeviceStatus::switch(false, true));
}

#[test]
fn unknown_unit_fails_without_network_traffic() {
    let (transport, _registry, engine) = started_home();

    let err = engine.dispatch_command(unit(200), Command::On, 50).unwrap_err();

    assert!(matches!(err, StateError::UnknownUnit(u) if u == unit(200)));
    assert!(transport.requests().is_empty());
}

#[test]
fn device_without_a_node_is_unavailable() {
    let (transport, registry, engine) = started_home();
    registry
        .create_device(unit(50), "Old lamp", "LED-GONE", DeviceKind::Dimmer)
        .unwrap();

    let err = engine.dispatch_command(unit(50), Command::On, 50).unwrap_err();

    match err {
        StateError::DeviceUnavailable { device_id } => assert_eq!(device_id, "LED-GONE"),
        other => panic!("unexpected error: {}", other),
    }
    assert!(transport.requests().is_empty());
}

#[test]
fn spawned_command_runs_on_its_own_thread() {
    let (transport, registry, engine) = started_home();
    transport.respond(SWITCH_LOCATION, "SetBinaryState", binary_state("1"));

    let handle = engine
        .spawn_command(registry.unit(SWITCH_DEVICE_ID), Command::On, 0)
        .unwrap();
    let outcome = handle.join().unwrap().unwrap();

    assert_eq!(outcome, DispatchOutcome::Applied(DeviceStatus::switch(true, false)));
}

#[test]
fn hub_command_names() {
    assert_eq!("On".parse::<Command>().unwrap(), Command::On);
    assert_eq!("Set Level".parse::<Command>().unwrap(), Command::On);
    assert_eq!("Off".parse::<Command>().unwrap(), Command::Off);
    assert!(matches!(
        "Toggle".parse::<Command>(),
        Err(StateError::UnknownCommand(name)) if name == "Toggle"
    ));
}
