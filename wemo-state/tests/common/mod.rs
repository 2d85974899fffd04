//! Test doubles shared by the engine integration tests
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::{Duration, Instant};

use wemo_api::SoapTransport;
use wemo_state::{
    DeviceKind, DeviceRegistry, DeviceStatus, Discoverer, MemoryRegistry, Result, StateError, Unit,
};

pub const BRIDGE_UDN: &str = "uuid:Bridge-1_0-231442B0100A0B";
pub const BRIDGE_LOCATION: &str = "http://10.0.0.9:49153";
pub const SWITCH_UDN: &str = "uuid:Socket-1_0-221517K0101769";
pub const SWITCH_LOCATION: &str = "http://10.0.0.5:49153";
pub const SWITCH_DEVICE_ID: &str = "221517K0101769";

/// One request seen by [`FakeTransport`]
#[derive(Debug, Clone)]
pub struct SoapRequest {
    pub url: String,
    pub action: String,
    pub body: String,
}

/// In-memory SOAP transport answering by (location, action)
#[derive(Default)]
pub struct FakeTransport {
    responses: Mutex<HashMap<(String, String), String>>,
    requests: Mutex<Vec<SoapRequest>>,
    panicking: Mutex<HashSet<String>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, location: &str, action: &str, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert((location.to_string(), action.to_string()), body.into());
    }

    /// Make `action` at `location` go unanswered
    pub fn silence(&self, location: &str, action: &str) {
        self.responses
            .lock()
            .unwrap()
            .remove(&(location.to_string(), action.to_string()));
    }

    /// Panic on any request to `location`
    pub fn panic_on(&self, location: &str) {
        self.panicking.lock().unwrap().insert(location.to_string());
    }

    pub fn requests(&self) -> Vec<SoapRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_for(&self, action: &str) -> Vec<SoapRequest> {
        self.requests()
            .into_iter()
            .filter(|request| request.action == action)
            .collect()
    }

    pub fn clear_requests(&self) {
        self.requests.lock().unwrap().clear();
    }
}

impl SoapTransport for FakeTransport {
    fn post(&self, url: &str, soap_action: &str, body: &str) -> String {
        let action = soap_action
            .trim_matches('"')
            .rsplit('#')
            .next()
            .unwrap_or_default()
            .to_string();

        self.requests.lock().unwrap().push(SoapRequest {
            url: url.to_string(),
            action: action.clone(),
            body: body.to_string(),
        });

        let panics = self
            .panicking
            .lock()
            .unwrap()
            .iter()
            .any(|location| url.starts_with(location.as_str()));
        if panics {
            panic!("transport exploded for {}", url);
        }

        self.responses
            .lock()
            .unwrap()
            .iter()
            .find(|((location, act), _)| url.starts_with(location.as_str()) && *act == action)
            .map(|(_, body)| body.clone())
            .unwrap_or_default()
    }
}

/// Discoverer returning a fixed, editable set of nodes
#[derive(Clone, Default)]
pub struct StaticDiscoverer {
    nodes: Arc<Mutex<HashMap<String, String>>>,
    failing: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl StaticDiscoverer {
    pub fn new(nodes: &[(&str, &str)]) -> Self {
        let discoverer = Self::default();
        for (udn, location) in nodes {
            discoverer.set(udn, location);
        }
        discoverer
    }

    pub fn set(&self, udn: &str, location: &str) {
        self.nodes
            .lock()
            .unwrap()
            .insert(udn.to_string(), location.to_string());
    }

    pub fn remove(&self, udn: &str) {
        self.nodes.lock().unwrap().remove(udn);
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Discoverer for StaticDiscoverer {
    fn discover(&self) -> Result<HashMap<String, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(StateError::Discovery(wemo_discovery::DiscoveryError::NetworkError(
                "no multicast route".to_string(),
            )));
        }
        Ok(self.nodes.lock().unwrap().clone())
    }
}

/// Discoverer that blocks every pass until released
#[derive(Clone)]
pub struct GatedDiscoverer {
    gate: Arc<Mutex<mpsc::Receiver<()>>>,
    calls: Arc<AtomicUsize>,
}

impl GatedDiscoverer {
    /// The sender releases one blocked pass per message
    pub fn new() -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        (
            Self {
                gate: Arc::new(Mutex::new(rx)),
                calls: Arc::new(AtomicUsize::new(0)),
            },
            tx,
        )
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Discoverer for GatedDiscoverer {
    fn discover(&self) -> Result<HashMap<String, String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _ = self.gate.lock().unwrap().recv_timeout(Duration::from_secs(10));
        Ok(HashMap::new())
    }
}

/// [`MemoryRegistry`] that counts writes
#[derive(Default)]
pub struct RecordingRegistry {
    pub inner: MemoryRegistry,
    creates: AtomicUsize,
    updates: AtomicUsize,
}

impl RecordingRegistry {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn creates(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.updates.load(Ordering::SeqCst)
    }

    pub fn unit(&self, device_id: &str) -> Unit {
        self.find_unit_by_device_id(device_id)
            .unwrap_or_else(|| panic!("{} is not registered", device_id))
    }

    pub fn status_of(&self, device_id: &str) -> DeviceStatus {
        self.status(self.unit(device_id)).unwrap()
    }
}

impl DeviceRegistry for RecordingRegistry {
    fn find_unit_by_device_id(&self, device_id: &str) -> Option<Unit> {
        self.inner.find_unit_by_device_id(device_id)
    }

    fn list_existing_units(&self) -> Vec<Unit> {
        self.inner.list_existing_units()
    }

    fn create_device(
        &self,
        unit: Unit,
        name: &str,
        device_id: &str,
        kind: DeviceKind,
    ) -> Result<()> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.inner.create_device(unit, name, device_id, kind)
    }

    fn update_device_state(&self, unit: Unit, status: DeviceStatus) -> bool {
        let changed = self.inner.update_device_state(unit, status);
        if changed {
            self.updates.fetch_add(1, Ordering::SeqCst);
        }
        changed
    }

    fn device_id(&self, unit: Unit) -> Option<String> {
        self.inner.device_id(unit)
    }

    fn status(&self, unit: Unit) -> Option<DeviceStatus> {
        self.inner.status(unit)
    }
}

pub fn unit(n: u8) -> Unit {
    Unit::new(n).unwrap()
}

/// Poll `condition` until it holds or `timeout` passes
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    condition()
}

fn escape(xml: &str) -> String {
    xml.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A group as listed by `GetEndDevices`: (id, name, [(member id, member name)])
pub type GroupFixture<'a> = (&'a str, &'a str, &'a [(&'a str, &'a str)]);

fn device_info(id: &str, name: &str) -> String {
    format!(
        "<DeviceInfo><DeviceID>{}</DeviceID><FriendlyName>{}</FriendlyName></DeviceInfo>",
        id, name
    )
}

/// `GetEndDevices` response with `leds` at top level and `groups` after them
pub fn end_devices(leds: &[(&str, &str)], groups: &[GroupFixture<'_>]) -> String {
    let mut inner = String::from(r#"<?xml version="1.0" encoding="utf-8"?><DeviceLists><DeviceList>"#);
    inner.push_str("<DeviceInfos>");
    for (id, name) in leds {
        inner.push_str(&device_info(id, name));
    }
    inner.push_str("</DeviceInfos><GroupInfos>");
    for (id, name, members) in groups {
        inner.push_str(&format!(
            "<GroupInfo><GroupID>{}</GroupID><GroupName>{}</GroupName><DeviceInfos>",
            id, name
        ));
        for (member, member_name) in members.iter() {
            inner.push_str(&device_info(member, member_name));
        }
        inner.push_str("</DeviceInfos></GroupInfo>");
    }
    inner.push_str("</GroupInfos></DeviceList></DeviceLists>");

    format!(
        concat!(
            r#"<?xml version="1.0"?><s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body>"#,
            r#"<u:GetEndDevicesResponse xmlns:u="urn:Belkin:service:bridge:1"><DeviceLists>{}</DeviceLists>"#,
            "</u:GetEndDevicesResponse></s:Body></s:Envelope>"
        ),
        escape(&inner)
    )
}

/// `GetDeviceStatus` response with one record per value, in order
pub fn device_status(values: &[&str]) -> String {
    let mut inner = String::from("<DeviceStatusList>");
    for value in values {
        inner.push_str(&format!(
            "<DeviceStatus><CapabilityID>10006,10008</CapabilityID><CapabilityValue>{}</CapabilityValue></DeviceStatus>",
            value
        ));
    }
    inner.push_str("</DeviceStatusList>");

    format!(
        "<s:Envelope><s:Body><u:GetDeviceStatusResponse><DeviceStatusList>{}</DeviceStatusList></u:GetDeviceStatusResponse></s:Body></s:Envelope>",
        escape(&inner)
    )
}

pub fn set_device_status_ok() -> String {
    set_device_status_rejecting("")
}

pub fn set_device_status_rejecting(ids: &str) -> String {
    format!(
        "<s:Envelope><s:Body><u:SetDeviceStatusResponse><ErrorDeviceIDs>{}</ErrorDeviceIDs></u:SetDeviceStatusResponse></s:Body></s:Envelope>",
        ids
    )
}

pub fn binary_state(value: &str) -> String {
    format!(
        "<s:Envelope><s:Body><u:GetBinaryStateResponse><BinaryState>{}</BinaryState></u:GetBinaryStateResponse></s:Body></s:Envelope>",
        value
    )
}

pub fn friendly_name(name: &str) -> String {
    format!(
        "<s:Envelope><s:Body><u:GetFriendlyNameResponse><FriendlyName>{}</FriendlyName></u:GetFriendlyNameResponse></s:Body></s:Envelope>",
        name
    )
}

pub const LIVING_MEMBERS: &[(&str, &str)] = &[("LED-SOFA", "Sofa"), ("LED-TV", "TV")];
pub const HALL_MEMBERS: &[(&str, &str)] = &[("LED-HALL", "Hall Bulb")];

/// Living room group (sofa, TV), hall group (hall bulb) and a standalone desk LED
pub fn living_room_bridge(transport: &FakeTransport) {
    transport.respond(
        BRIDGE_LOCATION,
        "GetEndDevices",
        end_devices(
            &[("LED-DESK", "Desk")],
            &[
                ("G-LIVING", "Living Room", LIVING_MEMBERS),
                ("G-HALL", "Hall", HALL_MEMBERS),
            ],
        ),
    );
}

/// Device order the engine uses for `living_room_bridge`:
/// groups, then every LED in payload order
pub const LIVING_ROOM_ORDER: [&str; 6] = ["G-LIVING", "G-HALL", "LED-DESK", "LED-SOFA", "LED-TV", "LED-HALL"];

pub fn coffee_switch(transport: &FakeTransport, state: &str) {
    transport.respond(SWITCH_LOCATION, "GetFriendlyName", friendly_name("Coffee Maker"));
    transport.respond(SWITCH_LOCATION, "GetBinaryState", binary_state(state));
}
