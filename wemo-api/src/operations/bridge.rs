//! bridge operations for WEMO Link LEDs and groups
//!
//! `SetDeviceStatus` takes a whole XML document as the text of its
//! `DeviceStatusList` argument, so that document is escaped before it goes
//! into the envelope.

use quick_xml::escape::escape;
use wemo_parser::{error_device_ids, percent_to_raw, DeviceStatusList, EndDevices};

use crate::{Service, WemoOperation};

/// Capability controlling on/off and brightness
pub const LEVEL_CAPABILITY_ID: &str = "10008";

/// List the bridge's paired LEDs and groups
pub struct GetEndDevicesOperation;

impl WemoOperation for GetEndDevicesOperation {
    /// UDN of the bridge being asked
    type Request = String;
    type Response = EndDevices;

    const SERVICE: Service = Service::Bridge;
    const ACTION: &'static str = "GetEndDevices";

    fn build_payload(udn: &Self::Request) -> String {
        format!(
            "<ReqListType>SCAN_LIST</ReqListType><DevUDN>{}</DevUDN>",
            escape(udn.as_str())
        )
    }

    fn parse_response(body: &str) -> Self::Response {
        EndDevices::parse(body)
    }
}

/// Bulk status query; records come back in request order
pub struct GetDeviceStatusOperation;

impl WemoOperation for GetDeviceStatusOperation {
    type Request = Vec<String>;
    type Response = DeviceStatusList;

    const SERVICE: Service = Service::Bridge;
    const ACTION: &'static str = "GetDeviceStatus";

    fn build_payload(device_ids: &Self::Request) -> String {
        format!("<DeviceIDs>{}</DeviceIDs>", escape(device_ids.join(",").as_str()))
    }

    fn parse_response(body: &str) -> Self::Response {
        DeviceStatusList::parse(body)
    }
}

/// Level command for one LED or group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceStatusCommand {
    pub device_id: String,
    /// Bridge brightness 0-255; 0 switches off
    pub raw_level: u8,
    /// Address a group rather than an individual LED
    pub is_group: bool,
}

impl DeviceStatusCommand {
    /// Build from a hub on/off + 0-100 level pair
    pub fn new(device_id: impl Into<String>, on: bool, percent: u8, is_group: bool) -> Self {
        Self {
            device_id: device_id.into(),
            raw_level: if on { percent_to_raw(percent) } else { 0 },
            is_group,
        }
    }

    /// `CapabilityValue` text, `<level>:0` (no transition time)
    pub fn capability_value(&self) -> String {
        format!("{}:0", self.raw_level)
    }

    fn document(&self) -> String {
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "<DeviceStatus><DeviceID>{}</DeviceID>",
                "<CapabilityID>{}</CapabilityID>",
                "<CapabilityValue>{}</CapabilityValue>",
                "<IsGroupAction>{}</IsGroupAction></DeviceStatus>",
            ),
            self.device_id,
            LEVEL_CAPABILITY_ID,
            self.capability_value(),
            if self.is_group { "YES" } else { "NO" },
        )
    }
}

/// Outcome of a `SetDeviceStatus` call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDeviceStatusResponse {
    /// The bridge answered at all
    pub responded: bool,
    /// DeviceIDs the bridge reported as failed
    pub error_device_ids: Vec<String>,
}

impl SetDeviceStatusResponse {
    pub fn is_accepted(&self) -> bool {
        self.responded && self.error_device_ids.is_empty()
    }
}

pub struct SetDeviceStatusOperation;

impl WemoOperation for SetDeviceStatusOperation {
    type Request = DeviceStatusCommand;
    type Response = SetDeviceStatusResponse;

    const SERVICE: Service = Service::Bridge;
    const ACTION: &'static str = "SetDeviceStatus";

    fn build_payload(command: &Self::Request) -> String {
        format!(
            "<DeviceStatusList>{}</DeviceStatusList>",
            escape(command.document().as_str())
        )
    }

    fn parse_response(body: &str) -> Self::Response {
        SetDeviceStatusResponse {
            responded: !body.is_empty(),
            error_device_ids: error_device_ids(body),
        }
    }
}
