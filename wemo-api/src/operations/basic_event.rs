//! basicevent operations for plain on/off switches

use wemo_parser::{friendly_name, BinaryState};

use crate::{Service, WemoOperation};

/// Read the relay state
pub struct GetBinaryStateOperation;

impl WemoOperation for GetBinaryStateOperation {
    type Request = ();
    type Response = BinaryState;

    const SERVICE: Service = Service::BasicEvent;
    const ACTION: &'static str = "GetBinaryState";

    fn build_payload(_request: &Self::Request) -> String {
        "<BinaryState>1</BinaryState>".to_string()
    }

    fn parse_response(body: &str) -> Self::Response {
        BinaryState::parse(body)
    }
}

/// Switch the relay; the device echoes the resulting state
pub struct SetBinaryStateOperation;

impl WemoOperation for SetBinaryStateOperation {
    /// `true` for on
    type Request = bool;
    type Response = BinaryState;

    const SERVICE: Service = Service::BasicEvent;
    const ACTION: &'static str = "SetBinaryState";

    fn build_payload(on: &Self::Request) -> String {
        format!("<BinaryState>{}</BinaryState>", if *on { 1 } else { 0 })
    }

    fn parse_response(body: &str) -> Self::Response {
        BinaryState::parse(body)
    }
}

/// Name the user gave the switch in the WEMO app
pub struct GetFriendlyNameOperation;

impl WemoOperation for GetFriendlyNameOperation {
    type Request = ();
    type Response = Option<String>;

    const SERVICE: Service = Service::BasicEvent;
    const ACTION: &'static str = "GetFriendlyName";

    fn build_payload(_request: &Self::Request) -> String {
        "<FriendlyName></FriendlyName>".to_string()
    }

    fn parse_response(body: &str) -> Self::Response {
        friendly_name(body)
    }
}
