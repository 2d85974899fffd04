//! Typed WEMO UPnP SOAP actions
//!
//! Covers the two Belkin services the engine needs:
//!
//! - `urn:Belkin:service:basicevent:1` at `{location}/upnp/control/basicevent1`
//!   (`GetBinaryState`, `SetBinaryState`, `GetFriendlyName`)
//! - `urn:Belkin:service:bridge:1` at `{location}/upnp/control/bridge1`
//!   (`GetEndDevices`, `GetDeviceStatus`, `SetDeviceStatus`)
//!
//! Each action is a [`WemoOperation`]; [`WemoClient`] runs them over a
//! [`SoapTransport`].

pub mod client;
pub mod operation;
pub mod operations;
pub mod service;

pub use client::WemoClient;
pub use operation::{envelope, WemoOperation};
pub use operations::{DeviceStatusCommand, SetDeviceStatusResponse};
pub use service::{Service, ServiceInfo};

pub use soap_client::{SoapClient, SoapTransport};
