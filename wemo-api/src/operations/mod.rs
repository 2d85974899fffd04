//! Operation definitions grouped by service

pub mod basic_event;
pub mod bridge;

pub use basic_event::{GetBinaryStateOperation, GetFriendlyNameOperation, SetBinaryStateOperation};
pub use bridge::{
    DeviceStatusCommand, GetDeviceStatusOperation, GetEndDevicesOperation, SetDeviceStatusOperation,
    SetDeviceStatusResponse,
};
