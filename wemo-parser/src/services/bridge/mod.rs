//! bridge service parser module
//!
//! ```rust,ignore
//! use wemo_parser::services::bridge::EndDevices;
//!
//! let topology = EndDevices::parse(&response_body);
//! for group in &topology.groups {
//!     println!("{} has {} members", group.name, group.members.len());
//! }
//! ```

pub mod parser;

pub use parser::{
    error_device_ids, CapabilityRecord, DeviceStatusList, EndDevices, GroupEntry, LedEntry,
};
