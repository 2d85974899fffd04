//! # wemo-parser
//!
//! Parsing for the fixed-shape, namespace-free payloads WEMO devices return
//! over UPnP SOAP. There is deliberately no full XML parser here: responses
//! are scanned for tag-scoped text with [`extract_elements`], and the bridge
//! payloads (which arrive XML-escaped inside the SOAP body) are decoded once
//! with [`unescape`] first.
//!
//! ## Usage
//!
//! ```rust
//! use wemo_parser::{extract_elements, BinaryState};
//!
//! let body = "<s:Body><BinaryState>1</BinaryState></s:Body>";
//! assert_eq!(extract_elements(body, "BinaryState"), vec!["1".to_string()]);
//! assert_eq!(BinaryState::parse(body), BinaryState::On);
//! ```

pub mod common;
pub mod error;
pub mod services;

pub use error::{ParseError, ParseResult};

pub use common::level::{percent_to_raw, raw_to_group_percent, raw_to_percent};
pub use common::xml_decode::{extract_elements, first_element, try_unescape, unescape};

pub use services::basic_event::{friendly_name, BinaryState};
pub use services::bridge::{
    error_device_ids, CapabilityRecord, DeviceStatusList, EndDevices, GroupEntry, LedEntry,
};
