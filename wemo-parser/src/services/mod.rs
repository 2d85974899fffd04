//! Service-specific parsers organized by WEMO UPnP service
//!
//! - [`basic_event`]: on/off switches (`urn:Belkin:service:basicevent:1`)
//! - [`bridge`]: WEMO Link bridges and their LEDs/groups (`urn:Belkin:service:bridge:1`)

pub mod basic_event;
pub mod bridge;
