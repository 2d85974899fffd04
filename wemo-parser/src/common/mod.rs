//! Shared scanning and conversion helpers used by every service parser

pub mod level;
pub mod xml_decode;
