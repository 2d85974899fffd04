//! basicevent response parsing

use crate::common::xml_decode::{first_element, unescape};

/// Binary state reported by a plain WEMO switch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BinaryState {
    /// `0`
    Off,
    /// `1`
    On,
    /// Some other non-empty value (Insight firmware reports extra states)
    Unknown(String),
    /// Empty response or no `BinaryState` element: the device did not answer
    Missing,
}

impl BinaryState {
    /// Parse a `GetBinaryState`/`SetBinaryState` response body
    pub fn parse(body: &str) -> Self {
        if body.is_empty() {
            return BinaryState::Missing;
        }

        match first_element(&unescape(body), "BinaryState").as_str() {
            "" => BinaryState::Missing,
            "0" => BinaryState::Off,
            "1" => BinaryState::On,
            other => BinaryState::Unknown(other.to_string()),
        }
    }
}

/// Friendly name from a `GetFriendlyName` response, if any
pub fn friendly_name(body: &str) -> Option<String> {
    let name = first_element(&unescape(body), "FriendlyName");
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}
