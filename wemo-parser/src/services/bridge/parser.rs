//! bridge response parsing
//!
//! Bridge responses carry an XML-escaped document inside the SOAP body.
//! Every parser here decodes the body once and then scans the inner
//! document with the tag extractor.

use std::collections::HashSet;

use crate::common::xml_decode::{extract_elements, first_element, unescape};
use crate::error::{ParseError, ParseResult};

/// A group defined on the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    /// Group identifier; lives in the same namespace as LED DeviceIDs
    pub id: String,
    /// Name chosen in the WEMO app
    pub name: String,
    /// DeviceIDs of the LEDs in this group
    pub members: Vec<String>,
}

/// An LED paired with the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedEntry {
    pub id: String,
    pub name: String,
}

/// Parsed `GetEndDevices` (`SCAN_LIST`) response
///
/// `leds` lists every `DeviceInfo` in the payload, including the ones nested
/// inside a group. Deciding which of them are standalone is the caller's job
/// since it needs the membership of every group at once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndDevices {
    pub groups: Vec<GroupEntry>,
    pub leds: Vec<LedEntry>,
}

impl EndDevices {
    /// Parse a raw `GetEndDevices` SOAP response body
    pub fn parse(body: &str) -> Self {
        let scan = unescape(body);

        // GroupInfo blocks, GroupName and GroupID come back in the same order;
        // the three sequences are aligned by index.
        let group_infos = extract_elements(&scan, "GroupInfo");
        let group_names = extract_elements(&scan, "GroupName");
        let group_ids = extract_elements(&scan, "GroupID");

        let groups = group_names
            .into_iter()
            .zip(group_ids)
            .enumerate()
            .map(|(index, (name, id))| GroupEntry {
                id,
                name,
                members: group_infos
                    .get(index)
                    .map(|block| extract_elements(block, "DeviceID"))
                    .unwrap_or_default(),
            })
            .collect();

        let leds = extract_elements(&scan, "FriendlyName")
            .into_iter()
            .zip(extract_elements(&scan, "DeviceID"))
            .map(|(name, id)| LedEntry { id, name })
            .collect();

        Self { groups, leds }
    }

    /// Every DeviceID that belongs to at least one group
    pub fn group_members(&self) -> HashSet<&str> {
        self.groups
            .iter()
            .flat_map(|group| group.members.iter().map(String::as_str))
            .collect()
    }

    /// Group identifiers in payload order
    pub fn group_ids(&self) -> Vec<String> {
        self.groups.iter().map(|group| group.id.clone()).collect()
    }
}

/// One `CapabilityValue` record from `GetDeviceStatus`
///
/// The record is comma separated. The first field is the on/off flag, the
/// second is `level:transition`. An LED the bridge cannot reach reports an
/// empty level field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityRecord {
    pub on: bool,
    /// Brightness 0-255, `None` when unreachable
    pub raw_level: Option<u8>,
}

impl CapabilityRecord {
    /// Lenient parse: a level that is not a number in 0-255 reads as
    /// unreachable.
    pub fn parse(value: &str) -> Self {
        Self::try_parse(value).unwrap_or(Self {
            on: on_flag(value),
            raw_level: None,
        })
    }

    /// Strict parse: an empty level field is unreachable, anything else must
    /// be a brightness in 0-255.
    pub fn try_parse(value: &str) -> ParseResult<Self> {
        let mut fields = value.split(',');
        fields.next();

        let raw_level = match fields.next().filter(|field| !field.is_empty()) {
            None => None,
            Some(field) => {
                let level = match field.rfind(':') {
                    Some(pos) => &field[..pos],
                    None => field,
                };
                let raw = level.trim().parse::<u8>().map_err(|_| ParseError::InvalidValue {
                    field: "CapabilityValue",
                    value: field.to_string(),
                })?;
                Some(raw)
            }
        };

        Ok(Self {
            on: on_flag(value),
            raw_level,
        })
    }

    pub fn is_reachable(&self) -> bool {
        self.raw_level.is_some()
    }
}

fn on_flag(value: &str) -> bool {
    !value.split(',').next().unwrap_or_default().starts_with('0')
}

/// Parsed `GetDeviceStatus` response
///
/// Records are positional: the n-th record belongs to the n-th DeviceID of
/// the request that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceStatusList {
    pub records: Vec<CapabilityRecord>,
}

impl DeviceStatusList {
    pub fn parse(body: &str) -> Self {
        let state = unescape(body);
        let records = extract_elements(&state, "CapabilityValue")
            .iter()
            .map(|value| CapabilityRecord::parse(value))
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// DeviceIDs the bridge rejected in a `SetDeviceStatus` response
pub fn error_device_ids(body: &str) -> Vec<String> {
    first_element(&unescape(body), "ErrorDeviceIDs")
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .collect()
}
