//! Conversions between the hub's 0-100 dimmer scale and the bridge's 0-255
//! brightness scale.
//!
//! Individual devices and groups are read back with different formulas:
//! devices round to nearest, groups truncate. Real bridges have only ever
//! been observed through these two paths, so both are kept as they are.

/// Hub level (0-100) to bridge brightness (0-255), rounding half up.
///
/// Values above 100 are clamped.
pub fn percent_to_raw(percent: u8) -> u8 {
    let percent = u32::from(percent.min(100));
    ((percent * 255 + 50) / 100) as u8
}

/// Bridge brightness to hub level for an individual LED, rounding to nearest.
///
/// `raw * 100 / 255` never lands exactly on a half, so no tie rule is needed.
pub fn raw_to_percent(raw: u8) -> u8 {
    ((u32::from(raw) * 200 + 255) / 510) as u8
}

/// Bridge brightness to hub level for a group, truncating.
pub fn raw_to_group_percent(raw: u8) -> u8 {
    (u32::from(raw) * 100 / 255) as u8
}
