//! Device status as reported to the host registry

use std::fmt;
use std::str::FromStr;

use crate::StateError;

/// How the hub should present a device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Plain on/off switch
    Switch,
    /// Dimmable LED or bridge group
    Dimmer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PowerState {
    #[default]
    Off,
    On,
}

impl PowerState {
    pub fn from_on(on: bool) -> Self {
        if on {
            PowerState::On
        } else {
            PowerState::Off
        }
    }

    pub fn is_on(self) -> bool {
        self == PowerState::On
    }
}

/// Status of one unit
///
/// Reachable-on, reachable-off and unreachable (`timed_out`) are the three
/// states the hub distinguishes. `level` is only present for dimmers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DeviceStatus {
    pub power: PowerState,
    /// 0-100
    pub level: Option<u8>,
    pub timed_out: bool,
}

impl DeviceStatus {
    pub fn switch(on: bool, timed_out: bool) -> Self {
        Self {
            power: PowerState::from_on(on),
            level: None,
            timed_out,
        }
    }

    pub fn dimmer(on: bool, level: u8, timed_out: bool) -> Self {
        Self {
            power: PowerState::from_on(on),
            level: Some(level.min(100)),
            timed_out,
        }
    }

    /// Dimmer that did not answer: off, level forced to 0
    pub fn unreachable_dimmer() -> Self {
        Self::dimmer(false, 0, true)
    }

    /// Anything not yet seen on the network
    pub fn unreachable() -> Self {
        Self::switch(false, true)
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let power = if self.power.is_on() { "On" } else { "Off" };
        match self.level {
            Some(level) => write!(f, "{}:{}", power, level)?,
            None => write!(f, "{}", power)?,
        }
        if self.timed_out {
            write!(f, " (timed out)")?;
        }
        Ok(())
    }
}

/// Command sent by the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    On,
    Off,
}

impl Command {
    pub fn is_on(self) -> bool {
        self == Command::On
    }
}

impl FromStr for Command {
    type Err = StateError;

    /// Accepts the hub's command names. A dimmer slider move arrives as
    /// `Set Level` and means "on at this level".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "On" | "on" | "Set Level" => Ok(Command::On),
            "Off" | "off" => Ok(Command::Off),
            other => Err(StateError::UnknownCommand(other.to_string())),
        }
    }
}
