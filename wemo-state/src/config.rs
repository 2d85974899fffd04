//! Engine configuration
//!
//! The hub hands plugins a flat parameter map; the only required entry is
//! the debug verbosity. Timeouts are tunable for tests and slow networks.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Deserializer};

use crate::StateError;

/// Hub debug verbosity option set
///
/// The discriminants are the values the hub stores for each option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum DebugLevel {
    #[default]
    None,
    PythonOnly,
    Basic,
    BasicMessages,
    ConnectionsOnly,
    ConnectionsPython,
    ConnectionsQueue,
    All,
}

impl DebugLevel {
    /// Value the hub stores for this option
    pub fn value(self) -> i32 {
        match self {
            DebugLevel::None => 0,
            DebugLevel::PythonOnly => 2,
            DebugLevel::Basic => 62,
            DebugLevel::BasicMessages => 126,
            DebugLevel::ConnectionsOnly => 16,
            DebugLevel::ConnectionsPython => 18,
            DebugLevel::ConnectionsQueue => 144,
            DebugLevel::All => -1,
        }
    }

    pub fn from_value(value: i32) -> Option<Self> {
        [
            DebugLevel::None,
            DebugLevel::PythonOnly,
            DebugLevel::Basic,
            DebugLevel::BasicMessages,
            DebugLevel::ConnectionsOnly,
            DebugLevel::ConnectionsPython,
            DebugLevel::ConnectionsQueue,
            DebugLevel::All,
        ]
        .into_iter()
        .find(|level| level.value() == value)
    }

    /// Default `tracing` filter directives for this option
    ///
    /// "Python" options open up the engine itself, "Connections" options
    /// open up the wire crates.
    pub fn filter_directives(self) -> &'static str {
        match self {
            DebugLevel::None => "info",
            DebugLevel::PythonOnly => "info,wemo_state=debug",
            DebugLevel::Basic => "debug",
            DebugLevel::BasicMessages => "debug,wemo_api=trace",
            DebugLevel::ConnectionsOnly => "info,soap_client=debug,wemo_discovery=debug",
            DebugLevel::ConnectionsPython => {
                "info,wemo_state=debug,wemo_api=debug,soap_client=debug,wemo_discovery=debug"
            }
            DebugLevel::ConnectionsQueue => "info,soap_client=trace,wemo_discovery=trace",
            DebugLevel::All => "trace",
        }
    }

    pub fn is_enabled(self) -> bool {
        self != DebugLevel::None
    }
}

impl FromStr for DebugLevel {
    type Err = StateError;

    /// Accepts the stored numeric value or the option name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i32>() {
            return Self::from_value(value)
                .ok_or_else(|| StateError::InvalidDebugLevel(s.to_string()));
        }

        match s.to_ascii_lowercase().replace([' ', '_', '-', '+'], "").as_str() {
            "none" => Ok(DebugLevel::None),
            "pythononly" => Ok(DebugLevel::PythonOnly),
            "basic" | "basicdebugging" => Ok(DebugLevel::Basic),
            "basicmessages" | "basicplusmessages" => Ok(DebugLevel::BasicMessages),
            "connectionsonly" => Ok(DebugLevel::ConnectionsOnly),
            "connectionspython" | "connectionsandpython" => Ok(DebugLevel::ConnectionsPython),
            "connectionsqueue" | "connectionsandqueue" => Ok(DebugLevel::ConnectionsQueue),
            "all" => Ok(DebugLevel::All),
            _ => Err(StateError::InvalidDebugLevel(s.to_string())),
        }
    }
}

impl TryFrom<String> for DebugLevel {
    type Error = StateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for DebugLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.value())
    }
}

/// Configuration for [`crate::WemoEngine`]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub debug_level: DebugLevel,
    /// How long each SSDP pass listens for answers
    #[serde(rename = "discovery_window_secs", deserialize_with = "seconds")]
    pub discovery_window: Duration,
    /// Per-request SOAP timeout
    #[serde(rename = "http_timeout_secs", deserialize_with = "seconds")]
    pub http_timeout: Duration,
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_level(mut self, debug_level: DebugLevel) -> Self {
        self.debug_level = debug_level;
        self
    }

    pub fn with_discovery_window(mut self, window: Duration) -> Self {
        self.discovery_window = window;
        self
    }

    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug_level: DebugLevel::None,
            discovery_window: wemo_discovery::DEFAULT_WINDOW,
            http_timeout: soap_client::DEFAULT_TIMEOUT,
        }
    }
}

fn seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = f64::deserialize(deserializer)?;
    if secs.is_finite() && secs >= 0.0 {
        Ok(Duration::from_secs_f64(secs))
    } else {
        Err(serde::de::Error::custom(format!("invalid duration: {}", secs)))
    }
}
