//! Error types for wemo-state

use thiserror::Error;

use crate::model::Unit;

/// Result type for wemo-state operations
pub type Result<T> = std::result::Result<T, StateError>;

/// Errors that can occur in discovery, reconciliation and dispatch
///
/// Transport and parse failures never appear here: they are folded into
/// device timeouts before reaching this layer.
#[derive(Debug, Error)]
pub enum StateError {
    /// The hub has no device registered under this unit
    #[error("Unknown unit {0}")]
    UnknownUnit(Unit),

    /// The unit's device is not currently mapped to any discovered node
    #[error("Device {device_id} is not available (not discovered or disconnected)")]
    DeviceUnavailable { device_id: String },

    /// All units 1..=254 are taken
    #[error("No free unit left for device {0}")]
    RegistryFull(String),

    /// The host registry rejected a request
    #[error("Registry error: {0}")]
    Registry(String),

    /// Command name the hub sent is not supported
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// SSDP could not run at all this cycle
    #[error("Discovery error: {0}")]
    Discovery(#[from] wemo_discovery::DiscoveryError),

    /// Invalid debug level in configuration
    #[error("Invalid debug level: {0}")]
    InvalidDebugLevel(String),

    /// The background worker is not running
    #[error("Poll worker is not running")]
    WorkerStopped,

    /// Failed to start the background worker
    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// Node processing panicked; contained by the poll cycle
    #[error("Node processing panicked: {0}")]
    Panicked(String),
}
